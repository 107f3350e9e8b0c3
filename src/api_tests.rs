//! HTTP-level tests over the in-memory store

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::modules::email::EmailSender;
use crate::modules::persistence::memory::MemoryStore;
use crate::shared::test_helpers::{test_app, test_user, RecordingEmailSender};

fn server_for(store: &MemoryStore, sender: Arc<dyn EmailSender>, sub: &str) -> TestServer {
    TestServer::new(test_app(store, sender, test_user(sub))).unwrap()
}

fn contact_body(first_name: &str, last_name: &str, email: &str) -> Value {
    json!({
        "first_name": first_name,
        "last_name": last_name,
        "address1": "1 Main St",
        "city": "Austin",
        "state": "TX",
        "zip_code": 73301,
        "email": email,
        "phone_number": "555-123-4567"
    })
}

async fn create_contact(server: &TestServer, first_name: &str, last_name: &str, email: &str) -> Value {
    let response = server
        .post("/api/contacts")
        .json(&contact_body(first_name, last_name, email))
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

#[tokio::test]
async fn test_create_then_list_echoes_status_message() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    create_contact(&server, "Zoe", "Adams", "zoe@x.com").await;
    create_contact(&server, "Amy", "Brown", "amy@x.com").await;

    let response = server
        .get("/api/contacts")
        .add_query_param("status_message", "Saved")
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["message"], "Saved");
    assert_eq!(body["meta"]["total"], 2);
    assert_eq!(body["data"][0]["full_name"], "Zoe Adams");
    assert_eq!(body["data"][1]["image"], "/img/DefaultContactImage.png");
}

#[tokio::test]
async fn test_validation_errors_are_listed_per_field() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    let mut body = contact_body("A", "Brown", "not-an-email");
    body["zip_code"] = json!(123456);

    let response = server.post("/api/contacts").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body = response.json::<Value>();
    assert_eq!(body["success"], false);
    let errors: Vec<String> = serde_json::from_value(body["errors"].clone()).unwrap();
    assert_eq!(errors.len(), 3);
    assert!(errors[0].starts_with("email:"));
    assert!(errors[1].starts_with("first_name:"));
    assert!(errors[2].starts_with("zip_code:"));
}

#[tokio::test]
async fn test_blank_category_name_is_rejected() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    let response = server
        .post("/api/categories")
        .json(&json!({ "name": "   " }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let errors: Vec<String> =
        serde_json::from_value(response.json::<Value>()["errors"].clone()).unwrap();
    assert_eq!(errors, vec!["name: Name is required".to_string()]);

    let listed = server.get("/api/categories").await.json::<Value>();
    assert_eq!(listed["meta"]["total"], 0);
}

#[tokio::test]
async fn test_other_users_contact_is_not_found() {
    let store = MemoryStore::new();
    let sender = Arc::new(RecordingEmailSender::new());
    let owner = server_for(&store, sender.clone(), "user-1");
    let intruder = server_for(&store, sender.clone(), "user-2");

    let contact = create_contact(&owner, "Amy", "Brown", "amy@x.com").await;
    let id = contact["id"].as_str().unwrap();

    intruder
        .get(&format!("/api/contacts/{}", id))
        .await
        .assert_status_not_found();
    intruder
        .get(&format!("/api/contacts/{}/edit", id))
        .await
        .assert_status_not_found();
    intruder
        .delete(&format!("/api/contacts/{}", id))
        .await
        .assert_status_not_found();
    intruder
        .post(&format!("/api/contacts/{}/email", id))
        .json(&json!({ "email_subject": "Hi", "email_body": "Hello" }))
        .await
        .assert_status_not_found();

    assert!(sender.calls().is_empty());
    let listed = intruder.get("/api/contacts").await.json::<Value>();
    assert_eq!(listed["meta"]["total"], 0);

    owner
        .get(&format!("/api/contacts/{}", id))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_stale_edit_returns_conflict() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    let contact = create_contact(&server, "Amy", "Brown", "amy@x.com").await;
    let id = contact["id"].as_str().unwrap();

    let mut edit = contact_body("Amelia", "Brown", "amy@x.com");
    edit["version"] = json!(1);
    server
        .put(&format!("/api/contacts/{}", id))
        .json(&edit)
        .await
        .assert_status_ok();

    // Same base version again
    server
        .put(&format!("/api/contacts/{}", id))
        .json(&edit)
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_group_email_sends_once_to_joined_members() {
    let store = MemoryStore::new();
    let sender = Arc::new(RecordingEmailSender::new());
    let server = server_for(&store, sender.clone(), "user-1");

    let a = create_contact(&server, "Ann", "Able", "a@x.com").await;
    let b = create_contact(&server, "Bob", "Baker", "b@x.com").await;
    let category = server
        .post("/api/categories")
        .json(&json!({ "name": "Friends", "contact_ids": [a["id"], b["id"]] }))
        .await
        .json::<Value>()["data"]
        .clone();
    let id = category["id"].as_str().unwrap();

    let form = server
        .get(&format!("/api/categories/{}/email", id))
        .await
        .json::<Value>();
    assert_eq!(form["data"]["email_address"], "a@x.com;b@x.com");
    assert_eq!(form["data"]["email_subject"], "Group Message: Friends");

    let response = server
        .post(&format!("/api/categories/{}/email", id))
        .json(&json!({ "email_subject": "Dinner", "email_body": "Friday" }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["data"]["sent"], true);
    assert_eq!(body["message"], "Your Email Has been Sent");

    let calls = sender.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].to, "a@x.com;b@x.com");
}

#[tokio::test]
async fn test_failed_email_is_reported_in_body() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::failing()), "user-1");

    let contact = create_contact(&server, "Amy", "Brown", "amy@x.com").await;
    let id = contact["id"].as_str().unwrap();

    let response = server
        .post(&format!("/api/contacts/{}/email", id))
        .json(&json!({ "email_subject": "Hi", "email_body": "Hello" }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["data"]["sent"], false);
    assert_eq!(body["message"], "Error: Email Send Failed");
    assert_eq!(
        body["data"]["redirect_to"],
        format!(
            "/api/contacts/{}/email?status_message=Error%3A%20Email%20Send%20Failed",
            id
        )
    );
}

#[tokio::test]
async fn test_search_and_membership() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    let amy = create_contact(&server, "Amy", "Brown", "amy@x.com").await;
    let zoe = create_contact(&server, "Zoe", "Clark", "zoe@x.com").await;
    let category = server
        .post("/api/categories")
        .json(&json!({ "name": "Friends", "contact_ids": [amy["id"]] }))
        .await
        .json::<Value>()["data"]
        .clone();

    let found = server
        .get("/api/contacts/search")
        .add_query_param("q", "aM")
        .await
        .json::<Value>();
    assert_eq!(found["meta"]["total"], 1);
    assert_eq!(found["data"][0]["full_name"], "Amy Brown");
    assert_eq!(found["data"][0]["categories"][0]["name"], "Friends");

    let category_id = category["id"].as_str().unwrap();
    let member = server
        .get(&format!(
            "/api/categories/{}/contacts/{}",
            category_id,
            amy["id"].as_str().unwrap()
        ))
        .await
        .json::<Value>();
    assert_eq!(member["data"]["is_member"], true);

    let not_member = server
        .get(&format!(
            "/api/categories/{}/contacts/{}",
            category_id,
            zoe["id"].as_str().unwrap()
        ))
        .await
        .json::<Value>();
    assert_eq!(not_member["data"]["is_member"], false);
}

#[tokio::test]
async fn test_image_upload_returns_data_uri() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    let contact = create_contact(&server, "Amy", "Brown", "amy@x.com").await;
    let id = contact["id"].as_str().unwrap();

    let form = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"abc".to_vec())
            .file_name("amy.png")
            .mime_type("image/png"),
    );
    let response = server
        .put(&format!("/api/contacts/{}/image", id))
        .multipart(form)
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>()["data"]["image"],
        "data:image/png;base64,YWJj"
    );

    let rejected = MultipartForm::new().add_part(
        "image",
        Part::bytes(b"abc".to_vec())
            .file_name("amy.txt")
            .mime_type("text/plain"),
    );
    server
        .put(&format!("/api/contacts/{}/image", id))
        .multipart(rejected)
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_profile_round_trip() {
    let store = MemoryStore::new();
    let server = server_for(&store, Arc::new(RecordingEmailSender::new()), "user-1");

    server
        .put("/api/users/me")
        .json(&json!({ "first_name": "Amy", "last_name": "Brown" }))
        .await
        .assert_status_ok();

    let profile = server.get("/api/users/me").await.json::<Value>();
    assert_eq!(profile["data"]["full_name"], "Amy Brown");
    assert_eq!(profile["data"]["email"], "user-1@example.com");
}
