use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{extract::Request, middleware::Next, Router};
use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::Fake;
use uuid::Uuid;

use crate::features::address_book::services::{AddressBookService, EmailDispatchService};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::categories::models::{Category, NewCategory};
use crate::features::categories::{self, CategoryService};
use crate::features::contacts::dtos::{CreateContactDto, UpdateContactDto};
use crate::features::contacts::models::{Contact, ContactFields, NewContact, UsState};
use crate::features::contacts::{self, ContactService};
use crate::features::users::{self, UserProfileService};
use crate::modules::email::{EmailSender, NotificationError};
use crate::modules::images::ImageService;
use crate::modules::persistence::memory::MemoryStore;
use crate::modules::persistence::{CategoryRepository, ContactRepository, Repositories};

pub fn test_user(sub: &str) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: sub.to_string(),
        email: Some(format!("{}@example.com", sub)),
    }
}

/// Stand in for the JWT middleware: every request runs as `user`
pub fn with_user_auth(router: Router, user: AuthenticatedUser) -> Router {
    router.layer(axum::middleware::from_fn(
        move |mut request: Request, next: Next| {
            let user = user.clone();
            async move {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
        },
    ))
}

pub fn contact_fields(first_name: &str, last_name: &str) -> ContactFields {
    ContactFields {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date: None,
        address1: "1 Main St".to_string(),
        address2: None,
        city: "Austin".to_string(),
        state: UsState::TX.code().to_string(),
        zip_code: 73301,
        email: SafeEmail().fake(),
        phone_number: "555-123-4567".to_string(),
    }
}

/// Unsaved contact row, for pure functions like search
pub fn contact_row(first_name: &str, last_name: &str) -> Contact {
    let f = contact_fields(first_name, last_name);
    let now = Utc::now();
    Contact {
        id: Uuid::new_v4(),
        owner_id: "user-1".to_string(),
        first_name: f.first_name,
        last_name: f.last_name,
        birth_date: f.birth_date,
        address1: f.address1,
        address2: f.address2,
        city: f.city,
        state: f.state,
        zip_code: f.zip_code,
        email: f.email,
        phone_number: f.phone_number,
        image_data: None,
        image_type: None,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_contact(
    store: &MemoryStore,
    owner_id: &str,
    first_name: &str,
    last_name: &str,
) -> Contact {
    ContactRepository::insert(
        store,
        NewContact {
            owner_id: owner_id.to_string(),
            fields: contact_fields(first_name, last_name),
        },
    )
    .await
    .unwrap()
}

pub async fn seed_contact_with_email(
    store: &MemoryStore,
    owner_id: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
) -> Contact {
    let mut fields = contact_fields(first_name, last_name);
    fields.email = email.to_string();
    ContactRepository::insert(
        store,
        NewContact {
            owner_id: owner_id.to_string(),
            fields,
        },
    )
    .await
    .unwrap()
}

pub async fn seed_category(store: &MemoryStore, owner_id: &str, name: &str) -> Category {
    CategoryRepository::insert(
        store,
        NewCategory {
            owner_id: owner_id.to_string(),
            name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

pub fn create_contact_dto(
    first_name: &str,
    last_name: &str,
    category_ids: Vec<Uuid>,
) -> CreateContactDto {
    CreateContactDto {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date: None,
        address1: "1 Main St".to_string(),
        address2: None,
        city: "Austin".to_string(),
        state: UsState::TX,
        zip_code: 73301,
        email: SafeEmail().fake(),
        phone_number: "555-123-4567".to_string(),
        category_ids,
    }
}

pub fn update_contact_dto(
    first_name: &str,
    last_name: &str,
    version: i32,
    category_ids: Option<Vec<Uuid>>,
) -> UpdateContactDto {
    UpdateContactDto {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        birth_date: None,
        address1: "2 Side St".to_string(),
        address2: None,
        city: "Dallas".to_string(),
        state: UsState::TX,
        zip_code: 75201,
        email: SafeEmail().fake(),
        phone_number: "555-765-4321".to_string(),
        version,
        category_ids,
    }
}

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// EmailSender that records every call and optionally fails
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    calls: Mutex<Vec<SentEmail>>,
    fail: bool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<SentEmail> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotificationError> {
        self.calls.lock().unwrap().push(SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });

        if self.fail {
            Err(NotificationError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

fn repositories(store: &MemoryStore) -> Repositories {
    Repositories::from_store(Arc::new(store.clone()))
}

pub fn address_book_service(store: &MemoryStore) -> AddressBookService {
    AddressBookService::new(&repositories(store))
}

pub fn contact_service(store: &MemoryStore, sender: Arc<dyn EmailSender>) -> ContactService {
    let repos = repositories(store);
    ContactService::new(
        repos.clone(),
        Arc::new(AddressBookService::new(&repos)),
        Arc::new(EmailDispatchService::new(sender)),
        ImageService::default(),
    )
}

pub fn category_service(store: &MemoryStore, sender: Arc<dyn EmailSender>) -> CategoryService {
    let repos = repositories(store);
    CategoryService::new(
        repos.clone(),
        Arc::new(AddressBookService::new(&repos)),
        Arc::new(EmailDispatchService::new(sender)),
    )
}

/// Every protected route over `store`, running as `user`
pub fn test_app(
    store: &MemoryStore,
    sender: Arc<dyn EmailSender>,
    user: AuthenticatedUser,
) -> Router {
    let repos = repositories(store);
    let router = Router::new()
        .merge(users::routes(Arc::new(UserProfileService::new(
            repos.users.clone(),
        ))))
        .merge(contacts::routes(Arc::new(contact_service(
            store,
            sender.clone(),
        ))))
        .merge(categories::routes(Arc::new(category_service(store, sender))));

    with_user_auth(router, user)
}
