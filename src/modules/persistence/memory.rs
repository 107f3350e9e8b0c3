use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{CategoryRepository, ContactCategoryRepository, ContactRepository, UserRepository};
use crate::core::error::{AppError, Result};
use crate::features::address_book::models::ContactCategoryLink;
use crate::features::categories::models::{Category, NewCategory};
use crate::features::contacts::models::{Contact, ContactFields, NewContact};
use crate::features::users::models::AppUser;

#[derive(Debug, Default)]
struct State {
    users: HashMap<String, AppUser>,
    contacts: HashMap<Uuid, Contact>,
    categories: HashMap<Uuid, Category>,
    links: Vec<ContactCategoryLink>,
}

/// In-memory store for tests, with the same cascade rules as the schema.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    fail_link_inserts: Arc<AtomicBool>,
    link_insert_calls: Arc<Mutex<usize>>,
    contact_list_calls: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `insert_links` call fail with a pool timeout
    pub fn fail_link_inserts(&self) {
        self.fail_link_inserts.store(true, Ordering::SeqCst);
    }

    pub fn link_insert_calls(&self) -> usize {
        *self.link_insert_calls.lock().unwrap()
    }

    /// Number of full `ContactRepository::list_owned` loads
    pub fn contact_list_calls(&self) -> usize {
        *self.contact_list_calls.lock().unwrap()
    }

    pub fn link_count(&self) -> usize {
        self.state.lock().unwrap().links.len()
    }

    /// Bump a contact's version as if another request saved it first
    pub fn touch_contact(&self, id: Uuid) {
        if let Some(c) = self.state.lock().unwrap().contacts.get_mut(&id) {
            c.version += 1;
        }
    }

    pub fn touch_category(&self, id: Uuid) {
        if let Some(c) = self.state.lock().unwrap().categories.get_mut(&id) {
            c.version += 1;
        }
    }
}

fn sort_contacts(contacts: &mut [Contact]) {
    contacts.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
}

fn apply_fields(contact: &mut Contact, fields: ContactFields) {
    contact.first_name = fields.first_name;
    contact.last_name = fields.last_name;
    contact.birth_date = fields.birth_date;
    contact.address1 = fields.address1;
    contact.address2 = fields.address2;
    contact.city = fields.city;
    contact.state = fields.state;
    contact.zip_code = fields.zip_code;
    contact.email = fields.email;
    contact.phone_number = fields.phone_number;
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find(&self, id: &str) -> Result<Option<AppUser>> {
        Ok(self.state.lock().unwrap().users.get(id).cloned())
    }

    async fn ensure(&self, id: &str) -> Result<()> {
        let now = Utc::now();
        self.state
            .lock()
            .unwrap()
            .users
            .entry(id.to_string())
            .or_insert_with(|| AppUser {
                id: id.to_string(),
                first_name: None,
                last_name: None,
                created_at: now,
                updated_at: now,
            });
        Ok(())
    }

    async fn upsert_profile(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AppUser> {
        self.ensure(id).await?;
        let mut state = self.state.lock().unwrap();
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::Internal("user vanished".to_string()))?;
        user.first_name = Some(first_name.to_string());
        user.last_name = Some(last_name.to_string());
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Contact>> {
        Ok(self.state.lock().unwrap().contacts.get(&id).cloned())
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<Contact>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .contacts
            .get(&id)
            .filter(|c| c.owner_id == owner_id)
            .cloned())
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Contact>> {
        *self.contact_list_calls.lock().unwrap() += 1;
        let mut contacts: Vec<Contact> = self
            .state
            .lock()
            .unwrap()
            .contacts
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        sort_contacts(&mut contacts);
        Ok(contacts)
    }

    async fn list_owned_by_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Contact>> {
        let mut contacts: Vec<Contact> = self
            .state
            .lock()
            .unwrap()
            .contacts
            .values()
            .filter(|c| c.owner_id == owner_id && ids.contains(&c.id))
            .cloned()
            .collect();
        sort_contacts(&mut contacts);
        Ok(contacts)
    }

    async fn insert(&self, contact: NewContact) -> Result<Contact> {
        let now = Utc::now();
        let f = contact.fields;
        let row = Contact {
            id: Uuid::new_v4(),
            owner_id: contact.owner_id,
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
        };
        self.state
            .lock()
            .unwrap()
            .contacts
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        expected_version: i32,
        fields: ContactFields,
    ) -> Result<Option<Contact>> {
        let mut state = self.state.lock().unwrap();
        let Some(contact) = state
            .contacts
            .get_mut(&id)
            .filter(|c| c.owner_id == owner_id && c.version == expected_version)
        else {
            return Ok(None);
        };
        apply_fields(contact, fields);
        contact.version += 1;
        contact.updated_at = Utc::now();
        Ok(Some(contact.clone()))
    }

    async fn set_image(
        &self,
        owner_id: &str,
        id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<Option<Contact>> {
        let mut state = self.state.lock().unwrap();
        let Some(contact) = state
            .contacts
            .get_mut(&id)
            .filter(|c| c.owner_id == owner_id)
        else {
            return Ok(None);
        };
        contact.image_data = Some(data);
        contact.image_type = Some(content_type.to_string());
        contact.version += 1;
        contact.updated_at = Utc::now();
        Ok(Some(contact.clone()))
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let owned = state
            .contacts
            .get(&id)
            .is_some_and(|c| c.owner_id == owner_id);
        if !owned {
            return Ok(false);
        }
        state.contacts.remove(&id);
        state.links.retain(|l| l.contact_id != id);
        Ok(true)
    }

    async fn exists_owned(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        Ok(ContactRepository::find_owned(self, owner_id, id)
            .await?
            .is_some())
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn find(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.state.lock().unwrap().categories.get(&id).cloned())
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<Category>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .categories
            .get(&id)
            .filter(|c| c.owner_id == owner_id)
            .cloned())
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .state
            .lock()
            .unwrap()
            .categories
            .values()
            .filter(|c| c.owner_id == owner_id)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn list_owned_by_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Category>> {
        let mut categories: Vec<Category> = self
            .state
            .lock()
            .unwrap()
            .categories
            .values()
            .filter(|c| c.owner_id == owner_id && ids.contains(&c.id))
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn insert(&self, category: NewCategory) -> Result<Category> {
        let now = Utc::now();
        let row = Category {
            id: Uuid::new_v4(),
            owner_id: category.owner_id,
            name: category.name,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .categories
            .insert(row.id, row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        expected_version: i32,
        name: &str,
    ) -> Result<Option<Category>> {
        let mut state = self.state.lock().unwrap();
        let Some(category) = state
            .categories
            .get_mut(&id)
            .filter(|c| c.owner_id == owner_id && c.version == expected_version)
        else {
            return Ok(None);
        };
        category.name = name.to_string();
        category.version += 1;
        category.updated_at = Utc::now();
        Ok(Some(category.clone()))
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        let owned = state
            .categories
            .get(&id)
            .is_some_and(|c| c.owner_id == owner_id);
        if !owned {
            return Ok(false);
        }
        state.categories.remove(&id);
        state.links.retain(|l| l.category_id != id);
        Ok(true)
    }

    async fn exists_owned(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        Ok(CategoryRepository::find_owned(self, owner_id, id)
            .await?
            .is_some())
    }
}

#[async_trait]
impl ContactCategoryRepository for MemoryStore {
    async fn category_ids_for_contact(&self, contact_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| l.contact_id == contact_id)
            .map(|l| l.category_id)
            .collect())
    }

    async fn contact_ids_for_category(&self, category_id: Uuid) -> Result<Vec<Uuid>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| l.category_id == category_id)
            .map(|l| l.contact_id)
            .collect())
    }

    async fn links_for_contacts(&self, contact_ids: &[Uuid]) -> Result<Vec<ContactCategoryLink>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| contact_ids.contains(&l.contact_id))
            .copied()
            .collect())
    }

    async fn links_for_categories(
        &self,
        category_ids: &[Uuid],
    ) -> Result<Vec<ContactCategoryLink>> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .links
            .iter()
            .filter(|l| category_ids.contains(&l.category_id))
            .copied()
            .collect())
    }

    async fn insert_links(&self, links: &[ContactCategoryLink]) -> Result<u64> {
        *self.link_insert_calls.lock().unwrap() += 1;

        if self.fail_link_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }

        let mut state = self.state.lock().unwrap();
        let mut inserted = 0;
        for link in links {
            if !state.links.contains(link) {
                state.links.push(*link);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn delete_for_contact(&self, contact_id: Uuid) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state.links.retain(|l| l.contact_id != contact_id);
        Ok((before - state.links.len()) as u64)
    }

    async fn delete_for_category(&self, category_id: Uuid) -> Result<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.links.len();
        state.links.retain(|l| l.category_id != category_id);
        Ok((before - state.links.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{seed_category, seed_contact};

    #[tokio::test]
    async fn test_lists_use_ordinal_order() {
        let store = MemoryStore::new();
        seed_contact(&store, "user-1", "amy", "adams").await;
        seed_contact(&store, "user-1", "Zoe", "Baker").await;
        seed_contact(&store, "user-1", "Bob", "Baker").await;
        seed_category(&store, "user-1", "family").await;
        seed_category(&store, "user-1", "Work").await;

        let names: Vec<String> = ContactRepository::list_owned(&store, "user-1")
            .await
            .unwrap()
            .iter()
            .map(|c| c.full_name())
            .collect();
        assert_eq!(names, vec!["Bob Baker", "Zoe Baker", "amy adams"]);

        let categories: Vec<String> = CategoryRepository::list_owned(&store, "user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(categories, vec!["Work", "family"]);
    }
}
