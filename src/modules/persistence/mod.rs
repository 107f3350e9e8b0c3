//! Persistence layer for the address book.
//!
//! Each entity is reached through a repository trait so services never touch a
//! concrete store. The Contact <-> Category relationship is a single explicit
//! join abstraction ([`ContactCategoryRepository`]) with one accessor per
//! side; neither entity carries a mutable collection of the other.
//!
//! Owner-scoped methods (`*_owned`) return `None`/`false` for ids that exist
//! under another owner, exactly as for missing ids.

mod postgres;

#[cfg(test)]
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::address_book::models::ContactCategoryLink;
use crate::features::categories::models::{Category, NewCategory};
use crate::features::contacts::models::{Contact, ContactFields, NewContact};
use crate::features::users::models::AppUser;

pub use postgres::PgAddressBookStore;

/// One handle per repository, usually all backed by the same store
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub links: Arc<dyn ContactCategoryRepository>,
}

impl Repositories {
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: UserRepository
            + ContactRepository
            + CategoryRepository
            + ContactCategoryRepository
            + 'static,
    {
        Self {
            users: store.clone(),
            contacts: store.clone(),
            categories: store.clone(),
            links: store,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find(&self, id: &str) -> Result<Option<AppUser>>;

    /// Make sure an owner row exists so foreign keys resolve
    async fn ensure(&self, id: &str) -> Result<()>;

    async fn upsert_profile(&self, id: &str, first_name: &str, last_name: &str)
        -> Result<AppUser>;
}

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Unscoped lookup, for the relationship service
    async fn find(&self, id: Uuid) -> Result<Option<Contact>>;

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<Contact>>;

    /// All of the owner's contacts ordered by last name, first name
    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Contact>>;

    /// The subset of `ids` owned by `owner_id`, ordered by last name, first name
    async fn list_owned_by_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Contact>>;

    async fn insert(&self, contact: NewContact) -> Result<Contact>;

    /// Update when `expected_version` still matches.
    ///
    /// `None` means the row is missing, foreign, or was changed concurrently.
    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        expected_version: i32,
        fields: ContactFields,
    ) -> Result<Option<Contact>>;

    async fn set_image(
        &self,
        owner_id: &str,
        id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<Option<Contact>>;

    /// Delete the contact and its join rows; `false` when nothing was deleted
    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<bool>;

    async fn exists_owned(&self, owner_id: &str, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Unscoped lookup, for the relationship service
    async fn find(&self, id: Uuid) -> Result<Option<Category>>;

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<Category>>;

    /// All of the owner's categories ordered by name
    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Category>>;

    /// The subset of `ids` owned by `owner_id`, ordered by name
    async fn list_owned_by_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Category>>;

    async fn insert(&self, category: NewCategory) -> Result<Category>;

    /// Rename when `expected_version` still matches; `None` as for contacts
    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        expected_version: i32,
        name: &str,
    ) -> Result<Option<Category>>;

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<bool>;

    async fn exists_owned(&self, owner_id: &str, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait ContactCategoryRepository: Send + Sync {
    async fn category_ids_for_contact(&self, contact_id: Uuid) -> Result<Vec<Uuid>>;

    async fn contact_ids_for_category(&self, category_id: Uuid) -> Result<Vec<Uuid>>;

    /// Batched lookup of every link touching one of `contact_ids`
    async fn links_for_contacts(&self, contact_ids: &[Uuid]) -> Result<Vec<ContactCategoryLink>>;

    /// Batched lookup of every link touching one of `category_ids`
    async fn links_for_categories(
        &self,
        category_ids: &[Uuid],
    ) -> Result<Vec<ContactCategoryLink>>;

    /// Insert in one round trip; existing pairs are left as they are
    async fn insert_links(&self, links: &[ContactCategoryLink]) -> Result<u64>;

    async fn delete_for_contact(&self, contact_id: Uuid) -> Result<u64>;

    async fn delete_for_category(&self, category_id: Uuid) -> Result<u64>;
}
