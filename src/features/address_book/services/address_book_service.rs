use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::Result;
use crate::features::address_book::models::ContactCategoryLink;
use crate::features::categories::models::Category;
use crate::modules::persistence::{
    CategoryRepository, ContactCategoryRepository, ContactRepository, Repositories,
};

/// Manages the Contact <-> Category relationship.
///
/// Ids that do not resolve are skipped with a warning, never reported as an
/// error. Ownership is not checked here; callers pass ids already filtered to
/// the requesting user.
pub struct AddressBookService {
    contacts: Arc<dyn ContactRepository>,
    categories: Arc<dyn CategoryRepository>,
    links: Arc<dyn ContactCategoryRepository>,
}

impl AddressBookService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            contacts: Arc::clone(&repos.contacts),
            categories: Arc::clone(&repos.categories),
            links: Arc::clone(&repos.links),
        }
    }

    /// Add `contact_id` to every resolvable category in `category_ids`
    pub async fn link_contact_to_categories(
        &self,
        contact_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<()> {
        if self.contacts.find(contact_id).await?.is_none() {
            tracing::warn!(
                "Skipping category links: contact {} does not exist",
                contact_id
            );
            return Ok(());
        }

        let mut present: HashSet<Uuid> = self
            .links
            .category_ids_for_contact(contact_id)
            .await?
            .into_iter()
            .collect();

        let mut new_links = Vec::new();
        for &category_id in category_ids {
            if present.contains(&category_id) {
                continue;
            }

            if self.categories.find(category_id).await?.is_none() {
                tracing::warn!(
                    "Skipping unknown category {} for contact {}",
                    category_id,
                    contact_id
                );
                continue;
            }

            present.insert(category_id);
            new_links.push(ContactCategoryLink {
                contact_id,
                category_id,
            });
        }

        self.persist(new_links).await
    }

    /// Add every resolvable contact in `contact_ids` to `category_id`
    pub async fn link_category_to_contacts(
        &self,
        category_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<()> {
        if self.categories.find(category_id).await?.is_none() {
            tracing::warn!(
                "Skipping contact links: category {} does not exist",
                category_id
            );
            return Ok(());
        }

        let mut present: HashSet<Uuid> = self
            .links
            .contact_ids_for_category(category_id)
            .await?
            .into_iter()
            .collect();

        let mut new_links = Vec::new();
        for &contact_id in contact_ids {
            if present.contains(&contact_id) {
                continue;
            }

            if self.contacts.find(contact_id).await?.is_none() {
                tracing::warn!(
                    "Skipping unknown contact {} for category {}",
                    contact_id,
                    category_id
                );
                continue;
            }

            present.insert(contact_id);
            new_links.push(ContactCategoryLink {
                contact_id,
                category_id,
            });
        }

        self.persist(new_links).await
    }

    pub async fn add_contact_to_category(&self, category_id: Uuid, contact_id: Uuid) -> Result<()> {
        self.link_contact_to_categories(contact_id, &[category_id])
            .await
    }

    /// Remove every category link of the contact; the categories stay
    pub async fn unlink_all_for_contact(&self, contact_id: Uuid) -> Result<()> {
        let removed = self.links.delete_for_contact(contact_id).await?;
        tracing::debug!("Removed {} category link(s) of contact {}", removed, contact_id);
        Ok(())
    }

    /// Remove every contact link of the category; the contacts stay
    pub async fn unlink_all_for_category(&self, category_id: Uuid) -> Result<()> {
        let removed = self.links.delete_for_category(category_id).await?;
        tracing::debug!("Removed {} contact link(s) of category {}", removed, category_id);
        Ok(())
    }

    /// False for an unknown contact
    pub async fn is_contact_in_category(&self, category_id: Uuid, contact_id: Uuid) -> Result<bool> {
        if self.contacts.find(contact_id).await?.is_none() {
            return Ok(false);
        }

        Ok(self
            .links
            .category_ids_for_contact(contact_id)
            .await?
            .contains(&category_id))
    }

    pub async fn categories_for_contact(&self, contact_id: Uuid) -> Result<Vec<Uuid>> {
        self.links.category_ids_for_contact(contact_id).await
    }

    pub async fn contacts_for_category(&self, category_id: Uuid) -> Result<Vec<Uuid>> {
        self.links.contact_ids_for_category(category_id).await
    }

    /// The owner's categories ordered by name
    pub async fn user_categories(&self, owner_id: &str) -> Result<Vec<Category>> {
        self.categories.list_owned(owner_id).await
    }

    async fn persist(&self, new_links: Vec<ContactCategoryLink>) -> Result<()> {
        if new_links.is_empty() {
            return Ok(());
        }

        let inserted = self.links.insert_links(&new_links).await?;
        tracing::debug!("Inserted {} contact category link(s)", inserted);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::modules::persistence::memory::MemoryStore;
    use crate::shared::test_helpers::{address_book_service, seed_category, seed_contact};

    #[tokio::test]
    async fn test_link_contact_to_categories_adds_valid_ids() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let friends = seed_category(&store, "user-1", "Friends").await;
        let work = seed_category(&store, "user-1", "Work").await;

        service
            .link_contact_to_categories(contact.id, &[friends.id, work.id])
            .await
            .unwrap();

        let mut linked = service.categories_for_contact(contact.id).await.unwrap();
        linked.sort();
        let mut expected = vec![friends.id, work.id];
        expected.sort();
        assert_eq!(linked, expected);
    }

    #[tokio::test]
    async fn test_link_contact_silently_skips_unknown_category() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let friends = seed_category(&store, "user-1", "Friends").await;

        let result = service
            .link_contact_to_categories(contact.id, &[Uuid::new_v4(), friends.id])
            .await;

        assert!(result.is_ok());
        assert_eq!(
            service.categories_for_contact(contact.id).await.unwrap(),
            vec![friends.id]
        );
    }

    #[tokio::test]
    async fn test_link_unknown_contact_silently_does_nothing() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let friends = seed_category(&store, "user-1", "Friends").await;

        service
            .link_contact_to_categories(Uuid::new_v4(), &[friends.id])
            .await
            .unwrap();

        assert_eq!(store.link_count(), 0);
        assert_eq!(store.link_insert_calls(), 0);
    }

    #[tokio::test]
    async fn test_link_is_idempotent_and_collapses_duplicates() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let friends = seed_category(&store, "user-1", "Friends").await;

        service
            .link_contact_to_categories(contact.id, &[friends.id, friends.id])
            .await
            .unwrap();
        service
            .link_contact_to_categories(contact.id, &[friends.id])
            .await
            .unwrap();

        assert_eq!(store.link_count(), 1);
        // Second call had nothing new to write
        assert_eq!(store.link_insert_calls(), 1);
    }

    #[tokio::test]
    async fn test_link_persists_in_one_batch() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let a = seed_category(&store, "user-1", "A").await;
        let b = seed_category(&store, "user-1", "B").await;
        let c = seed_category(&store, "user-1", "C").await;

        service
            .link_contact_to_categories(contact.id, &[a.id, b.id, c.id])
            .await
            .unwrap();

        assert_eq!(store.link_insert_calls(), 1);
        assert_eq!(store.link_count(), 3);
    }

    #[tokio::test]
    async fn test_link_is_symmetric() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let amy = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let zoe = seed_contact(&store, "user-1", "Zoe", "Adams").await;
        let friends = seed_category(&store, "user-1", "Friends").await;
        let work = seed_category(&store, "user-1", "Work").await;

        service
            .link_contact_to_categories(amy.id, &[friends.id])
            .await
            .unwrap();
        service
            .link_category_to_contacts(work.id, &[zoe.id])
            .await
            .unwrap();

        assert!(service.is_contact_in_category(friends.id, amy.id).await.unwrap());
        assert!(service.is_contact_in_category(work.id, zoe.id).await.unwrap());
        assert_eq!(
            service.contacts_for_category(friends.id).await.unwrap(),
            vec![amy.id]
        );
        assert_eq!(
            service.categories_for_contact(zoe.id).await.unwrap(),
            vec![work.id]
        );
    }

    #[tokio::test]
    async fn test_link_category_silently_skips_unknown_contact() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let amy = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let friends = seed_category(&store, "user-1", "Friends").await;

        service
            .link_category_to_contacts(friends.id, &[amy.id, Uuid::new_v4()])
            .await
            .unwrap();

        assert_eq!(
            service.contacts_for_category(friends.id).await.unwrap(),
            vec![amy.id]
        );
    }

    #[tokio::test]
    async fn test_unlink_then_link_yields_exactly_the_new_set() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let old = seed_category(&store, "user-1", "Old").await;
        let new = seed_category(&store, "user-1", "New").await;

        service
            .link_contact_to_categories(contact.id, &[old.id])
            .await
            .unwrap();
        service.unlink_all_for_contact(contact.id).await.unwrap();
        service
            .link_contact_to_categories(contact.id, &[new.id, Uuid::new_v4()])
            .await
            .unwrap();

        assert_eq!(
            service.categories_for_contact(contact.id).await.unwrap(),
            vec![new.id]
        );
        // Unlinking removes the relationship, not the category
        assert!(CategoryRepository::find(&store, old.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_unlink_all_for_category_keeps_contacts() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let amy = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let zoe = seed_contact(&store, "user-1", "Zoe", "Adams").await;
        let friends = seed_category(&store, "user-1", "Friends").await;

        service
            .link_category_to_contacts(friends.id, &[amy.id, zoe.id])
            .await
            .unwrap();
        service.unlink_all_for_category(friends.id).await.unwrap();

        assert!(service.contacts_for_category(friends.id).await.unwrap().is_empty());
        assert!(ContactRepository::find(&store, amy.id).await.unwrap().is_some());
        assert!(ContactRepository::find(&store, zoe.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_is_contact_in_category() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let friends = seed_category(&store, "user-1", "Friends").await;
        let work = seed_category(&store, "user-1", "Work").await;

        // Empty link set
        assert!(!service.is_contact_in_category(friends.id, contact.id).await.unwrap());

        service
            .add_contact_to_category(friends.id, contact.id)
            .await
            .unwrap();

        assert!(service.is_contact_in_category(friends.id, contact.id).await.unwrap());
        assert!(!service.is_contact_in_category(work.id, contact.id).await.unwrap());
        assert!(!service
            .is_contact_in_category(friends.id, Uuid::new_v4())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_link_propagates_storage_failure() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        let contact = seed_contact(&store, "user-1", "Amy", "Brown").await;
        let friends = seed_category(&store, "user-1", "Friends").await;
        store.fail_link_inserts();

        let result = service
            .link_contact_to_categories(contact.id, &[friends.id])
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_user_categories_ordered_by_name_and_scoped() {
        let store = MemoryStore::new();
        let service = address_book_service(&store);
        seed_category(&store, "user-1", "Work").await;
        seed_category(&store, "user-1", "Family").await;
        seed_category(&store, "user-2", "Golf").await;

        let names: Vec<String> = service
            .user_categories("user-1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Family".to_string(), "Work".to_string()]);
    }
}
