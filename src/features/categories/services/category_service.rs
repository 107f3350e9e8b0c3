use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::address_book::dtos::{EmailDispatchResultDto, EmailFormDto, SendEmailDto};
use crate::features::address_book::services::{AddressBookService, EmailDispatchService};
use crate::features::categories::dtos::{
    CategoryEditFormDto, CategoryFormOptionsDto, CategoryMembershipDto, CategoryResponseDto,
    CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::{Category, NewCategory};
use crate::features::contacts::dtos::ContactSummaryDto;
use crate::features::contacts::models::Contact;
use crate::modules::persistence::Repositories;
use crate::shared::constants::EMAIL_ADDRESS_SEPARATOR;

const CATEGORIES_PATH: &str = "/api/categories";

/// Service for category operations, always scoped to one owner
pub struct CategoryService {
    repos: Repositories,
    address_book: Arc<AddressBookService>,
    email: Arc<EmailDispatchService>,
}

impl CategoryService {
    pub fn new(
        repos: Repositories,
        address_book: Arc<AddressBookService>,
        email: Arc<EmailDispatchService>,
    ) -> Self {
        Self {
            repos,
            address_book,
            email,
        }
    }

    /// List the owner's categories by name, optionally only those holding `contact_id`
    pub async fn list(
        &self,
        owner_id: &str,
        contact_id: Option<Uuid>,
    ) -> Result<Vec<CategoryResponseDto>> {
        let categories = match contact_id {
            Some(contact_id) => {
                if !self.repos.contacts.exists_owned(owner_id, contact_id).await? {
                    return Err(AppError::NotFound(format!(
                        "Contact {} not found",
                        contact_id
                    )));
                }
                let ids = self.address_book.categories_for_contact(contact_id).await?;
                self.repos.categories.list_owned_by_ids(owner_id, &ids).await?
            }
            None => self.address_book.user_categories(owner_id).await?,
        };

        self.to_responses(owner_id, categories).await
    }

    pub async fn get(&self, owner_id: &str, id: Uuid) -> Result<CategoryResponseDto> {
        let category = self.find_owned(owner_id, id).await?;
        self.to_response(owner_id, category).await
    }

    pub async fn form_options(&self, owner_id: &str) -> Result<CategoryFormOptionsDto> {
        let contacts = self.repos.contacts.list_owned(owner_id).await?;

        Ok(CategoryFormOptionsDto {
            contacts: contacts.iter().map(ContactSummaryDto::from).collect(),
        })
    }

    pub async fn edit_form(&self, owner_id: &str, id: Uuid) -> Result<CategoryEditFormDto> {
        let category = self.get(owner_id, id).await?;
        let options = self.form_options(owner_id).await?;
        let selected_contact_ids = category.contacts.iter().map(|c| c.id).collect();

        Ok(CategoryEditFormDto {
            category,
            selected_contact_ids,
            options,
        })
    }

    pub async fn create(&self, owner_id: &str, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        self.repos.users.ensure(owner_id).await?;
        let category = self
            .repos
            .categories
            .insert(NewCategory {
                owner_id: owner_id.to_string(),
                name: dto.name.trim().to_string(),
            })
            .await?;

        let owned = self.owned_contact_ids(owner_id, &dto.contact_ids).await?;
        self.address_book
            .link_category_to_contacts(category.id, &owned)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to link contacts of new category {}: {}",
                    category.id,
                    e
                );
                e
            })?;

        tracing::info!("Category {} created for user {}", category.id, owner_id);
        self.to_response(owner_id, category).await
    }

    /// Rename, then replace the members when a selection was sent
    pub async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        dto: UpdateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        let category = match self
            .repos
            .categories
            .update(owner_id, id, dto.version, dto.name.trim())
            .await?
        {
            Some(category) => category,
            None => return Err(self.missing_or_conflict(owner_id, id).await),
        };

        if let Some(contact_ids) = dto.contact_ids {
            self.replace_contacts(owner_id, id, &contact_ids).await?;
        }

        tracing::info!("Category {} updated to version {}", id, category.version);
        self.to_response(owner_id, category).await
    }

    /// Delete the category; its contacts stay
    pub async fn delete(&self, owner_id: &str, id: Uuid) -> Result<()> {
        if !self.repos.categories.delete(owner_id, id).await? {
            return Err(category_not_found(id));
        }

        tracing::info!("Category {} deleted", id);
        Ok(())
    }

    pub async fn membership(
        &self,
        owner_id: &str,
        category_id: Uuid,
        contact_id: Uuid,
    ) -> Result<CategoryMembershipDto> {
        self.find_owned(owner_id, category_id).await?;
        if !self.repos.contacts.exists_owned(owner_id, contact_id).await? {
            return Err(AppError::NotFound(format!(
                "Contact {} not found",
                contact_id
            )));
        }

        let is_member = self
            .address_book
            .is_contact_in_category(category_id, contact_id)
            .await?;

        Ok(CategoryMembershipDto {
            category_id,
            contact_id,
            is_member,
        })
    }

    /// Group email form with recipients taken from the current members
    pub async fn email_form(&self, owner_id: &str, id: Uuid) -> Result<EmailFormDto> {
        let category = self.find_owned(owner_id, id).await?;
        let recipients = self.recipients(owner_id, id).await?;

        Ok(EmailFormDto {
            email_subject: format!("Group Message: {}", category.name),
            group_name: category.name,
            email_address: recipients,
            email_body: String::new(),
        })
    }

    /// Email every member once; recipients are never taken from the client
    pub async fn send_email(
        &self,
        owner_id: &str,
        id: Uuid,
        dto: SendEmailDto,
    ) -> Result<EmailDispatchResultDto> {
        self.find_owned(owner_id, id).await?;
        let recipients = self.recipients(owner_id, id).await?;
        let form_path = format!("{}/{}/email", CATEGORIES_PATH, id);

        Ok(self
            .email
            .dispatch(
                &recipients,
                &dto.email_subject,
                &dto.email_body,
                CATEGORIES_PATH,
                &form_path,
            )
            .await)
    }

    async fn recipients(&self, owner_id: &str, category_id: Uuid) -> Result<String> {
        let contacts = self.members(owner_id, category_id).await?;
        Ok(contacts
            .iter()
            .map(|c| c.email.as_str())
            .collect::<Vec<_>>()
            .join(EMAIL_ADDRESS_SEPARATOR))
    }

    async fn members(&self, owner_id: &str, category_id: Uuid) -> Result<Vec<Contact>> {
        let ids = self.address_book.contacts_for_category(category_id).await?;
        self.repos.contacts.list_owned_by_ids(owner_id, &ids).await
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Category> {
        self.repos
            .categories
            .find_owned(owner_id, id)
            .await?
            .ok_or_else(|| category_not_found(id))
    }

    async fn missing_or_conflict(&self, owner_id: &str, id: Uuid) -> AppError {
        match self.repos.categories.exists_owned(owner_id, id).await {
            Ok(true) => {
                tracing::warn!("Category {} was modified concurrently", id);
                AppError::Conflict(format!(
                    "Category {} was changed by another request; reload and try again",
                    id
                ))
            }
            Ok(false) => category_not_found(id),
            Err(e) => e,
        }
    }

    async fn owned_contact_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let owned = self.repos.contacts.list_owned_by_ids(owner_id, ids).await?;
        Ok(owned.into_iter().map(|c| c.id).collect())
    }

    async fn replace_contacts(
        &self,
        owner_id: &str,
        category_id: Uuid,
        contact_ids: &[Uuid],
    ) -> Result<()> {
        let owned = self.owned_contact_ids(owner_id, contact_ids).await?;

        self.address_book
            .unlink_all_for_category(category_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear contacts of category {}: {}", category_id, e);
                e
            })?;

        self.address_book
            .link_category_to_contacts(category_id, &owned)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Contacts of category {} were cleared but relinking failed: {}",
                    category_id,
                    e
                );
                e
            })
    }

    async fn to_response(&self, owner_id: &str, category: Category) -> Result<CategoryResponseDto> {
        let mut responses = self.to_responses(owner_id, vec![category]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::Internal("Category response missing".to_string()))
    }

    async fn to_responses(
        &self,
        owner_id: &str,
        categories: Vec<Category>,
    ) -> Result<Vec<CategoryResponseDto>> {
        let ids: Vec<Uuid> = categories.iter().map(|c| c.id).collect();
        let mut members_of: HashMap<Uuid, HashSet<Uuid>> = HashMap::new();
        for link in self.repos.links.links_for_categories(&ids).await? {
            members_of
                .entry(link.category_id)
                .or_default()
                .insert(link.contact_id);
        }
        let member_ids: Vec<Uuid> = members_of
            .values()
            .flatten()
            .copied()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        // Ordered by last, first; keep that order per category
        let contacts = self
            .repos
            .contacts
            .list_owned_by_ids(owner_id, &member_ids)
            .await?;

        Ok(categories
            .into_iter()
            .map(|category| {
                let members: Vec<ContactSummaryDto> = match members_of.get(&category.id) {
                    Some(ids) => contacts
                        .iter()
                        .filter(|c| ids.contains(&c.id))
                        .map(ContactSummaryDto::from)
                        .collect(),
                    None => Vec::new(),
                };

                CategoryResponseDto {
                    id: category.id,
                    name: category.name,
                    contacts: members,
                    version: category.version,
                    created_at: category.created_at,
                }
            })
            .collect())
    }
}

fn category_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}
