use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::address_book::dtos::{EmailDispatchResultDto, EmailFormDto, SendEmailDto};
use crate::features::address_book::services::{AddressBookService, EmailDispatchService};
use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::categories::models::Category;
use crate::features::contacts::dtos::{
    ContactEditFormDto, ContactFormOptionsDto, ContactResponseDto, CreateContactDto,
    StateOptionDto, UpdateContactDto,
};
use crate::features::contacts::models::{Contact, NewContact, UsState};
use crate::features::contacts::services::search_contacts;
use crate::modules::images::ImageService;
use crate::modules::persistence::Repositories;

const CONTACTS_PATH: &str = "/api/contacts";

/// Service for contact operations, always scoped to one owner
pub struct ContactService {
    repos: Repositories,
    address_book: Arc<AddressBookService>,
    email: Arc<EmailDispatchService>,
    images: ImageService,
}

impl ContactService {
    pub fn new(
        repos: Repositories,
        address_book: Arc<AddressBookService>,
        email: Arc<EmailDispatchService>,
        images: ImageService,
    ) -> Self {
        Self {
            repos,
            address_book,
            email,
            images,
        }
    }

    /// List the owner's contacts, optionally only those in `category_id`
    pub async fn list(
        &self,
        owner_id: &str,
        category_id: Option<Uuid>,
    ) -> Result<Vec<ContactResponseDto>> {
        let contacts = match category_id {
            Some(category_id) => {
                if !self
                    .repos
                    .categories
                    .exists_owned(owner_id, category_id)
                    .await?
                {
                    return Err(category_not_found(category_id));
                }
                let ids = self.address_book.contacts_for_category(category_id).await?;
                self.repos.contacts.list_owned_by_ids(owner_id, &ids).await?
            }
            None => self.repos.contacts.list_owned(owner_id).await?,
        };

        self.to_responses(owner_id, contacts).await
    }

    pub async fn search(&self, owner_id: &str, query: Option<&str>) -> Result<Vec<ContactResponseDto>> {
        let contacts = self.repos.contacts.list_owned(owner_id).await?;
        let matches = search_contacts(contacts, query);
        self.to_responses(owner_id, matches).await
    }

    pub async fn get(&self, owner_id: &str, id: Uuid) -> Result<ContactResponseDto> {
        let contact = self.find_owned(owner_id, id).await?;
        self.to_response(owner_id, contact).await
    }

    pub async fn form_options(&self, owner_id: &str) -> Result<ContactFormOptionsDto> {
        let categories = self.address_book.user_categories(owner_id).await?;

        Ok(ContactFormOptionsDto {
            categories: categories.iter().map(CategorySummaryDto::from).collect(),
            states: UsState::ALL.iter().copied().map(StateOptionDto::from).collect(),
        })
    }

    pub async fn edit_form(&self, owner_id: &str, id: Uuid) -> Result<ContactEditFormDto> {
        let contact = self.get(owner_id, id).await?;
        let options = self.form_options(owner_id).await?;
        let selected_category_ids = contact.categories.iter().map(|c| c.id).collect();

        Ok(ContactEditFormDto {
            contact,
            selected_category_ids,
            options,
        })
    }

    pub async fn create(&self, owner_id: &str, dto: CreateContactDto) -> Result<ContactResponseDto> {
        let (fields, category_ids) = dto.into_parts();

        self.repos.users.ensure(owner_id).await?;
        let contact = self
            .repos
            .contacts
            .insert(NewContact {
                owner_id: owner_id.to_string(),
                fields,
            })
            .await?;

        let owned = self.owned_category_ids(owner_id, &category_ids).await?;
        self.address_book
            .link_contact_to_categories(contact.id, &owned)
            .await
            .map_err(|e| {
                tracing::error!("Failed to link categories of new contact {}: {}", contact.id, e);
                e
            })?;

        tracing::info!("Contact {} created for user {}", contact.id, owner_id);
        self.to_response(owner_id, contact).await
    }

    /// Save the edit, then replace the categories when a selection was sent
    pub async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        dto: UpdateContactDto,
    ) -> Result<ContactResponseDto> {
        let (fields, version, category_ids) = dto.into_parts();

        let contact = match self
            .repos
            .contacts
            .update(owner_id, id, version, fields)
            .await?
        {
            Some(contact) => contact,
            None => return Err(self.missing_or_conflict(owner_id, id).await),
        };

        if let Some(category_ids) = category_ids {
            self.replace_categories(owner_id, id, &category_ids).await?;
        }

        tracing::info!("Contact {} updated to version {}", id, contact.version);
        self.to_response(owner_id, contact).await
    }

    pub async fn delete(&self, owner_id: &str, id: Uuid) -> Result<()> {
        if !self.repos.contacts.delete(owner_id, id).await? {
            return Err(contact_not_found(id));
        }

        tracing::info!("Contact {} deleted", id);
        Ok(())
    }

    pub async fn set_image(
        &self,
        owner_id: &str,
        id: Uuid,
        content_type: &str,
        data: &[u8],
    ) -> Result<ContactResponseDto> {
        let bytes = self.images.bytes_of(content_type, data)?;

        let contact = self
            .repos
            .contacts
            .set_image(owner_id, id, bytes, content_type)
            .await?
            .ok_or_else(|| contact_not_found(id))?;

        tracing::info!("Image of contact {} replaced ({} bytes)", id, data.len());
        self.to_response(owner_id, contact).await
    }

    pub async fn email_form(&self, owner_id: &str, id: Uuid) -> Result<EmailFormDto> {
        let contact = self.find_owned(owner_id, id).await?;

        Ok(EmailFormDto {
            group_name: contact.full_name(),
            email_address: contact.email,
            email_subject: String::new(),
            email_body: String::new(),
        })
    }

    /// Email the contact; a delivery failure is part of the result, not an error
    pub async fn send_email(
        &self,
        owner_id: &str,
        id: Uuid,
        dto: SendEmailDto,
    ) -> Result<EmailDispatchResultDto> {
        let contact = self.find_owned(owner_id, id).await?;
        let form_path = format!("{}/{}/email", CONTACTS_PATH, id);

        Ok(self
            .email
            .dispatch(
                &contact.email,
                &dto.email_subject,
                &dto.email_body,
                CONTACTS_PATH,
                &form_path,
            )
            .await)
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Contact> {
        self.repos
            .contacts
            .find_owned(owner_id, id)
            .await?
            .ok_or_else(|| contact_not_found(id))
    }

    async fn missing_or_conflict(&self, owner_id: &str, id: Uuid) -> AppError {
        match self.repos.contacts.exists_owned(owner_id, id).await {
            Ok(true) => {
                tracing::warn!("Contact {} was modified concurrently", id);
                AppError::Conflict(format!(
                    "Contact {} was changed by another request; reload and try again",
                    id
                ))
            }
            Ok(false) => contact_not_found(id),
            Err(e) => e,
        }
    }

    async fn owned_category_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Uuid>> {
        let owned = self
            .repos
            .categories
            .list_owned_by_ids(owner_id, ids)
            .await?;
        Ok(owned.into_iter().map(|c| c.id).collect())
    }

    async fn replace_categories(
        &self,
        owner_id: &str,
        contact_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<()> {
        let owned = self.owned_category_ids(owner_id, category_ids).await?;

        self.address_book
            .unlink_all_for_contact(contact_id)
            .await
            .map_err(|e| {
                tracing::error!("Failed to clear categories of contact {}: {}", contact_id, e);
                e
            })?;

        self.address_book
            .link_contact_to_categories(contact_id, &owned)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Categories of contact {} were cleared but relinking failed: {}",
                    contact_id,
                    e
                );
                e
            })
    }

    async fn to_response(&self, owner_id: &str, contact: Contact) -> Result<ContactResponseDto> {
        let mut responses = self.to_responses(owner_id, vec![contact]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::Internal("Contact response missing".to_string()))
    }

    /// Attach categories with one batched link lookup for the whole page
    async fn to_responses(
        &self,
        owner_id: &str,
        contacts: Vec<Contact>,
    ) -> Result<Vec<ContactResponseDto>> {
        let ids: Vec<Uuid> = contacts.iter().map(|c| c.id).collect();
        let links = self.repos.links.links_for_contacts(&ids).await?;
        let categories: HashMap<Uuid, Category> = self
            .repos
            .categories
            .list_owned(owner_id)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut by_contact: HashMap<Uuid, Vec<CategorySummaryDto>> = HashMap::new();
        for link in links {
            if let Some(category) = categories.get(&link.category_id) {
                by_contact
                    .entry(link.contact_id)
                    .or_default()
                    .push(CategorySummaryDto::from(category));
            }
        }

        Ok(contacts
            .into_iter()
            .map(|contact| {
                let mut summaries = by_contact.remove(&contact.id).unwrap_or_default();
                summaries.sort_by(|a, b| a.name.cmp(&b.name));
                self.build_response(contact, summaries)
            })
            .collect())
    }

    fn build_response(
        &self,
        contact: Contact,
        categories: Vec<CategorySummaryDto>,
    ) -> ContactResponseDto {
        let image = self
            .images
            .to_displayable_string(contact.image_data.as_deref(), contact.image_type.as_deref());
        let full_name = contact.full_name();

        ContactResponseDto {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            full_name,
            birth_date: contact.birth_date,
            address1: contact.address1,
            address2: contact.address2,
            city: contact.city,
            state: contact.state,
            zip_code: contact.zip_code,
            email: contact.email,
            phone_number: contact.phone_number,
            image,
            categories,
            version: contact.version,
            created_at: contact.created_at,
        }
    }
}

fn contact_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Contact {} not found", id))
}

fn category_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Category {} not found", id))
}
