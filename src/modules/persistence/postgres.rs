use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{CategoryRepository, ContactCategoryRepository, ContactRepository, UserRepository};
use crate::core::error::{AppError, Result};
use crate::features::address_book::models::ContactCategoryLink;
use crate::features::categories::models::{Category, NewCategory};
use crate::features::contacts::models::{Contact, ContactFields, NewContact};
use crate::features::users::models::AppUser;

const CONTACT_COLUMNS: &str = "id, owner_id, first_name, last_name, birth_date, address1, \
     address2, city, state, zip_code, email, phone_number, image_data, image_type, version, \
     created_at, updated_at";

const CATEGORY_COLUMNS: &str = "id, owner_id, name, version, created_at, updated_at";

// Byte-wise ordering, independent of the database's default collation
const CONTACT_ORDER: &str = "last_name COLLATE \"C\", first_name COLLATE \"C\"";
const CATEGORY_ORDER: &str = "name COLLATE \"C\"";

/// PostgreSQL-backed store implementing every address book repository
#[derive(Clone)]
pub struct PgAddressBookStore {
    pool: PgPool,
}

impl PgAddressBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {:?}", context, e);
        AppError::Database(e)
    }
}

#[async_trait]
impl UserRepository for PgAddressBookStore {
    async fn find(&self, id: &str) -> Result<Option<AppUser>> {
        sqlx::query_as::<_, AppUser>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM app_users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get user"))
    }

    async fn ensure(&self, id: &str) -> Result<()> {
        sqlx::query("INSERT INTO app_users (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to ensure user"))?;
        Ok(())
    }

    async fn upsert_profile(
        &self,
        id: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<AppUser> {
        sqlx::query_as::<_, AppUser>(
            r#"
            INSERT INTO app_users (id, first_name, last_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET first_name = $2, last_name = $3, updated_at = NOW()
            RETURNING id, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to upsert user profile"))
    }
}

#[async_trait]
impl ContactRepository for PgAddressBookStore {
    async fn find(&self, id: Uuid) -> Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE id = $1",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get contact"))
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE id = $1 AND owner_id = $2",
            CONTACT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get contact"))
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE owner_id = $1 ORDER BY {}",
            CONTACT_COLUMNS, CONTACT_ORDER
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list contacts"))
    }

    async fn list_owned_by_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Contact>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Contact>(&format!(
            "SELECT {} FROM contacts WHERE owner_id = $1 AND id = ANY($2) \
             ORDER BY {}",
            CONTACT_COLUMNS, CONTACT_ORDER
        ))
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list contacts by id"))
    }

    async fn insert(&self, contact: NewContact) -> Result<Contact> {
        let f = contact.fields;
        sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (owner_id, first_name, last_name, birth_date, address1, address2,
                                  city, state, zip_code, email, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(&contact.owner_id)
        .bind(f.first_name)
        .bind(f.last_name)
        .bind(f.birth_date)
        .bind(f.address1)
        .bind(f.address2)
        .bind(f.city)
        .bind(f.state)
        .bind(f.zip_code)
        .bind(f.email)
        .bind(f.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create contact"))
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        expected_version: i32,
        fields: ContactFields,
    ) -> Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET first_name = $4, last_name = $5, birth_date = $6, address1 = $7, address2 = $8,
                city = $9, state = $10, zip_code = $11, email = $12, phone_number = $13,
                version = version + 1, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2 AND version = $3
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(expected_version)
        .bind(fields.first_name)
        .bind(fields.last_name)
        .bind(fields.birth_date)
        .bind(fields.address1)
        .bind(fields.address2)
        .bind(fields.city)
        .bind(fields.state)
        .bind(fields.zip_code)
        .bind(fields.email)
        .bind(fields.phone_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update contact"))
    }

    async fn set_image(
        &self,
        owner_id: &str,
        id: Uuid,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<Option<Contact>> {
        sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
            SET image_data = $3, image_type = $4, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {}
            "#,
            CONTACT_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(data)
        .bind(content_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update contact image"))
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        // Join rows go with the contact (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete contact"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_owned(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM contacts WHERE id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check contact existence"))
    }
}

#[async_trait]
impl CategoryRepository for PgAddressBookStore {
    async fn find(&self, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id = $1",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get category"))
    }

    async fn find_owned(&self, owner_id: &str, id: Uuid) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE id = $1 AND owner_id = $2",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to get category"))
    }

    async fn list_owned(&self, owner_id: &str) -> Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE owner_id = $1 ORDER BY {}",
            CATEGORY_COLUMNS, CATEGORY_ORDER
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list categories"))
    }

    async fn list_owned_by_ids(&self, owner_id: &str, ids: &[Uuid]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Category>(&format!(
            "SELECT {} FROM categories WHERE owner_id = $1 AND id = ANY($2) ORDER BY {}",
            CATEGORY_COLUMNS, CATEGORY_ORDER
        ))
        .bind(owner_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list categories by id"))
    }

    async fn insert(&self, category: NewCategory) -> Result<Category> {
        sqlx::query_as::<_, Category>(&format!(
            "INSERT INTO categories (owner_id, name) VALUES ($1, $2) RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(&category.owner_id)
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create category"))
    }

    async fn update(
        &self,
        owner_id: &str,
        id: Uuid,
        expected_version: i32,
        name: &str,
    ) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $4, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2 AND version = $3
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .bind(expected_version)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to update category"))
    }

    async fn delete(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete category"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_owned(&self, owner_id: &str, id: Uuid) -> Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND owner_id = $2)",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to check category existence"))
    }
}

#[async_trait]
impl ContactCategoryRepository for PgAddressBookStore {
    async fn category_ids_for_contact(&self, contact_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT category_id FROM contact_categories WHERE contact_id = $1 ORDER BY created_at",
        )
        .bind(contact_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to get contact categories"))
    }

    async fn contact_ids_for_category(&self, category_id: Uuid) -> Result<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT contact_id FROM contact_categories WHERE category_id = $1 ORDER BY created_at",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to get category contacts"))
    }

    async fn links_for_contacts(&self, contact_ids: &[Uuid]) -> Result<Vec<ContactCategoryLink>> {
        if contact_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ContactCategoryLink>(
            "SELECT contact_id, category_id FROM contact_categories WHERE contact_id = ANY($1)",
        )
        .bind(contact_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to get links for contacts"))
    }

    async fn links_for_categories(
        &self,
        category_ids: &[Uuid],
    ) -> Result<Vec<ContactCategoryLink>> {
        if category_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, ContactCategoryLink>(
            "SELECT contact_id, category_id FROM contact_categories WHERE category_id = ANY($1)",
        )
        .bind(category_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to get links for categories"))
    }

    async fn insert_links(&self, links: &[ContactCategoryLink]) -> Result<u64> {
        if links.is_empty() {
            return Ok(0);
        }

        let (contact_ids, category_ids): (Vec<Uuid>, Vec<Uuid>) = links
            .iter()
            .map(|l| (l.contact_id, l.category_id))
            .unzip();

        let result = sqlx::query(
            r#"
            INSERT INTO contact_categories (contact_id, category_id)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
            ON CONFLICT (contact_id, category_id) DO NOTHING
            "#,
        )
        .bind(&contact_ids)
        .bind(&category_ids)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert contact category links"))?;

        Ok(result.rows_affected())
    }

    async fn delete_for_contact(&self, contact_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM contact_categories WHERE contact_id = $1")
            .bind(contact_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to unlink contact categories"))?;

        Ok(result.rows_affected())
    }

    async fn delete_for_category(&self, category_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM contact_categories WHERE category_id = $1")
            .bind(category_id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to unlink category contacts"))?;

        Ok(result.rows_affected())
    }
}
