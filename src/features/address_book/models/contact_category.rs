use uuid::Uuid;

/// One row of the Contact <-> Category join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::FromRow)]
pub struct ContactCategoryLink {
    pub contact_id: Uuid,
    pub category_id: Uuid,
}
