mod contact_category;

pub use contact_category::ContactCategoryLink;
