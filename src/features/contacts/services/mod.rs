mod contact_search;
mod contact_service;

pub use contact_search::search_contacts;
pub use contact_service::ContactService;
