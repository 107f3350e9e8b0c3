pub mod address_book;
pub mod auth;
pub mod categories;
pub mod contacts;
pub mod users;
