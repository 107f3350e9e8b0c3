//! Contact <-> Category relationship management and email dispatch,
//! shared by the contacts and categories features.

pub mod dtos;
pub mod models;
pub mod services;

pub use services::{AddressBookService, EmailDispatchService};
