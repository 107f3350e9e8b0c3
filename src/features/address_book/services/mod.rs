mod address_book_service;
mod email_dispatch_service;

pub use address_book_service::AddressBookService;
pub use email_dispatch_service::EmailDispatchService;
