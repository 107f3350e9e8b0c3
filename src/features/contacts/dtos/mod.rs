mod contact_dto;

pub use contact_dto::{
    ContactEditFormDto, ContactFormOptionsDto, ContactResponseDto, ContactSummaryDto,
    CreateContactDto, ListContactsQuery, SearchContactsQuery, StateOptionDto, UpdateContactDto,
    UploadContactImageDto,
};
