pub mod contact_handler;

pub use contact_handler::{
    __path_contact_email_form, __path_create_contact, __path_delete_contact,
    __path_delete_contact_preview, __path_edit_contact_form, __path_get_contact,
    __path_list_contacts, __path_new_contact_form, __path_search_contacts,
    __path_send_contact_email, __path_update_contact, __path_upload_contact_image,
    contact_email_form, create_contact, delete_contact, delete_contact_preview,
    edit_contact_form, get_contact, list_contacts, new_contact_form, search_contacts,
    send_contact_email, update_contact, upload_contact_image,
};
