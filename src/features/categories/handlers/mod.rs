pub mod category_handler;

pub use category_handler::{
    __path_category_email_form, __path_category_membership, __path_create_category,
    __path_delete_category, __path_delete_category_preview, __path_edit_category_form,
    __path_get_category, __path_list_categories, __path_new_category_form,
    __path_send_category_email, __path_update_category, category_email_form,
    category_membership, create_category, delete_category, delete_category_preview,
    edit_category_form, get_category, list_categories, new_category_form, send_category_email,
    update_category,
};
