use crate::features::contacts::models::Contact;

/// Filter an already-loaded contact set by a free-text query.
///
/// Matches case-insensitively anywhere in "first last". A missing or blank
/// query keeps every contact. Results are ordered by last name, then first
/// name, comparing strings ordinally.
pub fn search_contacts(mut contacts: Vec<Contact>, query: Option<&str>) -> Vec<Contact> {
    let needle = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    if let Some(needle) = needle {
        contacts.retain(|c| c.full_name().to_lowercase().contains(&needle));
    }

    contacts.sort_by(|a, b| {
        a.last_name
            .cmp(&b.last_name)
            .then_with(|| a.first_name.cmp(&b.first_name))
    });
    contacts
}
