/// Shown when a contact has no stored image
pub const DEFAULT_CONTACT_IMAGE: &str = "/img/DefaultContactImage.png";

/// Separator between recipients of a group email
pub const EMAIL_ADDRESS_SEPARATOR: &str = ";";

// =============================================================================
// STATUS MESSAGES
// =============================================================================

pub const EMAIL_SENT_MESSAGE: &str = "Your Email Has been Sent";

pub const EMAIL_FAILED_MESSAGE: &str = "Error: Email Send Failed";

