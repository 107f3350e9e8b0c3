mod contact;
mod us_state;

pub use contact::{Contact, ContactFields, NewContact};
pub use us_state::UsState;
