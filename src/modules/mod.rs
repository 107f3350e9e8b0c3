//! Modules layer - Infrastructure components behind narrow interfaces
//!
//! Persistence, outgoing email and image encoding.

pub mod email;
pub mod images;
pub mod persistence;
