//! Domain layer types and invariants.

pub mod entities;
pub mod error;
pub mod page_content;
pub mod settings;
pub mod slug;
pub mod types;
