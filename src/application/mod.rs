//! Application services layer.

pub mod admin;
pub mod error;
pub mod invalidation;
pub mod page_content;
pub mod repos;
pub mod settings;
