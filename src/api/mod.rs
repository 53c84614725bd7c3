//! Request parsing and response shapes for the HTTP surface.

pub mod attribute;
pub mod fields;
pub mod recipe;
pub mod user;
