// handlers/public/mod.rs - Public handlers (no authentication required)

pub mod root;
pub mod user;
