pub mod admin_handlers;
pub mod auth_handlers;
pub mod citizen_handlers;
pub mod public_handlers;
