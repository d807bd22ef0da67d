//! API endpoint handlers, one module per resource.

pub mod health;
pub mod nudges;
pub mod risk;
pub mod sessions;
