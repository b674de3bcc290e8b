//! Application services
//!
//! Services wrapping the backend capabilities for the UI.

mod auth;
mod backend;

pub use auth::AuthService;
pub use backend::BackendService;
