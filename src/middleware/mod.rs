// Declare submodules
pub mod auth;

// Re-export public items
pub use auth::{external_auth, internal_auth, AuthUser};
