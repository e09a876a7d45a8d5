// Declare submodules
pub mod fcm;

// Re-export public items
pub use fcm::{FcmClient, PushClient};
