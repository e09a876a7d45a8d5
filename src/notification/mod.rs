// Declare submodules
pub mod notification_models;
pub mod notification_dto;
pub mod notification_repository;
pub mod notification_handlers;
pub mod notification_service;

// Re-export public items
pub use notification_models::{Notification, SendResult};
pub use notification_repository::{NotificationFilters, NotificationRepository};
pub use notification_service::NotificationService;
