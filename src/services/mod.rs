//! Service layer for business logic.
//!
//! Separates store access and notifications from UI handlers for better
//! testability. Dependencies are passed in explicitly.

pub mod closet_service;
pub mod notification_service;
pub mod store_watch_service;

pub use closet_service::ClosetService;
pub use notification_service::{LogNotifier, Notice, Notifier};
pub use store_watch_service::{StoreDebouncer, StoreWatchService};
