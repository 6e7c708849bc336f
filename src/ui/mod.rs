//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - Gallery gestures: handled synchronously on the UI thread
//! - `slint::spawn_local`: the file dialog, which must run on the main thread
//! - `rayon::spawn`: store I/O and image decoding
//! - `slint::invoke_from_event_loop`: returning worker results to the UI thread

pub mod gallery_display;
pub mod handlers;
mod notifier;
mod state_helpers;

pub use handlers::setup_handlers;
pub use notifier::UiNotifier;
pub use state_helpers::*;
