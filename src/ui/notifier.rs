//! Notifier that shows notices as toasts in the window.

use crate::services::{LogNotifier, Notice, Notifier};
use crate::ui::show_notice;

/// Logs every notice and forwards it to the UI thread.
///
/// Safe to call from worker threads.
pub struct UiNotifier {
    ui: slint::Weak<crate::AppWindow>,
}

impl UiNotifier {
    pub fn new(ui: slint::Weak<crate::AppWindow>) -> Self {
        Self { ui }
    }
}

impl Notifier for UiNotifier {
    fn notify(&self, notice: Notice) {
        LogNotifier.notify(notice.clone());
        let _ = self.ui.upgrade_in_event_loop(move |ui| show_notice(&ui, &notice));
    }
}
