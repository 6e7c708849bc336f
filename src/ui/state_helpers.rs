//! Helper functions to set groups of ViewState properties together.

use crate::config::SETTLE_ANIMATION;
use crate::file_utils::PathExt;
use crate::model::Category;
use crate::services::Notice;
use crate::state::{GalleryView, UploadDraft};
use log::error;
use slint::ComponentHandle;
use std::time::Duration;

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Converts a computed gallery view into the UI struct.
pub fn gallery_data(title: &str, view: GalleryView) -> crate::GalleryData {
    crate::GalleryData {
        title: title.into(),
        current_index: view.current_index as i32,
        image_count: view.image_count as i32,
        translate_percent: view.translate_percent,
        animate: view.animate,
        transition_ms: if view.animate {
            SETTLE_ANIMATION.as_millis() as i32
        } else {
            0
        },
        show_placeholder: view.show_placeholder,
        show_navigation: view.show_navigation,
    }
}

/// Sets the presentation state of one gallery.
pub fn set_gallery_view(ui: &crate::AppWindow, category: Category, title: &str, view: GalleryView) {
    let view_state = ui.global::<crate::ViewState>();
    let data = gallery_data(title, view);
    match category {
        Category::Top => view_state.set_top_gallery(data),
        Category::Bottom => view_state.set_bottom_gallery(data),
    }
}

/// Sets the summary counts.
///
/// Groups: top-count, bottom-count
pub fn set_summary_counts(ui: &crate::AppWindow, top: usize, bottom: usize) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_top_count(top as i32);
    view_state.set_bottom_count(bottom as i32);
}

/// Mirrors the upload draft into the dialog properties.
///
/// Groups: has-preview, preview-name, selected-category, uploading, can-submit
pub fn set_dialog_state(ui: &crate::AppWindow, draft: &UploadDraft) {
    let view_state = ui.global::<crate::ViewState>();
    let has_preview = draft.selected_file().is_some();
    let preview_name = draft
        .selected_file()
        .map(|file| file.path.format_for_log())
        .unwrap_or_default();
    view_state.set_preview_name(preview_name.into());
    view_state.set_has_preview(has_preview);
    if has_preview {
        view_state.set_error_message(Default::default());
    } else {
        view_state.set_preview_image(slint::Image::default());
    }
    view_state.set_selected_category(draft.category().map(Category::ui_index).unwrap_or(-1));
    view_state.set_uploading(draft.is_uploading());
    view_state.set_can_submit(draft.can_submit());
}

/// Shows a toast and hides it again after a few seconds unless replaced.
pub fn show_notice(ui: &crate::AppWindow, notice: &Notice) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_toast_title(notice.title.as_str().into());
    view_state.set_toast_message(notice.description.as_str().into());
    view_state.set_toast_is_error(notice.is_error());
    view_state.set_toast_visible(true);

    let ui_handle = ui.as_weak();
    let shown_message = notice.description.clone();
    slint::Timer::single_shot(TOAST_DURATION, move || {
        if let Some(ui) = ui_handle.upgrade() {
            let view_state = ui.global::<crate::ViewState>();
            if view_state.get_toast_message() == shown_message.as_str() {
                view_state.set_toast_visible(false);
            }
        }
    });
}

/// Sets an error message in the UI with a prefix.
///
/// Logs the error and updates the ViewState error-message property.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}
