//! Event handlers for UI callbacks.
//!
//! Gallery input runs synchronously on the UI thread. Store operations and
//! file reads use `rayon::spawn`; the file dialog uses `slint::spawn_local`.

use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use crate::image_cache::ImageCache;
use crate::image_loader;
use crate::model::Category;
use crate::services::{ClosetService, Notice, Notifier};
use crate::state::{AppState, ClosetState, Direction, Gallery, GalleryEvent, UploadDraft};
use crate::ui::gallery_display::{apply_dialog_items, refresh_closet};
use crate::ui::{set_dialog_state, set_error_with_prefix, set_gallery_view};
use log::{debug, warn};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Applies `action` to one gallery and re-renders it.
fn with_gallery(
    ui_handle: &slint::Weak<crate::AppWindow>,
    closet: &Arc<Mutex<ClosetState>>,
    gallery_id: i32,
    action: impl FnOnce(&mut Gallery),
) {
    let Some(category) = Category::from_ui_index(gallery_id) else {
        warn!("Event for unknown gallery {}", gallery_id);
        return;
    };

    let (title, view) = {
        let Ok(mut closet) = closet.lock() else {
            return;
        };
        let gallery = closet.gallery_mut(category);
        action(gallery);
        (gallery.title().to_string(), gallery.state().view())
    };

    if let Some(ui) = ui_handle.upgrade() {
        set_gallery_view(&ui, category, &title, view);
    }
}

/// Converts a UI index, dropping negative values.
fn ui_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

fn refresh_dialog(ui: &crate::AppWindow, draft: &Arc<Mutex<UploadDraft>>) {
    if let Ok(draft) = draft.lock() {
        set_dialog_state(ui, &draft);
    }
}

/// Reads, validates and previews a file for the upload dialog.
///
/// Runs on a rayon worker; rejected files are reported through the notifier
/// and leave the draft unchanged.
pub fn select_file_for_upload(
    ui_handle: slint::Weak<crate::AppWindow>,
    path: PathBuf,
    draft: Arc<Mutex<UploadDraft>>,
    notifier: Arc<dyn Notifier>,
) {
    rayon::spawn(move || {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = ui_handle.upgrade_in_event_loop(move |ui| {
                    set_error_with_prefix(&ui, "Failed to read image", e.to_string());
                });
                return;
            }
        };

        let preview = match image_loader::decode_blocking(&bytes) {
            Ok(preview) => Some(preview),
            Err(e) => {
                debug!("No preview for {}: {}", path.display(), e);
                None
            }
        };

        let selected = match draft.lock() {
            Ok(mut draft) => draft.select_file(path, bytes),
            Err(_) => return,
        };
        if let Err(rejection) = selected {
            notifier.notify(Notice::file_rejected(&rejection));
            return;
        }

        let _ = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui_handle.upgrade() {
                if let Some(preview) = preview {
                    ui.global::<crate::ViewState>()
                        .set_preview_image(image_loader::create_slint_image(&preview));
                }
                refresh_dialog(&ui, &draft);
            }
        });
    });
}

/// Opens the dialog, optionally pre-filled with a file.
pub fn open_dialog(ui: &crate::AppWindow, state: &AppState, path: Option<PathBuf>) {
    ui.global::<crate::ViewState>().set_dialog_open(true);
    refresh_dialog(ui, &state.draft);

    if let Some(path) = path {
        select_file_for_upload(
            ui.as_weak(),
            path,
            state.draft.clone(),
            state.notifier.clone(),
        );
    }
}

fn setup_gallery_handlers(ui: &crate::AppWindow, state: &AppState) {
    let logic = ui.global::<crate::Logic>();

    logic.on_drag_start({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id, x| {
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                gallery.handle(GalleryEvent::DragStart(x));
            });
        }
    });

    logic.on_drag_move({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id, x, width| {
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                gallery.state_mut().set_container_width(width);
                gallery.handle(GalleryEvent::DragMove(x));
            });
        }
    });

    logic.on_drag_end({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id| {
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                gallery.handle(GalleryEvent::DragEnd);
            });
        }
    });

    logic.on_pointer_leave({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id| {
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                if gallery.state().is_dragging() {
                    gallery.handle(GalleryEvent::PointerLeave);
                }
            });
        }
    });

    logic.on_navigate({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id, forward| {
            let direction = if forward {
                Direction::Next
            } else {
                Direction::Previous
            };
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                gallery.handle(GalleryEvent::NavButton(direction));
            });
        }
    });

    logic.on_jump_to({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id, index| {
            let Some(index) = ui_index(index) else {
                warn!("Ignoring jump to negative index {}", index);
                return;
            };
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                if index < gallery.state().len() {
                    gallery.handle(GalleryEvent::Dot(index));
                }
            });
        }
    });

    logic.on_activate({
        let ui_handle = ui.as_weak();
        let closet = state.closet.clone();
        move |gallery_id, index| {
            let (Some(index), Some(category)) =
                (ui_index(index), Category::from_ui_index(gallery_id))
            else {
                return;
            };
            with_gallery(&ui_handle, &closet, gallery_id, |gallery| {
                if index < gallery.state().len() {
                    gallery.handle(GalleryEvent::ImageTap(index));
                }
            });
            if let Ok(closet) = closet.lock() {
                if let Some(item) = closet.item_at(category, index) {
                    debug!("Activated item {} ({})", item.id, item.url);
                }
            }
        }
    });
}

fn upload(
    ui_handle: slint::Weak<crate::AppWindow>,
    service: ClosetService,
    closet: Arc<Mutex<ClosetState>>,
    draft: Arc<Mutex<UploadDraft>>,
    cache: Arc<Mutex<ImageCache>>,
) {
    let Some(new_upload) = draft.lock().ok().and_then(|mut draft| draft.begin_upload()) else {
        return;
    };
    if let Some(ui) = ui_handle.upgrade() {
        refresh_dialog(&ui, &draft);
    }

    rayon::spawn(move || {
        let result = service.add(new_upload);

        let _ = slint::invoke_from_event_loop(move || {
            let success = result.is_ok();
            if let Ok(mut draft) = draft.lock() {
                draft.finish_upload(success);
            }
            if let Ok(item) = result {
                if let Ok(mut closet) = closet.lock() {
                    closet.insert_item(item);
                }
            }

            if let Some(ui) = ui_handle.upgrade() {
                refresh_dialog(&ui, &draft);
                if success {
                    ui.global::<crate::ViewState>().set_dialog_open(false);
                    refresh_closet(&ui, closet, cache);
                }
            }
        });
    });
}

fn delete(
    ui_handle: slint::Weak<crate::AppWindow>,
    service: ClosetService,
    closet: Arc<Mutex<ClosetState>>,
    cache: Arc<Mutex<ImageCache>>,
    id: String,
    url: String,
) {
    rayon::spawn(move || {
        if service.delete(&id, &url).is_err() {
            return;
        }

        let _ = slint::invoke_from_event_loop(move || {
            if let Ok(mut closet) = closet.lock() {
                closet.remove_item(&id);
            }
            if let Ok(mut cache) = cache.lock() {
                cache.remove(&url);
            }
            if let Some(ui) = ui_handle.upgrade() {
                refresh_closet(&ui, closet, cache);
            }
        });
    });
}

fn setup_dialog_handlers(ui: &crate::AppWindow, state: &AppState) {
    let logic = ui.global::<crate::Logic>();

    logic.on_open_dialog({
        let ui_handle = ui.as_weak();
        let draft = state.draft.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::ViewState>().set_dialog_open(true);
                refresh_dialog(&ui, &draft);
            }
        }
    });

    logic.on_close_dialog({
        let ui_handle = ui.as_weak();
        let draft = state.draft.clone();
        let closet = state.closet.clone();
        let cache = state.image_cache.clone();
        move || {
            let Ok(mut draft_state) = draft.lock() else {
                return;
            };
            if draft_state.is_uploading() {
                return;
            }
            draft_state.reset();
            drop(draft_state);

            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::ViewState>().set_dialog_open(false);
                refresh_dialog(&ui, &draft);
                apply_dialog_items(&ui, &closet, &cache);
            }
        }
    });

    // AsyncFileDialog must run on the main thread, so spawn_local rather than rayon.
    logic.on_pick_file({
        let ui_handle = ui.as_weak();
        let draft = state.draft.clone();
        let notifier = state.notifier.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let draft = draft.clone();
            let notifier = notifier.clone();
            let _ = slint::spawn_local(async move {
                let Some(file_handle) = AsyncFileDialog::new()
                    .add_filter("Imágenes", &SUPPORTED_IMAGE_EXTENSIONS)
                    .pick_file()
                    .await
                else {
                    debug!("No file selected");
                    return;
                };

                select_file_for_upload(
                    ui_handle,
                    file_handle.path().to_path_buf(),
                    draft,
                    notifier,
                );
            });
        }
    });

    logic.on_clear_file({
        let ui_handle = ui.as_weak();
        let draft = state.draft.clone();
        move || {
            if let Ok(mut draft) = draft.lock() {
                draft.clear_file();
            }
            if let Some(ui) = ui_handle.upgrade() {
                refresh_dialog(&ui, &draft);
            }
        }
    });

    logic.on_choose_category({
        let ui_handle = ui.as_weak();
        let draft = state.draft.clone();
        let closet = state.closet.clone();
        let cache = state.image_cache.clone();
        move |index| {
            let Some(category) = Category::from_ui_index(index) else {
                warn!("Unknown category {}", index);
                return;
            };
            if let Ok(mut draft) = draft.lock() {
                draft.choose_category(category);
            }
            if let Some(ui) = ui_handle.upgrade() {
                refresh_dialog(&ui, &draft);
                apply_dialog_items(&ui, &closet, &cache);
            }
        }
    });

    logic.on_upload({
        let ui_handle = ui.as_weak();
        let service = state.closet_service.clone();
        let closet = state.closet.clone();
        let draft = state.draft.clone();
        let cache = state.image_cache.clone();
        move || {
            upload(
                ui_handle.clone(),
                service.clone(),
                closet.clone(),
                draft.clone(),
                cache.clone(),
            );
        }
    });

    logic.on_delete_item({
        let ui_handle = ui.as_weak();
        let service = state.closet_service.clone();
        let closet = state.closet.clone();
        let cache = state.image_cache.clone();
        move |id, url| {
            delete(
                ui_handle.clone(),
                service.clone(),
                closet.clone(),
                cache.clone(),
                id.to_string(),
                url.to_string(),
            );
        }
    });
}

/// Sets up all UI event handlers for the application.
pub fn setup_handlers(ui: &crate::AppWindow, state: &AppState) {
    setup_gallery_handlers(ui, state);
    setup_dialog_handlers(ui, state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_ui_indices_are_dropped() {
        assert_eq!(ui_index(-1), None);
        assert_eq!(ui_index(3), Some(3));
    }
}
