use slint::ComponentHandle;
use std::path::PathBuf;

use crate::state::AppState;
use crate::services::StoreWatchService;
use crate::ui::gallery_display::refresh_closet;
use crate::ui::handlers::open_dialog;

fn startup_image_from_args() -> Option<PathBuf> {
    std::env::args_os()
        .skip(1)
        .filter_map(|arg| {
            let arg_str = arg.to_string_lossy();
            if arg_str.starts_with('-') {
                None
            } else {
                Some(PathBuf::from(arg))
            }
        })
        .find(|path| crate::file_utils::is_supported_image(path))
}

/// Loads the closet from the store in the background.
fn load_items(app: &crate::AppWindow, app_state: &AppState) {
    let ui_handle = app.as_weak();
    let service = app_state.closet_service.clone();
    let closet = app_state.closet.clone();
    let cache = app_state.image_cache.clone();

    rayon::spawn(move || {
        let result = service.load();

        let _ = slint::invoke_from_event_loop(move || {
            if let Ok(items) = result {
                log::info!("Loaded {} items", items.len());
                if let Ok(mut closet) = closet.lock() {
                    closet.replace_items(items);
                }
            }
            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::ViewState>().set_loading(false);
                refresh_closet(&ui, closet, cache);
            }
        });
    });
}

/// Reloads the closet whenever the store index changes on disk.
fn watch_store(app: &crate::AppWindow, app_state: &AppState, index_path: PathBuf) {
    let ui_handle = app.as_weak();
    let closet = app_state.closet.clone();
    let cache = app_state.image_cache.clone();
    let watch_service = StoreWatchService::new(app_state.closet_service.clone(), index_path);

    let watcher = watch_service.start_watching(move |items| {
        if let Ok(mut closet) = closet.lock() {
            closet.replace_items(items);
        }
        if let Some(ui) = ui_handle.upgrade() {
            refresh_closet(&ui, closet.clone(), cache.clone());
        }
    });

    match watcher {
        Ok(watcher) => {
            if let Ok(mut slot) = app_state.store_watcher.lock() {
                *slot = Some(watcher);
            }
        }
        Err(e) => log::warn!("Store refresh disabled: {}", e),
    }
}

fn setup_platform_window_hooks(app: &crate::AppWindow, app_state: &AppState) {
    use i_slint_backend_winit::WinitWindowAccessor;
    use i_slint_backend_winit::{winit::event::WindowEvent, EventResult};

    let ui_handle = app.as_weak();
    let draft = app_state.draft.clone();
    let notifier = app_state.notifier.clone();

    app.window().on_winit_window_event(move |_window, event| {
        if let WindowEvent::DroppedFile(path) = event {
            if crate::file_utils::is_supported_image(path) {
                if let Some(ui) = ui_handle.upgrade() {
                    ui.global::<crate::ViewState>().set_dialog_open(true);
                }
                crate::ui::handlers::select_file_for_upload(
                    ui_handle.clone(),
                    path.clone(),
                    draft.clone(),
                    notifier.clone(),
                );
            }
        }

        EventResult::Propagate
    });
}

pub fn configure_startup(app: &crate::AppWindow, app_state: &AppState, index_path: PathBuf) {
    setup_platform_window_hooks(app, app_state);
    crate::ui::gallery_display::refresh_views(app, &app_state.closet);
    load_items(app, app_state);
    watch_store(app, app_state, index_path);

    if let Some(path) = startup_image_from_args() {
        open_dialog(app, app_state, Some(path));
    }
}
