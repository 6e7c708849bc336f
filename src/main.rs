// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

slint::include_modules!();

mod config;
mod error;
mod file_utils;
mod image_cache;
mod image_loader;
mod model;
mod services;
mod startup;
mod state;
mod store;
mod ui;

use slint::ComponentHandle;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut logger = env_logger::Builder::from_default_env();
    #[cfg(debug_assertions)]
    logger.filter_level(log::LevelFilter::Debug);
    logger.init();

    let config = config::StoreConfig::from_env();
    let store = Arc::new(store::LocalItemStore::open(&config.data_dir)?);
    let index_path = store.index_path();

    let app = AppWindow::new()?;
    let notifier = Arc::new(ui::UiNotifier::new(app.as_weak()));
    let app_state = state::AppState::new(store, notifier, config.user_id);

    // Setup all UI event handlers
    ui::setup_handlers(&app, &app_state);
    startup::configure_startup(&app, &app_state, index_path);

    app.run()?;

    Ok(())
}
