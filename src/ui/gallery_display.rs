//! Pushes closet state into the galleries, counts and dialog list.
//!
//! Missing images are decoded with `rayon::spawn` into the shared cache, then
//! `slint::invoke_from_event_loop` re-applies the image models on the UI thread.

use crate::image_cache::ImageCache;
use crate::image_loader;
use crate::model::{Category, ClothingItem};
use crate::state::ClosetState;
use crate::ui::{set_gallery_view, set_summary_counts};
use log::warn;
use slint::{ComponentHandle, Image, ModelRc, VecModel};
use std::sync::{Arc, Mutex};

/// Builds the Slint image list for references, using blanks for images not decoded yet.
fn images_from_cache(urls: &[String], cache: &Arc<Mutex<ImageCache>>) -> Vec<Image> {
    let Ok(mut cache) = cache.lock() else {
        return vec![Image::default(); urls.len()];
    };
    urls.iter()
        .map(|url| {
            cache
                .get(url)
                .map(|cached| image_loader::create_slint_image(&cached))
                .unwrap_or_default()
        })
        .collect()
}

/// Sets the image models of both galleries and the dialog list.
fn apply_images(
    ui: &crate::AppWindow,
    closet: &Arc<Mutex<ClosetState>>,
    cache: &Arc<Mutex<ImageCache>>,
) {
    {
        let Ok(closet) = closet.lock() else {
            return;
        };
        let view_state = ui.global::<crate::ViewState>();

        for category in Category::ALL {
            let images = images_from_cache(closet.gallery(category).state().images(), cache);
            let model = ModelRc::new(VecModel::from(images));
            match category {
                Category::Top => view_state.set_top_images(model),
                Category::Bottom => view_state.set_bottom_images(model),
            }
        }
    }
    apply_dialog_items(ui, closet, cache);
}

/// Lists the items of the category chosen in the dialog; empty when none is chosen.
pub fn apply_dialog_items(
    ui: &crate::AppWindow,
    closet: &Arc<Mutex<ClosetState>>,
    cache: &Arc<Mutex<ImageCache>>,
) {
    let view_state = ui.global::<crate::ViewState>();
    let category = Category::from_ui_index(view_state.get_selected_category());
    let Ok(closet) = closet.lock() else {
        return;
    };

    let entries = dialog_entries(&closet, category);
    let urls: Vec<String> = entries.iter().map(|(item, _)| item.url.clone()).collect();
    let thumbnails = images_from_cache(&urls, cache);
    let dialog_items: Vec<crate::DialogItem> = entries
        .into_iter()
        .zip(thumbnails)
        .map(|((item, label), thumbnail)| crate::DialogItem {
            id: item.id.into(),
            url: item.url.into(),
            label: label.into(),
            thumbnail,
        })
        .collect();
    view_state.set_dialog_items(ModelRc::new(VecModel::from(dialog_items)));
}

/// Items of the chosen category with their list labels ("Superior 1", ...).
fn dialog_entries(closet: &ClosetState, category: Option<Category>) -> Vec<(ClothingItem, String)> {
    let Some(category) = category else {
        return Vec::new();
    };
    closet
        .items_in(category)
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let label = format!("{} {}", category.label(), position + 1);
            (item, label)
        })
        .collect()
}

/// Gallery images starting at the page on screen, wrapping around.
fn decode_order(images: &[String], current_index: usize) -> impl Iterator<Item = &String> {
    let start = current_index.min(images.len());
    images[start..].iter().chain(&images[..start])
}

/// Re-renders gallery views and counts from the current closet state.
pub fn refresh_views(ui: &crate::AppWindow, closet: &Arc<Mutex<ClosetState>>) {
    let Ok(closet) = closet.lock() else {
        return;
    };
    for category in Category::ALL {
        let gallery = closet.gallery(category);
        set_gallery_view(ui, category, gallery.title(), gallery.state().view());
    }
    let (top, bottom) = closet.counts();
    set_summary_counts(ui, top, bottom);
}

/// Refreshes everything after the item list changed and decodes missing images.
pub fn refresh_closet(
    ui: &crate::AppWindow,
    closet: Arc<Mutex<ClosetState>>,
    cache: Arc<Mutex<ImageCache>>,
) {
    refresh_views(ui, &closet);
    apply_images(ui, &closet, &cache);

    let missing: Vec<String> = {
        let (Ok(closet), Ok(mut cache)) = (closet.lock(), cache.lock()) else {
            return;
        };
        cache.reserve(closet.items().len());
        Category::ALL
            .into_iter()
            .flat_map(|category| {
                let state = closet.gallery(category).state();
                decode_order(state.images(), state.current_index())
            })
            .filter(|url| !cache.contains(url))
            .cloned()
            .collect()
    };
    if missing.is_empty() {
        return;
    }

    let ui_handle = ui.as_weak();
    rayon::spawn(move || {
        for url in missing {
            match image_loader::load_reference_blocking(&url) {
                Ok(cached) => {
                    if let Ok(mut cache) = cache.lock() {
                        cache.put(url, cached);
                    }
                }
                Err(e) => warn!("Failed to load {}: {}", url, e),
            }
        }

        let _ = slint::invoke_from_event_loop(move || {
            if let Some(ui) = ui_handle.upgrade() {
                apply_images(&ui, &closet, &cache);
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decoding_starts_at_the_visible_page() {
        let images: Vec<String> = ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect();
        let order: Vec<&String> = decode_order(&images, 2).collect();
        assert_eq!(order, vec!["c", "d", "a", "b"]);
        assert_eq!(decode_order(&[], 0).count(), 0);
    }

    #[test]
    fn dialog_lists_only_the_chosen_category() {
        let mut closet = ClosetState::new();
        let item = |id: &str, category| ClothingItem {
            id: id.to_string(),
            url: format!("file:///objects/u/{id}.png"),
            category,
            created_at: chrono::Utc::now(),
            preview: false,
        };
        closet.replace_items(vec![
            item("shirt", Category::Top),
            item("jeans", Category::Bottom),
            item("skirt", Category::Bottom),
        ]);

        assert!(dialog_entries(&closet, None).is_empty());

        let bottoms = dialog_entries(&closet, Some(Category::Bottom));
        let ids: Vec<&str> = bottoms.iter().map(|(item, _)| item.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(!ids.contains(&"shirt"));
        assert_eq!(bottoms[0].1, "Inferior 1");
        assert_eq!(bottoms[1].1, "Inferior 2");
    }
}
