//! Screen composition: the item list and one gallery per category.

use crate::model::{self, Category, ClothingItem};
use crate::state::gallery::Gallery;
use log::info;

/// Owns the loaded items and keeps both galleries in sync with them.
#[derive(Debug)]
pub struct ClosetState {
    items: Vec<ClothingItem>,
    top: Gallery,
    bottom: Gallery,
}

impl Default for ClosetState {
    fn default() -> Self {
        Self::new()
    }
}

fn logging_gallery(category: Category) -> Gallery {
    Gallery::new(
        category.label(),
        Vec::new(),
        Some(Box::new(move |index| {
            info!("Selected {} image at index {}", category, index);
        })),
    )
}

impl ClosetState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            top: logging_gallery(Category::Top),
            bottom: logging_gallery(Category::Bottom),
        }
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    /// Replaces all items, e.g. after a (re)load from the store.
    pub fn replace_items(&mut self, items: Vec<ClothingItem>) {
        self.items = items.into_iter().filter(|item| !item.preview).collect();
        self.sync_galleries();
    }

    /// Adds a freshly stored item at the front.
    pub fn insert_item(&mut self, item: ClothingItem) {
        self.items.insert(0, item);
        self.sync_galleries();
    }

    /// Removes an item by id. Returns whether anything was removed.
    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.sync_galleries();
        }
        removed
    }

    /// Image references of a category, newest first.
    pub fn images(&self, category: Category) -> Vec<String> {
        model::images_for(&self.items, category)
    }

    /// Items of a category in gallery order.
    pub fn items_in(&self, category: Category) -> Vec<ClothingItem> {
        model::items_for(&self.items, category)
    }

    /// Item shown at `index` of a category's gallery.
    pub fn item_at(&self, category: Category, index: usize) -> Option<ClothingItem> {
        self.items_in(category).into_iter().nth(index)
    }

    /// Number of (top, bottom) items.
    pub fn counts(&self) -> (usize, usize) {
        (
            self.gallery(Category::Top).state().len(),
            self.gallery(Category::Bottom).state().len(),
        )
    }

    pub fn gallery(&self, category: Category) -> &Gallery {
        match category {
            Category::Top => &self.top,
            Category::Bottom => &self.bottom,
        }
    }

    pub fn gallery_mut(&mut self, category: Category) -> &mut Gallery {
        match category {
            Category::Top => &mut self.top,
            Category::Bottom => &mut self.bottom,
        }
    }

    fn sync_galleries(&mut self) {
        for category in Category::ALL {
            let images = self.images(category);
            self.gallery_mut(category).state_mut().set_images(images);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: &str, category: Category, secs: i64) -> ClothingItem {
        ClothingItem {
            id: id.to_string(),
            url: format!("file:///store/u/{}.png", id),
            category,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            preview: false,
        }
    }

    #[test]
    fn galleries_follow_items() {
        let mut closet = ClosetState::new();
        closet.replace_items(vec![
            item("t1", Category::Top, 1),
            item("t2", Category::Top, 2),
            item("b1", Category::Bottom, 3),
        ]);

        assert_eq!(closet.counts(), (2, 1));
        assert_eq!(
            closet.gallery(Category::Top).state().images(),
            ["file:///store/u/t2.png", "file:///store/u/t1.png"]
        );
        assert_eq!(closet.gallery(Category::Top).title(), "Superior");
        assert_eq!(closet.item_at(Category::Bottom, 0).unwrap().id, "b1");
    }

    #[test]
    fn deleting_the_viewed_item_clamps_in_the_same_update() {
        let mut closet = ClosetState::new();
        closet.replace_items(vec![
            item("a", Category::Top, 3),
            item("b", Category::Top, 2),
            item("c", Category::Top, 1),
        ]);
        closet.gallery_mut(Category::Top).state_mut().jump_to(2);

        assert!(closet.remove_item("c"));
        assert_eq!(closet.gallery(Category::Top).state().current_index(), 1);
        assert!(!closet.remove_item("c"));
    }

    #[test]
    fn inserting_keeps_other_gallery_position() {
        let mut closet = ClosetState::new();
        closet.replace_items(vec![
            item("b1", Category::Bottom, 1),
            item("b2", Category::Bottom, 2),
        ]);
        closet.gallery_mut(Category::Bottom).state_mut().jump_to(1);

        closet.insert_item(item("t1", Category::Top, 5));
        assert_eq!(closet.counts(), (1, 1 + 1));
        assert_eq!(closet.gallery(Category::Bottom).state().current_index(), 1);
        assert_eq!(closet.items()[0].id, "t1");
    }

    #[test]
    fn preview_items_never_enter_the_closet() {
        let mut closet = ClosetState::new();
        closet.replace_items(vec![ClothingItem::preview(
            "file:///tmp/draft.png".to_string(),
            Category::Top,
        )]);
        assert_eq!(closet.counts(), (0, 0));
        assert!(closet.gallery(Category::Top).state().view().show_placeholder);
    }
}
