//! Clothing item records and categories.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The two fixed tags partitioning wardrobe items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "superior")]
    Top,
    #[serde(rename = "inferior")]
    Bottom,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Top, Category::Bottom];

    /// Label shown as the gallery title.
    pub fn label(self) -> &'static str {
        match self {
            Category::Top => "Superior",
            Category::Bottom => "Inferior",
        }
    }

    /// Index used by the UI to address a gallery.
    pub fn ui_index(self) -> i32 {
        match self {
            Category::Top => 0,
            Category::Bottom => 1,
        }
    }

    pub fn from_ui_index(index: i32) -> Option<Self> {
        match index {
            0 => Some(Category::Top),
            1 => Some(Category::Bottom),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One clothing item.
///
/// `preview` marks an image the user picked locally but has not uploaded.
/// It never reaches the record index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClothingItem {
    pub id: String,
    pub url: String,
    pub category: Category,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub preview: bool,
}

impl ClothingItem {
    /// Builds a transient preview item for a file that is not stored yet.
    pub fn preview(url: String, category: Category) -> Self {
        Self {
            id: String::new(),
            url,
            category,
            created_at: Utc::now(),
            preview: true,
        }
    }
}

/// Returns the image references of one category, newest first.
pub fn images_for(items: &[ClothingItem], category: Category) -> Vec<String> {
    let mut matching: Vec<&ClothingItem> = items
        .iter()
        .filter(|item| item.category == category && !item.preview)
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching.into_iter().map(|item| item.url.clone()).collect()
}

/// Returns the items of one category in the same order as [`images_for`].
pub fn items_for(items: &[ClothingItem], category: Category) -> Vec<ClothingItem> {
    let mut matching: Vec<ClothingItem> = items
        .iter()
        .filter(|item| item.category == category && !item.preview)
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, category: Category, secs: i64) -> ClothingItem {
        ClothingItem {
            id: id.to_string(),
            url: format!("file:///{}.png", id),
            category,
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
            preview: false,
        }
    }

    #[test]
    fn category_serializes_with_store_names() {
        assert_eq!(serde_json::to_string(&Category::Top).unwrap(), "\"superior\"");
        assert_eq!(
            serde_json::from_str::<Category>("\"inferior\"").unwrap(),
            Category::Bottom
        );
    }

    #[test]
    fn images_are_filtered_and_newest_first() {
        let items = vec![
            item("old-top", Category::Top, 10),
            item("bottom", Category::Bottom, 20),
            item("new-top", Category::Top, 30),
        ];

        assert_eq!(
            images_for(&items, Category::Top),
            vec!["file:///new-top.png", "file:///old-top.png"]
        );
        assert_eq!(images_for(&items, Category::Bottom), vec!["file:///bottom.png"]);
    }

    #[test]
    fn preview_items_are_not_listed_or_serialized() {
        let mut preview = ClothingItem::preview("file:///draft.png".to_string(), Category::Top);
        assert!(images_for(std::slice::from_ref(&preview), Category::Top).is_empty());

        preview.id = "draft".to_string();
        let json = serde_json::to_string(&preview).unwrap();
        assert!(!json.contains("preview"));
        let restored: ClothingItem = serde_json::from_str(&json).unwrap();
        assert!(!restored.preview);
    }

    #[test]
    fn ui_index_round_trips() {
        for category in Category::ALL {
            assert_eq!(Category::from_ui_index(category.ui_index()), Some(category));
        }
        assert_eq!(Category::from_ui_index(7), None);
    }
}
