//! User-facing notices ("toasts") for store operations.
//!
//! Services report outcomes through the [`Notifier`] handed to them, so they
//! can run headless in tests and against the window in the app.

use crate::error::UploadRejection;
use crate::model::Category;
use log::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A short message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub kind: NoticeKind,
}

impl Notice {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            kind: NoticeKind::Info,
        }
    }

    fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            kind: NoticeKind::Error,
        }
    }

    pub fn item_added(category: Category) -> Self {
        Self::info(
            "¡Imagen agregada!",
            format!("La imagen se guardó en la categoría {}.", category.label()),
        )
    }

    pub fn item_deleted() -> Self {
        Self::info("Prenda eliminada", "La prenda se eliminó correctamente.")
    }

    pub fn load_failed() -> Self {
        Self::error("No se pudieron cargar las prendas.")
    }

    pub fn upload_failed() -> Self {
        Self::error("No se pudo subir la imagen. Inténtalo de nuevo.")
    }

    pub fn delete_failed() -> Self {
        Self::error("No se pudo eliminar la prenda.")
    }

    pub fn file_rejected(rejection: &UploadRejection) -> Self {
        Self::error(rejection.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// Sink for notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Info => info!("{}: {}", notice.title, notice.description),
            NoticeKind::Error => error!("{}: {}", notice.title, notice.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_notice_names_the_category() {
        let notice = Notice::item_added(Category::Bottom);
        assert_eq!(notice.kind, NoticeKind::Info);
        assert!(notice.description.contains("Inferior"));
    }

    #[test]
    fn rejection_notice_is_an_error() {
        let notice = Notice::file_rejected(&UploadRejection::NotAnImage);
        assert!(notice.is_error());
        assert_eq!(notice.description, UploadRejection::NotAnImage.to_string());
    }
}
