//! State of the "add to closet" dialog.

use crate::config::{MAX_UPLOAD_BYTES, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::UploadRejection;
use crate::file_utils;
use crate::model::{Category, ClothingItem};
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Validated file ready to be handed to the item store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUpload {
    pub extension: String,
    pub bytes: Vec<u8>,
    pub category: Category,
}

/// A locally chosen file with its preview item.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub extension: String,
    pub preview: ClothingItem,
}

/// Dialog draft: chosen file, chosen category, upload in progress.
#[derive(Debug, Default)]
pub struct UploadDraft {
    file: Option<SelectedFile>,
    category: Option<Category>,
    uploading: bool,
}

/// Checks a candidate file and returns the extension it will be stored with.
pub fn validate_image(path: &Path, bytes: &[u8]) -> Result<String, UploadRejection> {
    let size = bytes.len() as u64;
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge { size });
    }

    let format = image::guess_format(bytes).map_err(|_| UploadRejection::NotAnImage)?;
    let extension = file_utils::supported_extension(path)
        .filter(|ext| format.extensions_str().contains(&ext.as_str()))
        .or_else(|| {
            format
                .extensions_str()
                .first()
                .map(|ext| ext.to_string())
                .filter(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
        })
        .ok_or(UploadRejection::NotAnImage)?;

    Ok(extension)
}

impl UploadDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Picks a file for upload. A rejected file leaves the draft unchanged.
    pub fn select_file(&mut self, path: PathBuf, bytes: Vec<u8>) -> Result<(), UploadRejection> {
        let extension = validate_image(&path, &bytes).inspect_err(|rejection| {
            warn!("Rejected {}: {}", path.display(), rejection);
        })?;

        debug!("Selected {} ({} bytes)", path.display(), bytes.len());
        let preview = ClothingItem::preview(
            file_utils::path_to_url(&path),
            self.category.unwrap_or(Category::Top),
        );
        self.file = Some(SelectedFile {
            path,
            bytes,
            extension,
            preview,
        });
        Ok(())
    }

    /// Drops the chosen file; the category choice is kept.
    pub fn clear_file(&mut self) {
        self.file = None;
    }

    pub fn choose_category(&mut self, category: Category) {
        self.category = Some(category);
        if let Some(file) = self.file.as_mut() {
            file.preview.category = category;
        }
    }

    pub fn can_submit(&self) -> bool {
        self.file.is_some() && self.category.is_some() && !self.uploading
    }

    /// Marks the draft as uploading and returns the payload, or `None` when
    /// the draft is incomplete or an upload is already running.
    pub fn begin_upload(&mut self) -> Option<NewUpload> {
        if !self.can_submit() {
            return None;
        }
        let file = self.file.as_ref()?;
        let category = self.category?;
        self.uploading = true;
        Some(NewUpload {
            extension: file.extension.clone(),
            bytes: file.bytes.clone(),
            category,
        })
    }

    /// Ends an upload. Success clears the draft; failure keeps it for a retry.
    pub fn finish_upload(&mut self, success: bool) {
        self.uploading = false;
        if success {
            self.reset();
        }
    }

    pub fn reset(&mut self) {
        self.file = None;
        self.category = None;
        self.uploading = false;
    }
}
