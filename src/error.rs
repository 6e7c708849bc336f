//! Unified error types for the closet application.

use std::fmt;

/// Reasons a selected file is refused before upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRejection {
    /// The file is not a decodable image in a supported format.
    NotAnImage,
    /// The file exceeds the upload size limit.
    TooLarge { size: u64 },
}

impl fmt::Display for UploadRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadRejection::NotAnImage => {
                write!(f, "Por favor selecciona un archivo de imagen válido.")
            }
            UploadRejection::TooLarge { size } => write!(
                f,
                "El archivo es demasiado grande ({} bytes). Máximo 10MB.",
                size
            ),
        }
    }
}

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error loading or decoding an image file
    ImageLoad(String),
    /// Filesystem error in the item store or while reading a selected file
    Io(String),
    /// The record index could not be read or written
    Serialization(String),
    /// The store refused or failed an operation
    Storage(String),
    /// No record with the given id exists
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
            AppError::Serialization(msg) => write!(f, "Index error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::NotFound(id) => write!(f, "Item not found: {}", id),
        }
    }
}

impl std::error::Error for AppError {}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
