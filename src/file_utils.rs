use crate::config::SUPPORTED_IMAGE_EXTENSIONS;
use std::path::{Path, PathBuf};

const FILE_URL_PREFIX: &str = "file://";

/// Returns the lowercased extension when it is one of the supported image types.
pub fn supported_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .filter(|ext| SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_supported_image(path: &Path) -> bool {
    path.is_file() && supported_extension(path).is_some()
}

/// Public reference for a stored object.
pub fn path_to_url(path: &Path) -> String {
    format!("{}{}", FILE_URL_PREFIX, path.display())
}

/// Local path behind a `file://` reference, if it is one.
pub fn url_to_path(url: &str) -> Option<PathBuf> {
    url.strip_prefix(FILE_URL_PREFIX).map(PathBuf::from)
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}

/// The `<user>/<object>` key of a stored image: the last two segments of its reference.
///
/// Empty, `.` and `..` segments yield `None`.
pub fn object_key_from_url(url: &str) -> Option<String> {
    let segments: Vec<&str> = url
        .trim_end_matches(['/', '\\'])
        .rsplit(['/', '\\'])
        .take(2)
        .collect();
    match segments.as_slice() {
        [name, user] if is_plain_segment(name) && is_plain_segment(user) => {
            Some(format!("{}/{}", user, name))
        }
        _ => None,
    }
}

pub trait PathExt {
    fn format_for_log(&self) -> String;
}

impl PathExt for Path {
    fn format_for_log(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(supported_extension(Path::new("shirt.JPG")), Some("jpg".to_string()));
        assert_eq!(supported_extension(Path::new("notes.txt")), None);
        assert_eq!(supported_extension(Path::new("no_extension")), None);
    }

    #[test]
    fn object_key_uses_last_two_segments() {
        assert_eq!(
            object_key_from_url("file:///data/objects/alice/1234.png"),
            Some("alice/1234.png".to_string())
        );
        assert_eq!(object_key_from_url("1234.png"), None);
    }

    #[test]
    fn object_key_rejects_relative_segments() {
        assert_eq!(object_key_from_url("file:///data/objects/../secret.png"), None);
        assert_eq!(object_key_from_url("file:///data/objects/alice/.."), None);
        assert_eq!(object_key_from_url("file:///data/objects/./a.png"), None);
    }

    #[test]
    fn file_urls_round_trip() {
        let path = Path::new("/data/objects/alice/1234.png");
        assert_eq!(url_to_path(&path_to_url(path)), Some(path.to_path_buf()));
        assert_eq!(url_to_path("https://example.com/a.png"), None);
    }
}
