//! Video/gallery classification by file-extension ratio
//!
//! Only the direct children of a folder are considered. Small folders are
//! always video collections; a folder with more than
//! `file_count_threshold` files becomes a gallery when the share of image
//! files is strictly greater than `image_ratio_threshold`.

use crate::ContentType;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_FILE_COUNT_THRESHOLD: usize = 30;
pub const DEFAULT_IMAGE_RATIO_THRESHOLD: f64 = 0.8;
pub const DEFAULT_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];

/// Tunables for [`classify`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Folders with this many direct files or fewer are always video
    pub file_count_threshold: usize,
    /// Image share above which a large folder is a gallery
    pub image_ratio_threshold: f64,
    /// Extensions counted as images, compared case-insensitively
    pub image_extensions: Vec<String>,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            file_count_threshold: DEFAULT_FILE_COUNT_THRESHOLD,
            image_ratio_threshold: DEFAULT_IMAGE_RATIO_THRESHOLD,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS.iter().map(|ext| (*ext).to_string()).collect(),
        }
    }
}

impl ClassifierSettings {
    /// Whether a path's extension is one of the image extensions
    ///
    /// Configured extensions may be written with or without a leading dot.
    #[must_use]
    pub fn is_image(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        self.image_extensions
            .iter()
            .any(|known| known.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}

/// Decide the content type of a folder from its direct file children
///
/// `files` must contain regular files only; sub-directories are not counted.
///
/// # Examples
/// ```
/// use shelvr::ContentType;
/// use shelvr::discovery::{ClassifierSettings, classify};
///
/// let settings = ClassifierSettings::default();
/// let pages: Vec<String> = (0..40).map(|i| format!("p{i}.jpg")).collect();
/// assert_eq!(classify(&pages, &settings), ContentType::Gallery);
/// assert_eq!(classify(["movie.mkv"], &settings), ContentType::Video);
/// ```
pub fn classify<I, P>(files: I, settings: &ClassifierSettings) -> ContentType
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut total = 0usize;
    let mut images = 0usize;
    for file in files {
        total += 1;
        if settings.is_image(file.as_ref()) {
            images += 1;
        }
    }

    if total <= settings.file_count_threshold {
        return ContentType::Video;
    }

    #[allow(clippy::cast_precision_loss)]
    let ratio = images as f64 / total as f64;
    if ratio > settings.image_ratio_threshold {
        ContentType::Gallery
    } else {
        ContentType::Video
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::numbered;

    fn folder(images: usize, others: usize) -> Vec<String> {
        let mut files = numbered("img", "jpg", images);
        files.extend(numbered("clip", "mkv", others));
        files
    }

    #[test]
    fn test_image_heavy_large_folder_is_gallery() {
        let settings = ClassifierSettings::default();
        assert_eq!(classify(folder(36, 4), &settings), ContentType::Gallery);
    }

    #[test]
    fn test_ratio_below_threshold_is_video() {
        let settings = ClassifierSettings::default();
        assert_eq!(classify(folder(30, 10), &settings), ContentType::Video);
    }

    #[test]
    fn test_ratio_exactly_at_threshold_is_video() {
        let settings = ClassifierSettings::default();
        assert_eq!(classify(folder(32, 8), &settings), ContentType::Video);
    }

    #[test]
    fn test_small_folder_is_always_video() {
        let settings = ClassifierSettings::default();
        assert_eq!(classify(folder(9, 1), &settings), ContentType::Video);
        assert_eq!(classify(folder(30, 0), &settings), ContentType::Video);
    }

    #[test]
    fn test_just_over_count_threshold() {
        let settings = ClassifierSettings::default();
        assert_eq!(classify(folder(31, 0), &settings), ContentType::Gallery);
    }

    #[test]
    fn test_empty_folder_is_video() {
        let settings = ClassifierSettings::default();
        assert_eq!(classify(Vec::<String>::new(), &settings), ContentType::Video);
    }

    #[test]
    fn test_extensions_are_case_insensitive() {
        let settings = ClassifierSettings::default();
        let mut files = numbered("IMG", "JPG", 20);
        files.extend(numbered("shot", "Png", 15));
        files.extend(numbered("anim", "GIF", 5));
        assert_eq!(classify(files, &settings), ContentType::Gallery);
    }

    #[test]
    fn test_files_without_extension_are_not_images() {
        let settings = ClassifierSettings::default();
        assert!(!settings.is_image(Path::new("README")));
        assert!(!settings.is_image(Path::new(".jpg")));
        assert!(settings.is_image(Path::new("dir/cover.webp")));
    }

    #[test]
    fn test_custom_settings() {
        let settings = ClassifierSettings {
            file_count_threshold: 2,
            image_ratio_threshold: 0.5,
            image_extensions: vec![".tiff".to_string()],
        };
        assert_eq!(classify(["a.tiff", "b.TIFF", "c.mkv"], &settings), ContentType::Gallery);
        assert_eq!(classify(["a.jpg", "b.jpg", "c.jpg"], &settings), ContentType::Video);
    }
}
