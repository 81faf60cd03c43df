//! Contents.json data model for Apple's Asset Catalog format
//!
//! Only the subset needed to describe a macOS `AppIcon.appiconset` is modelled.

use crate::icon_gen::icon_file_name;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Point sizes of a macOS app icon set; each is provided at 1x and 2x
pub const MAC_POINT_SIZES: [u32; 5] = [16, 32, 128, 256, 512];

/// Root structure of a Contents.json file
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// Array of image entries for different scales and sizes
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within an asset catalog
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageEntry {
    /// The size of the image in points (e.g., "16x16")
    pub size: String,

    /// The device type for the image, always "mac" here
    pub idiom: String,

    /// The filename for the image file
    pub filename: String,

    /// The scale factor for the image ("1x" or "2x")
    pub scale: String,
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The format version of the asset catalog (typically 1)
    pub version: u8,

    /// The application or tool that authored the asset catalog
    pub author: String,
}

impl ContentsFile {
    pub fn new(author: String) -> Self {
        Self {
            images: Vec::new(),
            info: Info { version: 1, author },
        }
    }

    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }
}

impl ImageEntry {
    /// Entry for a mac icon of `points` at `scale`
    pub fn new_mac(points: u32, scale: u32) -> Self {
        Self {
            size: format!("{points}x{points}"),
            idiom: "mac".to_string(),
            filename: icon_file_name(points * scale),
            scale: format!("{scale}x"),
        }
    }
}

/// Entries for every point size and scale whose pixel size is in `sizes`
pub fn mac_app_icon_entries(sizes: &[u32]) -> Vec<ImageEntry> {
    MAC_POINT_SIZES
        .iter()
        .flat_map(|&points| [1, 2].map(|scale| (points, scale)))
        .filter(|&(points, scale)| sizes.contains(&(points * scale)))
        .map(|(points, scale)| ImageEntry::new_mac(points, scale))
        .collect()
}

/// Writes a Contents.json file into `dir`, replacing any existing one
pub fn write_contents_json(dir: &Path, images: Vec<ImageEntry>) -> Result<()> {
    let mut contents = ContentsFile::new("app-icon-gen".to_string());
    for image in images {
        contents.add_image(image);
    }

    let json =
        serde_json::to_string_pretty(&contents).context("Failed to serialize Contents.json")?;
    std::fs::write(dir.join("Contents.json"), json).context("Failed to write Contents.json file")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_SIZES;

    #[test]
    fn test_default_sizes_fill_the_whole_set() {
        let entries = mac_app_icon_entries(&DEFAULT_SIZES);
        assert_eq!(entries.len(), 10);

        assert_eq!(entries[0], ImageEntry::new_mac(16, 1));
        assert_eq!(entries[0].filename, "app_icon_16.png");
        assert_eq!(entries[1].filename, "app_icon_32.png");
        assert_eq!(entries[1].scale, "2x");
        assert_eq!(entries[1].size, "16x16");

        let last = entries.last().unwrap();
        assert_eq!(last.size, "512x512");
        assert_eq!(last.filename, "app_icon_1024.png");
    }

    #[test]
    fn test_missing_sizes_are_skipped() {
        let entries = mac_app_icon_entries(&[32, 64]);
        let names: Vec<_> = entries.iter().map(|e| e.filename.as_str()).collect();
        // 32 px serves 16@2x and 32@1x, 64 px serves 32@2x
        assert_eq!(names, ["app_icon_32.png", "app_icon_32.png", "app_icon_64.png"]);
    }

    #[test]
    fn test_serialization() {
        let mut contents = ContentsFile::new("com.test.app".to_string());
        contents.add_image(ImageEntry::new_mac(128, 2));

        let json = serde_json::to_string_pretty(&contents).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["info"]["version"], 1);
        assert_eq!(value["info"]["author"], "com.test.app");
        assert_eq!(value["images"][0]["idiom"], "mac");
        assert_eq!(value["images"][0]["filename"], "app_icon_256.png");
        assert_eq!(value["images"][0]["size"], "128x128");
        assert_eq!(value["images"][0]["scale"], "2x");
    }

    #[test]
    fn test_write_contents_json() {
        let dir = tempfile::TempDir::new().unwrap();
        write_contents_json(dir.path(), mac_app_icon_entries(&DEFAULT_SIZES)).unwrap();

        let written = std::fs::read_to_string(dir.path().join("Contents.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["images"].as_array().unwrap().len(), 10);
    }
}
