//! Icon generation settings
//!
//! Every proportion, colour and path used by the composer lives in
//! [`IconConfig`]. The defaults reproduce the stock Hander app icon.

use anyhow::{Context, Result};
use image::{Rgb, Rgba};
use std::{path::PathBuf, str::FromStr};

/// Gradient endpoint colour
pub type ColorStop = Rgb<u8>;

/// Asset catalog the icons are written into by default
pub const DEFAULT_OUTPUT_DIR: &str = "macos/Runner/Assets.xcassets/AppIcon.appiconset";

/// Every size referenced by a macOS `AppIcon.appiconset`
pub const DEFAULT_SIZES: [u32; 7] = [16, 32, 64, 128, 256, 512, 1024];

/// Hacker News orange (#FF6600)
pub const BRAND_ORANGE: ColorStop = Rgb([255, 102, 0]);

/// Darker shade of the brand orange used at the bottom of the gradient
pub const BRAND_ORANGE_DARK: ColorStop = Rgb([230, 85, 0]);

/// Fill of the centred square
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Immutable configuration passed into the composer and the output sink
#[derive(Debug, Clone, PartialEq)]
pub struct IconConfig {
    /// Square pixel sizes to generate, in order
    pub sizes: Vec<u32>,

    /// Directory the PNG files are written into
    pub output_dir: PathBuf,

    /// Gradient colour at the top row, also used for the letter
    pub base_color: ColorStop,

    /// Gradient colour at the bottom row
    pub dark_color: ColorStop,

    /// Fill of the centred rounded square
    pub overlay_color: Rgba<u8>,

    /// Letter drawn in the middle of the icon
    pub letter: char,

    /// Outer corner radius as a fraction of the icon size
    pub corner_ratio: f64,

    /// Side of the centred square as a fraction of the icon size
    pub inner_ratio: f64,

    /// Corner radius of the centred square as a fraction of its side
    pub inner_corner_ratio: f64,

    /// Font pixel size as a fraction of the icon size
    pub font_ratio: f64,

    /// Upward shift of the letter as a fraction of the icon size
    pub glyph_lift_ratio: f64,

    /// Also write an asset catalog Contents.json next to the PNGs
    pub write_contents_json: bool,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_color: BRAND_ORANGE,
            dark_color: BRAND_ORANGE_DARK,
            overlay_color: WHITE,
            letter: 'Y',
            corner_ratio: 0.2,
            inner_ratio: 0.6,
            inner_corner_ratio: 0.15,
            font_ratio: 0.5,
            glyph_lift_ratio: 0.05,
            write_contents_json: false,
        }
    }
}

impl IconConfig {
    /// Outer corner radius for an icon of `size` pixels
    pub fn corner_radius(&self, size: u32) -> u32 {
        scaled(size, self.corner_ratio)
    }

    /// Side length of the centred square
    pub fn inner_side(&self, size: u32) -> u32 {
        scaled(size, self.inner_ratio)
    }

    /// Corner radius of the centred square
    pub fn inner_corner_radius(&self, size: u32) -> u32 {
        scaled(self.inner_side(size), self.inner_corner_ratio)
    }

    /// Font size in pixels
    pub fn font_px(&self, size: u32) -> u32 {
        scaled(size, self.font_ratio)
    }

    /// Upward shift of the letter in pixels
    pub fn glyph_lift(&self, size: u32) -> i32 {
        scaled(size, self.glyph_lift_ratio) as i32
    }
}

/// Proportional length truncated toward zero
fn scaled(length: u32, ratio: f64) -> u32 {
    (length as f64 * ratio) as u32
}

/// Parse a CSS colour (e.g. `#f60` or `#ff6600`) into an RGB stop.
/// Alpha is ignored; gradient stops are always opaque.
pub fn parse_color(value: &str) -> Result<ColorStop> {
    let color = css_color::Srgb::from_str(value)
        .ok()
        .with_context(|| format!("Invalid CSS color: {value}"))?;

    Ok(Rgb([
        channel(color.red),
        channel(color.green),
        channel(color.blue),
    ]))
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_proportions_at_128() {
        let config = IconConfig::default();
        assert_eq!(config.corner_radius(128), 25);
        assert_eq!(config.inner_side(128), 76);
        assert_eq!(config.inner_corner_radius(128), 11);
        assert_eq!(config.font_px(128), 64);
        assert_eq!(config.glyph_lift(128), 6);
    }

    #[test]
    fn test_small_sizes_truncate_to_zero() {
        let config = IconConfig::default();
        assert_eq!(config.corner_radius(4), 0);
        assert_eq!(config.glyph_lift(16), 0);
        assert_eq!(config.inner_side(1), 0);
    }

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!(parse_color("#FF6600").unwrap(), BRAND_ORANGE);
        assert_eq!(parse_color("#e65500").unwrap(), BRAND_ORANGE_DARK);
        assert_eq!(parse_color("#fff").unwrap(), Rgb([255, 255, 255]));
    }

    #[test]
    fn test_parse_invalid_color() {
        let err = parse_color("not-a-color").unwrap_err();
        assert!(err.to_string().contains("not-a-color"));
    }
}
