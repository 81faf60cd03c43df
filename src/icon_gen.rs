use crate::config::{ColorStop, IconConfig};
use crate::contents_json::{mac_app_icon_entries, write_contents_json};
use crate::font::{FontProvider, GlyphFace};
use anyhow::{Context, Result};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    ColorType, GrayImage, ImageEncoder, Luma, Pixel, Rgba, RgbaImage,
};
use std::{
    fs::{create_dir_all, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// Single channel opacity map, 255 keeps a pixel and 0 clears it
pub type Mask = GrayImage;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Draws the letter icon at any square size
#[derive(Debug)]
pub struct IconComposer {
    config: IconConfig,
    face: GlyphFace,
}

impl IconComposer {
    /// Resolve the letter font once and keep it for every size
    pub fn new(config: IconConfig, fonts: &dyn FontProvider) -> Self {
        Self {
            config,
            face: fonts.resolve(),
        }
    }

    pub fn face(&self) -> &GlyphFace {
        &self.face
    }

    /// Compose the full icon: gradient, rounded corners, centred square and letter
    pub fn compose(&self, size: u32) -> RgbaImage {
        let config = &self.config;
        if size == 0 {
            return RgbaImage::new(0, 0);
        }

        // Step 1: vertical gradient
        let mut icon = gradient_background(size, config.base_color, config.dark_color);

        // Step 2: clip the corners
        let mask = rounded_rect_mask(size, size, config.corner_radius(size));
        apply_mask(&mut icon, &mask);

        // Step 3: centred rounded square
        let inner = config.inner_side(size);
        let offset = (size - inner) / 2;
        let square = rounded_square(inner, config.inner_corner_radius(size), config.overlay_color);
        composite_over(&mut icon, &square, offset, offset);

        // Step 4: the letter, painted straight onto the icon
        self.draw_letter(&mut icon, size);

        // A letter wider than a tiny icon must not repaint the clipped corners
        apply_mask(&mut icon, &mask);

        icon
    }

    fn draw_letter(&self, icon: &mut RgbaImage, size: u32) {
        let config = &self.config;
        let px = config.font_px(size) as f32;
        let bounds = self.face.measure(config.letter, px);

        let size = size as i32;
        let x = (size - bounds.width()).div_euclid(2);
        let y = (size - bounds.height()).div_euclid(2) - config.glyph_lift(size as u32);

        self.face.draw(icon, config.letter, px, (x, y), config.base_color);
    }
}

/// Fill every row with the colour interpolated at `y / size`, fully opaque
pub fn gradient_background(size: u32, top: ColorStop, bottom: ColorStop) -> RgbaImage {
    let rows: Vec<Rgba<u8>> = (0..size)
        .map(|y| {
            let ratio = y as f64 / size as f64;
            let lerp = |a: u8, b: u8| (a as f64 * (1.0 - ratio) + b as f64 * ratio) as u8;
            Rgba([
                lerp(top[0], bottom[0]),
                lerp(top[1], bottom[1]),
                lerp(top[2], bottom[2]),
                255,
            ])
        })
        .collect();

    RgbaImage::from_fn(size, size, |_, y| rows[y as usize])
}

/// Whether pixel (x, y) lies entirely inside a `width` x `height` rectangle
/// whose corners are rounded with `radius`.
///
/// The pixel edge furthest toward the corner is tested against the arc, so
/// the outermost corner pixel is cleared for any radius of at least one.
pub fn rounded_rect_contains(width: u32, height: u32, radius: u32, x: u32, y: u32) -> bool {
    let radius = radius.min(width / 2).min(height / 2);
    if radius == 0 {
        return x < width && y < height;
    }

    let dx = if x < radius {
        radius - x
    } else if x >= width - radius {
        x + 1 - (width - radius)
    } else {
        return y < height;
    };
    let dy = if y < radius {
        radius - y
    } else if y >= height - radius {
        y + 1 - (height - radius)
    } else {
        return x < width;
    };

    let (dx, dy, r) = (dx as u64, dy as u64, radius as u64);
    dx * dx + dy * dy <= r * r
}

/// Opaque inside the rounded rectangle, clear outside it
pub fn rounded_rect_mask(width: u32, height: u32, radius: u32) -> Mask {
    GrayImage::from_fn(width, height, |x, y| {
        if rounded_rect_contains(width, height, radius, x, y) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Replace the alpha channel of `image` with `mask`
pub fn apply_mask(image: &mut RgbaImage, mask: &Mask) {
    debug_assert_eq!(image.dimensions(), mask.dimensions());
    for (pixel, opacity) in image.pixels_mut().zip(mask.pixels()) {
        pixel[3] = opacity[0];
    }
}

/// A `side` x `side` layer holding a filled rounded square
pub fn rounded_square(side: u32, radius: u32, color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(side, side, |x, y| {
        if rounded_rect_contains(side, side, radius, x, y) {
            color
        } else {
            TRANSPARENT
        }
    })
}

/// Source-over blend of a single pixel
pub fn blend_over(bottom: &mut Rgba<u8>, top: Rgba<u8>) {
    match top[3] {
        0 => {}
        255 => *bottom = top,
        _ => bottom.blend(&top),
    }
}

/// Source-over composite of `top` onto `bottom` with its origin at (x, y).
/// Pixels of `top` falling outside `bottom` are dropped.
pub fn composite_over(bottom: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    let (width, height) = bottom.dimensions();
    for (tx, ty, pixel) in top.enumerate_pixels() {
        let (bx, by) = (x + tx, y + ty);
        if bx < width && by < height {
            blend_over(bottom.get_pixel_mut(bx, by), *pixel);
        }
    }
}

/// File name the icon of `size` pixels is stored under
pub fn icon_file_name(size: u32) -> String {
    format!("app_icon_{size}.png")
}

/// Write `icon` into `out_dir`, replacing any previous file for that size
pub fn write_icon(icon: &RgbaImage, out_dir: &Path, size: u32) -> Result<PathBuf> {
    let path = out_dir.join(icon_file_name(size));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create PNG file {}", path.display()))?;
    let mut out_file = BufWriter::new(file);
    write_png(icon.as_raw(), &mut out_file, icon.width(), icon.height())
        .with_context(|| format!("Failed to write PNG {}", path.display()))?;
    out_file
        .flush()
        .with_context(|| format!("Failed to flush PNG {}", path.display()))?;
    Ok(path)
}

// Encode RGBA data as PNG with compression
fn write_png<W: Write>(image_data: &[u8], w: W, width: u32, height: u32) -> Result<()> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)?;
    Ok(())
}

/// Compose and write every configured size, one after the other.
/// Returns the written paths in generation order.
pub fn generate_icons(config: &IconConfig, fonts: &dyn FontProvider) -> Result<Vec<PathBuf>> {
    println!("🎨 Generating app icons...");

    let out_dir = &config.output_dir;
    create_dir_all(out_dir).context("Can't create output directory")?;

    let composer = IconComposer::new(config.clone(), fonts);
    println!("   Using font: {}", composer.face().describe());

    let mut written = Vec::with_capacity(config.sizes.len());
    for &size in &config.sizes {
        println!("   Creating {size}x{size} icon...");
        let icon = composer.compose(size);
        let path = write_icon(&icon, out_dir, size)?;
        println!("   ✅ Saved: {}", icon_file_name(size));
        written.push(path);
    }

    if config.write_contents_json {
        let images = mac_app_icon_entries(&config.sizes);
        write_contents_json(out_dir, images)?;
        println!("   ✅ Saved: Contents.json");
    }

    println!("\n✨ All icons generated successfully!");
    println!("📁 Location: {}", out_dir.display());
    Ok(written)
}
