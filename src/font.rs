//! Font resolution and glyph painting
//!
//! The composer asks a [`FontProvider`] for a [`GlyphFace`] and never fails
//! doing so: when no usable font file is found the built-in bitmap face is
//! returned instead.

use crate::icon_gen::blend_over;
use image::{Rgb, Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};
use std::{
    fmt,
    path::{Path, PathBuf},
};

/// Font files probed by [`SystemFontProvider::default`], in priority order
pub const DEFAULT_FONT_CANDIDATES: [&str; 7] = [
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Capability to pick a font for the icon letter
pub trait FontProvider {
    /// Resolve a face. Implementations fall back to [`GlyphFace::Builtin`]
    /// rather than returning an error.
    fn resolve(&self) -> GlyphFace;
}

/// Probes a list of font files and uses the first one that loads
#[derive(Debug, Clone)]
pub struct SystemFontProvider {
    candidates: Vec<PathBuf>,
}

impl SystemFontProvider {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Default candidates with `preferred` probed first
    pub fn with_preferred(preferred: PathBuf) -> Self {
        let mut provider = Self::default();
        provider.candidates.insert(0, preferred);
        provider
    }

    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }
}

impl Default for SystemFontProvider {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_CANDIDATES.iter().map(PathBuf::from).collect())
    }
}

impl FontProvider for SystemFontProvider {
    fn resolve(&self) -> GlyphFace {
        self.candidates
            .iter()
            .find_map(|path| {
                load_font(path).map(|font| GlyphFace::Outline {
                    font,
                    source: path.clone(),
                })
            })
            .unwrap_or(GlyphFace::Builtin)
    }
}

/// Always yields the embedded bitmap face. Output does not depend on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFontProvider;

impl FontProvider for BuiltinFontProvider {
    fn resolve(&self) -> GlyphFace {
        GlyphFace::Builtin
    }
}

// Missing, unreadable and unparsable files are all treated as a miss.
// Collections (.ttc) load their first face.
fn load_font(path: &Path) -> Option<Font<'static>> {
    let data = std::fs::read(path).ok()?;
    Font::try_from_vec_and_index(data, 0)
}

/// Ink box of a glyph relative to its top-left drawing origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphBounds {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl GlyphBounds {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// A face able to measure and paint single characters
pub enum GlyphFace {
    /// TrueType/OpenType outlines loaded from `source`
    Outline {
        font: Font<'static>,
        source: PathBuf,
    },
    /// Embedded 5x7 bitmap capitals
    Builtin,
}

impl fmt::Debug for GlyphFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphFace::Outline { source, .. } => {
                f.debug_struct("Outline").field("source", source).finish()
            }
            GlyphFace::Builtin => f.write_str("Builtin"),
        }
    }
}

impl GlyphFace {
    /// Human readable name used in progress output
    pub fn describe(&self) -> String {
        match self {
            GlyphFace::Outline { source, .. } => source.display().to_string(),
            GlyphFace::Builtin => "built-in bitmap font".to_string(),
        }
    }

    /// Measure the ink of `ch` at `px` pixels when drawn with its top-left
    /// origin at (0, 0). Characters without ink measure as an empty box.
    pub fn measure(&self, ch: char, px: f32) -> GlyphBounds {
        match self {
            GlyphFace::Outline { font, .. } => positioned(font, ch, px, 0, 0)
                .pixel_bounding_box()
                .map(|bb| GlyphBounds {
                    left: bb.min.x,
                    top: bb.min.y,
                    right: bb.max.x,
                    bottom: bb.max.y,
                })
                .unwrap_or_default(),
            GlyphFace::Builtin => builtin::bounds(ch, builtin::cell_size(px)),
        }
    }

    /// Paint `ch` onto `canvas` with its top-left origin at `origin`.
    /// Coverage is blended over the existing pixels; anything outside the
    /// canvas is clipped.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        ch: char,
        px: f32,
        origin: (i32, i32),
        color: Rgb<u8>,
    ) {
        match self {
            GlyphFace::Outline { font, .. } => {
                let glyph = positioned(font, ch, px, origin.0, origin.1);
                if let Some(bb) = glyph.pixel_bounding_box() {
                    glyph.draw(|gx, gy, coverage| {
                        let (x, y) = (bb.min.x + gx as i32, bb.min.y + gy as i32);
                        blend_coverage(canvas, x, y, color, coverage)
                    });
                }
            }
            GlyphFace::Builtin => {
                let cell = builtin::cell_size(px);
                for (col, row) in builtin::ink(ch) {
                    let x0 = origin.0 + col * cell;
                    let y0 = origin.1 + row * cell;
                    for y in y0..y0 + cell {
                        for x in x0..x0 + cell {
                            blend_coverage(canvas, x, y, color, 1.0);
                        }
                    }
                }
            }
        }
    }
}

// The origin is the top-left of the line box, so the baseline sits one
// ascent below it.
fn positioned(
    font: &Font<'static>,
    ch: char,
    px: f32,
    x: i32,
    y: i32,
) -> PositionedGlyph<'static> {
    let scale = Scale::uniform(px);
    let ascent = font.v_metrics(scale).ascent;
    font.glyph(ch)
        .scaled(scale)
        .positioned(point(x as f32, y as f32 + ascent))
}

fn blend_coverage(canvas: &mut RgbaImage, x: i32, y: i32, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
    if alpha == 0 {
        return;
    }
    let Rgb([r, g, b]) = color;
    blend_over(canvas.get_pixel_mut(x as u32, y as u32), Rgba([r, g, b, alpha]));
}

mod builtin {
    use super::GlyphBounds;

    const COLUMNS: i32 = 5;
    const ROWS: i32 = 7;

    // One byte per row, bit 4 is the leftmost column.
    const LETTERS: [[u8; 7]; 26] = [
        [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
        [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
        [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
        [0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110], // D
        [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
        [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
        [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
        [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
        [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
        [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
        [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
        [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
        [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
        [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
        [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
        [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
        [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
        [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
        [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
        [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
        [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
        [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
        [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
        [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
        [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100], // Y
        [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
    ];

    const MISSING: [u8; 7] = [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111];

    /// Integer scale so the 7-row bitmap spans roughly a cap height of `px`
    pub(super) fn cell_size(px: f32) -> i32 {
        ((px * 0.7 / ROWS as f32).round() as i32).max(1)
    }

    fn rows(ch: char) -> &'static [u8; 7] {
        let upper = ch.to_ascii_uppercase();
        if upper.is_ascii_uppercase() {
            &LETTERS[(upper as u8 - b'A') as usize]
        } else {
            &MISSING
        }
    }

    /// (column, row) of every inked cell
    pub(super) fn ink(ch: char) -> impl Iterator<Item = (i32, i32)> {
        let rows = rows(ch);
        (0..ROWS).flat_map(move |row| {
            (0..COLUMNS)
                .filter(move |col| rows[row as usize] & (1 << (COLUMNS - 1 - col)) != 0)
                .map(move |col| (col, row))
        })
    }

    pub(super) fn bounds(ch: char, cell: i32) -> GlyphBounds {
        let mut cells = ink(ch).peekable();
        if cells.peek().is_none() {
            return GlyphBounds::default();
        }
        let (mut left, mut top, mut right, mut bottom) = (COLUMNS, ROWS, 0, 0);
        for (col, row) in cells {
            left = left.min(col);
            top = top.min(row);
            right = right.max(col + 1);
            bottom = bottom.max(row + 1);
        }
        GlyphBounds {
            left: left * cell,
            top: top * cell,
            right: right * cell,
            bottom: bottom * cell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_candidates_fall_back_to_builtin() {
        let provider = SystemFontProvider::new(vec![
            PathBuf::from("/definitely/not/here.ttf"),
            PathBuf::from("/also/missing.ttc"),
        ]);
        assert!(matches!(provider.resolve(), GlyphFace::Builtin));
    }

    #[test]
    fn test_unparsable_file_is_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        let bogus = dir.path().join("bogus.ttf");
        std::fs::write(&bogus, b"this is not a font").unwrap();

        let provider = SystemFontProvider::new(vec![bogus]);
        assert!(matches!(provider.resolve(), GlyphFace::Builtin));
    }

    #[test]
    fn test_preferred_font_is_probed_first() {
        let provider = SystemFontProvider::with_preferred(PathBuf::from("/tmp/custom.ttf"));
        assert_eq!(provider.candidates()[0], PathBuf::from("/tmp/custom.ttf"));
        assert_eq!(provider.candidates().len(), DEFAULT_FONT_CANDIDATES.len() + 1);
    }

    #[test]
    fn test_builtin_y_bounds() {
        // 64px -> cell of 6, Y spans the full 5x7 grid
        let bounds = GlyphFace::Builtin.measure('Y', 64.0);
        assert_eq!(bounds, GlyphBounds { left: 0, top: 0, right: 30, bottom: 42 });
        assert_eq!(bounds.width(), 30);
        assert_eq!(bounds.height(), 42);
    }

    #[test]
    fn test_builtin_bounds_are_tight() {
        // I only inks columns 1..4
        let bounds = GlyphFace::Builtin.measure('i', 10.0);
        assert_eq!(bounds, GlyphBounds { left: 1, top: 0, right: 4, bottom: 7 });
    }

    #[test]
    fn test_builtin_cell_never_zero() {
        let bounds = GlyphFace::Builtin.measure('Y', 1.0);
        assert_eq!(bounds.width(), 5);
        assert_eq!(bounds.height(), 7);
    }

    #[test]
    fn test_builtin_draw_paints_and_clips() {
        let mut canvas = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        // Origin partly off canvas must not panic
        GlyphFace::Builtin.draw(&mut canvas, 'Y', 10.0, (-1, 5), Rgb([255, 0, 0]));

        // Row 0 of Y inks column 4 -> x = 3, y = 5
        assert_eq!(*canvas.get_pixel(3, 5), Rgba([255, 0, 0, 255]));
        // Column 2 of row 0 is empty
        assert_eq!(canvas.get_pixel(1, 5)[3], 0);
        // Nothing above the origin
        assert!((0..10).all(|x| canvas.get_pixel(x, 4)[3] == 0));
    }

    fn host_outline_face() -> Option<GlyphFace> {
        match SystemFontProvider::default().resolve() {
            face @ GlyphFace::Outline { .. } => Some(face),
            GlyphFace::Builtin => None,
        }
    }

    #[test]
    fn test_outline_face_measures_from_ascender() {
        let Some(face) = host_outline_face() else {
            eprintln!("no outline font on this host, skipping");
            return;
        };

        let bounds = face.measure('Y', 64.0);
        assert!(bounds.width() > 0, "{bounds:?}");
        assert!(bounds.height() > 0, "{bounds:?}");
        // Capitals start below the ascender line
        assert!(bounds.top > 0, "{bounds:?}");
    }

    #[test]
    fn test_outline_face_composes_letter() {
        use crate::config::{IconConfig, BRAND_ORANGE};
        use crate::icon_gen::IconComposer;

        let Some(face) = host_outline_face() else {
            eprintln!("no outline font on this host, skipping");
            return;
        };
        let source = match &face {
            GlyphFace::Outline { source, .. } => source.clone(),
            GlyphFace::Builtin => unreachable!(),
        };
        let composer = IconComposer::new(
            IconConfig::default(),
            &SystemFontProvider::new(vec![source]),
        );
        assert!(matches!(composer.face(), GlyphFace::Outline { .. }));

        // Fully covered letter pixels inside the 26..102 white square
        let icon = composer.compose(128);
        let opaque = Rgba([BRAND_ORANGE[0], BRAND_ORANGE[1], BRAND_ORANGE[2], 255]);
        let inked = (26..102)
            .flat_map(|y| (26..102).map(move |x| (x, y)))
            .filter(|&(x, y)| *icon.get_pixel(x, y) == opaque)
            .count();
        assert!(inked > 0);

        // Font size truncates to zero here
        for size in 1..=4 {
            assert_eq!(composer.compose(size).dimensions(), (size, size));
        }
    }

    #[test]
    fn test_unknown_character_draws_box() {
        let bounds = GlyphFace::Builtin.measure('?', 10.0);
        assert_eq!(bounds, GlyphBounds { left: 0, top: 0, right: 5, bottom: 7 });
    }
}
