//! Draws a gradient app icon with a centred letter at every size a macOS
//! asset catalog asks for.
//!
//! ```no_run
//! use app_icon_gen::{IconComposer, IconConfig, SystemFontProvider};
//!
//! let composer = IconComposer::new(IconConfig::default(), &SystemFontProvider::default());
//! let icon = composer.compose(128);
//! assert_eq!(icon.dimensions(), (128, 128));
//! ```

pub mod config;
pub mod contents_json;
pub mod font;
pub mod icon_gen;

pub use config::{parse_color, ColorStop, IconConfig};
pub use font::{BuiltinFontProvider, FontProvider, GlyphBounds, GlyphFace, SystemFontProvider};
pub use icon_gen::{generate_icons, write_icon, IconComposer, Mask};
