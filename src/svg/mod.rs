//! SVG post-processing.
//!
//! - [`transform`](transform::transform): structural restyling on a parsed tree
//! - [`recolor_fills`]: text-based recolor used by the shape icon view
//! - [`render_preview`]: raster previews for hosts without an SVG renderer

pub mod document;
pub mod preview;
pub mod recolor;
pub mod transform;

pub use document::{Attribute, Element, Node};
pub use preview::{preview_png, render_preview};
pub use recolor::recolor_fills;
pub use transform::{RenderOptions, transform, try_transform};

/// Returns true for `#` followed by exactly 3 or 6 hex digits.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Returns true for the literal spellings of opaque black that dark mode inverts.
pub fn is_black_literal(value: &str) -> bool {
    const BLACK: [&str; 5] = ["black", "#000", "#000000", "rgb(0,0,0)", "rgba(0,0,0,1)"];
    BLACK.iter().any(|b| b.eq_ignore_ascii_case(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        for ok in ["#fff", "#FFF", "#5FAC4B", "#abcdef", "#000"] {
            assert!(is_hex_color(ok), "{ok}");
        }
        for bad in ["fff", "#ffff", "#abcdeg", "#", "", "black", "#1234567"] {
            assert!(!is_hex_color(bad), "{bad}");
        }
    }

    #[test]
    fn black_literals() {
        for ok in ["black", "BLACK", "#000", "#000000", "rgb(0,0,0)", "RGBA(0,0,0,1)"] {
            assert!(is_black_literal(ok), "{ok}");
        }
        for bad in ["#010101", "rgb(0, 0, 0)", "rgba(0,0,0,0.5)", "none", "#0000"] {
            assert!(!is_black_literal(bad), "{bad}");
        }
    }
}
