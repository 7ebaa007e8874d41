//! Raster previews of rendered markup, for hosts that cannot display SVG.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::PreviewError;

/// Renders `markup` into an image whose longer side is `size` pixels.
///
/// Markup without intrinsic size (no `width`/`height` and no `viewBox`)
/// falls back to resvg's 100x100 default.
pub fn render_preview(markup: &str, size: u32) -> Result<RgbaImage, PreviewError> {
    let tree = Tree::from_str(markup, &Options::default())?;
    let bounds = tree.size();
    let scale = size as f32 / bounds.width().max(bounds.height());
    let (width, height) = (
        (bounds.width() * scale).ceil() as u32,
        (bounds.height() * scale).ceil() as u32,
    );

    let mut pixmap = Pixmap::new(width, height).ok_or(PreviewError::Empty { width, height })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let pixels = pixmap.pixels().iter().flat_map(|px| {
        let c = px.demultiply();
        [c.red(), c.green(), c.blue(), c.alpha()]
    });
    RgbaImage::from_vec(width, height, pixels.collect())
        .ok_or(PreviewError::Empty { width, height })
}

/// Renders `markup` like [`render_preview`] and encodes the result as PNG.
pub fn preview_png(markup: &str, size: u32) -> Result<Vec<u8>, PreviewError> {
    let image = render_preview(markup, size)?;
    let mut png = Cursor::new(Vec::new());
    image.write_to(&mut png, ImageFormat::Png)?;
    Ok(png.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColorSpec;
    use crate::svg::{RenderOptions, transform};

    fn center_pixel(image: &RgbaImage) -> image::Rgba<u8> {
        *image.get_pixel(image.width() / 2, image.height() / 2)
    }

    const WIDE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect width="100" height="50" fill="#ff0000" fill-opacity="0.5"/></svg>"##;

    #[test]
    fn keeps_aspect_ratio() {
        let image = render_preview(WIDE, 64).unwrap();
        assert_eq!((image.width(), image.height()), (64, 32));
    }

    #[test]
    fn pixels_are_not_premultiplied() {
        let image = render_preview(WIDE, 20).unwrap();
        let pixel = center_pixel(&image);
        assert_eq!(pixel[0], 255);
        assert!((127..=128).contains(&pixel[3]), "{pixel:?}");
    }

    #[test]
    fn restyled_markup_shows_user_color() {
        let options = RenderOptions::new().with_color(ColorSpec::parse("#00ff00").unwrap());
        let image = render_preview(&transform(WIDE, &options), 40).unwrap();
        let pixel = center_pixel(&image);
        assert!(pixel[1] > pixel[0], "{pixel:?}");
    }

    #[test]
    fn malformed_markup_is_a_parse_error() {
        assert!(matches!(render_preview("<svg", 32), Err(PreviewError::Parse(_))));
    }

    #[test]
    fn zero_size_is_empty() {
        assert!(matches!(
            render_preview(WIDE, 0),
            Err(PreviewError::Empty { .. })
        ));
    }

    #[test]
    fn png_signature() {
        let bytes = preview_png(WIDE, 16).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
