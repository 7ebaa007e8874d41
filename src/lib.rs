//! fraction-visuals: asset resolution and SVG rendering for fraction graphics
//!
//! This crate finds shape icons, object photographs and pre-divided shape
//! parts in a catalog of files, restyles the SVG ones for the current color
//! and theme, and draws split lines or pie slices over photographs.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use fraction_visuals::{
//!     Fraction, MemoryStore, PathResolver, ShapeCategory, SplitStyle,
//! };
//!
//! let store = MemoryStore::new()
//!     .with_text("shapes/circle/equal/1:4/1.svg", "<svg/>")
//!     .with_text("shape_parts/circle/3:4/0.svg", "<svg/>");
//! let resolver = PathResolver::new(Arc::new(store));
//!
//! assert_eq!(
//!     resolver.resolve_shape_variant(ShapeCategory::Circle, 4, SplitStyle::Equal, 1),
//!     Ok("shapes/circle/equal/1:4/1.svg".to_string())
//! );
//! assert_eq!(
//!     resolver.list_available_fractions(ShapeCategory::Circle),
//!     vec![Fraction::new(3, 4)]
//! );
//! ```
//!
//! # Restyling markup
//!
//! [`svg::transform`] adds an accessible title and description, applies a
//! fill color and dark-mode inversion, and makes the graphic scale with its
//! container. Malformed input comes back unchanged:
//!
//! ```
//! use fraction_visuals::{ColorSpec, RenderOptions, svg};
//!
//! let options = RenderOptions::new()
//!     .with_color(ColorSpec::parse("#ff0000").unwrap())
//!     .with_title("Half a circle");
//!
//! let out = svg::transform(r##"<svg><path fill="#000"/></svg>"##, &options);
//! assert!(out.contains(r##"fill="#ff0000""##));
//! assert!(out.contains("<title"));
//!
//! assert_eq!(svg::transform("<svg>", &options), "<svg>");
//! ```
//!
//! # Views
//!
//! The [`Viewer`] groups the four renderers over one store and keeps their
//! shared settings in step with a serializable [`ViewerConfig`]:
//!
//! ```
//! use std::sync::Arc;
//! use fraction_visuals::{Configurable, MemoryStore, Viewer, ViewerConfig};
//!
//! let config = ViewerConfig::from_json(r#"{ "theme": "dark" }"#).unwrap();
//! let viewer = Viewer::new(Arc::new(MemoryStore::new()), &config);
//!
//! let json = viewer.export_config().to_json().unwrap();
//! assert!(json.contains("\"dark\""));
//! ```

mod catalog;
mod config;
mod error;
pub mod geometry;
mod model;
mod renderer;
mod resolver;
pub mod svg;
mod viewer;

pub use catalog::{AssetRef, AssetStore, DirStore, MemoryStore, mime_type};
pub use config::ViewerConfig;
pub use error::{
    ConfigError, LoadError, NotFound, PreviewError, RenderFault, StoreError, TransformError,
};
pub use model::{
    AssetKey, ColorSpec, Fraction, InvalidColor, ObjectCategory, ShapeCategory, SplitStyle, Theme,
    UnknownCategory,
};
pub use renderer::{
    Fetched, LoadState, ObjectPartsRenderer, ObjectPartsSelection, ObjectPartsView,
    ObjectSelection, ObjectSplitRenderer, ObjectSplitView, PartsSelection, PendingLoad,
    RenderSlot, RequestId, ShapeIconRenderer, ShapePartsRenderer, ShapeSelection, Tile,
    object_parts_svg,
};
pub use resolver::{AssetLayout, PathResolver};
pub use svg::RenderOptions;
pub use viewer::{Configurable, Viewer};
