//! Error types shared across the catalog, resolver, transformer and renderers.
//!
//! Resolution failures ([`NotFound`]) are ordinary values that callers check
//! before loading. Store failures ([`LoadError`]) surface as a renderer state.
//! Transform failures ([`TransformError`]) never leave [`crate::svg::transform`]:
//! the markup passes through unchanged instead.

use thiserror::Error;

/// A resolvable key has no matching asset in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no asset available for {key}")]
pub struct NotFound {
    /// The attempted key, formatted for display.
    pub key: String,
}

impl NotFound {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// The asset store failed to deliver content for a path.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("asset not found: {0}")]
    Missing(String),

    #[error("failed to read asset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {0} is not valid UTF-8 text")]
    NotText(String),
}

/// SVG markup could not be parsed.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("malformed SVG: {0}")]
    Parse(#[from] roxmltree::Error),
}

/// A single tile failed to render during a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tile {index} could not be displayed: {message}")]
pub struct RenderFault {
    /// Zero-based tile position within the batch.
    pub index: usize,
    pub message: String,
}

/// Markup could not be turned into a raster preview.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("cannot render SVG preview: {0}")]
    Parse(#[from] resvg::usvg::Error),

    #[error("preview has no area ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("cannot encode preview: {0}")]
    Encode(#[from] image::ImageError),
}

/// Building a catalog index failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to index asset directory {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A configuration file could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_mentions_key() {
        let err = NotFound::new("shapes/hexagon/equal/1:3/#1");
        assert_eq!(
            err.to_string(),
            "no asset available for shapes/hexagon/equal/1:3/#1"
        );
    }

    #[test]
    fn load_error_messages() {
        let err = LoadError::Missing("fraction_objects/pizza/9.png".into());
        assert!(err.to_string().contains("fraction_objects/pizza/9.png"));

        let err = LoadError::Io {
            path: "shapes/a.svg".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("failed to read asset shapes/a.svg"));
    }

    #[test]
    fn render_fault_display() {
        let fault = RenderFault {
            index: 2,
            message: "empty SVG content".into(),
        };
        assert_eq!(
            fault.to_string(),
            "tile 2 could not be displayed: empty SVG content"
        );
    }
}
