//! Serializable viewer configuration.
//!
//! A [`ViewerConfig`] captures everything about the viewer that is not a
//! per-view selection: where assets live, the starting color and theme, and
//! named fill colors for part graphics.
//!
//! # Example
//!
//! ```
//! use fraction_visuals::{ColorSpec, Theme, ViewerConfig};
//!
//! let config = ViewerConfig::new()
//!     .with_default_color(ColorSpec::parse("#3366cc").unwrap())
//!     .with_theme(Theme::Dark)
//!     .with_named_color("accent", "#ff9900");
//!
//! let json = config.to_json().unwrap();
//! let restored = ViewerConfig::from_json(&json).unwrap();
//! assert_eq!(restored, config);
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::{ColorSpec, Theme};
use crate::resolver::AssetLayout;

/// Settings shared by all views.
///
/// # JSON Format
///
/// ```json
/// {
///   "layout": { "shapesRoot": "shapes", "objectExtension": "png" },
///   "defaultColor": "#5FAC4B",
///   "theme": "dark",
///   "namedColors": { "accent": "#ff9900" }
/// }
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ViewerConfig {
    /// Catalog directory roots and extensions.
    pub layout: AssetLayout,

    /// Color used for new shape and part selections.
    pub default_color: ColorSpec,

    pub theme: Theme,

    /// Non-hex fill values in part graphics and their replacements.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub named_colors: BTreeMap<String, String>,
}

impl ViewerConfig {
    /// Creates a config with the default layout, color and theme.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(mut self, layout: AssetLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_default_color(mut self, color: ColorSpec) -> Self {
        self.default_color = color;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_named_color(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.named_colors.insert(from.into(), to.into());
        self
    }

    /// Serializes to compact JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and deserializes a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_config_deserializes() {
        let config = ViewerConfig::from_json("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.layout.objects_root, "fraction_objects");
        assert_eq!(config.default_color.as_str(), "#5FAC4B");
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn json_uses_camel_case() {
        let config = ViewerConfig::new()
            .with_theme(Theme::Dark)
            .with_named_color("accent", "#fff");
        let json = config.to_json_pretty().unwrap();

        assert!(json.contains("\"defaultColor\""));
        assert!(json.contains("\"namedColors\""));
        assert!(json.contains("\"shapesRoot\""));
        assert!(json.contains("\"dark\""));
    }

    #[test]
    fn partial_layout_keeps_other_defaults() {
        let json = r#"{ "layout": { "partsRoot": "parts" } }"#;
        let config = ViewerConfig::from_json(json).unwrap();
        assert_eq!(config.layout.parts_root, "parts");
        assert_eq!(config.layout.shapes_root, "shapes");
    }

    #[test]
    fn invalid_color_is_rejected() {
        let err = ViewerConfig::from_json(r#"{ "defaultColor": "green" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn reads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r##"{ "defaultColor": "#112233" }"##).unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.default_color.as_str(), "#112233");

        let missing = ViewerConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
