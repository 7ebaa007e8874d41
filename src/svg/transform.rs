//! Structural SVG restyling: accessibility tags, fill remapping, dark-mode
//! inversion and responsive sizing.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::document::{Element, Node};
use super::{is_black_literal, is_hex_color};
use crate::error::TransformError;
use crate::model::ColorSpec;

/// Inline style that hands sizing over to the surrounding container.
pub const RESPONSIVE_STYLE: &str = "width: 100%; height: 100%; display: block;";

/// Aspect ratio applied when the markup does not specify one.
pub const DEFAULT_ASPECT_RATIO: &str = "xMidYMid meet";

// ============================================================================
// RenderOptions
// ============================================================================

/// Styling applied by [`transform`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    /// Replaces every hex-valued fill. Hex fills are kept when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorSpec>,

    /// Turns literal black fills and strokes white.
    #[serde(default)]
    pub dark_mode: bool,

    /// Accessible name, inserted as `<title>` and referenced by `aria-labelledby`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Accessible description, appended as `<desc>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Exact non-hex fill values and their replacements.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub named_colors: BTreeMap<String, String>,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_dark_mode(mut self, dark_mode: bool) -> Self {
        self.dark_mode = dark_mode;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_named_color(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.named_colors.insert(from.into(), to.into());
        self
    }
}

// ============================================================================
// Transform
// ============================================================================

/// Restyles SVG markup according to `options`.
///
/// Malformed markup is returned unchanged; a result equal to `raw` therefore
/// means no transformation took place.
///
/// # Example
///
/// ```
/// use fraction_visuals::{ColorSpec, RenderOptions, svg::transform};
///
/// let raw = r##"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"><rect fill="#000000"/></svg>"##;
/// let options = RenderOptions::new().with_color(ColorSpec::parse("#ff8800").unwrap());
///
/// let out = transform(raw, &options);
/// assert!(out.contains(r##"fill="#ff8800""##));
/// assert!(out.contains(r#"viewBox="0 0 20 10""#));
/// ```
pub fn transform(raw: &str, options: &RenderOptions) -> String {
    match try_transform(raw, options) {
        Ok(markup) => markup,
        Err(err) => {
            warn!(error = %err, "SVG transform skipped, returning original markup");
            raw.to_string()
        }
    }
}

/// Like [`transform`], but reports malformed markup instead of passing it through.
pub fn try_transform(raw: &str, options: &RenderOptions) -> Result<String, TransformError> {
    let mut root = Element::parse(raw)?;

    if let Some(title) = &options.title {
        insert_title(&mut root, title);
    }
    if let Some(description) = &options.description {
        insert_description(&mut root, description);
    }

    root.for_each_descendant_mut(&mut |element| restyle_element(element, options));

    normalize_sizing(&mut root);

    Ok(root.to_markup())
}

/// Returns a fresh id for an inserted `<title>`, unique within the process.
fn next_title_id() -> String {
    static NEXT: AtomicU64 = AtomicU64::new(1);
    format!("svg-title-{}", NEXT.fetch_add(1, Ordering::Relaxed))
}

/// Builds a child name sharing the root's namespace prefix.
fn sibling_name(root: &Element, local: &str) -> String {
    match root.prefix() {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

fn insert_title(root: &mut Element, title: &str) {
    root.remove_first_descendant("title");

    let id = next_title_id();
    let mut element = Element::new(sibling_name(root, "title"));
    element.set_attr("id", id.clone());
    element.children.push(Node::Text(title.to_string()));

    root.children.insert(0, Node::Element(element));
    root.set_attr("aria-labelledby", id);
}

fn insert_description(root: &mut Element, description: &str) {
    root.remove_first_descendant("desc");

    let mut element = Element::new(sibling_name(root, "desc"));
    element.children.push(Node::Text(description.to_string()));
    root.children.push(Node::Element(element));
}

fn restyle_element(element: &mut Element, options: &RenderOptions) {
    if !element.has_attr("fill") && !element.has_attr("stroke") {
        return;
    }

    if options.dark_mode {
        for attr in ["fill", "stroke"] {
            if element.attr(attr).is_some_and(is_black_literal) {
                element.set_attr(attr, "white");
            }
        }
    }

    // Inversion above may already have changed the fill.
    let Some(fill) = element.attr("fill") else {
        return;
    };
    if is_hex_color(fill) {
        if let Some(color) = &options.color {
            element.set_attr("fill", color.as_str());
        }
    } else if let Some(mapped) = options.named_colors.get(fill) {
        let mapped = mapped.clone();
        element.set_attr("fill", mapped);
    }
}

fn normalize_sizing(root: &mut Element) {
    if !root.has_attr("viewBox") {
        if let (Some(width), Some(height)) = (root.attr("width"), root.attr("height")) {
            let view_box = format!("0 0 {width} {height}");
            root.set_attr("viewBox", view_box);
        }
    }

    root.remove_attr("width");
    root.remove_attr("height");

    if !root.has_attr("preserveAspectRatio") {
        root.set_attr("preserveAspectRatio", DEFAULT_ASPECT_RATIO);
    }

    root.set_attr("style", RESPONSIVE_STYLE);
}

// ============================================================================
// Tests
// ============================================================================
