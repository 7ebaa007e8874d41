//! A single recolored shape icon.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::slot::{Fetched, LoadState, PendingLoad, RenderSlot};
use crate::error::{NotFound, PreviewError};
use crate::model::{ColorSpec, ShapeCategory, SplitStyle};
use crate::resolver::PathResolver;
use crate::svg::{preview_png, recolor_fills};

/// What the shape icon view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeSelection {
    pub category: ShapeCategory,
    pub denominator: u32,
    pub split: SplitStyle,
    /// 1-based position among the icons for this shape, denominator and split.
    pub variant: u32,
    pub color: ColorSpec,
}

impl Default for ShapeSelection {
    fn default() -> Self {
        Self {
            category: ShapeCategory::Rectangle,
            denominator: 2,
            split: SplitStyle::Equal,
            variant: 1,
            color: ColorSpec::default(),
        }
    }
}

/// Loads the icon for a [`ShapeSelection`] and recolors its fills.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use fraction_visuals::{
///     LoadState, MemoryStore, PathResolver, ShapeCategory, ShapeIconRenderer, ShapeSelection,
/// };
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = MemoryStore::new()
///     .with_text("shapes/circle/equal/1:2/1.svg", r##"<svg><path fill="#000"/></svg>"##);
/// let mut renderer = ShapeIconRenderer::new(PathResolver::new(Arc::new(store)));
///
/// let selection = ShapeSelection { category: ShapeCategory::Circle, ..Default::default() };
/// if let Some(load) = renderer.select(selection) {
///     let fetched = load.fetch_text().await;
///     renderer.apply(fetched);
/// }
///
/// assert_eq!(
///     renderer.state(),
///     &LoadState::Loaded(r##"<svg><path fill="#5FAC4B"/></svg>"##.to_string())
/// );
/// # });
/// ```
#[derive(Debug)]
pub struct ShapeIconRenderer {
    resolver: PathResolver,
    selection: ShapeSelection,
    slot: RenderSlot<String>,
}

impl ShapeIconRenderer {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            selection: ShapeSelection::default(),
            slot: RenderSlot::new(),
        }
    }

    /// Starts from `selection` instead of the default, without loading.
    pub fn with_selection(mut self, selection: ShapeSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &ShapeSelection {
        &self.selection
    }

    pub fn state(&self) -> &LoadState<String> {
        self.slot.state()
    }

    /// PNG preview of the loaded icon, `size` pixels on its longer side.
    /// `None` until an icon is loaded.
    pub fn preview_png(&self, size: u32) -> Option<Result<Vec<u8>, PreviewError>> {
        self.state().loaded().map(|markup| preview_png(markup, size))
    }

    /// Number of icons for the current shape, denominator and split.
    pub fn variant_count(&self) -> usize {
        let s = &self.selection;
        self.resolver.count_shape_variants(s.category, s.denominator, s.split)
    }

    /// Denominators offered for the current shape and split.
    pub fn denominators(&self) -> Vec<u32> {
        self.resolver
            .available_denominators(self.selection.category, self.selection.split)
    }

    /// Switches to `selection` and resolves its icon.
    ///
    /// Returns `None` when no icon matches; the state is then already
    /// settled as `NotFound` and nothing needs loading.
    pub fn select(&mut self, selection: ShapeSelection) -> Option<PendingLoad> {
        self.selection = selection;
        let id = self.slot.begin();
        let s = &self.selection;

        match self
            .resolver
            .resolve_shape_variant(s.category, s.denominator, s.split, s.variant)
        {
            Ok(path) => {
                debug!(request = %id, path = %path, "loading shape icon");
                Some(PendingLoad::new(id, vec![path], self.resolver.store().clone()))
            }
            Err(NotFound { key }) => {
                let message = if self.variant_count() == 0 {
                    format!("No shapes available for {key}")
                } else {
                    format!("Shape not available: {key}")
                };
                self.slot.settle(id, LoadState::NotFound(message));
                None
            }
        }
    }

    /// Commits a finished load if it belongs to the latest selection.
    ///
    /// Returns true if the state changed.
    pub fn apply(&mut self, fetched: Fetched<String>) -> bool {
        let Fetched { id, result } = fetched;
        if !self.slot.is_current(id) {
            debug!(request = %id, "discarding stale shape icon");
            return false;
        }
        let state = match result {
            Ok(raw) => LoadState::Loaded(recolor_fills(&raw, &self.selection.color)),
            Err(err) => {
                warn!(request = %id, error = %err, "shape icon failed to load");
                LoadState::LoadError(err.to_string())
            }
        };
        self.slot.settle(id, state)
    }

    /// Resolves, loads and applies the current selection.
    pub async fn refresh(&mut self) {
        if let Some(load) = self.select(self.selection.clone()) {
            let fetched = load.fetch_text().await;
            self.apply(fetched);
        }
    }

    /// Changes the shape. The denominator falls back to the first one the
    /// shape offers if it is not among them; the variant resets to 1.
    pub fn set_category(&mut self, category: ShapeCategory) -> Option<PendingLoad> {
        let mut next = self.selection.clone();
        next.category = category;
        let offered = self.resolver.available_denominators(category, next.split);
        if !offered.contains(&next.denominator) {
            if let Some(&first) = offered.first() {
                next.denominator = first;
            }
        }
        next.variant = 1;
        self.select(next)
    }

    /// Changes the denominator; the variant resets to 1.
    pub fn set_denominator(&mut self, denominator: u32) -> Option<PendingLoad> {
        let next = ShapeSelection {
            denominator,
            variant: 1,
            ..self.selection.clone()
        };
        self.select(next)
    }

    /// Changes the split style; the variant resets to 1.
    pub fn set_split(&mut self, split: SplitStyle) -> Option<PendingLoad> {
        let next = ShapeSelection {
            split,
            variant: 1,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_variant(&mut self, variant: u32) -> Option<PendingLoad> {
        let next = ShapeSelection {
            variant,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_color(&mut self, color: ColorSpec) -> Option<PendingLoad> {
        let next = ShapeSelection {
            color,
            ..self.selection.clone()
        };
        self.select(next)
    }
}
