//! All four views over one asset catalog.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::AssetStore;
use crate::config::ViewerConfig;
use crate::renderer::{
    ObjectPartsRenderer, ObjectPartsSelection, ObjectSelection, ObjectSplitRenderer,
    PartsSelection, ShapeIconRenderer, ShapePartsRenderer, ShapeSelection,
};
use crate::resolver::{AssetLayout, PathResolver};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Types whose shared settings round-trip through a [`ViewerConfig`].
pub trait Configurable {
    /// Applies a config's settings to this instance.
    fn apply_config(&mut self, config: &ViewerConfig);

    /// Exports the current settings as a config.
    fn export_config(&self) -> ViewerConfig;
}

// ============================================================================
// Viewer
// ============================================================================

/// The shape icon, object split, object parts and shape parts views, sharing
/// one asset store.
///
/// Each renderer is a public field and is driven directly; the viewer only
/// keeps their shared settings in step.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use fraction_visuals::{Configurable, MemoryStore, Theme, Viewer, ViewerConfig};
///
/// let store = MemoryStore::new();
/// let config = ViewerConfig::new().with_theme(Theme::Dark);
/// let mut viewer = Viewer::new(Arc::new(store), &config);
///
/// assert_eq!(viewer.object_split.selection().theme, Theme::Dark);
/// assert_eq!(viewer.export_config(), config);
///
/// viewer.apply_config(&ViewerConfig::new());
/// assert_eq!(viewer.shape_parts.selection().theme, Theme::Light);
/// ```
pub struct Viewer {
    store: Arc<dyn AssetStore>,
    layout: AssetLayout,
    pub shape_icon: ShapeIconRenderer,
    pub object_split: ObjectSplitRenderer,
    pub object_parts: ObjectPartsRenderer,
    pub shape_parts: ShapePartsRenderer,
}

impl fmt::Debug for Viewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Viewer")
            .field("layout", &self.layout)
            .field("shape_icon", &self.shape_icon)
            .field("object_split", &self.object_split)
            .field("object_parts", &self.object_parts)
            .field("shape_parts", &self.shape_parts)
            .finish_non_exhaustive()
    }
}

impl Viewer {
    /// Builds all four renderers from `config`, with default selections
    /// carrying the configured color and theme. Nothing is loaded yet.
    pub fn new(store: Arc<dyn AssetStore>, config: &ViewerConfig) -> Self {
        let resolver = PathResolver::with_layout(store.clone(), config.layout.clone());
        let mut viewer = Self {
            store,
            layout: config.layout.clone(),
            shape_icon: ShapeIconRenderer::new(resolver.clone()),
            object_split: ObjectSplitRenderer::new(resolver.clone()),
            object_parts: ObjectPartsRenderer::new(resolver.clone()),
            shape_parts: ShapePartsRenderer::new(resolver),
        };
        viewer.apply_config(config);
        viewer
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Resolves, loads and applies the current selection of every view.
    pub async fn refresh_all(&mut self) {
        self.shape_icon.refresh().await;
        self.object_split.refresh().await;
        self.object_parts.refresh().await;
        self.shape_parts.refresh().await;
    }
}

impl Configurable for Viewer {
    /// Rebuilds every renderer with the config's layout, color, theme and
    /// named colors.
    ///
    /// Other selection fields are kept. All views return to idle; call
    /// [`Viewer::refresh_all`] to load them again.
    fn apply_config(&mut self, config: &ViewerConfig) {
        debug!(theme = ?config.theme, color = %config.default_color, "applying viewer config");
        self.layout = config.layout.clone();
        let resolver = PathResolver::with_layout(self.store.clone(), self.layout.clone());

        let shape_icon = ShapeSelection {
            color: config.default_color.clone(),
            ..self.shape_icon.selection().clone()
        };
        let object_split = ObjectSelection {
            theme: config.theme,
            ..self.object_split.selection().clone()
        };
        let object_parts = ObjectPartsSelection {
            theme: config.theme,
            ..self.object_parts.selection().clone()
        };
        let shape_parts = PartsSelection {
            color: config.default_color.clone(),
            theme: config.theme,
            ..self.shape_parts.selection().clone()
        };

        self.shape_icon = ShapeIconRenderer::new(resolver.clone()).with_selection(shape_icon);
        self.object_split = ObjectSplitRenderer::new(resolver.clone()).with_selection(object_split);
        self.object_parts = ObjectPartsRenderer::new(resolver.clone()).with_selection(object_parts);
        self.shape_parts = ShapePartsRenderer::new(resolver)
            .with_named_colors(config.named_colors.clone())
            .with_selection(shape_parts);
    }

    /// Reads the color from the shape parts view and the theme from the
    /// object split view.
    fn export_config(&self) -> ViewerConfig {
        ViewerConfig {
            layout: self.layout.clone(),
            default_color: self.shape_parts.selection().color.clone(),
            theme: self.object_split.selection().theme,
            named_colors: self.shape_parts.named_colors().clone(),
        }
    }
}
