//! An object photograph with split lines drawn over it.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::slot::{Fetched, LoadState, PendingLoad, RenderSlot};
use crate::catalog::AssetRef;
use crate::geometry::split_overlay;
use crate::model::{ObjectCategory, Theme};
use crate::resolver::PathResolver;

/// What the object split view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectSelection {
    pub category: ObjectCategory,
    /// Exact file number, 0-based.
    pub number: u32,
    pub denominator: u32,
    pub theme: Theme,
}

impl Default for ObjectSelection {
    fn default() -> Self {
        Self {
            category: ObjectCategory::Pizza,
            number: 0,
            denominator: 2,
            theme: Theme::Light,
        }
    }
}

/// A loaded object image and the overlay to draw on top of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSplitView {
    pub image: AssetRef,
    /// Alternative text, `"{category} {number}"`.
    pub alt: String,
    /// Split-line SVG sized to cover the image; `None` for denominators
    /// without a layout.
    pub overlay: Option<String>,
}

/// Loads object photographs and pairs them with split overlays.
#[derive(Debug)]
pub struct ObjectSplitRenderer {
    resolver: PathResolver,
    selection: ObjectSelection,
    slot: RenderSlot<ObjectSplitView>,
}

impl ObjectSplitRenderer {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            selection: ObjectSelection::default(),
            slot: RenderSlot::new(),
        }
    }

    /// Starts from `selection` instead of the default, without loading.
    pub fn with_selection(mut self, selection: ObjectSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &ObjectSelection {
        &self.selection
    }

    pub fn state(&self) -> &LoadState<ObjectSplitView> {
        self.slot.state()
    }

    /// Number of images in the current category.
    pub fn object_count(&self) -> usize {
        self.resolver.count_object_variants(self.selection.category)
    }

    /// Switches to `selection` and resolves its image by exact file number.
    ///
    /// A number with no file settles as `NotFound`, even when it is below the
    /// category's object count.
    pub fn select(&mut self, selection: ObjectSelection) -> Option<PendingLoad> {
        self.selection = selection;
        let id = self.slot.begin();

        match self
            .resolver
            .resolve_object_variant(self.selection.category, self.selection.number)
        {
            Ok(path) => {
                debug!(request = %id, path = %path, "loading object image");
                Some(PendingLoad::new(id, vec![path], self.resolver.store().clone()))
            }
            Err(not_found) => {
                let message = format!("Image not found: {}", not_found.key);
                self.slot.settle(id, LoadState::NotFound(message));
                None
            }
        }
    }

    /// Commits a finished load if it belongs to the latest selection.
    pub fn apply(&mut self, fetched: Fetched<AssetRef>) -> bool {
        let Fetched { id, result } = fetched;
        if !self.slot.is_current(id) {
            debug!(request = %id, "discarding stale object image");
            return false;
        }
        let s = &self.selection;
        let state = match result {
            Ok(image) => LoadState::Loaded(ObjectSplitView {
                image,
                alt: format!("{} {}", s.category, s.number),
                overlay: split_overlay(s.denominator, s.theme),
            }),
            Err(err) => {
                warn!(request = %id, error = %err, "object image failed to load");
                LoadState::LoadError(err.to_string())
            }
        };
        self.slot.settle(id, state)
    }

    /// Resolves, loads and applies the current selection.
    pub async fn refresh(&mut self) {
        if let Some(load) = self.select(self.selection.clone()) {
            let fetched = load.fetch_ref().await;
            self.apply(fetched);
        }
    }

    /// Changes the category; the object number resets to 0.
    pub fn set_category(&mut self, category: ObjectCategory) -> Option<PendingLoad> {
        let next = ObjectSelection {
            category,
            number: 0,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_number(&mut self, number: u32) -> Option<PendingLoad> {
        let next = ObjectSelection {
            number,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_denominator(&mut self, denominator: u32) -> Option<PendingLoad> {
        let next = ObjectSelection {
            denominator,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Option<PendingLoad> {
        let next = ObjectSelection {
            theme,
            ..self.selection.clone()
        };
        self.select(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryStore;
    use crate::renderer::tests::FailingStore;
    use std::sync::Arc;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_bytes("fraction_objects/pizza/0.png", vec![1])
            .with_bytes("fraction_objects/pizza/1.png", vec![2])
            .with_bytes("fraction_objects/pizza/2.png", vec![3])
            .with_bytes("fraction_objects/pie/0.png", vec![4])
            .with_bytes("fraction_objects/donut/1.png", vec![5])
    }

    fn renderer() -> ObjectSplitRenderer {
        ObjectSplitRenderer::new(PathResolver::new(Arc::new(store())))
    }

    #[tokio::test]
    async fn loads_image_with_overlay() {
        let mut r = renderer();
        let load = r.set_number(2).unwrap();
        assert_eq!(load.paths(), &["fraction_objects/pizza/2.png".to_string()]);
        let fetched = load.fetch_ref().await;
        assert!(r.apply(fetched));

        let view = r.state().loaded().unwrap();
        assert_eq!(view.alt, "pizza 2");
        assert_eq!(view.image.url, "data:image/png;base64,Aw==");
        let overlay = view.overlay.as_deref().unwrap();
        assert_eq!(overlay.matches("<line").count(), 1);
        assert!(overlay.contains("#FFFFFF"));
    }

    #[tokio::test]
    async fn dark_theme_and_unsupported_denominators() {
        let mut r = renderer();
        let _ = r.set_theme(Theme::Dark);
        let _ = r.set_denominator(4);
        r.refresh().await;
        let overlay = r.state().loaded().unwrap().overlay.clone().unwrap();
        assert!(overlay.contains("#000000"));

        let _ = r.set_denominator(6);
        r.refresh().await;
        assert_eq!(r.state().loaded().unwrap().overlay, None);
    }

    #[tokio::test]
    async fn number_beyond_count_is_not_found() {
        let mut r = renderer();
        assert_eq!(r.object_count(), 3);
        assert!(r.set_number(5).is_none());
        assert_eq!(r.selection().number, 5);
        assert_eq!(
            r.state(),
            &LoadState::NotFound("Image not found: fraction_objects/pizza/5".into())
        );
    }

    #[tokio::test]
    async fn gapped_numbers_resolve_by_file_name() {
        let store = MemoryStore::new()
            .with_bytes("fraction_objects/pizza/0.png", vec![0])
            .with_bytes("fraction_objects/pizza/5.png", vec![5])
            .with_bytes("fraction_objects/pizza/7.png", vec![7]);
        let mut r = ObjectSplitRenderer::new(PathResolver::new(Arc::new(store)));

        let load = r.set_number(5).unwrap();
        assert_eq!(load.paths(), &["fraction_objects/pizza/5.png".to_string()]);
        assert!(r.apply(load.fetch_ref().await));
        assert_eq!(r.state().loaded().unwrap().alt, "pizza 5");

        assert!(r.set_number(7).is_some());
        assert!(r.set_number(3).is_none());
    }

    #[tokio::test]
    async fn gaps_in_numbering_are_not_found() {
        let mut r = renderer();
        let _ = r.set_category(ObjectCategory::Donut);
        // One donut, numbered 1: number 0 is inside the count but has no file.
        assert_eq!(r.selection().number, 0);
        assert_eq!(
            r.state(),
            &LoadState::NotFound("Image not found: fraction_objects/donut/0".into())
        );
    }

    #[tokio::test]
    async fn load_failure_surfaces() {
        let store = FailingStore::new(store(), "fraction_objects/pizza/0.png");
        let mut r = ObjectSplitRenderer::new(PathResolver::new(Arc::new(store)));
        r.refresh().await;
        assert!(matches!(r.state(), LoadState::LoadError(_)));
    }

    #[tokio::test]
    async fn category_change_resets_number() {
        let mut r = renderer();
        let _ = r.set_number(1);
        let stale = r.set_category(ObjectCategory::Pie).unwrap();
        assert_eq!(r.selection().number, 0);

        // A newer selection supersedes the pie load.
        let current = r.set_category(ObjectCategory::Pizza).unwrap();
        assert!(!r.apply(stale.fetch_ref().await));
        assert!(r.apply(current.fetch_ref().await));
        assert_eq!(r.state().loaded().unwrap().alt, "pizza 0");
    }
}
