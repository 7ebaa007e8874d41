//! A gallery of pre-divided shape parts, one tile per file.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::slot::{Fetched, LoadState, PendingLoad, RenderSlot};
use crate::error::{PreviewError, RenderFault};
use crate::model::{ColorSpec, Fraction, ShapeCategory, Theme};
use crate::resolver::PathResolver;
use crate::svg::{RenderOptions, preview_png, transform};

/// What the shape parts view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct PartsSelection {
    pub shape: ShapeCategory,
    pub fraction: Fraction,
    pub color: ColorSpec,
    pub theme: Theme,
}

impl Default for PartsSelection {
    fn default() -> Self {
        Self {
            shape: ShapeCategory::Circle,
            fraction: Fraction::new(1, 2),
            color: ColorSpec::default(),
            theme: Theme::Light,
        }
    }
}

impl PartsSelection {
    /// Accessible name of the `index`-th (0-based) tile.
    pub fn tile_title(&self, index: usize) -> String {
        format!("Part {} of {} {}", index + 1, self.fraction, self.shape)
    }

    pub fn description(&self) -> String {
        format!(
            "Visual representation of fraction {} using a {} shape",
            self.fraction, self.shape
        )
    }

    fn render_options(
        &self,
        index: usize,
        named_colors: &BTreeMap<String, String>,
    ) -> RenderOptions {
        RenderOptions {
            color: Some(self.color.clone()),
            dark_mode: self.theme.is_dark(),
            title: Some(self.tile_title(index)),
            description: Some(self.description()),
            named_colors: named_colors.clone(),
        }
    }
}

/// One tile of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tile {
    Rendered {
        index: usize,
        title: String,
        markup: String,
    },
    /// The tile could not be displayed; its siblings are unaffected.
    Fault(RenderFault),
}

impl Tile {
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Rendered { markup, .. } => Some(markup),
            Self::Fault(_) => None,
        }
    }

    /// PNG preview of a rendered tile, `size` pixels on its longer side.
    /// `None` for a faulted tile.
    pub fn preview_png(&self, size: u32) -> Option<Result<Vec<u8>, PreviewError>> {
        self.markup().map(|markup| preview_png(markup, size))
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unexpected error".to_string()
    }
}

/// Renders one tile with `render`, turning empty content or a panic into a
/// [`Tile::Fault`].
fn render_tile<F>(index: usize, raw: &str, options: &RenderOptions, render: &F) -> Tile
where
    F: Fn(&str, &RenderOptions) -> String,
{
    let fault = |detail: String| {
        warn!(tile = index, detail = %detail, "shape part could not be displayed");
        Tile::Fault(RenderFault {
            index,
            message: format!("Display Error: {detail}"),
        })
    };

    if raw.trim().is_empty() {
        return fault("empty SVG content".to_string());
    }
    match catch_unwind(AssertUnwindSafe(|| render(raw, options))) {
        Ok(markup) => Tile::Rendered {
            index,
            title: options.title.clone().unwrap_or_default(),
            markup,
        },
        Err(payload) => fault(panic_message(payload.as_ref())),
    }
}

fn render_tiles<F>(
    contents: &[String],
    selection: &PartsSelection,
    named_colors: &BTreeMap<String, String>,
    render: F,
) -> Vec<Tile>
where
    F: Fn(&str, &RenderOptions) -> String,
{
    contents
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            let options = selection.render_options(index, named_colors);
            render_tile(index, raw, &options, &render)
        })
        .collect()
}

/// Loads every part file of a fraction and restyles each into a tile.
#[derive(Debug)]
pub struct ShapePartsRenderer {
    resolver: PathResolver,
    selection: PartsSelection,
    named_colors: BTreeMap<String, String>,
    slot: RenderSlot<Vec<Tile>>,
}

impl ShapePartsRenderer {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            selection: PartsSelection::default(),
            named_colors: BTreeMap::new(),
            slot: RenderSlot::new(),
        }
    }

    /// Non-hex fill values to remap in every tile.
    pub fn with_named_colors(mut self, named_colors: BTreeMap<String, String>) -> Self {
        self.named_colors = named_colors;
        self
    }

    /// Starts from `selection` instead of the default, without loading.
    pub fn with_selection(mut self, selection: PartsSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &PartsSelection {
        &self.selection
    }

    pub fn named_colors(&self) -> &BTreeMap<String, String> {
        &self.named_colors
    }

    pub fn state(&self) -> &LoadState<Vec<Tile>> {
        self.slot.state()
    }

    /// Fractions with part files for the current shape.
    pub fn fractions(&self) -> Vec<Fraction> {
        self.resolver.list_available_fractions(self.selection.shape)
    }

    /// Switches to `selection` and lists its part files.
    pub fn select(&mut self, selection: PartsSelection) -> Option<PendingLoad> {
        self.selection = selection;
        let id = self.slot.begin();
        let s = &self.selection;

        let paths = self.resolver.list_part_variants(s.shape, s.fraction);
        if paths.is_empty() {
            let message = format!("No shape parts available for: {} - {}", s.shape, s.fraction);
            debug!(request = %id, shape = %s.shape, fraction = %s.fraction, "no shape parts");
            self.slot.settle(id, LoadState::NotFound(message));
            return None;
        }
        debug!(request = %id, parts = paths.len(), "loading shape parts");
        Some(PendingLoad::new(id, paths, self.resolver.store().clone()))
    }

    /// Commits a finished load if it belongs to the latest selection.
    pub fn apply(&mut self, fetched: Fetched<Vec<String>>) -> bool {
        let Fetched { id, result } = fetched;
        if !self.slot.is_current(id) {
            debug!(request = %id, "discarding stale shape parts");
            return false;
        }
        let state = match result {
            Ok(contents) => LoadState::Loaded(render_tiles(
                &contents,
                &self.selection,
                &self.named_colors,
                transform,
            )),
            Err(err) => {
                warn!(request = %id, error = %err, "shape parts failed to load");
                LoadState::LoadError(err.to_string())
            }
        };
        self.slot.settle(id, state)
    }

    /// Resolves, loads and applies the current selection.
    pub async fn refresh(&mut self) {
        if let Some(load) = self.select(self.selection.clone()) {
            let fetched = load.fetch_all_text().await;
            self.apply(fetched);
        }
    }

    pub fn set_shape(&mut self, shape: ShapeCategory) -> Option<PendingLoad> {
        let next = PartsSelection {
            shape,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_fraction(&mut self, fraction: Fraction) -> Option<PendingLoad> {
        let next = PartsSelection {
            fraction,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_color(&mut self, color: ColorSpec) -> Option<PendingLoad> {
        let next = PartsSelection {
            color,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Option<PendingLoad> {
        let next = PartsSelection {
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

    const PART: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><path fill="#123456"/><path fill="black" stroke="black"/></svg>"##;

    fn store() -> MemoryStore {
        MemoryStore::new()
            .with_text("shape_parts/triangle/1:3/a.svg", PART)
            .with_text("shape_parts/triangle/1:3/b.svg", PART)
            .with_text("shape_parts/triangle/1:3/c.svg", "   ")
            .with_text("shape_parts/circle/1:2/1.svg", PART)
            .with_text("shape_parts/circle/1:4/1.svg", PART)
    }

    fn renderer() -> ShapePartsRenderer {
        ShapePartsRenderer::new(PathResolver::new(Arc::new(store())))
    }

    #[tokio::test]
    async fn tiles_are_transformed_with_titles() {
        let mut r = renderer();
        let load = r
            .select(PartsSelection {
                shape: ShapeCategory::Triangle,
                fraction: Fraction::new(1, 3),
                theme: Theme::Dark,
                ..Default::default()
            })
            .unwrap();
        let fetched = load.fetch_all_text().await;
        assert!(r.apply(fetched));

        let tiles = r.state().loaded().unwrap();
        assert_eq!(tiles.len(), 3);

        let Tile::Rendered { index, title, markup } = &tiles[1] else {
            panic!("expected rendered tile");
        };
        assert_eq!(*index, 1);
        assert_eq!(title, "Part 2 of 1/3 triangle");
        assert!(markup.contains(">Part 2 of 1/3 triangle</title>"));
        assert!(markup.contains(
            "<desc>Visual representation of fraction 1/3 using a triangle shape</desc>"
        ));
        assert!(markup.contains(r##"<path fill="#5FAC4B"/>"##));
        assert!(markup.contains(r#"<path fill="white" stroke="white"/>"#));

        // Whitespace-only content faults without affecting its siblings.
        assert_eq!(
            tiles[2],
            Tile::Fault(RenderFault {
                index: 2,
                message: "Display Error: empty SVG content".into(),
            })
        );
        assert!(tiles[0].markup().is_some());

        let png = tiles[0].preview_png(24).unwrap().unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
        assert!(tiles[2].preview_png(24).is_none());
    }

    #[test]
    fn panicking_tile_is_isolated() {
        let contents = vec![PART.to_string(), PART.to_string(), PART.to_string()];
        let selection = PartsSelection::default();
        let tiles = render_tiles(&contents, &selection, &BTreeMap::new(), |raw, options| {
            if options.title.as_deref() == Some("Part 2 of 1/2 circle") {
                panic!("renderer exploded");
            }
            transform(raw, options)
        });

        assert!(tiles[0].markup().is_some());
        assert_eq!(
            tiles[1],
            Tile::Fault(RenderFault {
                index: 1,
                message: "Display Error: renderer exploded".into(),
            })
        );
        assert!(tiles[2].markup().is_some());
    }

    #[tokio::test]
    async fn missing_fraction_is_not_found() {
        let mut r = renderer();
        assert!(r.set_fraction(Fraction::new(2, 3)).is_none());
        assert_eq!(
            r.state(),
            &LoadState::NotFound("No shape parts available for: circle - 2/3".into())
        );
    }

    #[tokio::test]
    async fn any_failed_part_fails_the_set() {
        let store = FailingStore::new(store(), "shape_parts/triangle/1:3/b.svg");
        let mut r = ShapePartsRenderer::new(PathResolver::new(Arc::new(store)));
        let load = r.set_shape(ShapeCategory::Triangle);
        assert!(load.is_none(), "default fraction 1/2 has no triangle parts");

        let load = r.set_fraction(Fraction::new(1, 3)).unwrap();
        assert_eq!(load.paths().len(), 3);
        let fetched = load.fetch_all_text().await;
        r.apply(fetched);
        assert!(matches!(r.state(), LoadState::LoadError(_)));
    }

    #[tokio::test]
    async fn named_colors_and_fraction_listing() {
        let store = MemoryStore::new().with_text(
            "shape_parts/square/1:2/1.svg",
            r#"<svg><rect fill="accent"/></svg>"#,
        );
        let named = BTreeMap::from([("accent".to_string(), "teal".to_string())]);
        let mut r = ShapePartsRenderer::new(PathResolver::new(Arc::new(store)))
            .with_named_colors(named);
        let _ = r.set_shape(ShapeCategory::Square);
        assert_eq!(r.fractions(), vec![Fraction::new(1, 2)]);

        r.refresh().await;
        let tiles = r.state().loaded().unwrap();
        assert!(tiles[0].markup().unwrap().contains(r#"<rect fill="teal"/>"#));
    }

    #[tokio::test]
    async fn newer_selection_wins() {
        let mut r = renderer();
        let halves = r.set_fraction(Fraction::new(1, 2)).unwrap();
        let quarters = r.set_fraction(Fraction::new(1, 4)).unwrap();

        assert!(r.apply(quarters.fetch_all_text().await));
        assert!(!r.apply(halves.fetch_all_text().await));
        let Tile::Rendered { title, .. } = &r.state().loaded().unwrap()[0] else {
            panic!("expected rendered tile");
        };
        assert_eq!(title, "Part 1 of 1/4 circle");
    }
}
