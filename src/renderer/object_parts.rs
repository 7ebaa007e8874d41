//! An object photograph cut into pie slices, with only the shaded slices
//! showing the photograph.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::slot::{Fetched, LoadState, PendingLoad, RenderSlot};
use crate::catalog::AssetRef;
use crate::geometry::{PARTS_CENTER, PARTS_RADIUS, division_spokes, fmt_num, line, pie_slices};
use crate::model::{Fraction, ObjectCategory, Theme};
use crate::resolver::PathResolver;
use crate::svg::Element;

const OUTLINE_WIDTH: u32 = 3;

/// What the object parts view shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectPartsSelection {
    pub category: ObjectCategory,
    pub number: u32,
    /// Total number of slices.
    pub denominator: u32,
    /// Number of slices showing the photograph.
    pub shaded: u32,
    pub theme: Theme,
}

impl Default for ObjectPartsSelection {
    fn default() -> Self {
        Self {
            category: ObjectCategory::Pizza,
            number: 0,
            denominator: 2,
            shaded: 1,
            theme: Theme::Light,
        }
    }
}

impl ObjectPartsSelection {
    pub fn fraction(&self) -> Fraction {
        Fraction::new(self.shaded, self.denominator)
    }

    /// Id of the clip path holding the shaded slices.
    pub fn clip_id(&self) -> String {
        format!(
            "object-clip-{}-{}-{}-{}",
            self.category, self.number, self.denominator, self.shaded
        )
    }
}

/// A loaded object image and the sliced SVG built around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPartsView {
    pub image: AssetRef,
    pub markup: String,
}

/// Builds the 104x104 sliced view of an object image.
///
/// Layers, bottom to top: a background circle, the image clipped to the
/// first `shaded` slices, the division spokes, and the outer border.
pub fn object_parts_svg(selection: &ObjectPartsSelection, href: &str) -> String {
    let clip_id = selection.clip_id();
    let theme = selection.theme;
    let (cx, cy, r) = (
        fmt_num(PARTS_CENTER.x),
        fmt_num(PARTS_CENTER.y),
        fmt_num(PARTS_RADIUS),
    );
    let circle = || {
        Element::new("circle")
            .with_attr("cx", cx.clone())
            .with_attr("cy", cy.clone())
            .with_attr("r", r.clone())
    };

    let shaded_slices = pie_slices(selection.denominator)
        .into_iter()
        .take(selection.shaded as usize)
        .fold(Element::new("clipPath").with_attr("id", clip_id.clone()), |clip, slice| {
            clip.with_child(Element::new("path").with_attr("d", slice.path))
        });

    let defs = Element::new("defs")
        .with_child(
            Element::new("clipPath")
                .with_attr("id", format!("{clip_id}-circle"))
                .with_child(circle()),
        )
        .with_child(shaded_slices);

    let image = Element::new("image")
        .with_attr("href", href)
        .with_attr("x", "4")
        .with_attr("y", "4")
        .with_attr("width", "96")
        .with_attr("height", "96")
        .with_attr("clip-path", format!("url(#{clip_id})"));

    let spokes = division_spokes(selection.denominator).into_iter().fold(
        Element::new("g").with_attr("style", "pointer-events: none"),
        |g, rim| {
            g.with_child(
                line(PARTS_CENTER, rim, theme.outline(), OUTLINE_WIDTH).with_attr("opacity", "1"),
            )
        },
    );

    Element::new("svg")
        .with_attr("xmlns", "http://www.w3.org/2000/svg")
        .with_attr("viewBox", "0 0 104 104")
        .with_attr("width", "100%")
        .with_attr("height", "100%")
        .with_child(defs)
        .with_child(circle().with_attr("fill", theme.background()))
        .with_child(image)
        .with_child(spokes)
        .with_child(
            circle()
                .with_attr("fill", "none")
                .with_attr("stroke", theme.outline())
                .with_attr("stroke-width", OUTLINE_WIDTH.to_string())
                .with_attr("opacity", "1"),
        )
        .to_markup()
}

/// Loads object photographs and slices them into fraction views.
#[derive(Debug)]
pub struct ObjectPartsRenderer {
    resolver: PathResolver,
    selection: ObjectPartsSelection,
    slot: RenderSlot<ObjectPartsView>,
}

impl ObjectPartsRenderer {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            selection: ObjectPartsSelection::default(),
            slot: RenderSlot::new(),
        }
    }

    /// Starts from `selection` instead of the default, without loading.
    pub fn with_selection(mut self, selection: ObjectPartsSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn selection(&self) -> &ObjectPartsSelection {
        &self.selection
    }

    pub fn state(&self) -> &LoadState<ObjectPartsView> {
        self.slot.state()
    }

    pub fn object_count(&self) -> usize {
        self.resolver.count_object_variants(self.selection.category)
    }

    /// Fractions offered for the current denominator.
    pub fn fractions(&self) -> Vec<Fraction> {
        self.resolver.object_fractions(self.selection.denominator)
    }

    /// Switches to `selection` and resolves its image by exact file number.
    pub fn select(&mut self, selection: ObjectPartsSelection) -> Option<PendingLoad> {
        self.selection = selection;
        let id = self.slot.begin();

        match self
            .resolver
            .resolve_object_variant(self.selection.category, self.selection.number)
        {
            Ok(path) => {
                debug!(
                    request = %id,
                    path = %path,
                    fraction = %self.selection.fraction(),
                    "loading object parts"
                );
                Some(PendingLoad::new(id, vec![path], self.resolver.store().clone()))
            }
            Err(not_found) => {
                let message = format!("Object not found: {}", not_found.key);
                self.slot.settle(id, LoadState::NotFound(message));
                None
            }
        }
    }

    /// Commits a finished load if it belongs to the latest selection.
    pub fn apply(&mut self, fetched: Fetched<AssetRef>) -> bool {
        let Fetched { id, result } = fetched;
        if !self.slot.is_current(id) {
            debug!(request = %id, "discarding stale object parts");
            return false;
        }
        let state = match result {
            Ok(image) => {
                let markup = object_parts_svg(&self.selection, &image.url);
                LoadState::Loaded(ObjectPartsView { image, markup })
            }
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
        let next = ObjectPartsSelection {
            category,
            number: 0,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_number(&mut self, number: u32) -> Option<PendingLoad> {
        let next = ObjectPartsSelection {
            number,
            ..self.selection.clone()
        };
        self.select(next)
    }

    /// Changes the slice count, lowering the shaded count to fit.
    pub fn set_denominator(&mut self, denominator: u32) -> Option<PendingLoad> {
        let next = ObjectPartsSelection {
            denominator,
            shaded: self.selection.shaded.min(denominator),
            ..self.selection.clone()
        };
        self.select(next)
    }

    /// Sets shaded and total slices together.
    pub fn set_fraction(&mut self, fraction: Fraction) -> Option<PendingLoad> {
        let next = ObjectPartsSelection {
            shaded: fraction.numerator,
            denominator: fraction.denominator,
            ..self.selection.clone()
        };
        self.select(next)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Option<PendingLoad> {
        let next = ObjectPartsSelection {
            theme,
            ..self.selection.clone()
        };
        self.select(next)
    }
}
