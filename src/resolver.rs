//! Mapping from fraction selections to catalog paths.
//!
//! Every answer is derived by listing the store at call time, so adding or
//! removing files in the catalog is reflected without any manifest.
//!
//! Shape icons are addressed by position: the `variant`-th (1-based) entry of
//! the sorted directory listing. Object images are addressed by exact file
//! name (`{number}.png`, 0-based, gaps allowed). The two schemes are kept
//! apart on purpose; a shape directory holding `1.svg` and `3.svg` has
//! variants 1 and 2.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::AssetStore;
use crate::error::NotFound;
use crate::geometry::MAX_SLICES;
use crate::model::{AssetKey, Fraction, ObjectCategory, ShapeCategory, SplitStyle};

// ============================================================================
// AssetLayout
// ============================================================================

/// Directory roots and file extensions of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct AssetLayout {
    /// Root of `{category}/{split}/1:{d}/{k}.svg` shape icons.
    pub shapes_root: String,
    /// Root of `{category}/{k}.png` object images.
    pub objects_root: String,
    /// Root of `{shape}/{n}:{d}/{k}.svg` part sets.
    pub parts_root: String,
    pub shape_extension: String,
    pub object_extension: String,
    pub part_extension: String,
}

impl Default for AssetLayout {
    fn default() -> Self {
        Self {
            shapes_root: "shapes".into(),
            objects_root: "fraction_objects".into(),
            parts_root: "shape_parts".into(),
            shape_extension: "svg".into(),
            object_extension: "png".into(),
            part_extension: "svg".into(),
        }
    }
}

impl AssetLayout {
    fn shape_dir(&self, category: ShapeCategory, denominator: u32, split: SplitStyle) -> String {
        format!(
            "{}/{category}/{split}/{}/",
            self.shapes_root,
            Fraction::unit(denominator).path_segment()
        )
    }

    fn object_dir(&self, category: ObjectCategory) -> String {
        format!("{}/{category}/", self.objects_root)
    }

    fn parts_dir(&self, shape: ShapeCategory) -> String {
        format!("{}/{shape}/", self.parts_root)
    }
}

// ============================================================================
// PathResolver
// ============================================================================

/// Resolves selections against an [`AssetStore`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use fraction_visuals::{MemoryStore, PathResolver, ShapeCategory, SplitStyle};
///
/// let store = MemoryStore::new()
///     .with_text("shapes/circle/equal/1:2/a.svg", "<svg/>")
///     .with_text("shapes/circle/equal/1:2/b.svg", "<svg/>");
/// let resolver = PathResolver::new(Arc::new(store));
///
/// assert_eq!(resolver.count_shape_variants(ShapeCategory::Circle, 2, SplitStyle::Equal), 2);
/// assert_eq!(
///     resolver
///         .resolve_shape_variant(ShapeCategory::Circle, 2, SplitStyle::Equal, 2)
///         .unwrap(),
///     "shapes/circle/equal/1:2/b.svg"
/// );
/// ```
#[derive(Clone)]
pub struct PathResolver {
    store: Arc<dyn AssetStore>,
    layout: AssetLayout,
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl PathResolver {
    /// Creates a resolver using the default directory layout.
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self::with_layout(store, AssetLayout::default())
    }

    pub fn with_layout(store: Arc<dyn AssetStore>, layout: AssetLayout) -> Self {
        Self { store, layout }
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Lists `prefix`, keeping only paths with the given extension.
    fn list_with_extension(&self, prefix: &str, extension: &str) -> Vec<String> {
        let suffix = format!(".{extension}");
        self.store
            .list(prefix)
            .into_iter()
            .filter(|path| path.ends_with(&suffix))
            .collect()
    }

    fn shape_variants(
        &self,
        category: ShapeCategory,
        denominator: u32,
        split: SplitStyle,
    ) -> Vec<String> {
        let dir = self.layout.shape_dir(category, denominator, split);
        self.list_with_extension(&dir, &self.layout.shape_extension)
    }

    // ------------------------------------------------------------------------
    // Shape icons
    // ------------------------------------------------------------------------

    /// Number of icons available for a shape, denominator and split style.
    pub fn count_shape_variants(
        &self,
        category: ShapeCategory,
        denominator: u32,
        split: SplitStyle,
    ) -> usize {
        self.shape_variants(category, denominator, split).len()
    }

    /// Path of the `variant`-th (1-based) icon in sorted order.
    pub fn resolve_shape_variant(
        &self,
        category: ShapeCategory,
        denominator: u32,
        split: SplitStyle,
        variant: u32,
    ) -> Result<String, NotFound> {
        let variants = self.shape_variants(category, denominator, split);
        let found = (variant as usize)
            .checked_sub(1)
            .and_then(|i| variants.get(i))
            .cloned();

        found.ok_or_else(|| {
            let key = AssetKey::Shape {
                category,
                fraction: Fraction::unit(denominator),
                split,
                variant,
            };
            debug!(key = %key, available = variants.len(), "shape variant not found");
            NotFound::new(key.to_string())
        })
    }

    /// Denominators with at least one icon directory for `category`/`split`.
    ///
    /// Falls back to [`ShapeCategory::default_denominators`] when the catalog
    /// has no icons for the category at all.
    pub fn available_denominators(&self, category: ShapeCategory, split: SplitStyle) -> Vec<u32> {
        let category_dir = format!("{}/{category}/", self.layout.shapes_root);
        let any_for_category = !self
            .list_with_extension(&category_dir, &self.layout.shape_extension)
            .is_empty();
        if !any_for_category {
            return category.default_denominators().to_vec();
        }

        let split_dir = format!("{category_dir}{split}/");
        let suffix = format!(".{}", self.layout.shape_extension);
        let denominators: BTreeSet<u32> = self
            .store
            .list(&split_dir)
            .iter()
            .filter(|path| path.ends_with(&suffix))
            .filter_map(|path| path[split_dir.len()..].split('/').next())
            .filter_map(Fraction::from_segment)
            .filter(|fraction| fraction.numerator == 1)
            .map(|fraction| fraction.denominator)
            .collect();
        denominators.into_iter().collect()
    }

    // ------------------------------------------------------------------------
    // Object images
    // ------------------------------------------------------------------------

    /// Number of images available for an object category.
    pub fn count_object_variants(&self, category: ObjectCategory) -> usize {
        let dir = self.layout.object_dir(category);
        self.list_with_extension(&dir, &self.layout.object_extension)
            .len()
    }

    /// Path of `{number}.png` for the category, if it exists.
    pub fn resolve_object_variant(
        &self,
        category: ObjectCategory,
        number: u32,
    ) -> Result<String, NotFound> {
        let path = format!(
            "{}{number}.{}",
            self.layout.object_dir(category),
            self.layout.object_extension
        );
        if self.store.exists(&path) {
            return Ok(path);
        }
        let key = AssetKey::Object { category, number };
        debug!(key = %key, "object image not found");
        Err(NotFound::new(key.to_string()))
    }

    /// Fractions offered for object parts: 1/d through d/d. Empty when the pie
    /// cannot be divided that finely.
    pub fn object_fractions(&self, denominator: u32) -> Vec<Fraction> {
        if denominator > MAX_SLICES {
            return Vec::new();
        }
        (1..=denominator)
            .map(|numerator| Fraction::new(numerator, denominator))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Shape parts
    // ------------------------------------------------------------------------

    /// Every part file of a shape's fraction, sorted.
    pub fn list_part_variants(&self, shape: ShapeCategory, fraction: Fraction) -> Vec<String> {
        let dir = format!("{}{}/", self.layout.parts_dir(shape), fraction.path_segment());
        self.list_with_extension(&dir, &self.layout.part_extension)
    }

    /// Fractions that have at least one part file for `shape`, ordered by
    /// denominator then numerator.
    pub fn list_available_fractions(&self, shape: ShapeCategory) -> Vec<Fraction> {
        let dir = self.layout.parts_dir(shape);
        let fractions: BTreeSet<Fraction> = self
            .list_with_extension(&dir, &self.layout.part_extension)
            .iter()
            .filter_map(|path| {
                // Only `{n}:{d}/{file}`, not files directly under the shape
                let (segment, _) = path[dir.len()..].split_once('/')?;
                Fraction::from_segment(segment)
            })
            .collect();
        fractions.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryStore;

    fn resolver(paths: &[&str]) -> PathResolver {
        let store = paths
            .iter()
            .fold(MemoryStore::new(), |store, path| store.with_text(*path, "<svg/>"));
        PathResolver::new(Arc::new(store))
    }

    #[test]
    fn shape_variants_are_positional_and_bounded() {
        let r = resolver(&[
            "shapes/square/equal/1:4/3.svg",
            "shapes/square/equal/1:4/1.svg",
            "shapes/square/equal/1:4/notes.txt",
            "shapes/square/equal/1:40/1.svg",
        ]);
        let count = r.count_shape_variants(ShapeCategory::Square, 4, SplitStyle::Equal);
        assert_eq!(count, 2);

        for i in 1..=count as u32 {
            assert!(
                r.resolve_shape_variant(ShapeCategory::Square, 4, SplitStyle::Equal, i)
                    .is_ok()
            );
        }
        assert_eq!(
            r.resolve_shape_variant(ShapeCategory::Square, 4, SplitStyle::Equal, 2).unwrap(),
            "shapes/square/equal/1:4/3.svg"
        );

        let err = r
            .resolve_shape_variant(ShapeCategory::Square, 4, SplitStyle::Equal, 0)
            .unwrap_err();
        assert_eq!(err.key, "shapes/square/equal/1:4/#0");
        assert!(r.resolve_shape_variant(ShapeCategory::Square, 4, SplitStyle::Equal, 3).is_err());
    }

    #[test]
    fn hexagon_thirds_and_unequal_splits_are_empty() {
        let r = resolver(&["shapes/hexagon/equal/1:2/1.svg"]);
        assert_eq!(r.count_shape_variants(ShapeCategory::Hexagon, 3, SplitStyle::Equal), 0);
        assert_eq!(r.count_shape_variants(ShapeCategory::Hexagon, 2, SplitStyle::NotEqual), 0);
        let err = r
            .resolve_shape_variant(ShapeCategory::Hexagon, 3, SplitStyle::Equal, 1)
            .unwrap_err();
        assert_eq!(err.key, "shapes/hexagon/equal/1:3/#1");
    }

    #[test]
    fn objects_are_exact_file_names() {
        let r = resolver(&[
            "fraction_objects/pizza/0.png",
            "fraction_objects/pizza/1.png",
            "fraction_objects/pizza/2.png",
            "fraction_objects/pie/4.png",
        ]);
        assert_eq!(r.count_object_variants(ObjectCategory::Pizza), 3);
        assert_eq!(
            r.resolve_object_variant(ObjectCategory::Pizza, 2).unwrap(),
            "fraction_objects/pizza/2.png"
        );
        let err = r.resolve_object_variant(ObjectCategory::Pizza, 5).unwrap_err();
        assert_eq!(err.key, "fraction_objects/pizza/5");

        // Gaps are allowed; the count says nothing about which numbers exist.
        assert_eq!(r.count_object_variants(ObjectCategory::Pie), 1);
        assert!(r.resolve_object_variant(ObjectCategory::Pie, 0).is_err());
        assert!(r.resolve_object_variant(ObjectCategory::Pie, 4).is_ok());
        assert_eq!(r.count_object_variants(ObjectCategory::Donut), 0);
    }

    #[test]
    fn part_sets_and_available_fractions() {
        let r = resolver(&[
            "shape_parts/circle/3:4/1.svg",
            "shape_parts/circle/1:2/2.svg",
            "shape_parts/circle/1:2/1.svg",
            "shape_parts/circle/1:4/1.svg",
            "shape_parts/circle/2:3/1.svg",
            "shape_parts/circle/2:3/readme.md",
            "shape_parts/circle/stray.svg",
            "shape_parts/circle/bad:x/1.svg",
        ]);

        assert_eq!(
            r.list_part_variants(ShapeCategory::Circle, Fraction::new(1, 2)),
            vec![
                "shape_parts/circle/1:2/1.svg".to_string(),
                "shape_parts/circle/1:2/2.svg".to_string(),
            ]
        );
        assert!(r.list_part_variants(ShapeCategory::Circle, Fraction::new(5, 6)).is_empty());

        let fractions = r.list_available_fractions(ShapeCategory::Circle);
        assert_eq!(
            fractions,
            vec![
                Fraction::new(1, 2),
                Fraction::new(2, 3),
                Fraction::new(1, 4),
                Fraction::new(3, 4),
            ]
        );
        for fraction in fractions {
            assert!(!r.list_part_variants(ShapeCategory::Circle, fraction).is_empty());
        }
        assert!(r.list_available_fractions(ShapeCategory::Diamond).is_empty());
    }

    #[test]
    fn denominators_come_from_catalog() {
        let r = resolver(&[
            "shapes/rhombus/equal/1:2/1.svg",
            "shapes/rhombus/equal/1:5/1.svg",
            "shapes/rhombus/not_equal/1:3/1.svg",
        ]);
        assert_eq!(r.available_denominators(ShapeCategory::Rhombus, SplitStyle::Equal), vec![2, 5]);
        assert_eq!(r.available_denominators(ShapeCategory::Rhombus, SplitStyle::NotEqual), vec![3]);
        // No icons at all for the category: fixed table.
        assert_eq!(
            r.available_denominators(ShapeCategory::Triangle, SplitStyle::Equal),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn object_fraction_choices() {
        let r = resolver(&[]);
        assert_eq!(
            r.object_fractions(3),
            vec![Fraction::new(1, 3), Fraction::new(2, 3), Fraction::new(3, 3)]
        );
        assert!(r.object_fractions(0).is_empty());
        assert!(r.object_fractions(u32::MAX).is_empty());
    }

    #[test]
    fn custom_layout() {
        let store = MemoryStore::new().with_text("icons/circle/equal/1:2/a.svgz", "x");
        let layout = AssetLayout {
            shapes_root: "icons".into(),
            shape_extension: "svgz".into(),
            ..AssetLayout::default()
        };
        let r = PathResolver::with_layout(Arc::new(store), layout);
        assert_eq!(r.count_shape_variants(ShapeCategory::Circle, 2, SplitStyle::Equal), 1);
    }
}
