//! Value types describing a fraction selection.
//!
//! Every type here is a plain value: selections are re-derived on each
//! change and nothing outlives a single render cycle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Categories
// ============================================================================

/// A geometric shape family.
///
/// The lower-case name doubles as the directory name in the asset catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ShapeCategory {
    Circle,
    Hexagon,
    Rectangle,
    Rhombus,
    Square,
    Triangle,
    Diamond,
}

impl ShapeCategory {
    pub const ALL: [ShapeCategory; 7] = [
        Self::Circle,
        Self::Hexagon,
        Self::Rectangle,
        Self::Rhombus,
        Self::Square,
        Self::Triangle,
        Self::Diamond,
    ];

    /// Returns the directory name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Hexagon => "hexagon",
            Self::Rectangle => "rectangle",
            Self::Rhombus => "rhombus",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Diamond => "diamond",
        }
    }

    /// Denominators offered for shape icons when the catalog has no
    /// `1:{d}` directories for this category.
    pub fn default_denominators(&self) -> &'static [u32] {
        match self {
            Self::Hexagon => &[2],
            Self::Rhombus => &[2, 5],
            _ => &[2, 3, 4],
        }
    }
}

impl fmt::Display for ShapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShapeCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A real-world object family rendered from PNG photographs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Pizza,
    Fruit,
    Donut,
    Pie,
}

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 4] = [Self::Pizza, Self::Fruit, Self::Donut, Self::Pie];

    /// Returns the directory name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pizza => "pizza",
            Self::Fruit => "fruit",
            Self::Donut => "donut",
            Self::Pie => "pie",
        }
    }
}

impl fmt::Display for ObjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Returned when parsing a category name that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

// ============================================================================
// Fraction
// ============================================================================

/// A numerator/denominator pair.
///
/// `numerator <= denominator` is what the UI offers but is not enforced here.
/// Ordering is by denominator first, then numerator, which is the order
/// fraction pickers list them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Fraction {
    pub numerator: u32,
    pub denominator: u32,
}

impl Fraction {
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The unit fraction `1/denominator`, the key for shape icons.
    pub fn unit(denominator: u32) -> Self {
        Self::new(1, denominator)
    }

    /// Returns the `{n}:{d}` directory segment for this fraction.
    pub fn path_segment(&self) -> String {
        format!("{}:{}", self.numerator, self.denominator)
    }

    /// Parses a `{n}:{d}` directory segment.
    ///
    /// Both parts must be positive decimal integers.
    pub fn from_segment(segment: &str) -> Option<Self> {
        let (n, d) = segment.split_once(':')?;
        if n.is_empty() || d.is_empty() {
            return None;
        }
        if !n.bytes().all(|b| b.is_ascii_digit()) || !d.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let numerator: u32 = n.parse().ok()?;
        let denominator: u32 = d.parse().ok()?;
        if numerator == 0 || denominator == 0 {
            return None;
        }
        Some(Self::new(numerator, denominator))
    }

    /// A reader-friendly name, e.g. "Three Quarters".
    pub fn label(&self) -> String {
        match (self.numerator, self.denominator) {
            (1, 2) | (2, 4) => "Half".to_string(),
            (1, 3) => "One Third".to_string(),
            (2, 3) => "Two Thirds".to_string(),
            (1, 4) => "One Quarter".to_string(),
            (3, 4) => "Three Quarters".to_string(),
            (n, d) if n == d => "Whole".to_string(),
            (n, d) => format!("{n} out of {d}"),
        }
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.denominator, self.numerator).cmp(&(other.denominator, other.numerator))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

// ============================================================================
// SplitStyle
// ============================================================================

/// Whether a shape is divided into equal-sized regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum SplitStyle {
    #[default]
    Equal,
    NotEqual,
}

impl SplitStyle {
    pub fn from_equal(is_equal: bool) -> Self {
        if is_equal { Self::Equal } else { Self::NotEqual }
    }

    /// Returns the directory name of this split style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::NotEqual => "not_equal",
        }
    }
}

impl fmt::Display for SplitStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// AssetKey
// ============================================================================

/// The parameters of one lookup, kept for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKey {
    /// A shape icon, selected by 1-based position among sorted candidates.
    Shape {
        category: ShapeCategory,
        fraction: Fraction,
        split: SplitStyle,
        variant: u32,
    },
    /// An object photograph, selected by exact file name.
    Object { category: ObjectCategory, number: u32 },
    /// The full set of pre-divided part files for one fraction.
    Parts {
        shape: ShapeCategory,
        fraction: Fraction,
    },
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shape {
                category,
                fraction,
                split,
                variant,
            } => write!(
                f,
                "shapes/{category}/{split}/{}/#{variant}",
                fraction.path_segment()
            ),
            Self::Object { category, number } => write!(f, "fraction_objects/{category}/{number}"),
            Self::Parts { shape, fraction } => {
                write!(f, "shape_parts/{shape}/{}", fraction.path_segment())
            }
        }
    }
}

// ============================================================================
// ColorSpec
// ============================================================================

/// A CSS hex color chosen by the user.
///
/// Only `#` followed by 3 or 6 hex digits is accepted. The string is kept as
/// written so that recolored markup carries exactly what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(try_from = "String", into = "String")]
pub struct ColorSpec(String);

impl ColorSpec {
    /// The default fill used throughout the fraction library.
    pub const DEFAULT: &'static str = "#5FAC4B";

    /// Validates a hex color string.
    pub fn parse(value: &str) -> Result<Self, InvalidColor> {
        let value = value.trim();
        if !crate::svg::is_hex_color(value) {
            return Err(InvalidColor(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for ColorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ColorSpec {
    type Err = InvalidColor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorSpec {
    type Error = InvalidColor;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ColorSpec> for String {
    fn from(color: ColorSpec) -> Self {
        color.0
    }
}

/// Returned when a color string is not a 3 or 6 digit hex color.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a hex color: {0:?}")]
pub struct InvalidColor(pub String);

// ============================================================================
// Theme
// ============================================================================

/// Light or dark presentation; selects contrast colors that the user
/// cannot override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode { Self::Dark } else { Self::Light }
    }

    pub fn is_dark(&self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Page background, used behind unshaded slices.
    pub fn background(&self) -> &'static str {
        match self {
            Self::Light => "#ffffff",
            Self::Dark => "#1a1a1a",
        }
    }

    /// Division lines and borders drawn over object parts.
    pub fn outline(&self) -> &'static str {
        match self {
            Self::Light => "#000000",
            Self::Dark => "#ffffff",
        }
    }

    /// Split lines drawn over an unclipped object photograph.
    pub fn split_stroke(&self) -> &'static str {
        match self {
            Self::Light => "#FFFFFF",
            Self::Dark => "#000000",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_names_round_trip() {
        for category in ShapeCategory::ALL {
            assert_eq!(category.as_str().parse::<ShapeCategory>(), Ok(category));
        }
        for category in ObjectCategory::ALL {
            assert_eq!(category.to_string().parse::<ObjectCategory>(), Ok(category));
        }
        assert!("octagon".parse::<ShapeCategory>().is_err());
    }

    #[test]
    fn default_denominators_per_category() {
        assert_eq!(ShapeCategory::Hexagon.default_denominators(), &[2]);
        assert_eq!(ShapeCategory::Rhombus.default_denominators(), &[2, 5]);
        assert_eq!(ShapeCategory::Square.default_denominators(), &[2, 3, 4]);
    }

    #[test]
    fn fraction_segments() {
        assert_eq!(Fraction::new(3, 4).path_segment(), "3:4");
        assert_eq!(Fraction::from_segment("2:3"), Some(Fraction::new(2, 3)));
        assert_eq!(Fraction::from_segment("12:16"), Some(Fraction::new(12, 16)));
        assert_eq!(Fraction::from_segment("0:3"), None);
        assert_eq!(Fraction::from_segment("a:3"), None);
        assert_eq!(Fraction::from_segment("1:"), None);
        assert_eq!(Fraction::from_segment("+1:2"), None);
        assert_eq!(Fraction::from_segment("1.svg"), None);
    }

    #[test]
    fn fractions_sort_by_denominator_then_numerator() {
        let mut fractions = vec![
            Fraction::new(3, 4),
            Fraction::new(1, 2),
            Fraction::new(2, 3),
            Fraction::new(1, 4),
            Fraction::new(1, 3),
        ];
        fractions.sort();
        assert_eq!(
            fractions,
            vec![
                Fraction::new(1, 2),
                Fraction::new(1, 3),
                Fraction::new(2, 3),
                Fraction::new(1, 4),
                Fraction::new(3, 4),
            ]
        );
    }

    #[test]
    fn fraction_labels() {
        assert_eq!(Fraction::new(1, 2).label(), "Half");
        assert_eq!(Fraction::new(2, 4).label(), "Half");
        assert_eq!(Fraction::new(3, 4).label(), "Three Quarters");
        assert_eq!(Fraction::new(5, 5).label(), "Whole");
        assert_eq!(Fraction::new(2, 5).label(), "2 out of 5");
    }

    #[test]
    fn asset_key_display() {
        let key = AssetKey::Shape {
            category: ShapeCategory::Hexagon,
            fraction: Fraction::unit(3),
            split: SplitStyle::Equal,
            variant: 1,
        };
        assert_eq!(key.to_string(), "shapes/hexagon/equal/1:3/#1");

        let key = AssetKey::Object {
            category: ObjectCategory::Pizza,
            number: 5,
        };
        assert_eq!(key.to_string(), "fraction_objects/pizza/5");
    }

    #[test]
    fn color_spec_validation() {
        assert!(ColorSpec::parse("#5FAC4B").is_ok());
        assert!(ColorSpec::parse("#abc").is_ok());
        assert!(ColorSpec::parse("5FAC4B").is_err());
        assert!(ColorSpec::parse("#12345").is_err());
        assert!(ColorSpec::parse("red").is_err());
        assert_eq!(ColorSpec::default().as_str(), "#5FAC4B");
    }

    #[test]
    fn color_spec_serde_rejects_invalid() {
        let ok: ColorSpec = serde_json::from_str("\"#123456\"").unwrap();
        assert_eq!(ok.as_str(), "#123456");
        assert!(serde_json::from_str::<ColorSpec>("\"blue\"").is_err());
    }

    #[test]
    fn theme_contrast_colors() {
        assert_eq!(Theme::from_dark_mode(true), Theme::Dark);
        assert_eq!(Theme::Dark.background(), "#1a1a1a");
        assert_eq!(Theme::Light.outline(), "#000000");
        assert_eq!(Theme::Light.split_stroke(), "#FFFFFF");
        assert_eq!(Theme::Dark.split_stroke(), "#000000");
    }
}
