//! Pie-slice and split-line geometry for object views.
//!
//! Angles are in degrees, measured clockwise from 12 o'clock. SVG's y axis
//! points down, so a plain polar conversion offset by -90° gives that
//! orientation.

use kurbo::{Point, Vec2};

use crate::model::Theme;
use crate::svg::Element;

/// Center of the object-parts canvas.
pub const PARTS_CENTER: Point = Point::new(52.0, 52.0);

/// Radius of the object-parts pie.
pub const PARTS_RADIUS: f64 = 48.0;

/// Stroke width of the split overlay, in overlay units.
pub const SPLIT_STROKE_WIDTH: u32 = 4;

/// Largest denominator the object-parts pie is divided into. Anything above
/// draws no slices or spokes.
pub const MAX_SLICES: u32 = 360;

/// Converts a clockwise-from-top angle to a point on a circle.
pub fn polar_to_cartesian(center: Point, radius: f64, degrees: f64) -> Point {
    center + Vec2::from_angle((degrees - 90.0).to_radians()) * radius
}

/// Formats a coordinate for SVG output: at most three decimals, no trailing
/// zeros, never `-0`.
pub fn fmt_num(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{rounded}")
}

// ============================================================================
// Pie slices
// ============================================================================

/// One wedge of a pie divided into equal parts.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub index: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    /// True when the wedge spans more than half the circle.
    pub large_arc: bool,
    /// SVG path data for the wedge.
    pub path: String,
}

/// Path data for a wedge from the center out to the arc between two angles.
///
/// `M cx cy L sx sy A r r 0 large 1 ex ey Z`
pub fn describe_pie_slice(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> String {
    let start = polar_to_cartesian(center, radius, start_angle);
    let end = polar_to_cartesian(center, radius, end_angle);
    let large_arc = if end_angle - start_angle <= 180.0 { 0 } else { 1 };
    let r = fmt_num(radius);

    format!(
        "M {} {} L {} {} A {r} {r} 0 {large_arc} 1 {} {} Z",
        fmt_num(center.x),
        fmt_num(center.y),
        fmt_num(start.x),
        fmt_num(start.y),
        fmt_num(end.x),
        fmt_num(end.y),
    )
}

/// Splits the object-parts pie into `denominator` equal wedges.
///
/// Empty for 0 or more than [`MAX_SLICES`]. A denominator of 1 yields a
/// single wedge whose start and end points coincide, which SVG draws as
/// nothing.
pub fn pie_slices(denominator: u32) -> Vec<PieSlice> {
    if denominator == 0 || denominator > MAX_SLICES {
        return Vec::new();
    }
    let step = 360.0 / denominator as f64;
    (0..denominator)
        .map(|index| {
            let start_angle = index as f64 * step;
            let end_angle = (index + 1) as f64 * step;
            PieSlice {
                index,
                start_angle,
                end_angle,
                large_arc: end_angle - start_angle > 180.0,
                path: describe_pie_slice(PARTS_CENTER, PARTS_RADIUS, start_angle, end_angle),
            }
        })
        .collect()
}

/// Rim points of the lines separating the object-parts wedges.
pub fn division_spokes(denominator: u32) -> Vec<Point> {
    if denominator == 0 || denominator > MAX_SLICES {
        return Vec::new();
    }
    let step = 360.0 / denominator as f64;
    (0..denominator)
        .map(|i| polar_to_cartesian(PARTS_CENTER, PARTS_RADIUS, i as f64 * step))
        .collect()
}

/// Builds an SVG `<line>` element.
pub fn line(from: Point, to: Point, stroke: &str, width: u32) -> Element {
    Element::new("line")
        .with_attr("x1", fmt_num(from.x))
        .with_attr("y1", fmt_num(from.y))
        .with_attr("x2", fmt_num(to.x))
        .with_attr("y2", fmt_num(to.y))
        .with_attr("stroke", stroke)
        .with_attr("stroke-width", width.to_string())
}

// ============================================================================
// Split overlay
// ============================================================================

/// Lines drawn over an object photograph to show how it is cut.
///
/// The overlay is stretched over the image (`preserveAspectRatio="none"`,
/// 100x100 units). Only halves, thirds and quarters have a layout; other
/// denominators get no overlay.
pub fn split_overlay(denominator: u32, theme: Theme) -> Option<String> {
    let center = Point::new(50.0, 50.0);
    let segments: Vec<(Point, Point)> = match denominator {
        2 => vec![(Point::new(50.0, 0.0), Point::new(50.0, 100.0))],
        3 => [0.0, 120.0, 240.0]
            .into_iter()
            .map(|angle| (center, polar_to_cartesian(center, 50.0, angle)))
            .collect(),
        4 => vec![
            (Point::new(50.0, 0.0), Point::new(50.0, 100.0)),
            (Point::new(0.0, 50.0), Point::new(100.0, 50.0)),
        ],
        _ => return None,
    };

    let stroke = theme.split_stroke();
    let svg = segments.into_iter().fold(
        Element::new("svg")
            .with_attr("xmlns", "http://www.w3.org/2000/svg")
            .with_attr("class", "split-overlay")
            .with_attr("viewBox", "0 0 100 100")
            .with_attr("preserveAspectRatio", "none"),
        |svg, (from, to)| svg.with_child(line(from, to, stroke, SPLIT_STROKE_WIDTH)),
    );
    Some(svg.to_markup())
}
