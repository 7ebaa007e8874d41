//! Text-based fill replacement.

use crate::model::ColorSpec;

/// Replaces the value of every `fill="..."` attribute with `color`.
///
/// This is a plain text substitution: no parsing takes place, so malformed
/// markup is recolored as far as the pattern matches. Every value is replaced,
/// `none` included.
pub fn recolor_fills(svg: &str, color: &ColorSpec) -> String {
    replace_attr_values(svg, "fill", color.as_str())
}

fn replace_attr_values(svg: &str, attr: &str, new_value: &str) -> String {
    let mut result = String::with_capacity(svg.len());
    let pattern = format!("{attr}=\"");
    let mut remaining = svg;

    while let Some(start) = remaining.find(&pattern) {
        // Only whole attribute names, not e.g. `data-fill="`
        let boundary = remaining[..start]
            .chars()
            .next_back()
            .is_none_or(|c| c.is_whitespace());

        result.push_str(&remaining[..start + pattern.len()]);
        remaining = &remaining[start + pattern.len()..];

        let Some(end) = remaining.find('"') else {
            break;
        };
        if boundary {
            result.push_str(new_value);
        } else {
            result.push_str(&remaining[..end]);
        }
        remaining = &remaining[end..];
    }

    result.push_str(remaining);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn green() -> ColorSpec {
        ColorSpec::parse("#5FAC4B").unwrap()
    }

    #[test]
    fn replaces_every_fill() {
        let svg = r##"<svg><path fill="#000000"/><circle fill="none" stroke="#000"/></svg>"##;
        let out = recolor_fills(svg, &green());
        assert_eq!(
            out,
            r##"<svg><path fill="#5FAC4B"/><circle fill="#5FAC4B" stroke="#000"/></svg>"##
        );
    }

    #[test]
    fn ignores_attributes_ending_in_fill() {
        let svg = r##"<rect data-fill="#111" fill-opacity="0.5" fill="#222"/>"##;
        let out = recolor_fills(svg, &green());
        assert_eq!(
            out,
            r##"<rect data-fill="#111" fill-opacity="0.5" fill="#5FAC4B"/>"##
        );
    }

    #[test]
    fn unterminated_value_is_left_as_is() {
        let svg = r#"<rect fill="red"#;
        assert_eq!(recolor_fills(svg, &green()), svg);
    }

    #[test]
    fn markup_without_fills_is_unchanged() {
        let svg = r#"<svg><path stroke="red"/></svg>"#;
        assert_eq!(recolor_fills(svg, &green()), svg);
    }
}
