//! Reduce a stroke template to a single stroke.
//!
//! Both functions operate on the template text (placeholders may still be
//! present) and remove whole elements, so the remaining markup is left
//! byte-for-byte as it was.
use crate::error::{Result, SketchError};
use roxmltree::{Document, ParsingOptions};

const PATH_MARKER: &str = "path id";

/// Number of `<path id=…/>` strokes.
pub fn count_paths(svg: &str) -> usize {
    svg.matches(PATH_MARKER).count()
}

/// Remove every `<path id=…/>` element except the `keep`-th one in
/// document order.
///
/// An element spans from just after the preceding `>` to the end of the
/// next `/>`.
pub fn keep_only_path(svg: &str, keep: usize) -> Result<String> {
    let starts: Vec<usize> = svg.match_indices(PATH_MARKER).map(|(i, _)| i).collect();
    if keep >= starts.len() {
        return Err(SketchError::InvalidInput(format!(
            "path {keep} out of range ({} paths)",
            starts.len()
        )));
    }
    let mut out = svg.to_string();
    // back to front so earlier offsets stay valid
    for (k, &pos) in starts.iter().enumerate().rev() {
        if k == keep {
            continue;
        }
        let begin = out[..pos].rfind('>').map_or(0, |i| i + 1);
        let end = out[pos..]
            .find("/>")
            .map(|i| pos + i + 2)
            .ok_or_else(|| SketchError::Svg(format!("unterminated path element at byte {pos}")))?;
        out.replace_range(begin..end, "");
    }
    Ok(out)
}

/// Number of child elements of the first group.
pub fn count_strokes(svg: &str) -> Result<usize> {
    let doc = parse(svg)?;
    Ok(stroke_ranges(&doc)?.len())
}

/// Remove every child element of the first group except the `keep`-th.
pub fn keep_only_stroke(svg: &str, keep: usize) -> Result<String> {
    let doc = parse(svg)?;
    let ranges = stroke_ranges(&doc)?;
    if keep >= ranges.len() {
        return Err(SketchError::InvalidInput(format!(
            "stroke {keep} out of range ({} strokes)",
            ranges.len()
        )));
    }
    let mut out = svg.to_string();
    for (k, range) in ranges.into_iter().enumerate().rev() {
        if k != keep {
            out.replace_range(range, "");
        }
    }
    Ok(out)
}

fn parse(svg: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(svg, options).map_err(|e| SketchError::Svg(e.to_string()))
}

fn stroke_ranges(doc: &Document<'_>) -> Result<Vec<std::ops::Range<usize>>> {
    let group = doc
        .root_element()
        .children()
        .find(|n| n.is_element())
        .ok_or_else(|| SketchError::Svg("template has no stroke group".to_string()))?;
    Ok(group
        .children()
        .filter(|n| n.is_element())
        .map(|n| n.range())
        .collect())
}
