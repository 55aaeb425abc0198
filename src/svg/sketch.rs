use crate::error::{Result, SketchError};

/// Coordinate frame the raw sketches are drawn in.
pub const SKETCH_VIEWBOX: &str = "0 0 640 480";

/// Normalize a raw sketch SVG for rasterization at `width × height`.
///
/// - the `<svg` line gets `width`, `height` and the sketch view box in
///   place of its original size attributes;
/// - lines between the root element and the first `<g` line are dropped;
/// - inside the first group, lines containing `#fff` (thick white
///   eraser strokes) are dropped;
/// - reading stops at EOF or at the next `<g` line, in which case the
///   group is closed but the document is not (see [`super::Rasterizer`]).
pub fn prepare_sketch(raw: &str, width: u32, height: u32) -> Result<String> {
    let mut lines = raw.split_inclusive('\n');
    let mut out = String::with_capacity(raw.len());

    let root = loop {
        match lines.next() {
            Some(line) if line.contains("<svg") => break line,
            Some(line) => out.push_str(line),
            None => return Err(SketchError::Svg("no <svg> element".to_string())),
        }
    };
    out.push_str(&resize_root(root, width, height)?);

    loop {
        match lines.next() {
            Some(line) if line.contains("<g") => {
                out.push_str(line);
                break;
            }
            Some(_) => {}
            None => return Err(SketchError::Svg("no <g> element".to_string())),
        }
    }

    for line in lines {
        if line.contains("<g") {
            out.push_str("</g>\n");
            break;
        }
        if !line.contains("#fff") {
            out.push_str(line);
        }
    }
    Ok(out)
}

fn resize_root(line: &str, width: u32, height: u32) -> Result<String> {
    let start = line
        .find("width")
        .ok_or_else(|| SketchError::Svg("<svg> element has no width".to_string()))?;
    let end = line[start..]
        .find("xmlns")
        .map(|k| start + k)
        .ok_or_else(|| SketchError::Svg("<svg> element has no xmlns after width".to_string()))?;
    Ok(format!(
        "{}width=\"{width}\" height=\"{height}\" viewBox=\"{SKETCH_VIEWBOX}\" {}",
        &line[..start],
        &line[end..]
    ))
}
