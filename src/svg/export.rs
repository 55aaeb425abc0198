//! Writes fitted curves back out as an SVG document.
use super::fit::CubicBezier;
use std::fmt::Write;

/// One `<path>` per curve colored by `colors[k]`, plus a boundary
/// rectangle. Curves without a color are drawn black.
pub fn curves_to_svg(curves: &[CubicBezier], width: usize, height: usize, colors: &[[u8; 3]]) -> String {
    let mut svg = format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n\
<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n\
<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\">\n\
<g fill=\"none\" stroke-width=\"1\">"
    );
    for (id, c) in curves.iter().enumerate() {
        let [r, g, b] = colors.get(id).copied().unwrap_or([0, 0, 0]);
        // writing into a String cannot fail
        let _ = write!(
            svg,
            "<path id=\"{id}\" d=\"M {} {} C {} {} {} {} {} {}\" stroke=\"rgb({r},{g},{b})\"/>",
            c.p0[0], c.p0[1], c.p1[0], c.p1[1], c.p2[0], c.p2[1], c.p3[0], c.p3[1]
        );
    }
    let _ = write!(
        svg,
        "<rect width=\"{width}\" height=\"{height}\" stroke=\"rgb(0,0,0)\"/></g></svg>"
    );
    svg
}
