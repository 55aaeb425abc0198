/// A raw sketch in the 640×480 drawing frame with one black polyline per
/// entry of `strokes`, plus a white eraser stroke that preprocessing drops.
pub fn sketch_svg(strokes: &[&[(f32, f32)]]) -> String {
    let mut svg = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n\
         <svg width=\"640\" height=\"480\" xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">\n\
         <defs />\n\
         <g fill=\"none\" stroke=\"rgb(0,0,0)\" stroke-linecap=\"round\" stroke-width=\"8\">\n",
    );
    for stroke in strokes {
        let mut d = String::new();
        for (k, (x, y)) in stroke.iter().enumerate() {
            d.push_str(if k == 0 { "M " } else { " L " });
            d.push_str(&format!("{x} {y}"));
        }
        svg.push_str(&format!("<path d=\"{d}\" />\n"));
    }
    svg.push_str("<path d=\"M 0 240 L 640 240\" stroke=\"#fff\" stroke-width=\"40\" />\n");
    svg.push_str("</g>\n</svg>\n");
    svg
}

/// Template with `n` horizontal strokes tagged `path id`, in a 64×64
/// frame rotated about its center.
pub fn path_template(n: usize) -> String {
    let mut svg = String::from(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 64 64\">\
         <g fill=\"none\" stroke=\"black\" stroke-width=\"3\" \
         transform=\"translate({tx},{ty}) rotate({r},32,32) translate(32,32) scale({sx},{sy}) translate(-32,-32)\">",
    );
    for k in 0..n {
        let y = 12 + k * 40 / n.max(1);
        svg.push_str(&format!("<path id=\"{k}\" d=\"M 12 {y} L 52 {y}\"/>"));
    }
    svg.push_str("</g></svg>");
    svg
}

/// Template in the flipped frame: strokes are children of the first
/// group and `y` grows upwards from 900.
pub fn stroke_group_template() -> String {
    "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 1024 1024\">\n\
     <g fill=\"none\" stroke=\"black\" stroke-width=\"40\" transform=\"scale({sx},{sy}) translate({tx},{ty})\">\n\
     <path d=\"M 200 300 L 800 300\"/>\n\
     <path d=\"M 500 150 L 500 850\"/>\n\
     <path d=\"M 200 700 L 800 700\"/>\n\
     </g>\n</svg>\n"
        .to_string()
}
