//! Categorical coloring for label maps.

/// Maps a normalized position in `[0, 1]` to an RGB triple in `[0, 1]`.
pub trait Colormap {
    fn color(&self, t: f32) -> [f32; 3];

    fn color_u8(&self, t: f32) -> [u8; 3] {
        let [r, g, b] = self.color(t);
        [to_u8(r), to_u8(g), to_u8(b)]
    }
}

#[inline]
fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

type Anchors = &'static [(f32, f32)];

// (position, value) anchors of the classic "jet" map.
const JET_RED: Anchors = &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)];
const JET_GREEN: Anchors = &[
    (0.0, 0.0),
    (0.125, 0.0),
    (0.375, 1.0),
    (0.64, 1.0),
    (0.91, 0.0),
    (1.0, 0.0),
];
const JET_BLUE: Anchors = &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)];

/// Blue → cyan → yellow → red.
#[derive(Clone, Copy, Debug, Default)]
pub struct Jet;

impl Colormap for Jet {
    fn color(&self, t: f32) -> [f32; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        [
            interpolate(JET_RED, t),
            interpolate(JET_GREEN, t),
            interpolate(JET_BLUE, t),
        ]
    }
}

fn interpolate(anchors: Anchors, t: f32) -> f32 {
    for pair in anchors.windows(2) {
        let (x0, y0) = pair[0];
        let (x1, y1) = pair[1];
        if t <= x1 {
            let span = (x1 - x0).max(f32::EPSILON);
            return y0 + (y1 - y0) * ((t - x0) / span);
        }
    }
    anchors.last().map_or(0.0, |&(_, y)| y)
}
