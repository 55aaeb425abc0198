//! SVG handling: sketch preprocessing, rasterization, curve fitting and
//! export of fitted curves.
pub mod export;
pub mod fit;
mod raster;
mod sketch;

pub use export::curves_to_svg;
pub use fit::{fit_cubic_bezier, CubicBezier};
pub use raster::{binarize, Rasterizer, BINARIZE_THRESHOLD};
pub use sketch::{prepare_sketch, SKETCH_VIEWBOX};
