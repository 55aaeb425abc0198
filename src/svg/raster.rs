use crate::error::{Result, SketchError};
use crate::image::ImageF32;
use log::warn;
use resvg::{tiny_skia, usvg};

/// Normalized alpha above this counts as ink.
pub const BINARIZE_THRESHOLD: f32 = 1e-4;

/// Renders SVG markup and keeps only the alpha channel.
///
/// If the markup does not parse and `retry_with_closing_tag` is set, one
/// more attempt is made with `</svg>` appended (sketch files are sometimes
/// truncated). A second failure is returned to the caller.
#[derive(Clone, Copy, Debug)]
pub struct Rasterizer {
    pub retry_with_closing_tag: bool,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self {
            retry_with_closing_tag: true,
        }
    }
}

impl Rasterizer {
    /// Alpha coverage in `[0, 255]`, sized by the document's own
    /// `width`/`height`.
    pub fn render_alpha(&self, svg: &str) -> Result<ImageF32> {
        let tree = match parse(svg) {
            Ok(tree) => tree,
            Err(err) if self.retry_with_closing_tag => {
                warn!("SVG parse failed ({err}), retrying with closing tag");
                parse(&format!("{svg}</svg>"))?
            }
            Err(err) => return Err(err),
        };

        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height()).ok_or_else(|| {
            SketchError::Svg(format!(
                "cannot allocate {}x{} canvas",
                size.width(),
                size.height()
            ))
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        let alpha = pixmap
            .data()
            .chunks_exact(4)
            .map(|px| f32::from(px[3]))
            .collect();
        ImageF32::from_vec(size.width() as usize, size.height() as usize, alpha)
            .ok_or_else(|| SketchError::Svg("pixmap size disagrees with canvas".to_string()))
    }

    /// Rendered sketch as a binary line image (see [`binarize`]).
    pub fn render_binary(&self, svg: &str) -> Result<ImageF32> {
        self.render_alpha(svg).map(|alpha| binarize(&alpha))
    }
}

/// Scale alpha to `[0, 1]` and snap everything above
/// [`BINARIZE_THRESHOLD`] to 1.0.
pub fn binarize(alpha: &ImageF32) -> ImageF32 {
    let mut out = alpha.clone();
    for v in &mut out.data {
        let a = *v / 255.0;
        *v = if a > BINARIZE_THRESHOLD { 1.0 } else { a };
    }
    out
}

fn parse(svg: &str) -> Result<usvg::Tree> {
    let options = usvg::Options::default();
    usvg::Tree::from_str(svg, &options).map_err(|e| SketchError::Svg(e.to_string()))
}
