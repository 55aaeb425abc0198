//! Synthesis of one training example from a template.
use super::isolate::{count_paths, count_strokes, keep_only_path, keep_only_stroke};
use super::jitter::{sample_jitter, Jitter};
use super::params::{BatchParams, DatasetVariant};
use super::template::SvgTemplate;
use crate::error::{Result, SketchError};
use crate::image::ImageF32;
use crate::svg::Rasterizer;
use log::trace;
use rand::Rng;

/// Sketch, network input and target for one query point.
#[derive(Clone, Debug)]
pub struct TrainingExample {
    /// Full jittered sketch normalized to max 1.
    pub sketch: ImageF32,
    /// One image per input channel.
    pub input: Vec<ImageF32>,
    /// Isolated stroke, divided by the sketch maximum.
    pub target: ImageF32,
    /// `(row, col)` of the query pixel, always inside the target.
    pub query: (usize, usize),
    pub jitter: Jitter,
    pub attempts: usize,
}

/// Draw jitter, stroke and query until a non-empty sample comes out.
///
/// Blank renders (whole sketch or isolated stroke) are resampled, up to
/// `params.max_attempts` times. Render and parse failures are returned
/// straight away.
pub fn synthesize(
    template: &SvgTemplate,
    params: &BatchParams,
    rasterizer: &Rasterizer,
    rng: &mut impl Rng,
) -> Result<TrainingExample> {
    let (w, h) = (params.image_width, params.image_height);
    for attempt in 1..=params.max_attempts {
        let jitter = sample_jitter(params.variant, params.transform, rng);
        let svg = template.substitute(w, h, &jitter);

        let mut sketch = render(rasterizer, &svg, w, h)?;
        let max_intensity = sketch.max_value();
        if max_intensity <= 0.0 {
            trace!("attempt {attempt}: blank sketch");
            continue;
        }
        sketch.scale(1.0 / max_intensity);

        let Some(stroke) = isolate_random(params.variant, &svg, rng)? else {
            trace!("attempt {attempt}: template has no strokes");
            continue;
        };
        let mut target = render(rasterizer, &stroke, w, h)?;
        target.scale(1.0 / max_intensity);

        let ink = target.nonzero(0.0);
        if ink.is_empty() {
            trace!("attempt {attempt}: isolated stroke left the canvas");
            continue;
        }
        let (qx, qy) = ink[rng.gen_range(0..ink.len())];

        let input = if params.use_two_channels {
            let mut query = ImageF32::new(sketch.w, sketch.h);
            query.set(qx, qy, 1.0);
            vec![sketch.clone(), query]
        } else {
            let mut x = sketch.clone();
            x.scale(1.0 / params.intensity_ratio);
            x.set(qx, qy, 1.0);
            vec![x]
        };

        return Ok(TrainingExample {
            sketch,
            input,
            target,
            query: (qy, qx),
            jitter,
            attempts: attempt,
        });
    }
    Err(SketchError::RetriesExhausted {
        attempts: params.max_attempts,
    })
}

fn render(rasterizer: &Rasterizer, svg: &str, w: u32, h: u32) -> Result<ImageF32> {
    let img = rasterizer.render_alpha(svg)?;
    if (img.w, img.h) != (w as usize, h as usize) {
        return Err(SketchError::shape(
            "rendered template",
            &[h as usize, w as usize],
            &[img.h, img.w],
        ));
    }
    Ok(img)
}

/// `None` when the template holds no strokes of the variant's kind.
fn isolate_random(
    variant: DatasetVariant,
    svg: &str,
    rng: &mut impl Rng,
) -> Result<Option<String>> {
    match variant {
        DatasetVariant::PathIds => {
            let n = count_paths(svg);
            if n == 0 {
                return Ok(None);
            }
            keep_only_path(svg, rng.gen_range(0..n)).map(Some)
        }
        DatasetVariant::StrokeGroups => {
            let n = count_strokes(svg)?;
            if n == 0 {
                return Ok(None);
            }
            keep_only_stroke(svg, rng.gen_range(0..n)).map(Some)
        }
    }
}
