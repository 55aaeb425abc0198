use super::example::synthesize;
use super::params::BatchParams;
use super::template::SvgTemplate;
use crate::error::{Result, SketchError};
use crate::files::collect_files;
use crate::image::ImageF32;
use crate::svg::Rasterizer;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One batch in NHWC layout (`[B, H, W, C]`, row-major).
#[derive(Clone, Debug)]
pub struct Batch {
    pub batch_size: usize,
    pub height: usize,
    pub width: usize,
    pub input_channels: usize,
    /// `[B, H, W]` full sketches.
    pub sketch: Vec<f32>,
    /// `[B, H, W, C]` network input.
    pub input: Vec<f32>,
    /// `[B, H, W]` isolated strokes.
    pub target: Vec<f32>,
    /// `(row, col)` query pixel per example.
    pub queries: Vec<(usize, usize)>,
    /// Template index per example.
    pub template_ids: Vec<usize>,
}

impl Batch {
    fn zeros(params: &BatchParams) -> Self {
        let (b, h, w) = (
            params.batch_size,
            params.image_height as usize,
            params.image_width as usize,
        );
        let c = params.input_channels();
        Self {
            batch_size: b,
            height: h,
            width: w,
            input_channels: c,
            sketch: vec![0.0; b * h * w],
            input: vec![0.0; b * h * w * c],
            target: vec![0.0; b * h * w],
            queries: vec![(0, 0); b],
            template_ids: vec![0; b],
        }
    }

    fn plane_len(&self) -> usize {
        self.height * self.width
    }

    fn plane(&self, data: &[f32], b: usize) -> ImageF32 {
        let n = self.plane_len();
        ImageF32 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data: data[b * n..(b + 1) * n].to_vec(),
        }
    }

    pub fn sketch_image(&self, b: usize) -> ImageF32 {
        self.plane(&self.sketch, b)
    }

    pub fn target_image(&self, b: usize) -> ImageF32 {
        self.plane(&self.target, b)
    }

    /// Channel `c` of example `b`'s input.
    pub fn input_image(&self, b: usize, c: usize) -> ImageF32 {
        let n = self.plane_len();
        let ch = self.input_channels;
        let data = self.input[b * n * ch..(b + 1) * n * ch]
            .iter()
            .skip(c)
            .step_by(ch)
            .copied()
            .collect();
        ImageF32 {
            w: self.width,
            h: self.height,
            stride: self.width,
            data,
        }
    }
}

/// Read-only inputs shared by all workers of one batch.
struct BatchJob<'a> {
    params: &'a BatchParams,
    rasterizer: &'a Rasterizer,
    templates: &'a [SvgTemplate],
    assigned: &'a [usize],
    seeds: &'a [u64],
}

impl BatchJob<'_> {
    /// Synthesize example `b` into its own slices of the batch buffers.
    fn fill(
        &self,
        b: usize,
        sketch: &mut [f32],
        input: &mut [f32],
        target: &mut [f32],
    ) -> Result<(usize, usize)> {
        let mut rng = StdRng::seed_from_u64(self.seeds[b]);
        let template = &self.templates[self.assigned[b]];
        let ex = synthesize(template, self.params, self.rasterizer, &mut rng)?;
        sketch.copy_from_slice(&ex.sketch.data);
        target.copy_from_slice(&ex.target.data);
        let ch = ex.input.len();
        for (c, plane) in ex.input.iter().enumerate() {
            for (p, &v) in plane.data.iter().enumerate() {
                input[p * ch + c] = v;
            }
        }
        Ok(ex.query)
    }
}

/// Cycles through the template set and produces batches.
///
/// Templates are visited in a round-robin order that is reshuffled every
/// time the cursor wraps, which also advances the epoch counter. Examples
/// inside a batch are generated on a dedicated worker pool, each writing a
/// disjoint region of the batch buffers; the pool lives as long as the
/// manager.
#[derive(Debug)]
pub struct BatchManager {
    params: BatchParams,
    paths: Vec<PathBuf>,
    templates: Vec<SvgTemplate>,
    order: Vec<usize>,
    cursor: usize,
    epoch: usize,
    rng: StdRng,
    rasterizer: Rasterizer,
    batch: Batch,
    #[cfg(feature = "parallel")]
    pool: Option<rayon::ThreadPool>,
}

impl BatchManager {
    /// Load templates from `params.data_dir` and start the worker pool.
    pub fn new(params: BatchParams) -> Result<Self> {
        let paths = template_paths(&params)?;
        let templates = paths
            .iter()
            .map(|p| fs::read_to_string(p).map(SvgTemplate::new))
            .collect::<std::io::Result<Vec<_>>>()?;
        info!(
            "loaded {} templates from {}",
            templates.len(),
            params.data_dir.display()
        );
        Self::from_parts(params, paths, templates)
    }

    /// Manager over in-memory templates.
    pub fn from_templates(params: BatchParams, templates: Vec<SvgTemplate>) -> Result<Self> {
        let paths = (0..templates.len())
            .map(|i| PathBuf::from(format!("template_{i}")))
            .collect();
        Self::from_parts(params, paths, templates)
    }

    fn from_parts(
        params: BatchParams,
        paths: Vec<PathBuf>,
        templates: Vec<SvgTemplate>,
    ) -> Result<Self> {
        if templates.is_empty() {
            return Err(SketchError::InvalidInput(format!(
                "no templates found under {}",
                params.data_dir.display()
            )));
        }
        if params.batch_size == 0 || params.image_width == 0 || params.image_height == 0 {
            return Err(SketchError::InvalidInput(format!(
                "batch dimensions must be positive, got {}x{}x{}",
                params.batch_size, params.image_height, params.image_width
            )));
        }
        if params.max_attempts == 0 {
            return Err(SketchError::InvalidInput(
                "max_attempts must be positive".to_string(),
            ));
        }

        #[cfg(feature = "parallel")]
        let pool = match params.effective_workers() {
            1 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SketchError::InvalidInput(format!("worker pool: {e}")))?,
            ),
        };
        if cfg!(not(feature = "parallel")) && params.effective_workers() > 1 {
            debug!("built without `parallel`; generating batches on the calling thread");
        }

        let rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            batch: Batch::zeros(&params),
            order: (0..templates.len()).collect(),
            cursor: 0,
            epoch: 1,
            rng,
            rasterizer: Rasterizer::default(),
            paths,
            templates,
            params,
            #[cfg(feature = "parallel")]
            pool,
        })
    }

    pub fn params(&self) -> &BatchParams {
        &self.params
    }

    pub fn num_examples_per_epoch(&self) -> usize {
        self.templates.len()
    }

    /// Starts at 1 and increments each time the template cursor wraps.
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    pub fn template_path(&self, id: usize) -> Option<&Path> {
        self.paths.get(id).map(PathBuf::as_path)
    }

    fn next_template(&mut self) -> usize {
        let id = self.order[self.cursor];
        self.cursor += 1;
        if self.cursor == self.order.len() {
            self.cursor = 0;
            self.epoch += 1;
            self.order.shuffle(&mut self.rng);
        }
        id
    }

    /// Generate the next batch; buffers are reused between calls.
    ///
    /// On error the cursor, epoch, template order and RNG are rolled back,
    /// so a retry draws the same templates and seeds. The batch buffers may
    /// be partly overwritten but are only exposed again after a successful
    /// call, which rewrites every example.
    pub fn next_batch(&mut self) -> Result<&Batch> {
        let saved = (self.cursor, self.epoch, self.rng.clone());
        let saved_order = self.order.clone();
        if let Err(err) = self.fill_next() {
            (self.cursor, self.epoch, self.rng) = saved;
            self.order = saved_order;
            return Err(err);
        }
        Ok(&self.batch)
    }

    fn fill_next(&mut self) -> Result<()> {
        let start = Instant::now();
        let b = self.params.batch_size;
        let assigned: Vec<usize> = (0..b).map(|_| self.next_template()).collect();
        let seeds: Vec<u64> = (0..b).map(|_| self.rng.gen()).collect();

        let job = BatchJob {
            params: &self.params,
            rasterizer: &self.rasterizer,
            templates: &self.templates,
            assigned: &assigned,
            seeds: &seeds,
        };
        let hw = self.batch.plane_len();
        let hwc = hw * self.batch.input_channels;
        let Batch {
            sketch,
            input,
            target,
            ..
        } = &mut self.batch;

        #[cfg(feature = "parallel")]
        let queries = match &self.pool {
            Some(pool) => pool.install(|| {
                sketch
                    .par_chunks_mut(hw)
                    .zip(input.par_chunks_mut(hwc))
                    .zip(target.par_chunks_mut(hw))
                    .enumerate()
                    .map(|(i, ((s, x), y))| job.fill(i, s, x, y))
                    .collect::<Result<Vec<_>>>()
            })?,
            None => fill_sequential(&job, sketch, input, target, hw, hwc)?,
        };
        #[cfg(not(feature = "parallel"))]
        let queries = fill_sequential(&job, sketch, input, target, hw, hwc)?;

        self.batch.queries = queries;
        self.batch.template_ids = assigned;
        debug!(
            "batch of {b} in {:.3} sec (epoch {})",
            start.elapsed().as_secs_f64(),
            self.epoch
        );
        Ok(())
    }
}

fn fill_sequential(
    job: &BatchJob<'_>,
    sketch: &mut [f32],
    input: &mut [f32],
    target: &mut [f32],
    hw: usize,
    hwc: usize,
) -> Result<Vec<(usize, usize)>> {
    sketch
        .chunks_mut(hw)
        .zip(input.chunks_mut(hwc))
        .zip(target.chunks_mut(hw))
        .enumerate()
        .map(|(i, ((s, x), y))| job.fill(i, s, x, y))
        .collect()
}

fn template_paths(params: &BatchParams) -> Result<Vec<PathBuf>> {
    match &params.file_list {
        Some(list) => {
            let list_path = params.data_dir.join(list);
            let text = fs::read_to_string(&list_path).map_err(|e| {
                SketchError::Config(format!(
                    "Failed to read file list {}: {e}",
                    list_path.display()
                ))
            })?;
            Ok(text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| params.data_dir.join(l))
                .collect())
        }
        None => collect_files(&params.data_dir, ".svg_pre"),
    }
}
