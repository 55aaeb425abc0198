use super::params::GraphcutParams;
use super::report::{CurveSummary, GraphcutReport};
use crate::affinity::AffinityPredictor;
use crate::diagnostics::{elapsed_ms, TimingBreakdown};
use crate::error::Result;
use crate::files::file_stem;
use crate::gco::{read_label_file, write_weight_file, LabelSolver, WeightFileHeader};
use crate::image::io::{ensure_parent_dir, save_rgb};
use crate::image::ImageF32;
use crate::labelmap::{
    label_map_file_name, label_positions, render_label_map, unique_labels, Colormap, Jet,
};
use crate::pixels::LinePixels;
use crate::svg::fit::fit_rmse;
use crate::svg::{curves_to_svg, fit_cubic_bezier, prepare_sketch, CubicBezier, Rasterizer};
use crate::weights::{compute_pair_weights, WeightParams};
use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Owns the run configuration plus the two external collaborators.
pub struct GraphcutRunner<P, S> {
    params: GraphcutParams,
    predictor: P,
    solver: S,
    rasterizer: Rasterizer,
    cmap: Jet,
}

impl<P: AffinityPredictor, S: LabelSolver> GraphcutRunner<P, S> {
    pub fn new(params: GraphcutParams, predictor: P, solver: S) -> Self {
        Self {
            params,
            predictor,
            solver,
            rasterizer: Rasterizer::default(),
            cmap: Jet,
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Rasterizer) -> Self {
        self.rasterizer = rasterizer;
        self
    }

    pub fn params(&self) -> &GraphcutParams {
        &self.params
    }

    pub fn set_weight_params(&mut self, weights: WeightParams) {
        self.params.weights = weights;
    }

    /// Rasterize a sketch file the way [`Self::process_file`] does.
    pub fn load_sketch(&self, path: &Path) -> Result<ImageF32> {
        let raw = fs::read_to_string(path)?;
        let svg = prepare_sketch(&raw, self.params.image_width, self.params.image_height)?;
        self.rasterizer.render_binary(&svg)
    }

    pub fn process_file(&self, path: &Path) -> Result<GraphcutReport> {
        let t0 = Instant::now();
        let stem = file_stem(path);
        let p = &self.params;
        let mut timing = TimingBreakdown::default();
        info!("{stem}: start graphcut opt.");

        let image = timing.stage("rasterize", || self.load_sketch(path))?;
        let pixels = LinePixels::from_image(&image, 0.0);
        debug!(
            "{stem}: {}x{} raster, {} line pixels",
            image.w,
            image.h,
            pixels.len()
        );

        let maps = timing.stage("predict", || self.predictor.predict(&stem, &image, &pixels))?;
        info!("{stem}: affinity maps ready");

        let records = timing.stage("weights", || {
            compute_pair_weights(&pixels, &maps, (image.w, image.h), &p.weights)
        })?;
        drop(maps);

        // the solver runs in its own directory and reads line 1 back, so
        // the weight file is named by its absolute path
        fs::create_dir_all(&p.test_dir)?;
        let weight_file = p.test_dir.canonicalize()?.join(format!("{stem}.pred"));
        let header = WeightFileHeader {
            output_path: weight_file.clone(),
            data_dir: p.data_dir.clone(),
            max_num_labels: p.max_num_labels,
            neighbor_sigma: p.weights.neighbor_sigma,
            prediction_sigma: p.weights.prediction_sigma,
            num_pixels: pixels.len(),
        };
        timing.stage("write_weights", || write_weight_file(&weight_file, &header, &records))?;
        info!("{stem}: prediction computed");

        let outcome = self.solver.solve(&weight_file)?;
        timing.push("solve", outcome.elapsed_ms);
        let labeling = read_label_file(&outcome.label_file, pixels.len())?;
        let unique = unique_labels(&labeling.labels);

        let label_map = p.test_dir.join(label_map_file_name(
            &stem,
            p.weights.neighbor_sigma,
            p.weights.prediction_sigma,
        ));
        timing.stage("label_map", || -> Result<()> {
            let img = render_label_map(image.w, image.h, &pixels, &labeling.labels, &self.cmap)?;
            save_rgb(&img, &label_map)
        })?;

        let (curves, vector_file) = if p.fit_curves {
            let start = Instant::now();
            let curves = self.fit_curves(&pixels, &labeling.labels, &unique);
            let out = p.test_dir.join(format!("{stem}_rec.svg"));
            self.export_curves(&curves, image.w, image.h, &out)?;
            timing.push("fit_curves", elapsed_ms(start));
            (Some(curves), Some(out))
        } else {
            (None, None)
        };

        timing.total_ms = elapsed_ms(t0);
        let report = GraphcutReport {
            file_stem: stem,
            weights: p.weights,
            num_line_pixels: pixels.len(),
            num_pairs: records.len(),
            num_labels: unique.len(),
            energy_before: labeling.energy_before,
            energy_after: labeling.energy_after,
            solver_ms: outcome.elapsed_ms,
            weight_file,
            label_map,
            curves,
            vector_file,
            timing,
        };
        report.log_summary();
        Ok(report)
    }

    /// Process `files` in order, stopping at the first failure. The failing
    /// file is logged and its error is returned unchanged.
    pub fn process_files(&self, files: &[PathBuf]) -> Result<Vec<GraphcutReport>> {
        let mut reports = Vec::with_capacity(files.len());
        for file in files {
            match self.process_file(file) {
                Ok(report) => reports.push(report),
                Err(err) => {
                    error!("{}: {err}", file.display());
                    return Err(err);
                }
            }
        }
        Ok(reports)
    }

    /// One cubic per label with at least `min_group_pixels` members.
    fn fit_curves(&self, pixels: &LinePixels, labels: &[i32], unique: &[i32]) -> Vec<CurveSummary> {
        let mut out = Vec::new();
        for &label in unique {
            let points: Vec<[f32; 2]> = pixels
                .iter()
                .zip(labels)
                .filter(|(_, l)| **l == label)
                .map(|((row, col), _)| [col as f32, row as f32])
                .collect();
            if points.len() < self.params.min_group_pixels {
                continue;
            }
            let start = Instant::now();
            let Some(curve) = fit_cubic_bezier(&points) else {
                continue;
            };
            let rmse = fit_rmse(&curve, &points);
            debug!(
                "label {label} - fit line ({:.3} sec), rmse={rmse:.3}",
                start.elapsed().as_secs_f64()
            );
            out.push(CurveSummary {
                label,
                pixels: points.len(),
                rmse,
                curve,
            });
        }
        out
    }

    fn export_curves(&self, curves: &[CurveSummary], w: usize, h: usize, path: &Path) -> Result<()> {
        let beziers: Vec<CubicBezier> = curves.iter().map(|c| c.curve).collect();
        // fresh colors spread over the kept curves only
        let ids: Vec<i32> = (0..beziers.len() as i32).collect();
        let colors: Vec<[u8; 3]> = label_positions(&ids)
            .into_iter()
            .map(|t| self.cmap.color_u8(t))
            .collect();
        let svg = curves_to_svg(&beziers, w, h, &colors);
        ensure_parent_dir(path)?;
        fs::write(path, svg)?;
        Ok(())
    }
}
