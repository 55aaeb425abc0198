//! Grid search over the two weight bandwidths.
//!
//! Every file is processed once per `(neighbor_sigma, prediction_sigma)`
//! combination; the combination producing the fewest labels is reported
//! (first one wins on ties).
use super::runner::GraphcutRunner;
use crate::affinity::AffinityPredictor;
use crate::error::Result;
use crate::files::file_stem;
use crate::gco::LabelSolver;
use crate::weights::WeightParams;
use log::info;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f32, end: f32, n: usize) -> Vec<f32> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f32;
            (0..n).map(|k| start + step * k as f32).collect()
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepGrid {
    pub neighbor_sigmas: Vec<f32>,
    pub prediction_sigmas: Vec<f32>,
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            neighbor_sigmas: linspace(0.2, 0.9, 8),
            prediction_sigmas: linspace(0.1, 1.0, 10),
        }
    }
}

impl SweepGrid {
    pub fn combinations(&self) -> impl Iterator<Item = WeightParams> + '_ {
        self.neighbor_sigmas.iter().flat_map(move |&n| {
            self.prediction_sigmas.iter().map(move |&p| WeightParams {
                neighbor_sigma: n,
                prediction_sigma: p,
            })
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepEntry {
    pub neighbor_sigma: f32,
    pub prediction_sigma: f32,
    pub num_labels: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSweep {
    pub file: PathBuf,
    pub entries: Vec<SweepEntry>,
    pub best: Option<SweepEntry>,
}

impl FileSweep {
    fn new(file: PathBuf) -> Self {
        Self {
            file,
            entries: Vec::new(),
            best: None,
        }
    }

    fn record(&mut self, entry: SweepEntry) {
        if self.best.map_or(true, |b| entry.num_labels < b.num_labels) {
            self.best = Some(entry);
        }
        self.entries.push(entry);
    }
}

/// Run the grid for each file. The runner's own weight parameters are
/// restored afterwards, also when a run fails.
pub fn run_sweep<P, S>(
    runner: &mut GraphcutRunner<P, S>,
    files: &[PathBuf],
    grid: &SweepGrid,
) -> Result<Vec<FileSweep>>
where
    P: AffinityPredictor,
    S: LabelSolver,
{
    let saved = runner.params().weights;
    let result = sweep_files(runner, files, grid);
    runner.set_weight_params(saved);
    result
}

fn sweep_files<P, S>(
    runner: &mut GraphcutRunner<P, S>,
    files: &[PathBuf],
    grid: &SweepGrid,
) -> Result<Vec<FileSweep>>
where
    P: AffinityPredictor,
    S: LabelSolver,
{
    let mut out = Vec::with_capacity(files.len());
    for file in files {
        let mut sweep = FileSweep::new(file.clone());
        for weights in grid.combinations() {
            runner.set_weight_params(weights);
            let report = runner.process_file(file)?;
            info!(
                "{}: n_sig {:.4} p_sig {:.4} -> {} labels ({:.3} sec)",
                file_stem(file),
                weights.neighbor_sigma,
                weights.prediction_sigma,
                report.num_labels,
                report.timing.total_ms / 1000.0
            );
            sweep.record(SweepEntry {
                neighbor_sigma: weights.neighbor_sigma,
                prediction_sigma: weights.prediction_sigma,
                num_labels: report.num_labels,
            });
        }
        if let Some(best) = sweep.best {
            info!(
                "{}: min {} labels at [{:.4}, {:.4}]",
                file_stem(file),
                best.num_labels,
                best.neighbor_sigma,
                best.prediction_sigma
            );
        }
        out.push(sweep);
    }
    Ok(out)
}
