use crate::diagnostics::TimingBreakdown;
use crate::svg::CubicBezier;
use crate::weights::WeightParams;
use log::info;
use serde::Serialize;
use std::path::PathBuf;

/// Fitted curve for one label group.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurveSummary {
    pub label: i32,
    pub pixels: usize,
    pub rmse: f32,
    pub curve: CubicBezier,
}

/// Outcome of processing one sketch.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphcutReport {
    pub file_stem: String,
    pub weights: WeightParams,
    pub num_line_pixels: usize,
    pub num_pairs: usize,
    pub num_labels: usize,
    pub energy_before: f64,
    pub energy_after: f64,
    pub solver_ms: f64,
    pub weight_file: PathBuf,
    pub label_map: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curves: Option<Vec<CurveSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_file: Option<PathBuf>,
    pub timing: TimingBreakdown,
}

impl GraphcutReport {
    pub fn log_summary(&self) {
        info!(
            "{}: the number of labels {}",
            self.file_stem, self.num_labels
        );
        info!(
            "{}: energy before optimization {:.4}",
            self.file_stem, self.energy_before
        );
        info!(
            "{}: energy after optimization {:.4}",
            self.file_stem, self.energy_after
        );
        if let Some(curves) = &self.curves {
            info!("{}: {} curves fitted", self.file_stem, curves.len());
        }
    }
}
