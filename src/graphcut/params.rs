use crate::weights::WeightParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Everything one graph-cut run needs to know.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphcutParams {
    /// Raster width the sketch is rendered at.
    pub image_width: u32,
    /// Raster height the sketch is rendered at.
    pub image_height: u32,
    /// Upper bound on labels handed to the solver.
    pub max_num_labels: usize,
    pub weights: WeightParams,
    /// Where weight files, label files and label maps are written.
    pub test_dir: PathBuf,
    /// Input directory, also recorded in the weight file header.
    pub data_dir: PathBuf,
    /// Fit one cubic per label group and export `<stem>_rec.svg`.
    pub fit_curves: bool,
    /// Label groups smaller than this are not fitted.
    pub min_group_pixels: usize,
}

impl Default for GraphcutParams {
    fn default() -> Self {
        Self {
            image_width: 96,
            image_height: 72,
            max_num_labels: 20,
            weights: WeightParams::default(),
            test_dir: PathBuf::from("test/test"),
            data_dir: PathBuf::from("data/svg"),
            fit_curves: false,
            min_group_pixels: 5,
        }
    }
}

impl GraphcutParams {
    pub fn with_weights(mut self, weights: WeightParams) -> Self {
        self.weights = weights;
        self
    }
}
