use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a template's strokes are laid out, which decides both the jitter
/// frame and how a single stroke is isolated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetVariant {
    /// Strokes are the child elements of the first group, drawn in a
    /// y-up frame (flipped and shifted by 900 units).
    StrokeGroups,
    /// Strokes are self-closing `<path id=…/>` elements in a y-down frame.
    PathIds,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchParams {
    pub batch_size: usize,
    pub image_width: u32,
    pub image_height: u32,
    /// Sketch attenuation for single-channel input (query stays at 1.0).
    pub intensity_ratio: f32,
    /// Sketch and query point as separate channels.
    pub use_two_channels: bool,
    /// Worker threads; clamped to `batch_size`, 1 disables the pool.
    pub num_workers: usize,
    pub variant: DatasetVariant,
    /// Apply random jitter; otherwise only the variant's base frame.
    pub transform: bool,
    /// Upper bound on resampling for one example.
    pub max_attempts: usize,
    /// Seed for reproducible batches; entropy when absent.
    pub seed: Option<u64>,
    pub data_dir: PathBuf,
    /// Template list relative to `data_dir`; when absent every `*.svg_pre`
    /// under `data_dir` is used.
    pub file_list: Option<PathBuf>,
}

impl Default for BatchParams {
    fn default() -> Self {
        Self {
            batch_size: 8,
            image_width: 128,
            image_height: 128,
            intensity_ratio: 10.0,
            use_two_channels: true,
            num_workers: 8,
            variant: DatasetVariant::PathIds,
            transform: true,
            max_attempts: 100,
            seed: None,
            data_dir: PathBuf::from("data/chinese2"),
            file_list: Some(PathBuf::from("train.txt")),
        }
    }
}

impl BatchParams {
    pub fn input_channels(&self) -> usize {
        if self.use_two_channels {
            2
        } else {
            1
        }
    }

    pub fn effective_workers(&self) -> usize {
        self.num_workers.min(self.batch_size).max(1)
    }
}
