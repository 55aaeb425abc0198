use crate::batch::BatchParams;
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Deserialize)]
pub struct BatchToolConfig {
    #[serde(default)]
    pub params: BatchParams,
    /// PNG previews and `summary.json` are written here.
    pub output_dir: PathBuf,
    #[serde(default = "default_num_batches")]
    pub num_batches: usize,
}

fn default_num_batches() -> usize {
    1
}

pub fn load_config(path: &Path) -> Result<BatchToolConfig> {
    super::read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::DatasetVariant;

    #[test]
    fn params_fall_back_to_defaults() {
        let json = r#"{ "output_dir": "preview", "params": { "variant": "stroke_groups", "seed": 5 } }"#;
        let cfg: BatchToolConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.num_batches, 1);
        assert_eq!(cfg.params.variant, DatasetVariant::StrokeGroups);
        assert_eq!(cfg.params.seed, Some(5));
        assert_eq!(cfg.params.batch_size, 8);
        assert_eq!(cfg.params.image_width, 128);
        assert_eq!(cfg.params.max_attempts, 100);
    }
}
