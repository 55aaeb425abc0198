//! JSON configs for the command-line tools.
pub mod batch;
pub mod graphcut;

use crate::error::{Result, SketchError};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path).map_err(|e| {
        SketchError::Config(format!("Failed to read config {}: {e}", path.display()))
    })?;
    serde_json::from_str(&data).map_err(|e| {
        SketchError::Config(format!("Failed to parse config {}: {e}", path.display()))
    })
}
