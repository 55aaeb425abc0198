use crate::error::{Result, SketchError};
use crate::image::io::ensure_parent_dir;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Solver output: energies around the optimization and one label per
/// line pixel in the original pixel order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Labeling {
    pub energy_before: f64,
    pub energy_after: f64,
    pub labels: Vec<i32>,
}

impl Labeling {
    /// Number of distinct labels actually used.
    pub fn num_unique(&self) -> usize {
        self.labels.iter().collect::<BTreeSet<_>>().len()
    }
}

/// The solver writes its result next to the weight file.
pub fn label_path_for(weight_file: &Path) -> PathBuf {
    weight_file.with_extension("label")
}

/// Parse a `.label` file, checking it carries `expected` labels.
pub fn read_label_file(path: &Path, expected: usize) -> Result<Labeling> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.splitn(3, '\n');
    let energy_before = parse_energy(path, 1, lines.next())?;
    let energy_after = parse_energy(path, 2, lines.next())?;

    let mut labels = Vec::with_capacity(expected);
    for token in lines.next().unwrap_or("").split_whitespace() {
        let label = token.parse::<i32>().map_err(|e| SketchError::Parse {
            path: path.to_path_buf(),
            line: 3,
            message: format!("label {token:?}: {e}"),
        })?;
        labels.push(label);
    }
    if labels.len() != expected {
        return Err(SketchError::shape("label count", &[expected], &[labels.len()]));
    }
    Ok(Labeling {
        energy_before,
        energy_after,
        labels,
    })
}

/// Write a labeling in the solver's format. Used by in-process solvers.
pub fn write_label_file(path: &Path, labeling: &Labeling) -> Result<()> {
    ensure_parent_dir(path)?;
    let mut text = format!("{}\n{}\n", labeling.energy_before, labeling.energy_after);
    let labels: Vec<String> = labeling.labels.iter().map(i32::to_string).collect();
    text.push_str(&labels.join(" "));
    text.push('\n');
    fs::write(path, text)?;
    Ok(())
}

fn parse_energy(path: &Path, line: usize, raw: Option<&str>) -> Result<f64> {
    let raw = raw.unwrap_or("").trim();
    raw.parse().map_err(|e| SketchError::Parse {
        path: path.to_path_buf(),
        line,
        message: format!("energy {raw:?}: {e}"),
    })
}
