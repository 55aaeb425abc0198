#![doc = include_str!("../README.md")]

// Graph-cut driver
pub mod affinity;
pub mod gco;
pub mod graphcut;
pub mod labelmap;
pub mod pixels;
pub mod weights;

// Training data
pub mod batch;

// Shared plumbing
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod files;
pub mod image;
pub mod svg;

// --- High-level re-exports -------------------------------------------------

pub use crate::batch::{Batch, BatchManager, BatchParams};
pub use crate::error::{Result, SketchError};
pub use crate::graphcut::{GraphcutParams, GraphcutReport, GraphcutRunner};
pub use crate::weights::{compute_pair_weights, WeightParams};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use sketch_vectorizer::prelude::*;
/// use std::path::Path;
///
/// # fn main() -> sketch_vectorizer::Result<()> {
/// let runner = GraphcutRunner::new(
///     GraphcutParams::default(),
///     ConnectivityAffinity,
///     ExternalSolver::new("./gco_linenet", "gco/gco_src"),
/// );
/// let report = runner.process_file(Path::new("data/svg/cat.svg"))?;
/// println!("{} labels, map at {}", report.num_labels, report.label_map.display());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::affinity::{AffinityPredictor, ConnectivityAffinity, ExportedAffinity};
    pub use crate::gco::{ExternalSolver, LabelSolver};
    pub use crate::image::ImageF32;
    pub use crate::{BatchManager, BatchParams, GraphcutParams, GraphcutRunner, WeightParams};
}
