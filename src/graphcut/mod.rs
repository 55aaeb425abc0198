//! Graph-cut driver: from an SVG sketch to a color-coded stroke labeling.
//!
//! One run of [`GraphcutRunner::process_file`]:
//! 1. preprocess and rasterize the sketch to a binary line image;
//! 2. collect line pixels and ask the [`AffinityPredictor`] for their maps;
//! 3. compute pairwise weights and write the solver's weight file;
//! 4. run the [`LabelSolver`] and parse its labeling;
//! 5. render the label map and, optionally, fit one curve per label.
//!
//! [`AffinityPredictor`]: crate::affinity::AffinityPredictor
//! [`LabelSolver`]: crate::gco::LabelSolver
mod params;
mod report;
mod runner;
pub mod sweep;

pub use params::GraphcutParams;
pub use report::{CurveSummary, GraphcutReport};
pub use runner::GraphcutRunner;
pub use sweep::{linspace, run_sweep, FileSweep, SweepEntry, SweepGrid};
