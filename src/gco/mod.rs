//! Plaintext exchange with the external graph-cut solver.
//!
//! The driver writes a weight file (`.pred`), runs the solver binary on it
//! and reads back the labeling (`.label`) the solver leaves next to it.
mod label_file;
mod solver;
mod weight_file;

pub use label_file::{label_path_for, read_label_file, write_label_file, Labeling};
pub use solver::{ExternalSolver, LabelSolver, SolveOutcome};
pub use weight_file::{read_weight_file, write_weight_file, WeightFileHeader};
