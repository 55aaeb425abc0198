use super::label_file::label_path_for;
use crate::error::{Result, SketchError};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

/// Where the labeling landed and how long the solver took.
#[derive(Clone, Debug)]
pub struct SolveOutcome {
    pub label_file: PathBuf,
    pub elapsed_ms: f64,
}

/// Turns a weight file into a label file.
pub trait LabelSolver {
    fn solve(&self, weight_file: &Path) -> Result<SolveOutcome>;
}

impl<S: LabelSolver + ?Sized> LabelSolver for &S {
    fn solve(&self, weight_file: &Path) -> Result<SolveOutcome> {
        (**self).solve(weight_file)
    }
}

/// Graph-cut solver binary run as a child process.
///
/// The child gets `working_dir` as its current directory and
/// `library_path_var=working_dir` in its environment; the parent's own
/// directory and environment are left untouched. There is no timeout.
#[derive(Clone, Debug)]
pub struct ExternalSolver {
    /// Solver executable; relative paths are resolved against `working_dir`.
    pub binary: PathBuf,
    pub working_dir: PathBuf,
    pub library_path_var: String,
}

impl ExternalSolver {
    pub fn new(binary: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            working_dir: working_dir.into(),
            library_path_var: "LD_LIBRARY_PATH".to_string(),
        }
    }

    fn program(&self) -> PathBuf {
        if self.binary.is_absolute() {
            self.binary.clone()
        } else {
            self.working_dir.join(&self.binary)
        }
    }
}

impl LabelSolver for ExternalSolver {
    fn solve(&self, weight_file: &Path) -> Result<SolveOutcome> {
        // the child runs elsewhere, so hand it an absolute path
        let weight_file = weight_file.canonicalize()?;
        let program = self.program();
        debug!(
            "ExternalSolver: {} {} (cwd={})",
            program.display(),
            weight_file.display(),
            self.working_dir.display()
        );

        let start = Instant::now();
        let status = Command::new(&program)
            .arg(&weight_file)
            .current_dir(&self.working_dir)
            .env(&self.library_path_var, &self.working_dir)
            .status()
            .map_err(|e| SketchError::Solver(format!("failed to run {}: {e}", program.display())))?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        if !status.success() {
            return Err(SketchError::Solver(format!(
                "{} exited with {status}",
                program.display()
            )));
        }
        let label_file = label_path_for(&weight_file);
        if !label_file.is_file() {
            return Err(SketchError::Solver(format!(
                "solver finished but {} is missing",
                label_file.display()
            )));
        }
        info!("labeling finished ({:.3} sec)", elapsed_ms / 1000.0);
        Ok(SolveOutcome {
            label_file,
            elapsed_ms,
        })
    }
}
