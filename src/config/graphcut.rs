use crate::affinity::{AffinityPredictor, ConnectivityAffinity, ExportedAffinity};
use crate::error::Result;
use crate::gco::ExternalSolver;
use crate::graphcut::{GraphcutParams, SweepGrid};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where per-pixel affinity maps come from.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AffinitySource {
    /// `<dir>/<stem>.aff` files written by the network.
    Exported { dir: PathBuf },
    /// Connected components of the line pixels.
    #[default]
    Connectivity,
}

impl AffinitySource {
    pub fn build(&self) -> Box<dyn AffinityPredictor> {
        match self {
            Self::Exported { dir } => Box::new(ExportedAffinity::new(dir)),
            Self::Connectivity => Box::new(ConnectivityAffinity),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub binary: PathBuf,
    pub working_dir: PathBuf,
    pub library_path_var: String,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("./gco_linenet"),
            working_dir: PathBuf::from("gco/gco_src"),
            library_path_var: "LD_LIBRARY_PATH".to_string(),
        }
    }
}

impl SolverConfig {
    pub fn build(&self) -> ExternalSolver {
        let mut solver = ExternalSolver::new(&self.binary, &self.working_dir);
        solver.library_path_var = self.library_path_var.clone();
        solver
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphcutOutputConfig {
    /// Per-file reports as one JSON array.
    pub report_json: Option<PathBuf>,
    /// Remove and recreate `test_dir` before the run.
    pub reset_test_dir: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SweepConfig {
    #[serde(default)]
    pub grid: SweepGrid,
    pub sweep_json: PathBuf,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphcutToolConfig {
    pub params: GraphcutParams,
    pub affinity: AffinitySource,
    pub solver: SolverConfig,
    pub output: GraphcutOutputConfig,
    pub sweep: Option<SweepConfig>,
}

pub fn load_config(path: &Path) -> Result<GraphcutToolConfig> {
    super::read_json(path)
}
