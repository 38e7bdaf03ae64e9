//! Simulation data types.

use serde::{Deserialize, Serialize};

/// Copy of a concentration field at a single time step.
///
/// Captured after the boundaries are reset and before the step's update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Index in the time grid.
    pub step: usize,

    /// Simulation time (s).
    pub time: f64,

    /// Concentration at every grid point (µM).
    pub field: Vec<f64>,
}

/// Snapshots of one species, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRun {
    pub name: String,

    pub diffusivity: f64,

    pub snapshots: Vec<Snapshot>,
}

/// Everything a simulation run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Grid positions shifted to `[0, L]` (µm).
    pub positions: Vec<f64>,

    pub dx: f64,

    pub dt: f64,

    /// One entry per configured species, in configuration order.
    pub species: Vec<SpeciesRun>,
}
