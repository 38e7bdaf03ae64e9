use crate::model::{RunOutput, Snapshot};
use anyhow::{Context, Result};
use rmp_serde::encode;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

/// Values of one observable, one per snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObsReport {
    pub name: String,
    pub values: Vec<f64>,
}

/// Observables of one species over its snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesReport {
    pub name: String,
    pub times: Vec<f64>,
    pub obs: Vec<ObsReport>,
}

impl SpeciesReport {
    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.obs
            .iter()
            .find(|obs| obs.name == name)
            .map(|obs| obs.values.as_slice())
    }
}

pub trait Obs {
    fn update(&mut self, snapshot: &Snapshot, positions: &[f64], dx: f64);
    fn report(&self) -> ObsReport;
}

/// Amount of solute per unit channel cross-section (µM·µm).
pub struct Mass {
    values: Vec<f64>,
}

impl Mass {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }
}

impl Obs for Mass {
    fn update(&mut self, snapshot: &Snapshot, _positions: &[f64], dx: f64) {
        self.values.push(compute_mass(&snapshot.field, dx));
    }

    fn report(&self) -> ObsReport {
        ObsReport {
            name: "mass".to_string(),
            values: self.values.clone(),
        }
    }
}

/// Mass relative to the first snapshot.
pub struct RetainedMass {
    mass_init: Option<f64>,
    values: Vec<f64>,
}

impl RetainedMass {
    pub fn new() -> Self {
        Self {
            mass_init: None,
            values: Vec::new(),
        }
    }
}

impl Obs for RetainedMass {
    fn update(&mut self, snapshot: &Snapshot, _positions: &[f64], dx: f64) {
        let mass = compute_mass(&snapshot.field, dx);
        let mass_init = *self.mass_init.get_or_insert(mass);
        self.values.push(mass / mass_init);
    }

    fn report(&self) -> ObsReport {
        ObsReport {
            name: "retained_mass".to_string(),
            values: self.values.clone(),
        }
    }
}

pub struct Peak {
    values: Vec<f64>,
}

impl Peak {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }
}

impl Obs for Peak {
    fn update(&mut self, snapshot: &Snapshot, _positions: &[f64], _dx: f64) {
        let peak = snapshot
            .field
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        self.values.push(peak);
    }

    fn report(&self) -> ObsReport {
        ObsReport {
            name: "peak".to_string(),
            values: self.values.clone(),
        }
    }
}

/// Concentration at one channel edge; zero for absorbing boundaries.
pub struct Boundary {
    right: bool,
    values: Vec<f64>,
}

impl Boundary {
    pub fn left() -> Self {
        Self {
            right: false,
            values: Vec::new(),
        }
    }

    pub fn right() -> Self {
        Self {
            right: true,
            values: Vec::new(),
        }
    }
}

impl Obs for Boundary {
    fn update(&mut self, snapshot: &Snapshot, _positions: &[f64], _dx: f64) {
        let field = &snapshot.field;
        let edge = if self.right { field.last() } else { field.first() };
        self.values.push(edge.copied().unwrap_or(f64::NAN));
    }

    fn report(&self) -> ObsReport {
        let name = if self.right {
            "boundary_right"
        } else {
            "boundary_left"
        };
        ObsReport {
            name: name.to_string(),
            values: self.values.clone(),
        }
    }
}

/// Concentration-weighted standard deviation of position (µm).
pub struct Spread {
    values: Vec<f64>,
}

impl Spread {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }
}

impl Obs for Spread {
    fn update(&mut self, snapshot: &Snapshot, positions: &[f64], _dx: f64) {
        self.values.push(compute_spread(&snapshot.field, positions));
    }

    fn report(&self) -> ObsReport {
        ObsReport {
            name: "spread".to_string(),
            values: self.values.clone(),
        }
    }
}

pub struct Analyzer {
    output: RunOutput,
}

impl Analyzer {
    pub fn new(output: RunOutput) -> Self {
        Self { output }
    }

    pub fn analyze(&self) -> Vec<SpeciesReport> {
        self.output
            .species
            .iter()
            .map(|run| {
                let mut obs_ptr_vec: Vec<Box<dyn Obs>> = vec![
                    Box::new(Mass::new()),
                    Box::new(RetainedMass::new()),
                    Box::new(Peak::new()),
                    Box::new(Boundary::left()),
                    Box::new(Boundary::right()),
                    Box::new(Spread::new()),
                ];
                for snapshot in &run.snapshots {
                    for obs in &mut obs_ptr_vec {
                        obs.update(snapshot, &self.output.positions, self.output.dx);
                    }
                }
                SpeciesReport {
                    name: run.name.clone(),
                    times: run.snapshots.iter().map(|snapshot| snapshot.time).collect(),
                    obs: obs_ptr_vec.iter().map(|obs| obs.report()).collect(),
                }
            })
            .collect()
    }

    pub fn save_results<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let reports = self.analyze();
        for report in &reports {
            log_summary(report);
        }

        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);

        encode::write(&mut writer, &reports).context("failed to serialize reports")?;
        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }
}

fn log_summary(report: &SpeciesReport) {
    let last = |name: &str| report.values(name).and_then(|values| values.last().copied());
    match (report.times.last(), last("retained_mass"), last("spread")) {
        (Some(time), Some(retained), Some(spread)) => log::info!(
            "{}: at t = {time:.4} s retained {:.2}% of the mass, spread {spread:.2} µm",
            report.name,
            100.0 * retained
        ),
        _ => log::warn!("{}: no snapshots to analyze", report.name),
    }
}

fn compute_mass(field: &[f64], dx: f64) -> f64 {
    field.iter().sum::<f64>() * dx
}

fn compute_spread(field: &[f64], positions: &[f64]) -> f64 {
    let total: f64 = field.iter().sum();
    if total <= 0.0 {
        return f64::NAN;
    }
    let mean = field
        .iter()
        .zip(positions)
        .map(|(&c, &x)| c * x)
        .sum::<f64>()
        / total;
    let var = field
        .iter()
        .zip(positions)
        .map(|(&c, &x)| c * (x - mean).powi(2))
        .sum::<f64>()
        / total;
    var.sqrt()
}
