use crate::config::{Config, SpeciesConfig};
use crate::grid::Grid;
use crate::model::{RunOutput, SpeciesRun};
use crate::{profile, stepper};
use anyhow::{Context, Result};
use rayon::prelude::*;
use rmp_serde::{decode, encode};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

/// Simulation engine.
///
/// Holds the configuration and the grid derived from it,
/// and provides methods to run simulations and save or load their output.
pub struct Engine {
    cfg: Config,
    grid: Grid,
}

impl Engine {
    /// Create a new `Engine` with the given configuration.
    pub fn new(cfg: Config) -> Self {
        let grid = Grid::new(&cfg.grid);
        Self { cfg, grid }
    }

    /// Initial concentration profile, shared by every species.
    pub fn generate_initial_condition(&self) -> Result<Vec<f64>> {
        let field = profile::initialize(
            &self.grid.shifted_positions(),
            self.cfg.init.concentration,
            self.grid.width(),
            self.cfg.init.sharpness,
        )?;
        Ok(field)
    }

    /// Run every species and collect their snapshots.
    ///
    /// Species do not interact, so they are run in parallel.
    pub fn simulate(&self) -> Result<RunOutput> {
        let init = self
            .generate_initial_condition()
            .context("failed to generate initial condition")?;
        let capture_times = self.grid.capture_times(&self.cfg.output.capture_steps);

        let species = self
            .cfg
            .species
            .par_iter()
            .map(|species| {
                self.run_species(species, init.clone(), &capture_times)
                    .with_context(|| format!("failed to run species {:?}", species.name))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(RunOutput {
            positions: self.grid.shifted_positions(),
            dx: self.grid.dx(),
            dt: self.grid.dt(),
            species,
        })
    }

    /// Perform the simulation and save the output to a binary file.
    pub fn perform_simulation<P: AsRef<Path>>(&self, file: P) -> Result<()> {
        let output = self.simulate()?;

        let file = file.as_ref();
        let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
        let mut writer = BufWriter::new(file);

        encode::write(&mut writer, &output).context("failed to serialize output")?;
        writer.flush().context("failed to flush writer stream")?;

        Ok(())
    }

    /// Load the output of a previous simulation.
    pub fn load_output<P: AsRef<Path>>(file: P) -> Result<RunOutput> {
        let file = file.as_ref();
        let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
        let mut reader = BufReader::new(file);
        let output = decode::from_read(&mut reader).context("failed to deserialize output")?;
        Ok(output)
    }

    fn run_species(
        &self,
        species: &SpeciesConfig,
        mut field: Vec<f64>,
        capture_times: &[f64],
    ) -> Result<SpeciesRun> {
        let ratio = self.grid.stability_ratio(species.diffusivity);
        if ratio > 0.5 {
            log::warn!(
                "{}: stability ratio {ratio:.4} exceeds 0.5, the solution will diverge",
                species.name
            );
        }
        log::info!("{}: started (stability ratio {ratio:.4})", species.name);

        let snapshots = stepper::run(
            &mut field,
            species.diffusivity,
            self.grid.dx(),
            self.grid.times(),
            capture_times,
        )?;

        log::info!("{}: captured {} snapshots", species.name, snapshots.len());

        Ok(SpeciesRun {
            name: species.name.clone(),
            diffusivity: species.diffusivity,
            snapshots,
        })
    }
}
