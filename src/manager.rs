use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::Engine;
use anyhow::{Context, Result, bail};
use glob::glob;
use std::{
    fs,
    path::{Path, PathBuf},
};

pub struct Manager {
    sim_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(sim_dir: P) -> Result<Self> {
        let sim_dir = sim_dir.as_ref().to_path_buf();

        let cfg = Config::from_file(config_file(&sim_dir)).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { sim_dir, cfg })
    }

    /// Write the default configuration into `sim_dir`, creating the directory.
    pub fn write_default_config<P: AsRef<Path>>(sim_dir: P) -> Result<()> {
        let sim_dir = sim_dir.as_ref();
        fs::create_dir_all(sim_dir).with_context(|| format!("failed to create {sim_dir:?}"))?;

        let file = config_file(sim_dir);
        if file.exists() {
            bail!("{file:?} already exists");
        }

        let contents =
            toml::to_string(&Config::default()).context("failed to serialize config")?;
        fs::write(&file, contents).with_context(|| format!("failed to write {file:?}"))?;
        log::info!("created {file:?}");

        Ok(())
    }

    pub fn run_simulation(&self) -> Result<()> {
        let engine = Engine::new(self.cfg.clone());

        let output_file = self.output_file();
        engine
            .perform_simulation(&output_file)
            .context("failed to perform simulation")?;
        log::info!("saved {output_file:?}");

        Ok(())
    }

    pub fn run_analysis(&self) -> Result<()> {
        let output_file = self.output_file();
        let output = Engine::load_output(&output_file)
            .with_context(|| format!("failed to load {output_file:?}"))?;

        let n_species = self.cfg.species.len();
        if output.species.len() != n_species {
            bail!("output has {} species, config has {n_species}", output.species.len());
        }

        let analyzer = Analyzer::new(output);
        let results_file = self.results_file();
        analyzer
            .save_results(&results_file)
            .context("failed to save results")?;
        log::info!("saved {results_file:?}");

        Ok(())
    }

    pub fn clean_sim(&self) -> Result<()> {
        let pattern = self.sim_dir.join("*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        for file in glob(pattern)
            .context("failed to glob output files")?
            .filter_map(Result::ok)
        {
            fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }
        Ok(())
    }

    fn output_file(&self) -> PathBuf {
        self.sim_dir.join("output.msgpack")
    }

    fn results_file(&self) -> PathBuf {
        self.sim_dir.join("analysis.msgpack")
    }
}

fn config_file(sim_dir: &Path) -> PathBuf {
    sim_dir.join("config.toml")
}
