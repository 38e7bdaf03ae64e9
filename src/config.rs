use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt::Debug, fs, ops::RangeBounds, path::Path};

const POSITIVE: std::ops::Range<f64> = f64::MIN_POSITIVE..f64::INFINITY;

/// Simulation configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Spatial and temporal discretization.
    pub grid: GridConfig,
    /// Initial concentration profile.
    pub init: InitConfig,
    /// Diffusing species, simulated independently.
    pub species: Vec<SpeciesConfig>,
    /// Snapshot capture parameters.
    pub output: OutputConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Channel width (µm).
    pub channel_width: f64,
    /// Number of grid points across the channel.
    pub n_points: usize,
    /// Maximum simulation time (s).
    pub max_time: f64,
    /// Time-step granularity (s).
    pub time_step: f64,
}

impl GridConfig {
    /// Number of points in the time grid.
    pub fn n_times(&self) -> usize {
        (self.max_time / self.time_step).round() as usize
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    /// Plateau concentration (µM).
    pub concentration: f64,
    /// Sharpness of the plateau edges (smaller is steeper).
    pub sharpness: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Species label, e.g. `"Na"`.
    pub name: String,
    /// Diffusivity (µm²/s).
    pub diffusivity: f64,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Time-grid indices at which snapshots are captured.
    pub capture_steps: Vec<usize>,
}

impl Default for Config {
    /// Three-inlet device with a 360 µm main channel and sodium sulfate /
    /// sodium chloride solutions.
    fn default() -> Self {
        let species = [("Na", 133.4), ("Cl", 203.2), ("SO4", 106.5)]
            .into_iter()
            .map(|(name, diffusivity)| SpeciesConfig {
                name: name.to_string(),
                diffusivity,
            })
            .collect();

        Self {
            grid: GridConfig {
                channel_width: 360.0,
                n_points: 1001,
                max_time: 7.0,
                time_step: 1e-4,
            },
            init: InitConfig {
                concentration: 1e6,
                sharpness: 8.0,
            },
            species,
            output: OutputConfig {
                capture_steps: vec![
                    0, 1000, 2500, 5000, 7000, 10000, 14000, 18000, 22000, 26000, 30000, 35000,
                    40000,
                ],
            },
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded and contain a serialized [`Config`].
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        check_num(grid.channel_width, POSITIVE).context("invalid channel width")?;
        check_num(grid.n_points, 3..100_000_000).context("invalid number of grid points")?;
        check_num(grid.max_time, POSITIVE).context("invalid maximum time")?;
        check_num(grid.time_step, POSITIVE).context("invalid time step")?;
        check_num(grid.max_time / grid.time_step, 1.5..1e8)
            .context("invalid ratio of maximum time to time step")?;
        check_num(grid.n_times(), 2..100_000_000).context("invalid number of time points")?;

        check_num(self.init.concentration, POSITIVE).context("invalid initial concentration")?;
        check_num(self.init.sharpness, POSITIVE).context("invalid transition sharpness")?;

        if self.species.is_empty() {
            bail!("at least one species must be given");
        }
        let mut names = HashSet::new();
        for species in &self.species {
            if !names.insert(species.name.as_str()) {
                bail!("species {:?} is given more than once", species.name);
            }
            check_num(species.diffusivity, POSITIVE)
                .with_context(|| format!("invalid diffusivity of {:?}", species.name))?;
        }

        check_steps(&self.output.capture_steps, grid.n_times())
            .context("invalid capture steps")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

fn check_steps(steps: &[usize], n_times: usize) -> Result<()> {
    if steps.windows(2).any(|pair| pair[0] >= pair[1]) {
        bail!("steps must be strictly increasing");
    }
    for &step in steps {
        check_num(step, 0..n_times).with_context(|| format!("invalid step {step}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        cfg.validate().expect("default config must validate");
        assert_eq!(cfg.grid.n_times(), 70_000);
        assert_eq!(cfg.species.len(), 3);
    }

    #[test]
    fn parses_toml_sections() {
        let contents = r#"
[grid]
channel_width = 360.0
n_points = 101
max_time = 0.1
time_step = 1e-3

[init]
concentration = 1e6
sharpness = 8.0

[[species]]
name = "Na"
diffusivity = 133.4

[[species]]
name = "Cl"
diffusivity = 203.2

[output]
capture_steps = [0, 10, 50]
"#;
        let cfg: Config = toml::from_str(contents).expect("failed to parse config");
        cfg.validate().expect("config must validate");
        assert_eq!(cfg.grid.n_points, 101);
        assert_eq!(cfg.grid.n_times(), 100);
        assert_eq!(cfg.species[1].name, "Cl");
        assert_eq!(cfg.output.capture_steps, vec![0, 10, 50]);
    }

    #[test]
    fn rejects_non_positive_values() {
        let mut cfg = Config::default();
        cfg.init.sharpness = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.grid.channel_width = -360.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.species[2].diffusivity = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_bad_species_lists() {
        let mut cfg = Config::default();
        cfg.species.clear();
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.species[1].name = "Na".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_huge_time_grid() {
        let mut cfg = Config::default();
        cfg.grid.max_time = 1.0;
        cfg.grid.time_step = 1e-300;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.grid.max_time = 1e4;
        cfg.grid.time_step = 1e-8;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.grid.max_time = 1e-4;
        cfg.grid.time_step = 1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn default_config_survives_toml_round_trip() {
        let contents = toml::to_string(&Config::default()).expect("failed to serialize config");
        let cfg: Config = toml::from_str(&contents).expect("failed to parse config");
        cfg.validate().expect("config must validate");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn rejects_bad_capture_steps() {
        let mut cfg = Config::default();
        cfg.output.capture_steps = vec![0, 70_000];
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.output.capture_steps = vec![1000, 1000];
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.output.capture_steps = vec![2500, 1000];
        assert!(cfg.validate().is_err());
    }
}
