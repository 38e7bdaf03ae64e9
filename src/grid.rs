//! Spatial and temporal discretization.

use crate::config::GridConfig;

/// Return `n` evenly spaced values over `[start, stop]`.
///
/// Both endpoints are included and the last value is exactly `stop`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut vals: Vec<f64> = (0..n).map(|i| start + i as f64 * step).collect();
            vals[n - 1] = stop;
            vals
        }
    }
}

/// Grid points across the channel and time points of the run.
///
/// The channel spans `[-L/2, L/2]`, time spans `[0, max_time]`.
#[derive(Debug, Clone)]
pub struct Grid {
    width: f64,
    positions: Vec<f64>,
    times: Vec<f64>,
}

impl Grid {
    pub fn new(cfg: &GridConfig) -> Self {
        let half = cfg.channel_width / 2.0;
        Self {
            width: cfg.channel_width,
            positions: linspace(-half, half, cfg.n_points),
            times: linspace(0.0, cfg.max_time, cfg.n_times()),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Positions shifted so the channel spans `[0, L]`.
    pub fn shifted_positions(&self) -> Vec<f64> {
        let half = self.width / 2.0;
        self.positions.iter().map(|&x| x + half).collect()
    }

    pub fn dx(&self) -> f64 {
        (self.positions[0] - self.positions[1]).abs()
    }

    pub fn dt(&self) -> f64 {
        self.times[1]
    }

    /// Dimensionless ratio `D dt / dx²`; the explicit scheme is stable up to 0.5.
    pub fn stability_ratio(&self, diffusivity: f64) -> f64 {
        diffusivity * self.dt() / self.dx().powi(2)
    }

    /// Time values at the given step indices.
    ///
    /// Indices beyond the time grid are dropped.
    pub fn capture_times(&self, steps: &[usize]) -> Vec<f64> {
        steps
            .iter()
            .filter_map(|&step| self.times.get(step).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn default_grid() -> Grid {
        Grid::new(&GridConfig {
            channel_width: 360.0,
            n_points: 1001,
            max_time: 7.0,
            time_step: 1e-4,
        })
    }

    #[test]
    fn linspace_includes_endpoints() {
        let vals = linspace(-180.0, 180.0, 1001);
        assert_eq!(vals.len(), 1001);
        assert_eq!(vals[0], -180.0);
        assert_eq!(vals[1000], 180.0);
        assert_abs_diff_eq!(vals[500], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn linspace_degenerate_lengths() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 1.0, 1), vec![2.0]);
    }

    #[test]
    fn default_grid_spacing() {
        let grid = default_grid();
        assert_eq!(grid.positions.len(), 1001);
        assert_eq!(grid.times().len(), 70_000);
        assert_abs_diff_eq!(grid.dx(), 0.36, epsilon = 1e-12);
        assert_abs_diff_eq!(grid.dt(), 7.0 / 69_999.0, epsilon = 1e-15);
        assert_eq!(grid.times()[69_999], 7.0);
    }

    #[test]
    fn shifted_positions_span_the_channel() {
        let grid = default_grid();
        let shifted = grid.shifted_positions();
        assert_eq!(shifted[0], 0.0);
        assert_eq!(shifted[1000], 360.0);
        assert_abs_diff_eq!(shifted[500], 180.0, epsilon = 1e-12);
    }

    #[test]
    fn default_species_are_stable() {
        let grid = default_grid();
        for diffusivity in [133.4, 203.2, 106.5] {
            assert!(grid.stability_ratio(diffusivity) <= 0.5);
        }
    }

    #[test]
    fn capture_times_are_grid_values() {
        let grid = default_grid();
        let times = grid.capture_times(&[0, 1000, 70_000]);
        assert_eq!(times, vec![0.0, grid.times()[1000]]);
    }
}
