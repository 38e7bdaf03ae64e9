//! Explicit FTCS integration of the 1D diffusion equation.
//!
//! Each step applies `u[i] += D dt/dx² (u[i+1] - 2 u[i] + u[i-1])` to every
//! interior point, reading only the previous step's values. Both edges are
//! absorbing: they are reset to zero before every step.
//!
//! The scheme is conditionally stable (`D dt/dx² <= 0.5`). This is not
//! checked here; an unstable setup oscillates and diverges.

use crate::error::{ParamError, check_positive};
use crate::model::Snapshot;

/// Advance `field` through every point of `times`, capturing snapshots.
///
/// A snapshot is taken at each time value that is exactly equal (`==`) to an
/// element of `capture_times`. Requested times that never occur in `times`
/// are skipped and reported with a warning, they do not fail the run.
/// Snapshots come out in the order of `times`, whatever the order of
/// `capture_times`.
///
/// On return `field` holds the state after the last update.
pub fn run(
    field: &mut [f64],
    diffusivity: f64,
    dx: f64,
    times: &[f64],
    capture_times: &[f64],
) -> Result<Vec<Snapshot>, ParamError> {
    check_positive("diffusivity", diffusivity)?;
    check_positive("dx", dx)?;
    check_len("times", times.len())?;
    check_len("field", field.len())?;
    let dt = times[1] - times[0];
    check_positive("dt", dt)?;

    let n = field.len();
    let coef = diffusivity * (dt / dx.powi(2));

    let mut snapshots = Vec::new();
    let mut captured = vec![false; capture_times.len()];
    let mut prev = vec![0.0; n];

    for (step, &time) in times.iter().enumerate() {
        field[0] = 0.0;
        field[n - 1] = 0.0;

        let mut hit = false;
        for (flag, &capture_time) in captured.iter_mut().zip(capture_times) {
            if capture_time == time {
                *flag = true;
                hit = true;
            }
        }
        if hit {
            snapshots.push(Snapshot {
                step,
                time,
                field: field.to_vec(),
            });
        }

        prev.copy_from_slice(field);
        for (i, win) in prev.windows(3).enumerate() {
            field[i + 1] += coef * (win[2] - 2.0 * win[1] + win[0]);
        }
    }

    for (&capture_time, _) in capture_times
        .iter()
        .zip(&captured)
        .filter(|(_, flag)| !**flag)
    {
        log::warn!("capture time {capture_time:?} is not in the time grid, skipped");
    }

    Ok(snapshots)
}

fn check_len(name: &'static str, len: usize) -> Result<(), ParamError> {
    if len < 2 {
        return Err(ParamError::InvalidParameter {
            name,
            value: len as f64,
            reason: "length must be at least 2",
        });
    }
    Ok(())
}
