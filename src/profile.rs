//! Initial concentration profile.

use crate::error::{ParamError, check_positive};
use std::f64::consts::PI;

/// Values below this are numerical noise and are set to exactly zero.
pub const CLAMP_THRESHOLD: f64 = 1e-15;

/// Build a smoothed plateau across a channel of the given `width`.
///
/// The profile is the difference of two shifted tanh steps: close to
/// `amplitude` over the middle third of `[0, width]` and close to zero over the
/// outer thirds. `sharpness` sets the transition width (smaller is steeper).
/// `positions` must already be shifted so the channel starts at zero.
pub fn initialize(
    positions: &[f64],
    amplitude: f64,
    width: f64,
    sharpness: f64,
) -> Result<Vec<f64>, ParamError> {
    check_positive("width", width)?;
    check_positive("sharpness", sharpness)?;
    if !amplitude.is_finite() {
        return Err(ParamError::InvalidParameter {
            name: "amplitude",
            value: amplitude,
            reason: "must be finite",
        });
    }

    let k = PI / sharpness;
    let step = |edge: f64, x: f64| 0.5 * amplitude * ((k * (edge - x)).tanh() + 1.0);

    let field = positions
        .iter()
        .map(|&x| step(2.0 * width / 3.0, x) - step(width / 3.0, x))
        .map(|val| if val < CLAMP_THRESHOLD { 0.0 } else { val })
        .collect();

    Ok(field)
}
