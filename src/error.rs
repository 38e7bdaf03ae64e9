/// Error returned by the numerical routines when given unusable parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    /// A parameter was non-positive, non-finite or otherwise out of its domain.
    #[error("invalid parameter {name}: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Ensure `value` is finite and strictly positive.
pub fn check_positive(name: &'static str, value: f64) -> Result<(), ParamError> {
    if !value.is_finite() {
        return Err(ParamError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(ParamError::InvalidParameter {
            name,
            value,
            reason: "must be positive",
        });
    }
    Ok(())
}
