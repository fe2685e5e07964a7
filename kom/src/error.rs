/// Result type of the fallible mechanism operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Domain errors of the mechanism parameters.
///
/// Closure failures of a four-bar linkage are not errors, see
/// [`FourBarState::Open`](crate::fb::FourBarState::Open).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A length must be a positive finite number.
    #[error("invalid length of {link}: {value}")]
    Length {
        /// Name of the link
        link: &'static str,
        /// The rejected value
        value: f64,
    },
    /// A speed must be finite.
    #[error("invalid speed: {0} rpm")]
    Speed(f64),
    /// The connecting rod cannot reach the slider axis.
    #[error("connecting rod ({rod}) is shorter than the crank ({crank})")]
    RodTooShort {
        /// Crank length
        crank: f64,
        /// Connecting rod length
        rod: f64,
    },
    /// The connecting rod is perpendicular to the slider axis, the slider
    /// velocity is unbounded.
    #[error("dead center at crank angle {0} rad")]
    DeadCenter(f64),
    /// A gear must have at least one tooth.
    #[error("gear {0} has no teeth")]
    NoTeeth(usize),
    /// The number of gears is out of range.
    #[error("gear train needs {min} to {max} gears, got {len}")]
    GearCount {
        /// Minimum number of gears
        min: usize,
        /// Maximum number of gears
        max: usize,
        /// Current number of gears
        len: usize,
    },
}

pub(crate) fn check_length(link: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0. {
        Ok(value)
    } else {
        Err(Error::Length { link, value })
    }
}

pub(crate) fn check_speed(rpm: f64) -> Result<f64> {
    if rpm.is_finite() {
        Ok(rpm)
    } else {
        Err(Error::Speed(rpm))
    }
}
