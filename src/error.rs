//! Launcher-specific error types.
//!
//! Errors only arise from configuration: a bad value is caught once at
//! startup and reported through these types.  Runtime conditions such as a
//! ray that hits nothing or a target above the apex are handled in place and
//! never surface here.
//!
//! ## Usage
//!
//! ```rust
//! use lobber::error::{validate_gravity, LauncherResult};
//!
//! fn check(gravity_y: f32) -> LauncherResult<()> {
//!     validate_gravity(gravity_y)?;
//!     Ok(())
//! }
//! assert!(check(-9.81).is_ok());
//! assert!(check(0.0).is_err());
//! ```

use std::fmt;

/// Top-level error enum for the launcher.
#[derive(Debug, Clone, PartialEq)]
pub enum LauncherError {
    /// Gravity is exactly zero; the flight-time formula divides by it.
    ZeroGravity,

    /// Gravity is NaN or infinite.
    NonFiniteGravity {
        /// The value that was rejected.
        value: f32,
    },

    /// A tuning constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// `assets/launcher.toml` (or another TOML source) failed to parse.
    ConfigParse {
        /// Parser message, including the offending line when available.
        message: String,
    },
}

impl fmt::Display for LauncherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LauncherError::ZeroGravity => write!(
                f,
                "gravity must be non-zero: flight time is undefined without vertical acceleration"
            ),
            LauncherError::NonFiniteGravity { value } => {
                write!(f, "gravity must be finite, got {}", value)
            }
            LauncherError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            LauncherError::ConfigParse { message } => {
                write!(f, "failed to parse launcher config: {}", message)
            }
        }
    }
}

impl std::error::Error for LauncherError {}

impl From<toml::de::Error> for LauncherError {
    fn from(err: toml::de::Error) -> Self {
        LauncherError::ConfigParse {
            message: err.to_string(),
        }
    }
}

/// Convenience alias: a `Result` using `LauncherError` as the error type.
pub type LauncherResult<T> = Result<T, LauncherError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `gravity_y` is finite and non-zero.
pub fn validate_gravity(gravity_y: f32) -> LauncherResult<()> {
    if !gravity_y.is_finite() {
        Err(LauncherError::NonFiniteGravity { value: gravity_y })
    } else if gravity_y == 0.0 {
        Err(LauncherError::ZeroGravity)
    } else {
        Ok(())
    }
}

/// Returns an error unless `value` is finite and `>= 0`.
pub fn validate_non_negative(name: &'static str, value: f32) -> LauncherResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LauncherError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite.
pub fn validate_finite(name: &'static str, value: f32) -> LauncherResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(LauncherError::UnsafeConstant {
            name,
            value,
            safe_range: "(-∞, ∞)",
        })
    }
}

/// Returns an error if the path would have no segments.
pub fn validate_path_resolution(resolution: usize) -> LauncherResult<()> {
    if resolution == 0 {
        Err(LauncherError::UnsafeConstant {
            name: "PATH_RESOLUTION",
            value: 0.0,
            safe_range: "[1, ∞)",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_validation_rejects_zero_and_non_finite() {
        assert_eq!(validate_gravity(0.0), Err(LauncherError::ZeroGravity));
        assert_eq!(validate_gravity(-0.0), Err(LauncherError::ZeroGravity));
        assert!(matches!(
            validate_gravity(f32::NAN),
            Err(LauncherError::NonFiniteGravity { .. })
        ));
        assert!(matches!(
            validate_gravity(f32::NEG_INFINITY),
            Err(LauncherError::NonFiniteGravity { .. })
        ));
        assert!(validate_gravity(-9.81).is_ok());
        assert!(validate_gravity(3.0).is_ok(), "inverted gravity is allowed");
    }

    #[test]
    fn non_negative_validation_names_the_constant() {
        let err = validate_non_negative("FIRE_COOLDOWN_SECS", -1.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("FIRE_COOLDOWN_SECS"), "message was: {msg}");
        assert!(validate_non_negative("FIRE_COOLDOWN_SECS", 0.0).is_ok());
    }

    #[test]
    fn zero_path_resolution_is_rejected() {
        assert!(validate_path_resolution(0).is_err());
        assert!(validate_path_resolution(1).is_ok());
    }
}
