//! Simulation-specific error types.
//!
//! Only configuration and construction can fail.  The per-tick path repairs
//! numeric degeneracy in place and never returns an error.
//!
//! ## Usage
//!
//! ```rust
//! use blackhole::config::SimConfig;
//! use blackhole::error::SimResult;
//!
//! fn checked_default() -> SimResult<SimConfig> {
//!     let config = SimConfig::default();
//!     config.validate()?;
//!     Ok(config)
//! }
//! # checked_default().unwrap();
//! ```

use std::fmt;

/// Top-level error enum for the black hole simulation.
#[derive(Debug)]
pub enum SimError {
    /// The configuration file exists but could not be read.
    ConfigRead {
        /// Path that was opened.
        path: String,
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::SimConfig`].
    ConfigParse {
        path: String,
        source: toml::de::Error,
    },

    /// A tunable is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// Attractor radii violate `core < event_horizon × 2 < gravity_range`.
    RadiusOrdering {
        core: f32,
        event_horizon: f32,
        gravity_range: f32,
    },

    /// Simulation bounds must be finite and strictly positive.
    InvalidBounds { width: f32, height: f32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::ConfigRead { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            SimError::ConfigParse { path, source } => {
                write!(f, "failed to parse config '{}': {}", path, source)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::RadiusOrdering {
                core,
                event_horizon,
                gravity_range,
            } => write!(
                f,
                "attractor radii out of order: need core ({}) < 2 × event horizon ({}) < \
                 gravity range ({})",
                core,
                event_horizon * 2.0,
                gravity_range
            ),
            SimError::InvalidBounds { width, height } => {
                write!(f, "simulation bounds {}×{} must be positive", width, height)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::ConfigRead { source, .. } => Some(source),
            SimError::ConfigParse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and non-negative.
pub fn validate_non_negative(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is a friction multiplier in `(0, 1]`.
pub fn validate_friction(name: &'static str, value: f32) -> SimResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

/// Returns an error unless the three attractor radii are strictly ascending
/// in the `core < event_horizon × 2 < gravity_range` sense.
pub fn validate_radius_ordering(core: f32, event_horizon: f32, gravity_range: f32) -> SimResult<()> {
    if core > 0.0 && core < event_horizon * 2.0 && event_horizon * 2.0 < gravity_range {
        Ok(())
    } else {
        Err(SimError::RadiusOrdering {
            core,
            event_horizon,
            gravity_range,
        })
    }
}

/// Returns an error unless both bounds are finite and strictly positive.
pub fn validate_bounds(width: f32, height: f32) -> SimResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidBounds { width, height })
    }
}
