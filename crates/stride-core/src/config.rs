//! Movement configuration.
//!
//! Typically loaded from a JSON file by the application crate (see
//! [`MovementConfig::from_json_path`], behind the `serde` feature) and passed
//! to the scheduler builder.

use std::fmt;

use crate::{StrideError, StrideResult};

// ── MovementMode ──────────────────────────────────────────────────────────────

/// How movement is initiated outside of combat.
///
/// The scheduler stores this but never reads it; call sites that build paths
/// consult it to decide whether the whole group follows the selected actor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MovementMode {
    /// Every group member follows the selected actor.
    #[default]
    GroupFollow = 0,
    /// Only the selected actor moves.
    SingleActor = 1,
}

impl MovementMode {
    /// Inverse of `as u8`.  Unknown values map to the default.
    #[inline]
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => MovementMode::SingleActor,
            _ => MovementMode::GroupFollow,
        }
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovementMode::GroupFollow => f.write_str("group-follow"),
            MovementMode::SingleActor => f.write_str("single-actor"),
        }
    }
}

// ── MovementConfig ────────────────────────────────────────────────────────────

/// Tunables for the scheduler and its movers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementConfig {
    /// Nominal time between two steps of one mover, in milliseconds.
    pub step_interval_ms: u64,

    /// Multiplier applied to the step interval after an opportunity hook
    /// paused the mover, so the hook is not polled every tick.  Default: 5.
    pub provoke_backoff_factor: u32,

    /// How often the tick driver calls `tick`, in milliseconds.
    pub tick_cadence_ms: u64,

    /// Mode the scheduler starts in.
    pub default_mode: MovementMode,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step_interval_ms:       150,
            provoke_backoff_factor: 5,
            tick_cadence_ms:        16,
            default_mode:           MovementMode::GroupFollow,
        }
    }
}

impl MovementConfig {
    /// Step interval used while an opportunity hook holds the mover.
    #[inline]
    pub fn backoff_interval_ms(&self) -> u64 {
        self.step_interval_ms
            .saturating_mul(u64::from(self.provoke_backoff_factor))
    }

    /// Reject configurations the scheduler cannot run with.
    pub fn validate(&self) -> StrideResult<()> {
        if self.step_interval_ms == 0 {
            return Err(StrideError::Config("step_interval_ms must be > 0".into()));
        }
        if self.provoke_backoff_factor == 0 {
            return Err(StrideError::Config("provoke_backoff_factor must be >= 1".into()));
        }
        if self.tick_cadence_ms == 0 {
            return Err(StrideError::Config("tick_cadence_ms must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl MovementConfig {
    /// Parse and validate a JSON document.  Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> StrideResult<Self> {
        let config: MovementConfig =
            serde_json::from_str(json).map_err(|e| StrideError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_path(path: impl AsRef<std::path::Path>) -> StrideResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
