//! `stride-core`: foundational types for the `stride` movement engine.
//!
//! This crate is a dependency of every other `stride-*` crate.  It has no
//! `stride-*` dependencies and minimal external ones (`thiserror` and
//! `tracing`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `ActorId`                                                 |
//! | [`cell`]    | `Cell`, `CellDelta`: discrete grid coordinates            |
//! | [`time`]    | `Timestamp`, `Clock`, `SystemClock`, `ManualClock`        |
//! | [`config`]  | `MovementConfig`, `MovementMode`                          |
//! | [`pause`]   | `PauseCounter`, `PauseHandle`: reference-counted pausing  |
//! | [`error`]   | `StrideError`, `StrideResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                      |
//! |---------|-------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to public types and enables  |
//! |         | `MovementConfig::from_json_str` / `from_json_path`.         |

pub mod cell;
pub mod config;
pub mod error;
pub mod ids;
pub mod pause;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use cell::{Cell, CellDelta};
pub use config::{MovementConfig, MovementMode};
pub use error::{StrideError, StrideResult};
pub use ids::ActorId;
pub use pause::{PauseCounter, PauseHandle};
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
