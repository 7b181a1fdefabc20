//! Shared type definitions for the Skirmish match engine.
//!
//! This crate is the single source of truth for the types used across the
//! Skirmish workspace: strongly-typed identifiers, the closed enums that
//! drive the match state machine, and the arena configuration structs.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers for players, matches, spawns
//! - [`enums`] -- Closed enumeration types (team colors, phases, stop reasons)
//! - [`position`] -- Spawn and lobby coordinates
//! - [`rules`] -- Per-arena rule settings read at match build time

pub mod enums;
pub mod ids;
pub mod position;
pub mod rules;

// Re-export all public types at crate root for convenience.
pub use enums::{PhaseKind, StopReason, TeamColor};
pub use ids::{MatchId, PlayerId, SpawnId};
pub use position::Position;
pub use rules::ArenaRules;
