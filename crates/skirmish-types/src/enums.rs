//! Closed enumeration types for the match state machine.
//!
//! The phase set is deliberately closed: every match is always in exactly
//! one of [`PhaseKind::Waiting`], [`PhaseKind::Playing`], or
//! [`PhaseKind::Done`], and no "between phases" state is observable from
//! outside the engine.

use serde::{Deserialize, Serialize};

/// Identity of one faction within a match.
///
/// A team exists for a given arena only when the arena has at least one
/// spawn point configured for that color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamColor {
    /// The red team.
    Red,
    /// The blue team.
    Blue,
    /// The green team.
    Green,
    /// The yellow team.
    Yellow,
}

impl TeamColor {
    /// All team colors in canonical order.
    pub const ALL: [Self; 4] = [Self::Red, Self::Blue, Self::Green, Self::Yellow];

    /// Return the lowercase display name of this color.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        }
    }
}

impl core::fmt::Display for TeamColor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The stage a match is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    /// Collecting players; the only phase that accepts joins.
    Waiting,
    /// Combat is running; teams are being eliminated.
    Playing,
    /// Winner announced (or match abandoned); closing countdown runs.
    Done,
}

impl PhaseKind {
    /// Return the phase that follows this one in the fixed cycle,
    /// or `None` for the terminal phase.
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Waiting => Some(Self::Playing),
            Self::Playing => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether a match in this phase admits new players.
    pub const fn accepts_joins(self) -> bool {
        matches!(self, Self::Waiting)
    }
}

impl core::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Done => "done",
        };
        write!(f, "{name}")
    }
}

/// Why a phase stopped.
///
/// A phase's exit hook runs exactly once per phase instance regardless of
/// which reason applies, so teardown logic never depends on the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The phase ran its course (countdown expired, winner decided).
    Natural,
    /// The cycler was told to advance before the phase finished.
    Forced,
    /// The phase was cancelled; the cycler does not advance.
    Cancelled,
}

impl core::fmt::Display for StopReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Natural => "natural",
            Self::Forced => "forced",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{name}")
    }
}
