//! Errors for match admission and control operations.
//!
//! Phase-internal faults live in [`PhaseError`](crate::phase::PhaseError);
//! this module covers the caller-facing surface: joins, leaves, and the
//! privileged force/cancel commands. Every variant is a rejected request
//! the caller can report back to the player, not an engine fault.

use thiserror::Error;

use skirmish_types::PhaseKind;

use crate::arena::ArenaError;
use crate::phase::PhaseError;

/// A match admission or control request was rejected.
#[derive(Debug, Error)]
pub enum MatchError {
    /// The match is past its joinable phase.
    #[error("cannot join during the {phase} phase")]
    WrongPhase {
        /// The phase the match was in.
        phase: PhaseKind,
    },

    /// The player is already a member of this match.
    #[error("player is already in this match")]
    AlreadyJoined,

    /// Every team seat and the audience allowance are taken.
    #[error("the match is full")]
    MatchFull,

    /// The player has no live session; nothing to admit.
    #[error("player has no live session")]
    Offline,

    /// The player is not a member of this match.
    #[error("player is not in this match")]
    NotInMatch,

    /// A listener vetoed the match creation.
    #[error("match creation was cancelled by a listener")]
    CreateCancelled,

    /// No match is running on this arena.
    #[error("no match is running on arena '{name}'")]
    NoMatch {
        /// The requested arena name.
        name: String,
    },

    /// No arena with this name is configured.
    #[error("no arena named '{name}' is configured")]
    UnknownArena {
        /// The requested arena name.
        name: String,
    },

    /// The arena's configuration cannot host a match.
    #[error("arena is not playable: {source}")]
    UnusableArena {
        /// The failed validation.
        #[from]
        source: ArenaError,
    },

    /// A phase lifecycle hook failed while servicing the request.
    #[error("match lifecycle fault: {source}")]
    Lifecycle {
        /// The underlying phase fault.
        #[from]
        source: PhaseError,
    },
}
