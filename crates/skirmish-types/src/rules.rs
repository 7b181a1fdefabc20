//! Per-arena rule settings.
//!
//! Rules are read from arena configuration once, at match build time, and
//! are never re-read while a match is running. This makes a mid-match
//! config edit harmless: it only affects the next match.

use serde::{Deserialize, Serialize};

/// Rule settings for one arena.
///
/// All durations are wall-clock seconds; the engine converts them to ticks
/// through its fixed tick-ratio table when a phase starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaRules {
    /// Minimum audience size before the waiting countdown starts.
    #[serde(default = "default_min_players")]
    pub min_players: u32,

    /// Maximum members per team.
    #[serde(default = "default_team_capacity")]
    pub team_capacity: u32,

    /// Whether a single remaining team automatically ends the match.
    ///
    /// Disabled during arena testing so a lone builder can walk around
    /// the playing phase without instantly winning.
    #[serde(default = "default_true")]
    pub winnable: bool,

    /// Length of the waiting-phase countdown once enough players joined.
    #[serde(default = "default_waiting_countdown_seconds")]
    pub waiting_countdown_seconds: u64,

    /// Maximum length of the playing phase before it ends undecided
    /// (0 = unlimited).
    #[serde(default = "default_playing_max_seconds")]
    pub playing_max_seconds: u64,

    /// Length of the closing countdown in the done phase.
    #[serde(default = "default_done_seconds")]
    pub done_seconds: u64,
}

impl Default for ArenaRules {
    fn default() -> Self {
        Self {
            min_players: default_min_players(),
            team_capacity: default_team_capacity(),
            winnable: true,
            waiting_countdown_seconds: default_waiting_countdown_seconds(),
            playing_max_seconds: default_playing_max_seconds(),
            done_seconds: default_done_seconds(),
        }
    }
}

const fn default_min_players() -> u32 {
    2
}

const fn default_team_capacity() -> u32 {
    4
}

const fn default_waiting_countdown_seconds() -> u64 {
    60
}

const fn default_playing_max_seconds() -> u64 {
    600
}

const fn default_done_seconds() -> u64 {
    15
}

const fn default_true() -> bool {
    true
}
