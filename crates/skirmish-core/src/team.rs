//! Teams: one named faction with a capacity and a weak-membership roster.

use skirmish_types::{PlayerId, TeamColor};

use crate::group::{GroupChange, PlayerGroup};
use crate::sessions::SessionDirectory;

/// Errors surfaced by team operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TeamError {
    /// The team is already at capacity.
    #[error("team {color} is full ({capacity} members)")]
    CapacityExceeded {
        /// The team that rejected the join.
        color: TeamColor,
        /// The capacity it was built with.
        capacity: u32,
    },

    /// The requested team was never built for this match (the arena had
    /// no spawns configured for it).
    #[error("team {color} does not exist in this match")]
    NotFound {
        /// The missing team identity.
        color: TeamColor,
    },
}

/// One faction in a running match.
///
/// Capacity is read from arena rules once, at assignment build time, and
/// never re-read live: a mid-match rule edit cannot shrink a team under
/// its current membership. The live member count is always at most the
/// capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    color: TeamColor,
    capacity: u32,
    members: PlayerGroup,
}

impl Team {
    /// Create an empty team with the given capacity.
    pub const fn new(color: TeamColor, capacity: u32) -> Self {
        Self {
            color,
            capacity,
            members: PlayerGroup::new(),
        }
    }

    /// The team's identity.
    pub const fn color(&self) -> TeamColor {
        self.color
    }

    /// The capacity this team was built with.
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// The member roster.
    pub const fn members(&self) -> &PlayerGroup {
        &self.members
    }

    /// Number of live members.
    pub fn size(&self, sessions: &dyn SessionDirectory) -> usize {
        self.members.size(sessions)
    }

    /// Whether at least one more player fits.
    pub fn has_space(&self, sessions: &dyn SessionDirectory) -> bool {
        let size = u64::try_from(self.size(sessions)).unwrap_or(u64::MAX);
        size < u64::from(self.capacity)
    }

    /// Add a player to the roster.
    ///
    /// # Errors
    ///
    /// Returns [`TeamError::CapacityExceeded`] when the live member count
    /// has reached capacity. The caller (the team assignment) maintains
    /// the player's team back-reference on success.
    pub fn add(
        &mut self,
        player: PlayerId,
        sessions: &dyn SessionDirectory,
    ) -> Result<GroupChange, TeamError> {
        if !self.has_space(sessions) {
            return Err(TeamError::CapacityExceeded {
                color: self.color,
                capacity: self.capacity,
            });
        }
        Ok(self.members.add(player, sessions))
    }

    /// Remove a player from the roster.
    pub fn remove(&mut self, player: PlayerId, sessions: &dyn SessionDirectory) -> GroupChange {
        self.members.remove(player, sessions)
    }
}
