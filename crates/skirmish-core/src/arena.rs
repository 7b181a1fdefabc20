//! Arena definitions: the static world data a match is built from.
//!
//! An arena is configuration, not match state. Matches take a snapshot of
//! the spawn allocations and a copy of the rules when they are created,
//! so setup tooling can keep editing the arena while a match runs.

use std::collections::BTreeMap;

use skirmish_types::{ArenaRules, Position, TeamColor};

use crate::spawn::SpawnAllocation;

/// Errors raised when an arena cannot host a match.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArenaError {
    /// No team has any spawn points configured.
    #[error("arena '{name}' has no spawn points configured for any team")]
    NoSpawns {
        /// The arena in question.
        name: String,
    },

    /// Fewer than two teams have spawn points, so no opposition exists.
    #[error("arena '{name}' needs spawns for at least two teams, found {teams}")]
    NotEnoughTeams {
        /// The arena in question.
        name: String,
        /// Number of teams with at least one spawn.
        teams: usize,
    },
}

/// One configured arena.
#[derive(Debug, Clone)]
pub struct Arena {
    name: String,
    lobby: Position,
    rules: ArenaRules,
    spawns: BTreeMap<TeamColor, SpawnAllocation>,
}

impl Arena {
    /// Create an arena with empty spawn allocations for every color.
    pub fn new(name: &str, lobby: Position, rules: ArenaRules) -> Self {
        let spawns = TeamColor::ALL
            .iter()
            .map(|color| (*color, SpawnAllocation::new()))
            .collect();
        Self {
            name: name.to_owned(),
            lobby,
            rules,
            spawns,
        }
    }

    /// The arena's unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The shared lobby position players wait in and return to.
    pub const fn lobby(&self) -> Position {
        self.lobby
    }

    /// The arena's rule settings.
    pub const fn rules(&self) -> &ArenaRules {
        &self.rules
    }

    /// The spawn allocation for one team (present for every color, but
    /// possibly empty).
    pub fn spawns(&self, color: TeamColor) -> Option<&SpawnAllocation> {
        self.spawns.get(&color)
    }

    /// Mutable access for setup tooling.
    pub fn spawns_mut(&mut self, color: TeamColor) -> Option<&mut SpawnAllocation> {
        self.spawns.get_mut(&color)
    }

    /// Teams with at least one spawn point, in canonical color order.
    /// Only these teams exist when a match is built here.
    pub fn active_teams(&self) -> Vec<TeamColor> {
        self.spawns
            .iter()
            .filter(|(_, allocation)| !allocation.is_empty())
            .map(|(color, _)| *color)
            .collect()
    }

    /// Check that the arena can host a match.
    ///
    /// # Errors
    ///
    /// Returns [`ArenaError::NoSpawns`] if no team has spawns, or
    /// [`ArenaError::NotEnoughTeams`] if only one does.
    pub fn validate(&self) -> Result<(), ArenaError> {
        let teams = self.active_teams().len();
        match teams {
            0 => Err(ArenaError::NoSpawns {
                name: self.name.clone(),
            }),
            1 => Err(ArenaError::NotEnoughTeams {
                name: self.name.clone(),
                teams,
            }),
            _ => Ok(()),
        }
    }
}
