//! Team assignment: the full set of teams for one match.
//!
//! Built once per match, on the transition into the playing phase, from
//! the arena's non-empty spawn allocations. The assignment also owns the
//! canonical player-to-team back-reference map: teams and players never
//! hold strong references to each other, they resolve membership through
//! this owner on each access.

use std::collections::BTreeMap;

use tracing::debug;

use skirmish_types::{PlayerId, Position, TeamColor};

use crate::arena::Arena;
use crate::group::GroupChange;
use crate::sessions::SessionDirectory;
use crate::spawn::SpawnAllocation;
use crate::team::{Team, TeamError};

/// The teams of one running match, keyed by identity.
#[derive(Debug, Clone)]
pub struct TeamAssignment {
    teams: BTreeMap<TeamColor, Team>,
    spawns: BTreeMap<TeamColor, SpawnAllocation>,
    membership: BTreeMap<PlayerId, TeamColor>,
}

impl TeamAssignment {
    /// Build the team set from an arena's non-empty spawn allocations.
    ///
    /// Teams with zero spawns configured are skipped entirely: they do
    /// not exist for this match, and looking them up yields
    /// [`TeamError::NotFound`]. Spawn allocations are snapshotted so
    /// later arena edits cannot move match-time spawns.
    pub fn build(arena: &Arena) -> Self {
        let capacity = arena.rules().team_capacity;
        let mut teams = BTreeMap::new();
        let mut spawns = BTreeMap::new();

        for color in arena.active_teams() {
            if let Some(allocation) = arena.spawns(color) {
                teams.insert(color, Team::new(color, capacity));
                spawns.insert(color, allocation.snapshot());
            }
        }

        debug!(arena = arena.name(), teams = teams.len(), capacity, "Team assignment built");
        Self {
            teams,
            spawns,
            membership: BTreeMap::new(),
        }
    }

    /// Look up a team by identity.
    ///
    /// # Errors
    ///
    /// Returns [`TeamError::NotFound`] if the arena had no spawns for
    /// this color when the assignment was built.
    pub fn team(&self, color: TeamColor) -> Result<&Team, TeamError> {
        self.teams.get(&color).ok_or(TeamError::NotFound { color })
    }

    /// The colors built for this match, in canonical order.
    pub fn colors(&self) -> Vec<TeamColor> {
        self.teams.keys().copied().collect()
    }

    /// Number of teams in this match.
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// The team a player currently belongs to, if any.
    ///
    /// The back-reference is resolved through this owner; a player whose
    /// session died still maps here until removed, but is invisible to
    /// every live-membership read.
    pub fn team_of(&self, player: PlayerId) -> Option<TeamColor> {
        self.membership.get(&player).copied()
    }

    /// Add a player to a team, updating the back-reference map.
    ///
    /// # Errors
    ///
    /// Returns [`TeamError::NotFound`] for a team that was never built,
    /// or [`TeamError::CapacityExceeded`] if the team is full.
    pub fn add_player(
        &mut self,
        color: TeamColor,
        player: PlayerId,
        sessions: &dyn SessionDirectory,
    ) -> Result<(), TeamError> {
        let team = self
            .teams
            .get_mut(&color)
            .ok_or(TeamError::NotFound { color })?;
        if let GroupChange::Added(_) = team.add(player, sessions)? {
            self.membership.insert(player, color);
        }
        Ok(())
    }

    /// Remove a player from their team, clearing the back-reference.
    /// Returns the team they were on, if any.
    pub fn remove_player(
        &mut self,
        player: PlayerId,
        sessions: &dyn SessionDirectory,
    ) -> Option<TeamColor> {
        let color = self.membership.remove(&player)?;
        if let Some(team) = self.teams.get_mut(&color) {
            let _ = team.remove(player, sessions);
        }
        Some(color)
    }

    /// Spread the given players across teams, smallest team first.
    ///
    /// Players that fit nowhere (every team full) are returned and stay
    /// pure spectators; this is a validation condition, not a fault.
    pub fn distribute(
        &mut self,
        players: &[PlayerId],
        sessions: &dyn SessionDirectory,
    ) -> Vec<PlayerId> {
        let mut spectators = Vec::new();
        for &player in players {
            let target = self
                .teams
                .values()
                .filter(|team| team.has_space(sessions))
                .min_by_key(|team| team.size(sessions))
                .map(Team::color);

            match target {
                Some(color) => {
                    if self.add_player(color, player, sessions).is_err() {
                        spectators.push(player);
                    }
                }
                None => spectators.push(player),
            }
        }
        spectators
    }

    /// The spawn position for a player's next respawn, rotating through
    /// the team's spawn points by roster position.
    pub fn spawn_position(&self, player: PlayerId, index: usize) -> Option<Position> {
        let color = self.team_of(player)?;
        let positions = self.spawns.get(&color)?.positions();
        if positions.is_empty() {
            return None;
        }
        positions.get(index % positions.len()).copied()
    }

    /// Evaluate the winner condition: exactly one team with at least one
    /// live member while every other team has zero.
    pub fn winner(&self, sessions: &dyn SessionDirectory) -> Option<TeamColor> {
        let mut alive = self
            .teams
            .values()
            .filter(|team| team.size(sessions) > 0)
            .map(Team::color);

        let first = alive.next()?;
        if alive.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Total live members across all teams.
    pub fn live_players(&self, sessions: &dyn SessionDirectory) -> usize {
        self.teams.values().map(|team| team.size(sessions)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skirmish_types::ArenaRules;

    use super::*;
    use crate::sessions::StubSessions;

    fn two_team_arena(capacity: u32) -> Arena {
        let rules = ArenaRules {
            team_capacity: capacity,
            ..ArenaRules::default()
        };
        let mut arena = Arena::new("quarry", Position::new(0.0, 70.0, 0.0), rules);
        for color in [TeamColor::Red, TeamColor::Blue] {
            if let Some(allocation) = arena.spawns_mut(color) {
                let _ = allocation.add(Position::new(0.0, 64.0, 0.0));
                let _ = allocation.add(Position::new(4.0, 64.0, 0.0));
            }
        }
        arena
    }

    fn online(sessions: &StubSessions, name: &str) -> PlayerId {
        let p = PlayerId::new();
        sessions.connect(p, name);
        p
    }

    #[test]
    fn build_skips_empty_allocations() {
        let assignment = TeamAssignment::build(&two_team_arena(4));
        assert_eq!(assignment.colors(), vec![TeamColor::Red, TeamColor::Blue]);
        assert_eq!(
            assignment.team(TeamColor::Green),
            Err(TeamError::NotFound {
                color: TeamColor::Green
            })
        );
    }

    #[test]
    fn add_player_sets_back_reference() {
        let sessions = StubSessions::new();
        let mut assignment = TeamAssignment::build(&two_team_arena(4));
        let p = online(&sessions, "Alice");

        assignment.add_player(TeamColor::Red, p, &sessions).unwrap();
        assert_eq!(assignment.team_of(p), Some(TeamColor::Red));

        assert_eq!(assignment.remove_player(p, &sessions), Some(TeamColor::Red));
        assert_eq!(assignment.team_of(p), None);
    }

    #[test]
    fn distribute_balances_smallest_first() {
        let sessions = StubSessions::new();
        let mut assignment = TeamAssignment::build(&two_team_arena(2));
        let players: Vec<_> = (0..4).map(|i| online(&sessions, &format!("p{i}"))).collect();

        let spectators = assignment.distribute(&players, &sessions);
        assert!(spectators.is_empty());
        assert_eq!(assignment.team(TeamColor::Red).unwrap().size(&sessions), 2);
        assert_eq!(assignment.team(TeamColor::Blue).unwrap().size(&sessions), 2);
    }

    #[test]
    fn distribute_overflow_becomes_spectators() {
        let sessions = StubSessions::new();
        let mut assignment = TeamAssignment::build(&two_team_arena(1));
        let players: Vec<_> = (0..3).map(|i| online(&sessions, &format!("p{i}"))).collect();

        let spectators = assignment.distribute(&players, &sessions);
        assert_eq!(spectators.len(), 1);
        assert_eq!(assignment.live_players(&sessions), 2);
    }

    #[test]
    fn winner_requires_exactly_one_live_team() {
        let sessions = StubSessions::new();
        let mut assignment = TeamAssignment::build(&two_team_arena(4));

        let a1 = online(&sessions, "a1");
        let a2 = online(&sessions, "a2");
        let a3 = online(&sessions, "a3");
        let b1 = online(&sessions, "b1");
        let b2 = online(&sessions, "b2");

        for p in [a1, a2, a3] {
            assignment.add_player(TeamColor::Red, p, &sessions).unwrap();
        }
        for p in [b1, b2] {
            assignment.add_player(TeamColor::Blue, p, &sessions).unwrap();
        }

        // Both teams alive: no winner.
        assert_eq!(assignment.winner(&sessions), None);

        // Eliminate all of blue: red wins.
        let _ = assignment.remove_player(b1, &sessions);
        let _ = assignment.remove_player(b2, &sessions);
        assert_eq!(assignment.winner(&sessions), Some(TeamColor::Red));
    }

    #[test]
    fn disconnects_count_as_eliminations_for_winner() {
        let sessions = StubSessions::new();
        let mut assignment = TeamAssignment::build(&two_team_arena(4));

        let a = online(&sessions, "a");
        let b = online(&sessions, "b");
        assignment.add_player(TeamColor::Red, a, &sessions).unwrap();
        assignment.add_player(TeamColor::Blue, b, &sessions).unwrap();

        sessions.disconnect(b);
        assert_eq!(assignment.winner(&sessions), Some(TeamColor::Red));
    }

    #[test]
    fn spawn_positions_rotate() {
        let sessions = StubSessions::new();
        let mut assignment = TeamAssignment::build(&two_team_arena(4));
        let p = online(&sessions, "Alice");
        assignment.add_player(TeamColor::Red, p, &sessions).unwrap();

        let first = assignment.spawn_position(p, 0).unwrap();
        let wrapped = assignment.spawn_position(p, 2).unwrap();
        assert_eq!(first, wrapped);
    }
}
