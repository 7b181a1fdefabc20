//! One elimination match bound to an arena.
//!
//! The match is the aggregation point: it owns the audience group, the
//! team assignment, the winner slot, and the phase cycler, and it lends
//! them out as a [`PhaseContext`] for every phase hook. Admission rules
//! (joinable phase, capacity, liveness) are enforced here, before any
//! phase sees the player.

use tracing::{info, warn};

use skirmish_types::{MatchId, PhaseKind, PlayerId, StopReason, TeamColor};

use crate::arena::Arena;
use crate::assignment::TeamAssignment;
use crate::cycler::{CycleOutcome, PhaseCycler};
use crate::error::MatchError;
use crate::events::{EventBus, PlayerLeft};
use crate::group::{GroupChange, PlayerGroup};
use crate::phase::{PhaseContext, PhaseError};
use crate::sessions::SessionDirectory;
use crate::stats::MatchStats;

/// A single match from first join to teardown.
#[derive(Debug)]
pub struct Match {
    id: MatchId,
    arena: Arena,
    audience: PlayerGroup,
    assignment: Option<TeamAssignment>,
    winner: Option<TeamColor>,
    cycler: PhaseCycler,
}

impl Match {
    /// Create a match for an arena and enter its Waiting phase.
    ///
    /// The arena snapshot is owned by the match: rule or spawn edits made
    /// after this point affect the next match, not this one.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] if the initial phase cannot be entered.
    pub fn create(
        id: MatchId,
        arena: Arena,
        sessions: &dyn SessionDirectory,
        events: &mut EventBus,
    ) -> Result<Self, PhaseError> {
        let mut game = Self {
            id,
            arena,
            audience: PlayerGroup::new(),
            assignment: None,
            winner: None,
            cycler: PhaseCycler::new(),
        };
        {
            let (cycler, mut ctx) = game.parts(sessions, events);
            cycler.start(&mut ctx)?;
        }
        info!(match_id = %game.id, arena = game.arena.name(), "Match created");
        Ok(game)
    }

    /// This match's ID.
    pub const fn id(&self) -> MatchId {
        self.id
    }

    /// The arena snapshot the match runs in.
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The active phase kind, or `None` once the match is over.
    pub fn phase_kind(&self) -> Option<PhaseKind> {
        self.cycler.kind()
    }

    /// The winning team, if the match has been decided.
    pub const fn winner(&self) -> Option<TeamColor> {
        self.winner
    }

    /// Whether the cycler has run out of phases.
    pub const fn is_finished(&self) -> bool {
        self.cycler.is_finished()
    }

    /// Live audience size (participants and spectators).
    pub fn audience_size(&self, sessions: &dyn SessionDirectory) -> usize {
        self.audience.size(sessions)
    }

    /// Whether a player is a live audience member.
    pub fn contains(&self, player: PlayerId, sessions: &dyn SessionDirectory) -> bool {
        self.audience.contains(player, sessions)
    }

    /// The team a player is currently assigned to, if the match is in
    /// (or past) its playing phase and the player has not been
    /// eliminated.
    pub fn team_of(&self, player: PlayerId) -> Option<TeamColor> {
        self.assignment.as_ref().and_then(|a| a.team_of(player))
    }

    /// Admit a player into the audience.
    ///
    /// Only the Waiting phase accepts joins. The player is moved to the
    /// arena lobby and the join is announced to everyone present.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the phase is past joining, the player is
    /// offline or already present, or every seat is taken.
    pub fn join(
        &mut self,
        player: PlayerId,
        sessions: &dyn SessionDirectory,
    ) -> Result<(), MatchError> {
        let phase = self.cycler.kind().unwrap_or(PhaseKind::Done);
        if !phase.accepts_joins() {
            return Err(MatchError::WrongPhase { phase });
        }
        if !sessions.is_online(player) {
            return Err(MatchError::Offline);
        }
        if self.seats_taken(sessions) >= self.seat_limit() {
            return Err(MatchError::MatchFull);
        }
        match self.audience.add(player, sessions) {
            GroupChange::Added(_) => {}
            GroupChange::Removed(_) | GroupChange::Unchanged => {
                return Err(MatchError::AlreadyJoined);
            }
        }

        sessions.teleport(player, &self.arena.lobby());
        let name = sessions.display_name(player);
        let joined = self.audience.size(sessions);
        let needed = self.arena.rules().min_players;
        self.broadcast(sessions, &format!("{name} joined ({joined}/{needed})"));
        info!(match_id = %self.id, %player, joined, "Player joined");
        Ok(())
    }

    /// Remove a player from the match entirely: team seat, audience
    /// membership, and visual state.
    ///
    /// Leaving mid-combat counts as an elimination, so the winner
    /// condition is re-evaluated immediately rather than on the next
    /// tick.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NotInMatch`] if the player was not a live
    /// member, or propagates a lifecycle fault from an immediate phase
    /// transition.
    pub fn leave(
        &mut self,
        player: PlayerId,
        sessions: &dyn SessionDirectory,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        let phase = self.cycler.kind().unwrap_or(PhaseKind::Done);
        let team = self
            .assignment
            .as_mut()
            .and_then(|a| a.remove_player(player, sessions));
        let change = self.audience.remove(player, sessions);
        if team.is_none() && change == GroupChange::Unchanged {
            return Err(MatchError::NotInMatch);
        }

        sessions.clear_effects(player);
        events.publish_player_left(&PlayerLeft {
            match_id: self.id,
            player,
            phase,
        });
        info!(match_id = %self.id, %player, %phase, "Player left");

        self.settle_if_decided(sessions, events)?;
        Ok(())
    }

    /// Knock a player out of combat. They lose their team seat but stay
    /// in the audience as a spectator until the match ends.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::WrongPhase`] outside the Playing phase,
    /// [`MatchError::NotInMatch`] if the player holds no team seat, or a
    /// lifecycle fault from an immediate phase transition.
    pub fn eliminate(
        &mut self,
        player: PlayerId,
        sessions: &dyn SessionDirectory,
        events: &mut EventBus,
    ) -> Result<(), MatchError> {
        let phase = self.cycler.kind().unwrap_or(PhaseKind::Done);
        if phase != PhaseKind::Playing {
            return Err(MatchError::WrongPhase { phase });
        }
        let seat = self
            .assignment
            .as_mut()
            .and_then(|a| a.remove_player(player, sessions));
        let Some(team) = seat else {
            return Err(MatchError::NotInMatch);
        };

        sessions.send_message(player, "You are out. Spectating until the match ends.");
        let name = sessions.display_name(player);
        self.broadcast(sessions, &format!("{name} was eliminated"));
        info!(match_id = %self.id, %player, %team, "Player eliminated");

        self.settle_if_decided(sessions, events)?;
        Ok(())
    }

    /// Forward one simulation tick to the active phase.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] on a lifecycle fault; the caller should
    /// tear this match down and keep other matches running.
    pub fn update(
        &mut self,
        sessions: &dyn SessionDirectory,
        events: &mut EventBus,
    ) -> Result<CycleOutcome, PhaseError> {
        let (cycler, mut ctx) = self.parts(sessions, events);
        cycler.update(&mut ctx)
    }

    /// Skip the rest of the current phase (privileged force-start or
    /// force-stop).
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] if the next phase cannot be entered.
    pub fn force_next(
        &mut self,
        sessions: &dyn SessionDirectory,
        events: &mut EventBus,
    ) -> Result<CycleOutcome, PhaseError> {
        warn!(match_id = %self.id, phase = ?self.cycler.kind(), "Phase force-advanced");
        let (cycler, mut ctx) = self.parts(sessions, events);
        cycler.cycle_next(&mut ctx)
    }

    /// Cancel the match outright. The current phase exits with a
    /// cancelled reason and no further phase runs.
    pub fn cancel(&mut self, sessions: &dyn SessionDirectory, events: &mut EventBus) {
        warn!(match_id = %self.id, phase = ?self.cycler.kind(), "Match cancelled");
        let (cycler, mut ctx) = self.parts(sessions, events);
        cycler.cancel(&mut ctx);
    }

    /// Forcibly end the match after a lifecycle fault, running whatever
    /// exit bookkeeping is still possible.
    pub fn force_teardown(&mut self, sessions: &dyn SessionDirectory, events: &mut EventBus) {
        warn!(match_id = %self.id, phase = ?self.cycler.kind(), "Match torn down");
        let (cycler, mut ctx) = self.parts(sessions, events);
        cycler.teardown(&mut ctx);
    }

    /// Single-match stat records for everyone still present at the end:
    /// a win for live winner-team members, a loss for everyone else.
    pub fn result_records(&self, sessions: &dyn SessionDirectory) -> Vec<MatchStats> {
        self.audience
            .iter_live(sessions)
            .map(|player| {
                let won = self.winner.is_some() && self.team_of(player) == self.winner;
                if won {
                    MatchStats::win(player)
                } else {
                    MatchStats::loss(player)
                }
            })
            .collect()
    }

    /// Re-evaluate the winner condition after a roster change and end
    /// the playing phase on the spot if the match is decided.
    fn settle_if_decided(
        &mut self,
        sessions: &dyn SessionDirectory,
        events: &mut EventBus,
    ) -> Result<(), PhaseError> {
        if self.cycler.kind() != Some(PhaseKind::Playing) || !self.arena.rules().winnable {
            return Ok(());
        }
        let Some(color) = self.assignment.as_ref().and_then(|a| a.winner(sessions)) else {
            return Ok(());
        };

        self.winner = Some(color);
        info!(match_id = %self.id, winner = %color, "Match decided");
        let (cycler, mut ctx) = self.parts(sessions, events);
        let _ = cycler.advance(&mut ctx, StopReason::Natural)?;
        Ok(())
    }

    /// Split the match into its cycler and a phase context borrowing the
    /// remaining fields.
    fn parts<'a>(
        &'a mut self,
        sessions: &'a dyn SessionDirectory,
        events: &'a mut EventBus,
    ) -> (&'a mut PhaseCycler, PhaseContext<'a>) {
        let Self {
            id,
            arena,
            audience,
            assignment,
            winner,
            cycler,
        } = self;
        (
            cycler,
            PhaseContext {
                match_id: *id,
                arena,
                audience,
                assignment,
                winner,
                sessions,
                events,
            },
        )
    }

    fn broadcast(&self, sessions: &dyn SessionDirectory, message: &str) {
        for player in self.audience.iter_live(sessions) {
            sessions.send_message(player, message);
        }
    }

    /// Total joinable seats: one per team member slot across the teams
    /// that have spawns configured.
    fn seat_limit(&self) -> u64 {
        let teams = u64::try_from(self.arena.active_teams().len()).unwrap_or(u64::MAX);
        teams.saturating_mul(u64::from(self.arena.rules().team_capacity))
    }

    fn seats_taken(&self, sessions: &dyn SessionDirectory) -> u64 {
        u64::try_from(self.audience.size(sessions)).unwrap_or(u64::MAX)
    }
}
