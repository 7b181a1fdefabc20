//! The match phase state machine.
//!
//! A match is always in exactly one phase of the closed set
//! {Waiting, Playing, Done}. Instead of a class-per-state hierarchy,
//! [`Phase`] is a tagged variant carrying each state's own payload
//! (its ticker and countdown bookkeeping), dispatched through a single
//! `update` per variant:
//!
//! 1. **Waiting** -- collect players; hold the countdown while the
//!    audience is under the minimum, run it once enough have joined,
//!    announce milestones, then advance to Playing.
//!
//! 2. **Playing** -- build the team assignment on entry, let external
//!    combat logic erode team rosters, and watch for the winner condition
//!    or the time limit.
//!
//! 3. **Done** -- restore everyone to a neutral observer state at the
//!    lobby, run the closing countdown, then signal the match is over.
//!
//! Phase instances are created fresh on each transition and never reused.
//! Durations are soft deadlines evaluated once per update: an expiring
//! countdown never preempts a running update.

use std::collections::BTreeMap;

use tracing::{debug, info};

use skirmish_types::{MatchId, PhaseKind, StopReason, TeamColor};

use crate::arena::{Arena, ArenaError};
use crate::assignment::TeamAssignment;
use crate::events::{EventBus, PhaseStopped};
use crate::group::PlayerGroup;
use crate::sessions::SessionDirectory;
use crate::time::{TimeError, TimeUnit, TimeValue, Ticker};

/// Seconds between repeated "need more players" notices while the
/// waiting audience is under the minimum.
const NEED_MORE_NOTICE_SECONDS: u64 = 30;

/// Errors escaping a phase's enter or update hook.
///
/// Any of these is a lifecycle fault: fatal to the owning match only.
/// The engine force-tears the match down and carries on.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PhaseError {
    /// The arena cannot host a match.
    #[error("arena rejected: {source}")]
    Arena {
        /// The underlying arena error.
        #[from]
        source: ArenaError,
    },

    /// A ticker could not be constructed.
    #[error("time error: {source}")]
    Time {
        /// The underlying time error.
        #[from]
        source: TimeError,
    },
}

/// What the current phase wants the cycler to do after an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseDirective {
    /// Stay in this phase.
    Continue,
    /// Transition to the next phase (or finish, from Done).
    Advance,
    /// Abandon the match entirely, with no winner.
    Teardown,
}

/// Borrowed view of the match state a phase may inspect and mutate.
///
/// Phases never own match state; the match lends its fields out for the
/// duration of one hook call. This keeps every back-reference (phase to
/// match, team to match) a plain borrow resolved by the owner.
pub struct PhaseContext<'a> {
    /// The owning match's ID, for logs and events.
    pub match_id: MatchId,
    /// The arena the match runs in.
    pub arena: &'a Arena,
    /// Everyone associated with the match, participants and observers.
    pub audience: &'a mut PlayerGroup,
    /// The team assignment; built on the transition into Playing.
    pub assignment: &'a mut Option<TeamAssignment>,
    /// The winner slot, set by Playing when the match is decided.
    pub winner: &'a mut Option<TeamColor>,
    /// Host session directory.
    pub sessions: &'a dyn SessionDirectory,
    /// Lifecycle event bus.
    pub events: &'a mut EventBus,
}

impl PhaseContext<'_> {
    /// Send a message to every live audience member.
    fn broadcast(&self, message: &str) {
        for player in self.audience.iter_live(self.sessions) {
            self.sessions.send_message(player, message);
        }
    }

    /// Play the attention cue for every live audience member.
    fn cue_all(&self) {
        for player in self.audience.iter_live(self.sessions) {
            self.sessions.play_cue(player);
        }
    }

    /// Live audience size.
    fn audience_size(&self) -> u64 {
        u64::try_from(self.audience.size(self.sessions)).unwrap_or(u64::MAX)
    }
}

/// Waiting-phase payload: the held-or-running start countdown.
#[derive(Debug, Clone)]
pub struct WaitingState {
    ticker: Ticker,
    countdown: TimeValue,
    counting: bool,
    last_missing: Option<u64>,
}

/// Playing-phase payload: the match clock.
#[derive(Debug, Clone)]
pub struct PlayingState {
    ticker: Ticker,
    max_duration: TimeValue,
}

/// Done-phase payload: the closing countdown.
#[derive(Debug, Clone)]
pub struct DoneState {
    ticker: Ticker,
    duration: TimeValue,
}

/// One stage of a match's life, with its state payload.
#[derive(Debug, Clone)]
pub enum Phase {
    /// Collecting players.
    Waiting(WaitingState),
    /// Combat running.
    Playing(PlayingState),
    /// Closing down.
    Done(DoneState),
}

impl Phase {
    /// Construct and enter a fresh phase of the given kind.
    ///
    /// Runs the phase's entry behavior (teleports, announcements, team
    /// assignment build) before returning the new instance.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] if entry fails; the caller treats this as a
    /// lifecycle fault for the owning match.
    pub fn enter(kind: PhaseKind, ctx: &mut PhaseContext<'_>) -> Result<Self, PhaseError> {
        info!(match_id = %ctx.match_id, phase = %kind, "Phase entered");
        match kind {
            PhaseKind::Waiting => Ok(Self::Waiting(WaitingState {
                ticker: Ticker::per_tick(),
                countdown: TimeValue::seconds(ctx.arena.rules().waiting_countdown_seconds),
                counting: false,
                last_missing: None,
            })),
            PhaseKind::Playing => enter_playing(ctx).map(Self::Playing),
            PhaseKind::Done => Ok(Self::Done(enter_done(ctx))),
        }
    }

    /// The state tag of this phase.
    pub const fn kind(&self) -> PhaseKind {
        match self {
            Self::Waiting(_) => PhaseKind::Waiting,
            Self::Playing(_) => PhaseKind::Playing,
            Self::Done(_) => PhaseKind::Done,
        }
    }

    /// Run one tick of this phase's update behavior.
    ///
    /// Must return promptly: the host calls this once per simulation tick
    /// on the tick thread.
    ///
    /// # Errors
    ///
    /// Returns [`PhaseError`] on a lifecycle fault.
    pub fn update(&mut self, ctx: &mut PhaseContext<'_>) -> Result<PhaseDirective, PhaseError> {
        match self {
            Self::Waiting(state) => Ok(update_waiting(state, ctx)),
            Self::Playing(state) => Ok(update_playing(state, ctx)),
            Self::Done(state) => Ok(update_done(state, ctx)),
        }
    }

    /// Run this phase's exit behavior.
    ///
    /// The cycler guarantees this runs exactly once per phase instance,
    /// whether the stop was natural, forced, or cancelled, so teardown
    /// side effects (the phase-stop event, log record) always happen.
    pub fn exit(&mut self, reason: StopReason, ctx: &mut PhaseContext<'_>) {
        info!(match_id = %ctx.match_id, phase = %self.kind(), %reason, "Phase stopped");
        let event = PhaseStopped {
            match_id: ctx.match_id,
            phase: self.kind(),
            reason,
        };
        ctx.events.publish_phase_stopped(&event);
    }

    /// Elapsed time of the current phase in the given unit.
    pub const fn elapsed(&self, unit: TimeUnit) -> u64 {
        match self {
            Self::Waiting(state) => state.ticker.elapsed(unit),
            Self::Playing(state) => state.ticker.elapsed(unit),
            Self::Done(state) => state.ticker.elapsed(unit),
        }
    }
}

/// Waiting: hold or run the start countdown.
fn update_waiting(state: &mut WaitingState, ctx: &mut PhaseContext<'_>) -> PhaseDirective {
    let audience = ctx.audience_size();
    if audience == 0 {
        // Everybody left before the match started.
        return PhaseDirective::Teardown;
    }

    let minimum = u64::from(ctx.arena.rules().min_players);
    let missing = minimum.saturating_sub(audience);

    if missing > 0 {
        if state.counting {
            // Someone left mid-countdown; hold at the not-running mark.
            debug!(match_id = %ctx.match_id, missing, "Countdown held");
            state.counting = false;
            state.ticker.reset();
        }
        let _ = state.ticker.tick();

        // Re-announce only when the shortfall changed, or on the coarse
        // periodic cycle, to avoid spamming the lobby.
        let changed = state.last_missing != Some(missing);
        if changed || state.ticker.is_cycling(NEED_MORE_NOTICE_SECONDS, TimeUnit::Seconds) {
            state.last_missing = Some(missing);
            ctx.broadcast(&format!("Waiting for {missing} more player(s) to start"));
        }
        return PhaseDirective::Continue;
    }

    if !state.counting {
        state.counting = true;
        state.last_missing = None;
        state.ticker.reset();
        let total = state.countdown.to_seconds();
        ctx.broadcast(&format!("Match starts in {total}s"));
        ctx.cue_all();
        return PhaseDirective::Continue;
    }

    let _ = state.ticker.tick();
    let total = state.countdown.to_seconds();
    let elapsed = state.ticker.elapsed(TimeUnit::Seconds);
    if elapsed >= total {
        return PhaseDirective::Advance;
    }

    if state.ticker.is_cycling(1, TimeUnit::Seconds) {
        let remaining = total.saturating_sub(elapsed);
        if announce_at(remaining) {
            ctx.broadcast(&format!("Match starts in {remaining}s"));
            ctx.cue_all();
        }
    }
    PhaseDirective::Continue
}

/// Countdown milestone schedule: every second in the final 3, every 5 s
/// under 20 s, every 15 s under 60 s, every 30 s otherwise.
const fn announce_at(remaining: u64) -> bool {
    if remaining <= 3 {
        true
    } else if remaining < 20 {
        remaining % 5 == 0
    } else if remaining < 60 {
        remaining % 15 == 0
    } else {
        remaining % 30 == 0
    }
}

/// Playing entry: build the team assignment (once), place everyone.
fn enter_playing(ctx: &mut PhaseContext<'_>) -> Result<PlayingState, PhaseError> {
    if ctx.assignment.is_none() {
        ctx.arena.validate()?;
        let mut assignment = TeamAssignment::build(ctx.arena);
        let players = ctx.audience.live_members(ctx.sessions);
        let spectators = assignment.distribute(&players, ctx.sessions);

        let mut spawn_index: BTreeMap<TeamColor, usize> = BTreeMap::new();
        for player in &players {
            if let Some(color) = assignment.team_of(*player) {
                let index = spawn_index.entry(color).or_insert(0);
                if let Some(position) = assignment.spawn_position(*player, *index) {
                    ctx.sessions.teleport(*player, &position);
                }
                *index = index.saturating_add(1);
                ctx.sessions
                    .send_message(*player, &format!("You fight for team {color}"));
            }
        }
        for spectator in spectators {
            ctx.sessions
                .send_message(spectator, "All teams are full; you are spectating");
        }
        *ctx.assignment = Some(assignment);
    } else {
        // Already built (rebuild would orphan the existing rosters and
        // their back-references, so it is an idempotent no-op).
        debug!(match_id = %ctx.match_id, "Team assignment already built; keeping rosters");
    }

    ctx.broadcast("The match has begun!");
    Ok(PlayingState {
        ticker: Ticker::per_tick(),
        max_duration: TimeValue::seconds(ctx.arena.rules().playing_max_seconds),
    })
}

/// Playing: watch for the winner condition, the time limit, or abandonment.
fn update_playing(state: &mut PlayingState, ctx: &mut PhaseContext<'_>) -> PhaseDirective {
    let _ = state.ticker.tick();

    if ctx.audience.is_empty(ctx.sessions) {
        // Abandoned mid-match: torn down without declaring a winner.
        return PhaseDirective::Teardown;
    }

    if ctx.arena.rules().winnable {
        let winner = ctx
            .assignment
            .as_ref()
            .and_then(|assignment| assignment.winner(ctx.sessions));
        if let Some(color) = winner {
            *ctx.winner = Some(color);
            return PhaseDirective::Advance;
        }
    }

    let limit = state.max_duration.to_seconds();
    if limit > 0 && state.ticker.elapsed(TimeUnit::Seconds) >= limit {
        ctx.broadcast("Time limit reached");
        return PhaseDirective::Advance;
    }

    PhaseDirective::Continue
}

/// Done entry: neutralize and recall everyone, announce the outcome.
fn enter_done(ctx: &mut PhaseContext<'_>) -> DoneState {
    let lobby = ctx.arena.lobby();
    for player in ctx.audience.live_members(ctx.sessions) {
        ctx.sessions.clear_effects(player);
        ctx.sessions.teleport(player, &lobby);
    }

    match *ctx.winner {
        Some(color) => ctx.broadcast(&format!("Team {color} wins!")),
        None => ctx.broadcast("The match ended with no winner"),
    }

    DoneState {
        ticker: Ticker::per_tick(),
        duration: TimeValue::seconds(ctx.arena.rules().done_seconds),
    }
}

/// Done: run the closing countdown; advance early if everyone leaves.
fn update_done(state: &mut DoneState, ctx: &mut PhaseContext<'_>) -> PhaseDirective {
    let _ = state.ticker.tick();

    if ctx.audience.is_empty(ctx.sessions) {
        return PhaseDirective::Advance;
    }

    let total = state.duration.to_seconds();
    let elapsed = state.ticker.elapsed(TimeUnit::Seconds);
    if elapsed >= total {
        return PhaseDirective::Advance;
    }

    let remaining = total.saturating_sub(elapsed);
    if remaining <= 3 {
        ctx.broadcast(&format!("Arena closes in {remaining}s"));
    } else if state.ticker.is_cycling(5, TimeUnit::Seconds) {
        ctx.broadcast(&format!("Arena closes in {remaining}s"));
    }

    PhaseDirective::Continue
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skirmish_types::{ArenaRules, PlayerId, Position};

    use super::*;
    use crate::sessions::StubSessions;

    fn test_arena(min_players: u32, countdown_seconds: u64) -> Arena {
        let rules = ArenaRules {
            min_players,
            team_capacity: 2,
            waiting_countdown_seconds: countdown_seconds,
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

    struct Fixture {
        match_id: MatchId,
        arena: Arena,
        audience: PlayerGroup,
        assignment: Option<TeamAssignment>,
        winner: Option<TeamColor>,
        events: EventBus,
    }

    impl Fixture {
        fn new(arena: Arena) -> Self {
            Self {
                match_id: MatchId::new(),
                arena,
                audience: PlayerGroup::new(),
                assignment: None,
                winner: None,
                events: EventBus::new(),
            }
        }

        fn ctx<'a>(&'a mut self, sessions: &'a StubSessions) -> PhaseContext<'a> {
            PhaseContext {
                match_id: self.match_id,
                arena: &self.arena,
                audience: &mut self.audience,
                assignment: &mut self.assignment,
                winner: &mut self.winner,
                sessions,
                events: &mut self.events,
            }
        }
    }

    fn join(fixture: &mut Fixture, sessions: &StubSessions, name: &str) -> PlayerId {
        let p = PlayerId::new();
        sessions.connect(p, name);
        let _ = fixture.audience.add(p, sessions);
        p
    }

    #[test]
    fn waiting_holds_until_enough_players() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let _p = join(&mut fixture, &sessions, "solo");

        let mut phase = Phase::enter(PhaseKind::Waiting, &mut fixture.ctx(&sessions)).unwrap();

        // One player, minimum two: never advances no matter how long.
        for _ in 0..500 {
            let directive = phase.update(&mut fixture.ctx(&sessions)).unwrap();
            assert_eq!(directive, PhaseDirective::Continue);
        }
    }

    #[test]
    fn waiting_advances_after_countdown() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let _a = join(&mut fixture, &sessions, "a");
        let _b = join(&mut fixture, &sessions, "b");

        let mut phase = Phase::enter(PhaseKind::Waiting, &mut fixture.ctx(&sessions)).unwrap();

        let mut advanced_at = None;
        for tick in 0..200 {
            match phase.update(&mut fixture.ctx(&sessions)).unwrap() {
                PhaseDirective::Advance => {
                    advanced_at = Some(tick);
                    break;
                }
                PhaseDirective::Continue => {}
                PhaseDirective::Teardown => panic!("unexpected teardown"),
            }
        }
        // 3 s countdown at 20 ticks/s, plus the start announcement tick.
        let advanced_at = advanced_at.unwrap();
        assert!(advanced_at >= 60, "advanced too early at tick {advanced_at}");
        assert!(advanced_at <= 62, "advanced too late at tick {advanced_at}");
    }

    #[test]
    fn waiting_never_advances_while_under_populated() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        // Minimum three, audience never above two, arbitrary churn on the
        // second seat: the phase must never leave Waiting on its own.
        for seed in 0..1000_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let sessions = StubSessions::new();
            let mut fixture = Fixture::new(test_arena(3, 1));
            let _anchor = join(&mut fixture, &sessions, "anchor");
            let churner = join(&mut fixture, &sessions, "churner");

            let mut phase =
                Phase::enter(PhaseKind::Waiting, &mut fixture.ctx(&sessions)).unwrap();

            let ticks = rng.random_range(1..60);
            for _ in 0..ticks {
                if rng.random_bool(0.3) {
                    if sessions.is_online(churner) {
                        sessions.disconnect(churner);
                    } else {
                        sessions.connect(churner, "churner");
                        let _ = fixture.audience.add(churner, &sessions);
                    }
                }
                let directive = phase.update(&mut fixture.ctx(&sessions)).unwrap();
                assert_ne!(directive, PhaseDirective::Advance, "seed {seed}");
            }
        }
    }

    #[test]
    fn waiting_countdown_resets_when_player_leaves() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let _a = join(&mut fixture, &sessions, "a");
        let b = join(&mut fixture, &sessions, "b");

        let mut phase = Phase::enter(PhaseKind::Waiting, &mut fixture.ctx(&sessions)).unwrap();

        // Run half the countdown, then lose a player.
        for _ in 0..30 {
            let _ = phase.update(&mut fixture.ctx(&sessions)).unwrap();
        }
        sessions.disconnect(b);
        for _ in 0..100 {
            let directive = phase.update(&mut fixture.ctx(&sessions)).unwrap();
            assert_eq!(directive, PhaseDirective::Continue);
        }
    }

    #[test]
    fn waiting_tears_down_when_empty() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let a = join(&mut fixture, &sessions, "a");

        let mut phase = Phase::enter(PhaseKind::Waiting, &mut fixture.ctx(&sessions)).unwrap();
        sessions.disconnect(a);

        assert_eq!(
            phase.update(&mut fixture.ctx(&sessions)).unwrap(),
            PhaseDirective::Teardown
        );
    }

    #[test]
    fn playing_builds_assignment_and_detects_winner() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let players: Vec<_> = (0..4)
            .map(|i| join(&mut fixture, &sessions, &format!("p{i}")))
            .collect();

        let mut phase = Phase::enter(PhaseKind::Playing, &mut fixture.ctx(&sessions)).unwrap();
        assert!(fixture.assignment.is_some());

        // Both teams populated: no winner yet.
        assert_eq!(
            phase.update(&mut fixture.ctx(&sessions)).unwrap(),
            PhaseDirective::Continue
        );

        // Eliminate every blue member.
        let blues: Vec<_> = players
            .iter()
            .filter(|p| {
                fixture.assignment.as_ref().unwrap().team_of(**p) == Some(TeamColor::Blue)
            })
            .copied()
            .collect();
        assert!(!blues.is_empty());
        for p in blues {
            let _ = fixture
                .assignment
                .as_mut()
                .unwrap()
                .remove_player(p, &sessions);
        }

        assert_eq!(
            phase.update(&mut fixture.ctx(&sessions)).unwrap(),
            PhaseDirective::Advance
        );
        assert_eq!(fixture.winner, Some(TeamColor::Red));
    }

    #[test]
    fn playing_respects_winnability_flag() {
        let sessions = StubSessions::new();
        let mut arena = test_arena(2, 3);
        // Rebuild with winnability off.
        let rules = ArenaRules {
            winnable: false,
            ..arena.rules().clone()
        };
        arena = {
            let mut fresh = Arena::new("quarry", arena.lobby(), rules);
            for color in [TeamColor::Red, TeamColor::Blue] {
                if let Some(allocation) = fresh.spawns_mut(color) {
                    let _ = allocation.add(Position::new(0.0, 64.0, 0.0));
                }
            }
            fresh
        };

        let mut fixture = Fixture::new(arena);
        let _a = join(&mut fixture, &sessions, "a");

        let mut phase = Phase::enter(PhaseKind::Playing, &mut fixture.ctx(&sessions)).unwrap();

        // A single live team exists, but winnability is off: keep playing.
        for _ in 0..50 {
            assert_eq!(
                phase.update(&mut fixture.ctx(&sessions)).unwrap(),
                PhaseDirective::Continue
            );
        }
    }

    #[test]
    fn playing_tears_down_when_abandoned() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let a = join(&mut fixture, &sessions, "a");
        let b = join(&mut fixture, &sessions, "b");

        let mut phase = Phase::enter(PhaseKind::Playing, &mut fixture.ctx(&sessions)).unwrap();
        sessions.disconnect(a);
        sessions.disconnect(b);

        assert_eq!(
            phase.update(&mut fixture.ctx(&sessions)).unwrap(),
            PhaseDirective::Teardown
        );
        assert_eq!(fixture.winner, None);
    }

    #[test]
    fn playing_enter_fails_on_unusable_arena() {
        let sessions = StubSessions::new();
        let bare = Arena::new("empty", Position::new(0.0, 70.0, 0.0), ArenaRules::default());
        let mut fixture = Fixture::new(bare);
        let _a = join(&mut fixture, &sessions, "a");

        let result = Phase::enter(PhaseKind::Playing, &mut fixture.ctx(&sessions));
        assert!(matches!(result, Err(PhaseError::Arena { .. })));
    }

    #[test]
    fn done_restores_and_advances_after_duration() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let a = join(&mut fixture, &sessions, "a");
        fixture.winner = Some(TeamColor::Red);

        let mut phase = Phase::enter(PhaseKind::Done, &mut fixture.ctx(&sessions)).unwrap();
        assert!(sessions.was_cleared(a));
        assert_eq!(sessions.teleports_for(a), vec![fixture.arena.lobby()]);
        assert!(sessions
            .messages_for(a)
            .iter()
            .any(|m| m.contains("wins")));

        // Done default is 15 s = 300 ticks.
        let mut ticks = 0;
        loop {
            match phase.update(&mut fixture.ctx(&sessions)).unwrap() {
                PhaseDirective::Advance => break,
                _ => ticks += 1,
            }
            assert!(ticks < 400, "done phase never expired");
        }
        assert!(ticks >= 299);
    }

    #[test]
    fn done_advances_early_when_empty() {
        let sessions = StubSessions::new();
        let mut fixture = Fixture::new(test_arena(2, 3));
        let a = join(&mut fixture, &sessions, "a");

        let mut phase = Phase::enter(PhaseKind::Done, &mut fixture.ctx(&sessions)).unwrap();
        sessions.disconnect(a);

        assert_eq!(
            phase.update(&mut fixture.ctx(&sessions)).unwrap(),
            PhaseDirective::Advance
        );
    }

    #[test]
    fn announce_schedule_matches_milestones() {
        // Every second at and under 3.
        assert!(announce_at(0));
        assert!(announce_at(1));
        assert!(announce_at(3));
        assert!(!announce_at(4));
        // Every 5 s under 20 s.
        assert!(announce_at(5));
        assert!(announce_at(15));
        assert!(!announce_at(17));
        // Every 15 s under 60 s.
        assert!(announce_at(30));
        assert!(announce_at(45));
        assert!(!announce_at(50));
        // Every 30 s otherwise.
        assert!(announce_at(60));
        assert!(announce_at(90));
        assert!(!announce_at(75));
    }
}
