//! The engine context: arena catalogue, match registry, tick dispatch.
//!
//! One engine instance owns every running match. The host calls
//! [`Engine::tick`] once per simulation tick on a single thread; the
//! engine forwards the tick to each match, reaps finished matches, and
//! then runs due scheduled tasks. A lifecycle fault in one match tears
//! that match down and never touches its neighbors.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{error, info};

use skirmish_types::{MatchId, PlayerId};

use crate::arena::Arena;
use crate::config::EngineConfig;
use crate::cycler::CycleOutcome;
use crate::error::MatchError;
use crate::events::{EventBus, MatchCreated, MatchListener};
use crate::game::Match;
use crate::scheduler::{TaskHandle, TickScheduler};
use crate::sessions::SessionDirectory;
use crate::stats::{self, MemoryStatsStore, StatsStore};
use crate::time::{TimeError, TimeValue};

/// Owner of all arenas, matches, and tick-aligned tasks.
pub struct Engine {
    arenas: BTreeMap<String, Arena>,
    matches: BTreeMap<String, Match>,
    sessions: Arc<dyn SessionDirectory>,
    events: EventBus,
    stats: Arc<dyn StatsStore>,
    scheduler: TickScheduler<Self>,
    ticks: u64,
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("arenas", &self.arenas.len())
            .field("matches", &self.matches.len())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine with an empty arena catalogue and an in-memory
    /// stats store.
    pub fn new(sessions: Arc<dyn SessionDirectory>) -> Self {
        Self {
            arenas: BTreeMap::new(),
            matches: BTreeMap::new(),
            sessions,
            events: EventBus::new(),
            stats: Arc::new(MemoryStatsStore::new()),
            scheduler: TickScheduler::new(),
            ticks: 0,
        }
    }

    /// Create an engine with the arena catalogue from a config file.
    pub fn from_config(config: &EngineConfig, sessions: Arc<dyn SessionDirectory>) -> Self {
        let mut engine = Self::new(sessions);
        engine.arenas = config.build_arenas();
        info!(arenas = engine.arenas.len(), "Engine configured");
        engine
    }

    /// Replace the stats store (builder style).
    #[must_use]
    pub fn with_stats(mut self, stats: Arc<dyn StatsStore>) -> Self {
        self.stats = stats;
        self
    }

    /// Add or replace an arena in the catalogue. Running matches keep
    /// their own snapshot and are unaffected.
    pub fn register_arena(&mut self, arena: Arena) {
        info!(arena = arena.name(), "Arena registered");
        self.arenas.insert(arena.name().to_owned(), arena);
    }

    /// Subscribe a lifecycle listener.
    pub fn subscribe(&mut self, listener: Box<dyn MatchListener>) {
        self.events.subscribe(listener);
    }

    /// Names in the arena catalogue, sorted.
    pub fn arena_names(&self) -> Vec<String> {
        self.arenas.keys().cloned().collect()
    }

    /// The running match on an arena, if any.
    pub fn match_for(&self, arena: &str) -> Option<&Match> {
        self.matches.get(arena)
    }

    /// Number of matches currently running.
    pub fn active_matches(&self) -> usize {
        self.matches.len()
    }

    /// Ticks processed so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Put a player into the match on an arena, creating the match on
    /// demand. Returns the match ID the player ended up in.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the arena is unknown or unplayable, a
    /// listener vetoed the match creation, or the match rejected the
    /// join.
    pub fn join(&mut self, arena_name: &str, player: PlayerId) -> Result<MatchId, MatchError> {
        if let Some(game) = self.matches.get_mut(arena_name) {
            if !game.is_finished() {
                game.join(player, &*self.sessions)?;
                return Ok(game.id());
            }
        }

        let arena = self
            .arenas
            .get(arena_name)
            .ok_or_else(|| MatchError::UnknownArena {
                name: arena_name.to_owned(),
            })?
            .clone();
        arena.validate()?;

        let id = MatchId::new();
        let mut created = MatchCreated::new(id, arena_name.to_owned());
        if !self.events.publish_match_created(&mut created) {
            info!(arena = arena_name, "Match creation vetoed by listener");
            return Err(MatchError::CreateCancelled);
        }

        let mut game = Match::create(id, arena, &*self.sessions, &mut self.events)?;
        if let Err(rejected) = game.join(player, &*self.sessions) {
            game.cancel(&*self.sessions, &mut self.events);
            return Err(rejected);
        }
        self.matches.insert(arena_name.to_owned(), game);
        Ok(id)
    }

    /// Remove a player from the match on an arena.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NoMatch`] if nothing is running there, or
    /// whatever the match rejected the leave with.
    pub fn leave(&mut self, arena_name: &str, player: PlayerId) -> Result<(), MatchError> {
        let game = Self::running_match(&mut self.matches, arena_name)?;
        game.leave(player, &*self.sessions, &mut self.events)?;
        self.reap_if_finished(arena_name);
        Ok(())
    }

    /// Knock a player out of combat in the match on an arena.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NoMatch`] if nothing is running there, or
    /// whatever the match rejected the elimination with.
    pub fn eliminate(&mut self, arena_name: &str, player: PlayerId) -> Result<(), MatchError> {
        let game = Self::running_match(&mut self.matches, arena_name)?;
        game.eliminate(player, &*self.sessions, &mut self.events)?;
        self.reap_if_finished(arena_name);
        Ok(())
    }

    /// Skip the rest of the current phase of the match on an arena
    /// (privileged force-start or force-stop).
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NoMatch`] if nothing is running there, or a
    /// lifecycle fault from entering the next phase.
    pub fn force_next(&mut self, arena_name: &str) -> Result<(), MatchError> {
        let game = Self::running_match(&mut self.matches, arena_name)?;
        game.force_next(&*self.sessions, &mut self.events)?;
        self.reap_if_finished(arena_name);
        Ok(())
    }

    /// Cancel the match on an arena outright.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError::NoMatch`] if nothing is running there.
    pub fn cancel(&mut self, arena_name: &str) -> Result<(), MatchError> {
        let game = Self::running_match(&mut self.matches, arena_name)?;
        game.cancel(&*self.sessions, &mut self.events);
        self.reap_if_finished(arena_name);
        Ok(())
    }

    /// Run one simulation tick: update every match, reap finished ones,
    /// then run due scheduled tasks.
    pub fn tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);

        let names: Vec<String> = self.matches.keys().cloned().collect();
        for name in names {
            let Some(game) = self.matches.get_mut(&name) else {
                continue;
            };
            match game.update(&*self.sessions, &mut self.events) {
                Ok(CycleOutcome::Running) => {}
                Ok(CycleOutcome::Finished) => {
                    if let Some(game) = self.matches.remove(&name) {
                        self.finish(&game);
                    }
                }
                Err(fault) => {
                    error!(arena = %name, error = %fault, "Lifecycle fault, tearing match down");
                    if let Some(mut game) = self.matches.remove(&name) {
                        game.force_teardown(&*self.sessions, &mut self.events);
                    }
                }
            }
        }

        self.run_due_tasks();
    }

    /// Schedule a one-shot task against the engine. It runs at the end
    /// of a later tick, after all phase updates.
    pub fn schedule_once<F>(&mut self, delay: TimeValue, callback: F) -> TaskHandle
    where
        F: FnMut(&mut Self) + Send + 'static,
    {
        self.scheduler.run_once(delay, callback)
    }

    /// Schedule a repeating task against the engine.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::ZeroInterval`] for an interval under one
    /// tick.
    pub fn schedule_repeating<F>(
        &mut self,
        interval: TimeValue,
        callback: F,
    ) -> Result<TaskHandle, TimeError>
    where
        F: FnMut(&mut Self) + Send + 'static,
    {
        self.scheduler.run_repeating(interval, callback)
    }

    fn running_match<'a>(
        matches: &'a mut BTreeMap<String, Match>,
        arena_name: &str,
    ) -> Result<&'a mut Match, MatchError> {
        matches
            .get_mut(arena_name)
            .ok_or_else(|| MatchError::NoMatch {
                name: arena_name.to_owned(),
            })
    }

    fn reap_if_finished(&mut self, arena_name: &str) {
        if self.matches.get(arena_name).is_some_and(Match::is_finished) {
            if let Some(game) = self.matches.remove(arena_name) {
                self.finish(&game);
            }
        }
    }

    /// Final bookkeeping for a match that ran out of phases. Stats are
    /// recorded only for decided matches; cancelled and abandoned ones
    /// leave no trace on anyone's record.
    fn finish(&mut self, game: &Match) {
        info!(match_id = %game.id(), winner = ?game.winner(), "Match over");
        if game.winner().is_some() {
            stats::dispatch_results(&self.stats, game.result_records(&*self.sessions));
        }
    }

    fn run_due_tasks(&mut self) {
        let mut due = self.scheduler.advance();
        for mut task in due.drain(..) {
            if task.is_cancelled() {
                continue;
            }
            task.run(self);
            if task.is_repeating() && !task.is_cancelled() {
                self.scheduler.reschedule(task);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use skirmish_types::{ArenaRules, PhaseKind, Position, TeamColor};

    use super::*;
    use crate::sessions::StubSessions;
    use crate::time::TimeUnit;

    fn fast_arena(name: &str) -> Arena {
        let rules = ArenaRules {
            min_players: 2,
            waiting_countdown_seconds: 1,
            done_seconds: 1,
            ..ArenaRules::default()
        };
        let mut arena = Arena::new(name, Position::new(0.0, 70.0, 0.0), rules);
        for color in [TeamColor::Red, TeamColor::Blue] {
            if let Some(allocation) = arena.spawns_mut(color) {
                let _ = allocation.add(Position::new(0.0, 64.0, 0.0));
            }
        }
        arena
    }

    fn engine_with(sessions: &Arc<StubSessions>, arenas: &[&str]) -> Engine {
        let mut engine = Engine::new(Arc::clone(sessions) as Arc<dyn SessionDirectory>);
        for name in arenas {
            engine.register_arena(fast_arena(name));
        }
        engine
    }

    fn online(sessions: &StubSessions, name: &str) -> PlayerId {
        let p = PlayerId::new();
        sessions.connect(p, name);
        p
    }

    fn tick_until_phase(engine: &mut Engine, arena: &str, target: PhaseKind) {
        for _ in 0..200 {
            if engine.match_for(arena).and_then(Match::phase_kind) == Some(target) {
                return;
            }
            engine.tick();
        }
        assert_eq!(
            engine.match_for(arena).and_then(Match::phase_kind),
            Some(target),
            "phase never reached"
        );
    }

    #[test]
    fn join_creates_match_on_demand_and_reuses_it() {
        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &["quarry"]);

        let a = online(&sessions, "a");
        let b = online(&sessions, "b");
        let first = engine.join("quarry", a).unwrap();
        let second = engine.join("quarry", b).unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.active_matches(), 1);
    }

    #[test]
    fn unknown_arena_is_rejected() {
        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &[]);
        let a = online(&sessions, "a");

        assert!(matches!(
            engine.join("nowhere", a),
            Err(MatchError::UnknownArena { .. })
        ));
    }

    #[test]
    fn unplayable_arena_is_rejected_at_join() {
        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &[]);
        engine.register_arena(Arena::new(
            "bare",
            Position::new(0.0, 70.0, 0.0),
            ArenaRules::default(),
        ));

        let a = online(&sessions, "a");
        assert!(matches!(
            engine.join("bare", a),
            Err(MatchError::UnusableArena { .. })
        ));
        assert_eq!(engine.active_matches(), 0);
    }

    #[test]
    fn listener_veto_blocks_match_creation() {
        struct Veto;
        impl MatchListener for Veto {
            fn on_match_created(&mut self, event: &mut MatchCreated) {
                event.cancel();
            }
        }

        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &["quarry"]);
        engine.subscribe(Box::new(Veto));

        let a = online(&sessions, "a");
        assert!(matches!(
            engine.join("quarry", a),
            Err(MatchError::CreateCancelled)
        ));
        assert_eq!(engine.active_matches(), 0);
    }

    #[test]
    fn fault_in_one_match_spares_the_others() {
        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &["quarry", "ridge"]);

        for arena in ["quarry", "ridge"] {
            let a = online(&sessions, &format!("{arena}-a"));
            let b = online(&sessions, &format!("{arena}-b"));
            engine.join(arena, a).unwrap();
            engine.join(arena, b).unwrap();
        }
        assert_eq!(engine.active_matches(), 2);

        // Cancel one; the other keeps running through its countdown.
        engine.cancel("ridge").unwrap();
        assert_eq!(engine.active_matches(), 1);
        tick_until_phase(&mut engine, "quarry", PhaseKind::Playing);
    }

    #[test]
    fn scheduled_tasks_run_after_phase_updates() {
        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &[]);

        let seen = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let seen_by_task = Arc::clone(&seen);
        let _handle = engine.schedule_once(TimeValue::of(TimeUnit::Ticks, 3), move |engine| {
            seen_by_task.store(engine.ticks(), std::sync::atomic::Ordering::Relaxed);
        });

        engine.tick();
        engine.tick();
        assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 0);
        engine.tick();
        assert_eq!(seen.load(std::sync::atomic::Ordering::Relaxed), 3);
    }

    #[test]
    fn repeating_task_can_cancel_itself_through_its_handle() {
        let sessions = Arc::new(StubSessions::new());
        let mut engine = engine_with(&sessions, &[]);

        let runs = Arc::new(std::sync::atomic::AtomicU64::new(0));
        let runs_by_task = Arc::clone(&runs);
        let handle = engine
            .schedule_repeating(TimeValue::ONE_TICK, move |_| {
                runs_by_task.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            })
            .unwrap();

        engine.tick();
        engine.tick();
        handle.cancel();
        engine.tick();
        assert_eq!(runs.load(std::sync::atomic::Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn decided_match_records_stats() {
        let sessions = Arc::new(StubSessions::new());
        let store = Arc::new(MemoryStatsStore::new());
        let mut engine =
            engine_with(&sessions, &["quarry"]).with_stats(Arc::clone(&store) as Arc<dyn StatsStore>);

        let a = online(&sessions, "a");
        let b = online(&sessions, "b");
        engine.join("quarry", a).unwrap();
        engine.join("quarry", b).unwrap();

        tick_until_phase(&mut engine, "quarry", PhaseKind::Playing);
        engine.eliminate("quarry", b).unwrap();
        tick_until_phase(&mut engine, "quarry", PhaseKind::Done);

        for _ in 0..60 {
            if engine.active_matches() == 0 {
                break;
            }
            engine.tick();
        }
        assert_eq!(engine.active_matches(), 0);
        // Let the spawned write task complete.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }

        let winner_record = store.read(a).await.unwrap();
        assert_eq!(winner_record.wins, 1);
        let loser_record = store.read(b).await.unwrap();
        assert_eq!(loser_record.losses, 1);
    }
}
