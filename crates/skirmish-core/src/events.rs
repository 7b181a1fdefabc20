//! Match lifecycle notifications for external collaborators.
//!
//! Sign boards, fallback routing, and statistics listeners subscribe to
//! the [`EventBus`] independently of the core. Publication is synchronous
//! on the tick thread; listeners must return promptly. The match-create
//! notification is the only cancellable one: a listener can veto match
//! creation before any player is admitted.

use serde::Serialize;

use skirmish_types::{MatchId, PhaseKind, PlayerId, StopReason};

/// A match is about to be created for an arena.
///
/// Published before any player is admitted. If a listener cancels it,
/// the triggering join fails and no match is left behind.
#[derive(Debug, Clone, Serialize)]
pub struct MatchCreated {
    /// The ID the new match will have.
    pub match_id: MatchId,
    /// The arena the match is being created for.
    pub arena: String,
    cancelled: bool,
}

impl MatchCreated {
    /// Create an uncancelled notification.
    pub const fn new(match_id: MatchId, arena: String) -> Self {
        Self {
            match_id,
            arena,
            cancelled: false,
        }
    }

    /// Veto the match creation.
    pub const fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether any listener vetoed the creation.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// A player left a match (voluntarily or by elimination bookkeeping).
#[derive(Debug, Clone, Serialize)]
pub struct PlayerLeft {
    /// The match the player left.
    pub match_id: MatchId,
    /// The player who left.
    pub player: PlayerId,
    /// The phase the match was in at the time.
    pub phase: PhaseKind,
}

/// A phase stopped, for any reason.
///
/// Published from the phase's exit hook, which runs exactly once per
/// phase instance, so subscribers see every stop exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseStopped {
    /// The match whose phase stopped.
    pub match_id: MatchId,
    /// The phase that stopped.
    pub phase: PhaseKind,
    /// Why it stopped.
    pub reason: StopReason,
}

/// A subscriber to match lifecycle notifications.
///
/// All methods have empty defaults so listeners only implement what they
/// care about.
pub trait MatchListener: Send {
    /// Called before a match is created; may cancel the event.
    fn on_match_created(&mut self, _event: &mut MatchCreated) {}

    /// Called after a player left a match.
    fn on_player_left(&mut self, _event: &PlayerLeft) {}

    /// Called after a phase stopped.
    fn on_phase_stopped(&mut self, _event: &PhaseStopped) {}
}

/// Synchronous publish-subscribe hub for match lifecycle events.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn MatchListener>>,
}

impl core::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventBus {
    /// Create a bus with no listeners.
    pub const fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Register a listener. Listeners are invoked in registration order.
    pub fn subscribe(&mut self, listener: Box<dyn MatchListener>) {
        self.listeners.push(listener);
    }

    /// Publish a match-create notification. Returns `false` if any
    /// listener cancelled it.
    pub fn publish_match_created(&mut self, event: &mut MatchCreated) -> bool {
        for listener in &mut self.listeners {
            listener.on_match_created(event);
        }
        !event.is_cancelled()
    }

    /// Publish a player-left notification.
    pub fn publish_player_left(&mut self, event: &PlayerLeft) {
        for listener in &mut self.listeners {
            listener.on_player_left(event);
        }
    }

    /// Publish a phase-stopped notification.
    pub fn publish_phase_stopped(&mut self, event: &PhaseStopped) {
        for listener in &mut self.listeners {
            listener.on_phase_stopped(event);
        }
    }
}
