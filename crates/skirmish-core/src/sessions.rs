//! Player session provider interface.
//!
//! The engine never owns player connections. The host process exposes
//! them through [`SessionDirectory`], and the core treats every lookup as
//! potentially stale: a player can disconnect between any two ticks, and
//! the disconnect path never calls back into the engine. Group membership
//! stays correct anyway because [`PlayerGroup`] resolves liveness through
//! this trait on every read.
//!
//! [`PlayerGroup`]: crate::group::PlayerGroup

use std::collections::BTreeMap;
use std::sync::Mutex;

use skirmish_types::{PlayerId, Position};

/// Host-side view of player sessions.
///
/// All methods take `&self`; implementations are expected to use interior
/// mutability or to proxy to the host's own session registry. Delivery
/// methods are best-effort: sending to an offline player is a no-op, not
/// an error.
pub trait SessionDirectory: Send + Sync {
    /// Whether the player's underlying session is still valid.
    fn is_online(&self, player: PlayerId) -> bool;

    /// Display name for chat and announcements.
    fn display_name(&self, player: PlayerId) -> String;

    /// Deliver a chat message to one player.
    fn send_message(&self, player: PlayerId, message: &str);

    /// Play a short attention cue (countdown click) for one player.
    fn play_cue(&self, player: PlayerId);

    /// Move the player to a position in the arena world.
    fn teleport(&self, player: PlayerId, position: &Position);

    /// Restore the player to a neutral observer state (clear team
    /// display, combat effects, held countdown UI).
    fn clear_effects(&self, player: PlayerId);
}

/// An in-memory session directory for tests and the demo binary.
///
/// Tracks a set of online players and records every delivery so tests can
/// assert on what the engine said and where it sent people.
#[derive(Debug, Default)]
pub struct StubSessions {
    inner: Mutex<StubState>,
}

#[derive(Debug, Default)]
struct StubState {
    online: BTreeMap<PlayerId, String>,
    messages: Vec<(PlayerId, String)>,
    cues: Vec<PlayerId>,
    teleports: Vec<(PlayerId, Position)>,
    cleared: Vec<PlayerId>,
}

impl StubSessions {
    /// Create an empty directory with no one online.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a player as online under the given name.
    pub fn connect(&self, player: PlayerId, name: &str) {
        if let Ok(mut state) = self.inner.lock() {
            state.online.insert(player, name.to_owned());
        }
    }

    /// Simulate a disconnect. No engine callback happens; groups notice
    /// lazily on their next read.
    pub fn disconnect(&self, player: PlayerId) {
        if let Ok(mut state) = self.inner.lock() {
            state.online.remove(&player);
        }
    }

    /// Messages delivered to one player, in order.
    pub fn messages_for(&self, player: PlayerId) -> Vec<String> {
        self.inner.lock().map_or_else(
            |_| Vec::new(),
            |state| {
                state
                    .messages
                    .iter()
                    .filter(|(p, _)| *p == player)
                    .map(|(_, m)| m.clone())
                    .collect()
            },
        )
    }

    /// Total number of messages delivered to anyone.
    pub fn message_count(&self) -> usize {
        self.inner.lock().map_or(0, |state| state.messages.len())
    }

    /// Teleports performed for one player, in order.
    pub fn teleports_for(&self, player: PlayerId) -> Vec<Position> {
        self.inner.lock().map_or_else(
            |_| Vec::new(),
            |state| {
                state
                    .teleports
                    .iter()
                    .filter(|(p, _)| *p == player)
                    .map(|(_, pos)| *pos)
                    .collect()
            },
        )
    }

    /// Whether the player's effects were cleared at least once.
    pub fn was_cleared(&self, player: PlayerId) -> bool {
        self.inner
            .lock()
            .is_ok_and(|state| state.cleared.contains(&player))
    }

    /// Number of cues played for one player.
    pub fn cue_count(&self, player: PlayerId) -> usize {
        self.inner.lock().map_or(0, |state| {
            state.cues.iter().filter(|p| **p == player).count()
        })
    }
}

impl SessionDirectory for StubSessions {
    fn is_online(&self, player: PlayerId) -> bool {
        self.inner
            .lock()
            .is_ok_and(|state| state.online.contains_key(&player))
    }

    fn display_name(&self, player: PlayerId) -> String {
        self.inner.lock().map_or_else(
            |_| String::from("unknown"),
            |state| {
                state
                    .online
                    .get(&player)
                    .cloned()
                    .unwrap_or_else(|| String::from("unknown"))
            },
        )
    }

    fn send_message(&self, player: PlayerId, message: &str) {
        if let Ok(mut state) = self.inner.lock() {
            if state.online.contains_key(&player) {
                state.messages.push((player, message.to_owned()));
            }
        }
    }

    fn play_cue(&self, player: PlayerId) {
        if let Ok(mut state) = self.inner.lock() {
            if state.online.contains_key(&player) {
                state.cues.push(player);
            }
        }
    }

    fn teleport(&self, player: PlayerId, position: &Position) {
        if let Ok(mut state) = self.inner.lock() {
            if state.online.contains_key(&player) {
                state.teleports.push((player, *position));
            }
        }
    }

    fn clear_effects(&self, player: PlayerId) {
        if let Ok(mut state) = self.inner.lock() {
            if state.online.contains_key(&player) {
                state.cleared.push(player);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_and_disconnect_toggle_liveness() {
        let sessions = StubSessions::new();
        let p = PlayerId::new();
        assert!(!sessions.is_online(p));

        sessions.connect(p, "Alice");
        assert!(sessions.is_online(p));
        assert_eq!(sessions.display_name(p), "Alice");

        sessions.disconnect(p);
        assert!(!sessions.is_online(p));
    }

    #[test]
    fn delivery_to_offline_player_is_dropped() {
        let sessions = StubSessions::new();
        let p = PlayerId::new();
        sessions.send_message(p, "hello");
        assert_eq!(sessions.message_count(), 0);

        sessions.connect(p, "Bob");
        sessions.send_message(p, "hello again");
        assert_eq!(sessions.messages_for(p), vec!["hello again".to_owned()]);
    }
}
