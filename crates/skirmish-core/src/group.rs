//! Weak-membership player groups.
//!
//! A [`PlayerGroup`] backs both team rosters and match audiences. It holds
//! player identities, not sessions: the underlying session can vanish at
//! any moment (the host tears connections down asynchronously), and the
//! group must never surface a dead entry. Liveness is resolved through the
//! [`SessionDirectory`] on every read, and stale identities are pruned
//! lazily the next time the group is mutated.
//!
//! The consequence callers rely on: a disconnected player is invisible to
//! [`size`](PlayerGroup::size) and iteration immediately, with no explicit
//! `remove` required and no error raised for the stale entry.

use skirmish_types::PlayerId;

use crate::sessions::SessionDirectory;

/// What logically happened to the group as the result of a mutation.
///
/// The group itself sends nothing; the owner (team or match) turns these
/// into chat notifications and bus events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupChange {
    /// A live player was newly added.
    Added(PlayerId),
    /// A present player was removed.
    Removed(PlayerId),
    /// Nothing changed (duplicate add, absent remove, dead session).
    Unchanged,
}

/// An insertion-ordered set of players with weak membership semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerGroup {
    members: Vec<PlayerId>,
}

impl PlayerGroup {
    /// Create an empty group.
    pub const fn new() -> Self {
        Self { members: Vec::new() }
    }

    /// Register weak membership for a live player.
    ///
    /// Returns [`GroupChange::Added`] exactly once per newly-added,
    /// currently-live player. Duplicates and players whose session is
    /// already gone produce [`GroupChange::Unchanged`].
    pub fn add(&mut self, player: PlayerId, sessions: &dyn SessionDirectory) -> GroupChange {
        self.prune(sessions);
        if !sessions.is_online(player) || self.members.contains(&player) {
            return GroupChange::Unchanged;
        }
        self.members.push(player);
        GroupChange::Added(player)
    }

    /// Remove a player from the group.
    ///
    /// A stale entry (member whose session died) counts as already absent:
    /// it is pruned silently and the removal reports
    /// [`GroupChange::Unchanged`], matching what iteration would have
    /// shown the caller.
    pub fn remove(&mut self, player: PlayerId, sessions: &dyn SessionDirectory) -> GroupChange {
        let was_live = sessions.is_online(player) && self.members.contains(&player);
        self.members.retain(|m| *m != player);
        self.prune(sessions);
        if was_live {
            GroupChange::Removed(player)
        } else {
            GroupChange::Unchanged
        }
    }

    /// Number of live members. Stale entries are invisible.
    pub fn size(&self, sessions: &dyn SessionDirectory) -> usize {
        self.members
            .iter()
            .filter(|m| sessions.is_online(**m))
            .count()
    }

    /// Whether the group has no live members.
    pub fn is_empty(&self, sessions: &dyn SessionDirectory) -> bool {
        self.size(sessions) == 0
    }

    /// Whether a player is a live member.
    pub fn contains(&self, player: PlayerId, sessions: &dyn SessionDirectory) -> bool {
        sessions.is_online(player) && self.members.contains(&player)
    }

    /// Iterate live members in insertion order, skipping stale entries.
    pub fn iter_live<'a>(
        &'a self,
        sessions: &'a dyn SessionDirectory,
    ) -> impl Iterator<Item = PlayerId> + 'a {
        self.members
            .iter()
            .copied()
            .filter(move |m| sessions.is_online(*m))
    }

    /// Collect the live members into a vector (for callers that need to
    /// mutate the group while walking the membership).
    pub fn live_members(&self, sessions: &dyn SessionDirectory) -> Vec<PlayerId> {
        self.iter_live(sessions).collect()
    }

    /// Drop entries whose session has become invalid. Returns the pruned
    /// identities, oldest first.
    pub fn prune(&mut self, sessions: &dyn SessionDirectory) -> Vec<PlayerId> {
        let mut pruned = Vec::new();
        self.members.retain(|m| {
            if sessions.is_online(*m) {
                true
            } else {
                pruned.push(*m);
                false
            }
        });
        pruned
    }

    /// Remove every member without touching their sessions.
    pub fn clear(&mut self) {
        self.members.clear();
    }
}
