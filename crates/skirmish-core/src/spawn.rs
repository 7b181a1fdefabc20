//! Spawn point allocations.
//!
//! Each team in an arena owns one [`SpawnAllocation`]: an append-only,
//! identifier-keyed collection of spawn positions. Setup tooling mutates
//! allocations between matches; a running match only ever sees an
//! immutable [`snapshot`](SpawnAllocation::snapshot).

use std::collections::BTreeMap;

use skirmish_types::{Position, SpawnId};

/// An ordered map of spawn IDs to positions for one team.
///
/// IDs are assigned monotonically and never reused, so a removed spawn
/// leaves a hole rather than renumbering later entries. This keeps signs
/// and setup tooling that reference spawns by ID stable across edits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnAllocation {
    next_id: u32,
    slots: BTreeMap<SpawnId, Position>,
}

impl SpawnAllocation {
    /// Create an empty allocation.
    pub const fn new() -> Self {
        Self {
            next_id: 0,
            slots: BTreeMap::new(),
        }
    }

    /// Build an allocation from a list of positions, assigning IDs in
    /// list order.
    pub fn from_positions(positions: &[Position]) -> Self {
        let mut allocation = Self::new();
        for position in positions {
            let _ = allocation.add(*position);
        }
        allocation
    }

    /// Append a spawn point, returning its newly assigned ID.
    pub fn add(&mut self, position: Position) -> SpawnId {
        let id = SpawnId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.slots.insert(id, position);
        id
    }

    /// Look up a spawn point by ID.
    pub fn get(&self, id: SpawnId) -> Option<&Position> {
        self.slots.get(&id)
    }

    /// Remove a spawn point, returning the previous position if present.
    pub fn remove(&mut self, id: SpawnId) -> Option<Position> {
        self.slots.remove(&id)
    }

    /// Remove all spawn points. The ID counter keeps advancing so IDs
    /// from before the clear are never reissued.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// An independent shallow copy for use by a match-time view.
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Number of configured spawn points.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no spawn points are configured.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate spawn points in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (SpawnId, &Position)> {
        self.slots.iter().map(|(id, pos)| (*id, pos))
    }

    /// Positions in ID order, used for round-robin spawn placement.
    pub fn positions(&self) -> Vec<Position> {
        self.slots.values().copied().collect()
    }
}
