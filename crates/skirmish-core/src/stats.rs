//! Per-player win/loss statistics.
//!
//! Statistics are a best-effort side channel. Writes are dispatched
//! fire-and-forget onto the async runtime so a slow or dead backend can
//! never stall the tick thread; a failed write is logged and dropped,
//! and the match outcome stands regardless.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use skirmish_types::PlayerId;

/// One player's accumulated match record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    /// The player these numbers belong to.
    pub player: PlayerId,
    /// Matches the player finished, won or not.
    pub matches_played: u64,
    /// Matches won.
    pub wins: u64,
    /// Matches finished without winning.
    pub losses: u64,
}

impl MatchStats {
    /// An empty record for a player with no history.
    pub const fn zero(player: PlayerId) -> Self {
        Self {
            player,
            matches_played: 0,
            wins: 0,
            losses: 0,
        }
    }

    /// A single-match record for a winner.
    pub const fn win(player: PlayerId) -> Self {
        Self {
            player,
            matches_played: 1,
            wins: 1,
            losses: 0,
        }
    }

    /// A single-match record for a non-winner.
    pub const fn loss(player: PlayerId) -> Self {
        Self {
            player,
            matches_played: 1,
            wins: 0,
            losses: 1,
        }
    }

    /// Fold another record for the same player into this one.
    pub const fn merge(&mut self, other: &Self) {
        self.matches_played = self.matches_played.saturating_add(other.matches_played);
        self.wins = self.wins.saturating_add(other.wins);
        self.losses = self.losses.saturating_add(other.losses);
    }
}

/// A statistics backend failed to service a request.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The backend is unreachable or refused the request.
    #[error("stats backend unavailable: {message}")]
    Unavailable {
        /// Backend-specific failure description.
        message: String,
    },
}

/// Persistent store for per-player match records.
///
/// Implementations sit behind the async boundary; the tick thread never
/// awaits them directly.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Read a player's accumulated record. Unknown players get a zero
    /// record, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the backend cannot be reached.
    async fn read(&self, player: PlayerId) -> Result<MatchStats, StatsError>;

    /// Merge a single-match record into the player's accumulated record.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError`] if the backend cannot be reached.
    async fn write(&self, record: MatchStats) -> Result<(), StatsError>;
}

/// In-memory store used by tests and single-node deployments.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    records: RwLock<BTreeMap<PlayerId, MatchStats>>,
}

impl MemoryStatsStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn read(&self, player: PlayerId) -> Result<MatchStats, StatsError> {
        let records = self.records.read().await;
        Ok(records.get(&player).copied().unwrap_or(MatchStats::zero(player)))
    }

    async fn write(&self, record: MatchStats) -> Result<(), StatsError> {
        let mut records = self.records.write().await;
        records
            .entry(record.player)
            .or_insert(MatchStats::zero(record.player))
            .merge(&record);
        Ok(())
    }
}

/// Dispatch match-result records onto the async runtime, fire-and-forget.
///
/// Outside a runtime (unit tests driving ticks by hand) the records are
/// dropped with a debug note; stats are never allowed to become a
/// lifecycle dependency.
pub fn dispatch_results(store: &Arc<dyn StatsStore>, records: Vec<MatchStats>) {
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            for record in records {
                let store = Arc::clone(store);
                handle.spawn(async move {
                    if let Err(error) = store.write(record).await {
                        warn!(player = %record.player, %error, "Stats write dropped");
                    }
                });
            }
        }
        Err(_) => {
            debug!(count = records.len(), "No async runtime, stats records dropped");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_player_reads_zero() {
        let store = MemoryStatsStore::new();
        let p = PlayerId::new();
        let record = store.read(p).await.unwrap();
        assert_eq!(record, MatchStats::zero(p));
    }

    #[tokio::test]
    async fn writes_accumulate() {
        let store = MemoryStatsStore::new();
        let p = PlayerId::new();

        store.write(MatchStats::win(p)).await.unwrap();
        store.write(MatchStats::loss(p)).await.unwrap();
        store.write(MatchStats::win(p)).await.unwrap();

        let record = store.read(p).await.unwrap();
        assert_eq!(record.matches_played, 3);
        assert_eq!(record.wins, 2);
        assert_eq!(record.losses, 1);
    }

    #[tokio::test]
    async fn dispatch_runs_on_runtime() {
        let store: Arc<dyn StatsStore> = Arc::new(MemoryStatsStore::new());
        let p = PlayerId::new();

        dispatch_results(&store, vec![MatchStats::win(p)]);
        tokio::task::yield_now().await;

        let record = store.read(p).await.unwrap();
        assert_eq!(record.wins, 1);
    }

    #[test]
    fn dispatch_without_runtime_is_harmless() {
        let store: Arc<dyn StatsStore> = Arc::new(MemoryStatsStore::new());
        dispatch_results(&store, vec![MatchStats::win(PlayerId::new())]);
    }
}
