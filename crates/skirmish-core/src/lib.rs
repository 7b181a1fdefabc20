//! Match engine core: phases, teams, scheduling, and the engine context.
//!
//! This crate owns the tick-driven lifecycle of elimination matches: the
//! Waiting -> Playing -> Done phase machine, weak-membership player
//! groups, team assignment and the winner condition, tick-aligned
//! scheduling, and the engine context that ties them together.
//!
//! # Modules
//!
//! - [`arena`] -- Arena definition: lobby, rules, per-team spawn
//!   allocations, and playability validation.
//! - [`assignment`] -- [`TeamAssignment`]: team build, player
//!   distribution, and the winner condition.
//! - [`config`] -- Configuration loading from `skirmish-config.yaml`
//!   into strongly-typed structs.
//! - [`cycler`] -- [`PhaseCycler`]: ordered phase transitions with
//!   exactly-once exit hooks.
//! - [`engine`] -- [`Engine`]: arena catalogue, match registry, and tick
//!   dispatch.
//! - [`error`] -- [`MatchError`]: the caller-facing rejection surface.
//! - [`events`] -- [`EventBus`] and the lifecycle notifications.
//! - [`game`] -- [`Match`]: one match from first join to teardown.
//! - [`group`] -- [`PlayerGroup`]: weak-membership player sets.
//! - [`phase`] -- The [`Phase`] state machine and its per-phase
//!   payloads.
//! - [`scheduler`] -- [`TickScheduler`]: deferred and repeating
//!   tick-aligned tasks.
//! - [`sessions`] -- [`SessionDirectory`]: the host's view of player
//!   sessions, plus the test stub.
//! - [`spawn`] -- [`SpawnAllocation`]: ordered spawn points with stable
//!   IDs.
//! - [`stats`] -- [`StatsStore`]: fire-and-forget win/loss records.
//! - [`team`] -- [`Team`]: one capacity-bounded roster.
//! - [`time`] -- [`TimeValue`] and [`Ticker`]: tick-based durations and
//!   elapsed-time counting.
//!
//! [`TeamAssignment`]: assignment::TeamAssignment
//! [`PhaseCycler`]: cycler::PhaseCycler
//! [`Engine`]: engine::Engine
//! [`MatchError`]: error::MatchError
//! [`EventBus`]: events::EventBus
//! [`Match`]: game::Match
//! [`PlayerGroup`]: group::PlayerGroup
//! [`Phase`]: phase::Phase
//! [`TickScheduler`]: scheduler::TickScheduler
//! [`SessionDirectory`]: sessions::SessionDirectory
//! [`SpawnAllocation`]: spawn::SpawnAllocation
//! [`StatsStore`]: stats::StatsStore
//! [`Team`]: team::Team
//! [`TimeValue`]: time::TimeValue
//! [`Ticker`]: time::Ticker

pub mod arena;
pub mod assignment;
pub mod config;
pub mod cycler;
pub mod engine;
pub mod error;
pub mod events;
pub mod game;
pub mod group;
pub mod phase;
pub mod scheduler;
pub mod sessions;
pub mod spawn;
pub mod stats;
pub mod team;
pub mod time;
