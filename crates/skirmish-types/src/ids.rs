//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Players and matches carry strongly-typed IDs to prevent accidental
//! mixing of identifiers at compile time. Both use UUID v7 (time-ordered)
//! so that log output sorts chronologically.
//!
//! Spawn points use a small integer ID instead: spawn IDs are assigned
//! monotonically within one spawn allocation and are only meaningful
//! relative to their owning allocation, never globally.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a player session known to the host process.
    PlayerId
}

define_id! {
    /// Unique identifier for one running match instance.
    MatchId
}

/// Identifier of a spawn point within one team's spawn allocation.
///
/// Assigned monotonically starting from 0 by the owning allocation.
/// IDs are never reused, even after a spawn point is removed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SpawnId(pub u32);

impl SpawnId {
    /// Return the inner index value.
    pub const fn into_inner(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for SpawnId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "spawn-{}", self.0)
    }
}
