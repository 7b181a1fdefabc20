//! Spawn and lobby coordinates.

use serde::{Deserialize, Serialize};

/// A point in the arena world, used for spawn points and the shared lobby.
///
/// The engine never interprets coordinates itself; it only hands them to
/// the session provider's teleport hook. Yaw is the facing direction in
/// degrees so that players spawn looking the right way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// East-west coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
    /// North-south coordinate.
    pub z: f64,
    /// Facing direction in degrees.
    #[serde(default)]
    pub yaw: f32,
}

impl Position {
    /// Create a position with the given coordinates facing yaw 0.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z, yaw: 0.0 }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn yaw_defaults_to_zero_when_missing() {
        let p: Position = serde_json::from_str(r#"{"x":1.0,"y":64.0,"z":-3.5}"#).unwrap();
        assert_eq!(p, Position::new(1.0, 64.0, -3.5));
    }
}
