//! Editor canvas placement.

use serde::{Deserialize, Serialize};

/// Where a node sits on the editor canvas.
///
/// Carried through save/load so layouts survive a round trip; the resolver
/// and engine never read it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal canvas coordinate.
    pub x: f32,
    /// Vertical canvas coordinate.
    pub y: f32,
}

impl Position {
    /// Creates a position at the given canvas coordinates.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_tuple() {
        assert_eq!(Position::from((100.0, 200.0)), Position::new(100.0, 200.0));
    }
}
