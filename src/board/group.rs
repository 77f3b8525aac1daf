//! Anchor groups for the hex spinner

use glam::Vec2;
use serde::Serialize;

use super::{GridCoord, TileId};

/// Tiles around one anchor point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGroup {
    /// Shared vertex of all members; the rotation pivot
    pub anchor: Vec2,
    /// Member tiles, ordered around the anchor for draggable groups
    pub members: Vec<TileId>,
    /// Whether a press on this anchor may start a group roll
    pub draggable: bool,
    /// Group row/column for rolls, `(-1, -1)` for non-draggable anchors
    pub grid: GridCoord,
}

impl TileGroup {
    pub const SIZE: usize = 6;

    pub fn new(anchor: Vec2, members: Vec<TileId>, draggable: bool, grid: GridCoord) -> Self {
        Self {
            anchor,
            members,
            draggable,
            grid,
        }
    }

    /// A complete group surrounds its anchor with exactly six tiles
    pub fn is_complete(&self) -> bool {
        self.members.len() == Self::SIZE
    }

    pub fn contains(&self, tile: TileId) -> bool {
        self.members.contains(&tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_group() {
        let mut group = TileGroup::new(Vec2::ZERO, vec![0, 1, 2, 3, 4], false, GridCoord::NONE);
        assert!(!group.is_complete());
        group.members.push(9);
        assert!(group.is_complete());
        assert!(group.contains(9));
        assert!(!group.contains(5));
    }
}
