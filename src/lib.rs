//! Tile Puzzles - geometry and move engine for tile puzzles
//!
//! Core modules:
//! - `geom`: Stateless vector math (translate, rotate about a pivot, angles)
//! - `board`: Tiles, anchor groups and the three puzzle variants
//! - `interaction`: Pointer-driven drag state machine
//! - `config`: Declarative board configuration
//! - `platform`: Viewport normalization and logging setup
//!
//! Rendering, windowing and asset loading live outside this crate. A renderer
//! reads the vertex buffers exposed by [`Board`] and feeds pointer events to a
//! [`Puzzle`].

pub mod board;
pub mod config;
pub mod error;
pub mod geom;
pub mod interaction;
pub mod platform;

pub use board::{Board, BoardSnapshot, Direction, GridCoord, Shape, TileId};
pub use config::{BoardConfig, PuzzleKind};
pub use error::ConfigError;
pub use interaction::{DragState, Puzzle, PuzzleSnapshot};

/// Board layout and interaction constants
pub mod consts {
    /// Board extents in clip space
    pub const LOW_X: f32 = -1.0;
    pub const HIGH_X: f32 = 1.0;
    pub const LOW_Y: f32 = -1.0;
    pub const HIGH_Y: f32 = 1.0;
    pub const TILE_SCALE_FACTOR: f32 = 1.0;

    /// Draw layering (z values)
    pub const TILE_DEPTH: f32 = 0.0;
    pub const BORDER_DEPTH: f32 = 0.2;
    pub const ANCHOR_DEPTH: f32 = 0.4;
    pub const RAISED_TILE_DEPTH: f32 = 0.9;

    /// Absolute tolerance for vertex equality and triangle area sums
    pub const EPS: f32 = 0.001;
    /// Tolerance for pressing on an anchor point
    pub const ANCHOR_HIT_EPS: f32 = 0.06;
    /// Tolerance for snapping a vertex back onto the lattice
    pub const SNAP_EPS: f32 = 0.1;

    /// Hex lattice step (60 degrees)
    pub const PI_3: f32 = std::f32::consts::PI / 3.0;
    /// Rotation applied per pointer sample during a tile drag
    pub const ROTATION_ANGLE: f32 = std::f32::consts::PI / 35.0;
    /// Rotations below this are treated as already snapped
    pub const ANGLE_EPS: f32 = 1e-4;

    /// Random group rotations per hex shuffle
    pub const SHUFFLE_PASSES: u32 = 400;

    /// Vertices one tile buffer may hold with 16-bit indices
    pub const MAX_VERTICES: u64 = 1 << 16;

    /// Texture atlas cell widths
    pub const TILE_TEX_WIDTH: f32 = 32.0 / 1024.0;
    pub const BORDER_TEX_WIDTH: f32 = 30.0 / 60.0;
    pub const ANCHOR_TEX_WIDTH: f32 = 1.0;
}

/// Width of the board in clip space
#[inline]
pub fn board_width() -> f32 {
    consts::HIGH_X - consts::LOW_X
}

/// Height of the board in clip space
#[inline]
pub fn board_height() -> f32 {
    consts::HIGH_Y - consts::LOW_Y
}

/// Integer square root, `None` unless `n` is a perfect square
#[inline]
pub fn exact_sqrt(n: u32) -> Option<u32> {
    let root = (n as f64).sqrt().round() as u32;
    (root * root == n).then_some(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_sqrt() {
        assert_eq!(exact_sqrt(16), Some(4));
        assert_eq!(exact_sqrt(25), Some(5));
        assert_eq!(exact_sqrt(15), None);
        assert_eq!(exact_sqrt(0), Some(0));
    }
}
