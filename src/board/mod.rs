//! Board engine: tiles, their vertex buffers and the three puzzle variants

pub mod group;
pub mod hex;
pub mod mesh;
pub mod roller;
pub mod slider;
pub mod tile;
pub mod vertex;

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::config::{BoardConfig, Dimension, PuzzleKind};
use crate::error::ConfigError;

pub use group::TileGroup;
pub use hex::HexBoard;
pub use mesh::Mesh;
pub use roller::RollerBoard;
pub use slider::SliderBoard;
pub use tile::{Shape, Tile};
pub use vertex::{Vertex, VertexBuffer};

/// Index of a tile in its board's tile collection (also its buffer slot)
pub type TileId = usize;

/// Move direction on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Direction::Left),
            "right" => Some(Direction::Right),
            "up" => Some(Direction::Up),
            "down" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Grid step as (rows, columns); rows grow downward
    pub fn step(&self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// Dominant axis of a board-plane drag (y grows upward)
    pub fn from_drag(delta: Vec2) -> Self {
        if delta.x.abs() > delta.y.abs() {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// Row/column address of a tile or anchor group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GridCoord {
    pub row: i32,
    pub col: i32,
}

impl GridCoord {
    /// Marker for things that have no grid position
    pub const NONE: GridCoord = GridCoord { row: -1, col: -1 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, (rows, cols): (i32, i32)) -> Self {
        Self::new(self.row + rows, self.col + cols)
    }
}

/// Where one tile currently sits
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSnapshot {
    pub id: TileId,
    pub number: u32,
    pub shape: Shape,
    pub grid: GridCoord,
    pub centroid: Vec2,
    pub blank: bool,
}

/// Serializable view of a board for saving or inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub kind: &'static str,
    pub solved: bool,
    pub tiles: Vec<TileSnapshot>,
    /// Anchor groups, empty for slider and roller boards
    pub groups: Vec<TileGroup>,
}

/// A puzzle board of one of the three variants
#[derive(Debug, Clone)]
pub enum Board {
    Slider(SliderBoard),
    Roller(RollerBoard),
    HexSpin(HexBoard),
}

impl Board {
    /// Build the initial, solved layout for a configuration
    pub fn new(config: &BoardConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let side = config.grid_side();
        let board = match (config.kind, config.dimension) {
            (PuzzleKind::Slider, Dimension::Count(_)) => {
                Board::Slider(SliderBoard::new(side).with_border(config.border))
            }
            (PuzzleKind::Roller, Dimension::Count(_)) => {
                Board::Roller(RollerBoard::new(side).with_border(config.border))
            }
            (PuzzleKind::HexSpinner, Dimension::Groups { rows, columns }) => Board::HexSpin(
                HexBoard::new(rows, columns, side).with_border(config.border, side),
            ),
            (kind, dimension) => {
                return Err(ConfigError::invalid(
                    "dimension",
                    format!("{dimension:?} does not fit a {} board", kind.as_str()),
                ));
            }
        };
        log::info!(
            "Built {} board with {} tiles",
            config.kind.as_str(),
            board.mesh().len()
        );
        Ok(board)
    }

    /// Parse a JSON configuration and build its board
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Self::new(&BoardConfig::from_json(json)?)
    }

    pub fn kind(&self) -> PuzzleKind {
        match self {
            Board::Slider(_) => PuzzleKind::Slider,
            Board::Roller(_) => PuzzleKind::Roller,
            Board::HexSpin(_) => PuzzleKind::HexSpinner,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        match self {
            Board::Slider(b) => b.mesh(),
            Board::Roller(b) => b.mesh(),
            Board::HexSpin(b) => b.mesh(),
        }
    }

    /// Tile geometry for drawing
    pub fn tile_buffer(&self) -> &VertexBuffer {
        self.mesh().buffer()
    }

    pub fn border_buffer(&self) -> Option<&VertexBuffer> {
        self.mesh().border_buffer()
    }

    /// Anchor marker geometry (hex boards only)
    pub fn anchor_buffer(&self) -> Option<&VertexBuffer> {
        match self {
            Board::HexSpin(b) => Some(b.marker_buffer()),
            _ => None,
        }
    }

    /// Number of tile shapes a renderer should draw from the tile buffer
    pub fn visible_shapes(&self) -> usize {
        match self {
            Board::Slider(b) => b.visible_shapes(),
            _ => self.mesh().len(),
        }
    }

    pub fn hit_test(&self, point: Vec2) -> Option<TileId> {
        self.mesh().hit_test(point)
    }

    /// Scramble the board into a state reachable by legal moves
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        match self {
            Board::Slider(b) => b.shuffle(rng),
            Board::Roller(b) => b.shuffle(rng),
            Board::HexSpin(b) => b.shuffle(rng),
        }
    }

    pub fn is_solved(&self) -> bool {
        match self {
            Board::Slider(b) => b.is_solved(),
            Board::Roller(b) => b.is_solved(),
            Board::HexSpin(b) => b.is_solved(),
        }
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let mesh = self.mesh();
        let tiles = mesh
            .tiles()
            .iter()
            .enumerate()
            .map(|(id, tile)| TileSnapshot {
                id,
                number: tile.number(),
                shape: tile.shape(),
                grid: tile.grid(),
                centroid: tile.centroid(mesh.buffer()),
                blank: tile.is_blank(),
            })
            .collect();
        let groups = match self {
            Board::HexSpin(b) => b.groups().to_vec(),
            _ => Vec::new(),
        };
        BoardSnapshot {
            kind: self.kind().as_str(),
            solved: self.is_solved(),
            tiles,
            groups,
        }
    }

    /// Re-derive anchor groups from the current geometry
    pub fn rebuild_groups(&mut self) {
        if let Board::HexSpin(b) = self {
            b.process_anchor_groups();
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mesh())
    }
}
