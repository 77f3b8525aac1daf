//! Pointer-driven drag state machine
//!
//! A [`Puzzle`] owns a board and turns down/move/up pointer samples (already
//! in clip space) into discrete moves:
//!
//! - slider: a press slides the pressed tile's line toward the blank
//! - roller: dragging from one tile onto another in the same row or column
//!   rolls that line one step toward the pointer, repeatedly
//! - hex: pressing a draggable anchor and dragging past one tile side rolls
//!   its row or column of groups; pressing anywhere else spins the nearest
//!   group with the pointer and snaps it to a multiple of 60 degrees on release

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::board::{Board, BoardSnapshot, Direction, GridCoord, TileId};
use crate::config::BoardConfig;
use crate::consts::{ANGLE_EPS, EPS, PI_3, RAISED_TILE_DEPTH, ROTATION_ANGLE, TILE_DEPTH};
use crate::error::ConfigError;
use crate::geom;

/// Active gesture kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragState {
    Idle,
    TileDrag,
    AnchorDrag,
}

impl DragState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DragState::Idle => "idle",
            DragState::TileDrag => "tile_drag",
            DragState::AnchorDrag => "anchor_drag",
        }
    }
}

/// Per-gesture bookkeeping, reset on every pointer-up
#[derive(Debug, Clone, Default)]
struct DragSession {
    /// Tile under the pointer at press time
    origin: Option<TileId>,
    /// Group being spun (tile drag) or pressed (anchor drag)
    group: Option<usize>,
    /// Group grid coordinate of the pressed anchor
    group_grid: GridCoord,
    pivot: Vec2,
    /// Reference point for anchor drags, moved after every roll
    drag_point: Vec2,
    last_normal: Vec3,
    total_angle: f32,
}

/// Rotation still needed to land `total` on the nearest multiple of 60
/// degrees; residuals below [`ANGLE_EPS`] count as already snapped
pub fn snap_to_angle(total: f32) -> f32 {
    let residual = (total / PI_3).round() * PI_3 - total;
    if residual.abs() < ANGLE_EPS { 0.0 } else { residual }
}

/// Serializable view of a puzzle and its gesture state
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleSnapshot {
    pub state: DragState,
    pub read_only: bool,
    /// Spin accumulated by an unreleased tile drag, in radians
    pub rotation: f32,
    pub board: BoardSnapshot,
}

/// A board plus the gesture state that drives it
#[derive(Debug, Clone)]
pub struct Puzzle {
    board: Board,
    rng: Pcg32,
    state: DragState,
    session: DragSession,
    read_only: bool,
}

impl Puzzle {
    pub fn new(config: &BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        Ok(Self::from_board(Board::new(config)?, seed))
    }

    pub fn from_board(board: Board, seed: u64) -> Self {
        Self {
            board,
            rng: Pcg32::seed_from_u64(seed),
            state: DragState::Idle,
            session: DragSession::default(),
            read_only: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// In read-only mode presses and shuffles only report the tile under the pointer
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Rotation accumulated by the current tile drag
    pub fn rotation(&self) -> f32 {
        self.session.total_angle
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        PuzzleSnapshot {
            state: self.state,
            read_only: self.read_only,
            rotation: self.session.total_angle,
            board: self.board.snapshot(),
        }
    }

    pub fn on_pointer_down(&mut self, point: Vec2) -> Option<TileId> {
        if self.state != DragState::Idle {
            log::warn!("Pointer down ignored during {}", self.state.as_str());
            return None;
        }
        let hit = self.board.hit_test(point);
        if self.read_only {
            return hit;
        }

        match &mut self.board {
            Board::Slider(board) => {
                if let Some(id) = hit {
                    board.slide_tiles(id);
                    self.begin(DragState::TileDrag, hit);
                }
            }
            Board::Roller(_) => {
                if hit.is_some() {
                    self.begin(DragState::TileDrag, hit);
                }
            }
            Board::HexSpin(board) => {
                if let Some(g) = board.hit_test_anchor(point) {
                    let grid = board.groups()[g].grid;
                    self.begin(DragState::AnchorDrag, hit);
                    self.session.group = Some(g);
                    self.session.group_grid = grid;
                    self.session.drag_point = point;
                    log::debug!("Anchor drag on group {:?}", grid);
                } else if let Some(g) = hit.and_then(|_| board.nearest_anchor_group(point)) {
                    let pivot = board.groups()[g].anchor;
                    let edge = Vec3::new(board.tile_extent().x, 0.0, 0.0);
                    board.set_group_depth(g, RAISED_TILE_DEPTH);
                    self.begin(DragState::TileDrag, hit);
                    self.session.group = Some(g);
                    self.session.pivot = pivot;
                    self.session.last_normal = geom::cross(edge, geom::on_plane(point - pivot));
                    log::debug!("Tile drag about {:?}", pivot);
                }
            }
        }
        hit
    }

    fn begin(&mut self, state: DragState, origin: Option<TileId>) {
        self.state = state;
        self.session = DragSession {
            origin,
            ..DragSession::default()
        };
    }

    pub fn on_pointer_move(&mut self, point: Vec2) -> Option<TileId> {
        match self.state {
            DragState::Idle => None,
            DragState::TileDrag => self.drag_tile(point),
            DragState::AnchorDrag => self.drag_anchor(point),
        }
    }

    fn drag_tile(&mut self, point: Vec2) -> Option<TileId> {
        let origin = self.session.origin?;
        match &mut self.board {
            Board::Slider(_) => None,
            Board::Roller(board) => {
                let target = board.mesh().hit_test(point)?;
                if target == origin {
                    return None;
                }
                let mesh = board.mesh();
                let dir = mesh.tile(origin)?.direction_to(mesh.tile(target)?)?;
                board.roll_tiles(origin, dir);
                Some(origin)
            }
            Board::HexSpin(board) => {
                let group = self.session.group?;
                let edge = Vec3::new(board.tile_extent().x, 0.0, 0.0);
                let offset = geom::on_plane(point - self.session.pivot);
                let normal = geom::cross(edge, offset);
                let last = self.session.last_normal;
                self.session.last_normal = normal;

                if normal.z.abs() > EPS && (normal.z - last.z).abs() > EPS {
                    // Crossing upward on the right of the pivot, or downward on
                    // its left, turns counter-clockwise
                    let turn = if normal.z > last.z { 1.0 } else { -1.0 };
                    let side = if offset.x >= 0.0 { 1.0 } else { -1.0 };
                    let increment = turn * side * ROTATION_ANGLE;
                    board.rotate_tile_group(group, increment);
                    self.session.total_angle += increment;
                    return Some(origin);
                }
                None
            }
        }
    }

    fn drag_anchor(&mut self, point: Vec2) -> Option<TileId> {
        let Board::HexSpin(board) = &mut self.board else {
            return None;
        };
        let delta = point - self.session.drag_point;
        if delta.length() <= board.tile_extent().x {
            return None;
        }
        let dir = Direction::from_drag(delta);
        let rolled = board.roll_tile_groups(self.session.group_grid, dir);
        self.session.drag_point = point;
        self.session.group = board.tile_group_at(self.session.group_grid);
        if rolled {
            log::debug!("Rolled groups {:?} through {:?}", dir, self.session.group_grid);
            board.mesh().hit_test(point)
        } else {
            None
        }
    }

    pub fn on_pointer_up(&mut self, point: Vec2) -> Option<TileId> {
        if self.state == DragState::Idle {
            return None;
        }

        if let (DragState::TileDrag, Board::HexSpin(board), Some(group)) =
            (self.state, &mut self.board, self.session.group)
        {
            let total = self.session.total_angle;
            let residual = snap_to_angle(total);
            if residual != 0.0 {
                board.rotate_tile_group(group, residual);
            }
            if total != 0.0 {
                board.snap_to_position();
            }
            board.set_group_depth(group, TILE_DEPTH);
            board.process_anchor_groups();
            log::debug!(
                "Spin released at {:.1} degrees, snapped to {:.0}",
                total.to_degrees(),
                (total + residual).to_degrees()
            );
        }

        self.state = DragState::Idle;
        self.session = DragSession::default();
        let hit = self.board.hit_test(point);
        if self.board.is_solved() {
            log::info!("Puzzle solved");
        }
        hit
    }

    /// Shuffle unless read-only or mid-gesture; reports the tile under `point`
    pub fn on_shuffle_request(&mut self, point: Vec2) -> Option<TileId> {
        if self.read_only {
            log::debug!("Shuffle ignored in read-only mode");
        } else if self.state != DragState::Idle {
            log::warn!("Shuffle ignored during {}", self.state.as_str());
        } else {
            self.board.shuffle(&mut self.rng);
            self.board.rebuild_groups();
        }
        self.board.hit_test(point)
    }
}
