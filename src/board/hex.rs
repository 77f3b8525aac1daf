//! Hex spinner: triangles clustered into six-tile groups around anchor points
//!
//! The board is `2 * rows` by `3 * columns` triangles. Every lattice vertex
//! shared by six triangles is an anchor; its group can be spun about it in
//! 60 degree steps. Some anchors are draggable: they sit on a regular
//! `rows x columns` grid and whole rows or columns of their groups can be
//! rolled like a roller board.
//!
//! Groups are never patched. Any structural change (spin, roll, shuffle pass)
//! is followed by [`HexBoard::process_anchor_groups`], which rescans the
//! lattice.

use glam::{Vec2, Vec3};
use rand::Rng;

use super::group::TileGroup;
use super::mesh::Mesh;
use super::tile::{Shape, Tile, TileLayout};
use super::vertex::VertexBuffer;
use super::{Direction, GridCoord, TileId};
use crate::config::Border;
use crate::consts::{
    ANCHOR_DEPTH, ANCHOR_HIT_EPS, ANCHOR_TEX_WIDTH, EPS, HIGH_Y, LOW_X, PI_3, SHUFFLE_PASSES,
    SNAP_EPS, TILE_DEPTH, TILE_TEX_WIDTH,
};
use crate::{board_width, geom};

/// Triangle side and height for a board `columns` groups wide
fn triangle_extent(columns: u32) -> Vec2 {
    let side = board_width() / columns.max(1) as f32 / 2.0;
    Vec2::new(side, side * 3f32.sqrt() / 2.0)
}

/// Row-major triangle layouts
pub fn triangle_layouts(rows: u32, columns: u32) -> Vec<TileLayout> {
    let size = triangle_extent(columns);
    let (tile_rows, tile_cols) = (rows as i32 * 2, columns as i32 * 3);
    let mut layouts = Vec::with_capacity((tile_rows * tile_cols) as usize);
    for row in 0..tile_rows {
        for col in 0..tile_cols {
            let slot = layouts.len();
            let group_col = col / 3;
            let mut top_left = Vec2::new(LOW_X + col as f32 * size.x * 0.5, HIGH_Y - row as f32 * size.y);
            // Odd group columns sit half a group lower
            if group_col % 2 == 1 {
                top_left.y -= size.y;
            }
            layouts.push(TileLayout {
                id: format!("tile{row}{col}"),
                number: slot as u32 + 1,
                shape: Shape::Triangle,
                grid: GridCoord::new(row, col),
                top_left,
                size,
                depth: TILE_DEPTH,
                slot,
                tex_index: (row / 2) as u32 * columns + group_col as u32,
                tex_width: TILE_TEX_WIDTH,
            });
        }
    }
    layouts
}

#[derive(Debug, Clone)]
pub struct HexBoard {
    mesh: Mesh,
    rows: u32,
    columns: u32,
    /// Triangle side and height
    extent: Vec2,
    groups: Vec<TileGroup>,
    /// Every distinct initial vertex, the targets of position snapping
    lattice: Vec<Vec2>,
    markers: Vec<Tile>,
    marker_buffer: VertexBuffer,
}

impl HexBoard {
    /// Board of `rows x columns` draggable groups; markers are sized for a
    /// square cell grid of `grid_side` cells
    pub fn new(rows: u32, columns: u32, grid_side: u32) -> Self {
        let mesh = Mesh::from_layouts(
            Shape::Triangle,
            rows * 2,
            columns * 3,
            triangle_layouts(rows, columns),
        );

        let mut lattice: Vec<Vec2> = Vec::new();
        for tile in mesh.tiles() {
            for v in tile.initial_vertices() {
                let p = v.truncate();
                if !lattice.iter().any(|&q| geom::same_point(p, q, EPS)) {
                    lattice.push(p);
                }
            }
        }

        let mut board = Self {
            mesh,
            rows,
            columns,
            extent: triangle_extent(columns),
            groups: Vec::new(),
            lattice,
            markers: Vec::new(),
            marker_buffer: VertexBuffer::new(Shape::Quad, 0),
        };
        board.process_anchor_groups();
        board.build_markers(grid_side);
        log::info!(
            "Hex board {}x{}: {} tiles, {} anchor groups ({} draggable)",
            rows,
            columns,
            board.mesh.len(),
            board.groups.len(),
            board.groups.iter().filter(|g| g.draggable).count()
        );
        board
    }

    pub fn with_border(mut self, border: Option<Border>, grid_side: u32) -> Self {
        self.mesh = self.mesh.with_border(border, grid_side);
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Triangle side (x) and height (y)
    pub fn tile_extent(&self) -> Vec2 {
        self.extent
    }

    pub fn groups(&self) -> &[TileGroup] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&TileGroup> {
        self.groups.get(index)
    }

    pub fn markers(&self) -> &[Tile] {
        &self.markers
    }

    pub fn marker_buffer(&self) -> &VertexBuffer {
        &self.marker_buffer
    }

    /// Rebuild all groups from the current geometry
    pub fn process_anchor_groups(&mut self) {
        self.collect_anchors();
        self.order_anchor_groups();
    }

    fn collect_anchors(&mut self) {
        let Vec2 { x: a, y: h } = self.extent;
        let buffer = self.mesh.buffer();
        let mut groups = Vec::new();

        for row in 0..=(self.rows as i32 * 2 + 1) {
            for col in 0..=(self.columns as i32 * 3) {
                let anchor = Vec2::new(LOW_X + col as f32 * a * 0.5, HIGH_Y - row as f32 * h);
                let members: Vec<TileId> = self
                    .mesh
                    .tiles()
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.has_vertex(buffer, anchor))
                    .map(|(i, _)| i)
                    .collect();
                if members.len() != TileGroup::SIZE {
                    continue;
                }

                let group_col = col / 3;
                let draggable = col % 3 == 2 && ((group_col % 2 == 0) == (row % 2 == 1));
                let grid = if draggable {
                    GridCoord::new(row / 2 - group_col % 2, group_col)
                } else {
                    GridCoord::NONE
                };
                groups.push(TileGroup::new(anchor, members, draggable, grid));
            }
        }
        self.groups = groups;
    }

    /// Put each draggable group's members in a fixed spatial order: the three
    /// cells above the anchor left to right, then the three below
    fn order_anchor_groups(&mut self) {
        let Vec2 { x: a, y: h } = self.extent;
        let buffer = self.mesh.buffer();
        for group in self.groups.iter_mut().filter(|g| g.draggable) {
            let pt = group.anchor;
            let samples = [
                Vec2::new(pt.x - a / 2.0, pt.y + h / 2.0),
                Vec2::new(pt.x, pt.y + h / 2.0),
                Vec2::new(pt.x + a / 2.0, pt.y + h / 2.0),
                Vec2::new(pt.x - a / 2.0, pt.y - h / 2.0),
                Vec2::new(pt.x, pt.y - h / 2.0),
                Vec2::new(pt.x + a / 2.0, pt.y - h / 2.0),
            ];
            let ordered: Vec<TileId> = samples
                .iter()
                .filter_map(|&s| {
                    group.members.iter().copied().find(|&id| {
                        self.mesh
                            .tile(id)
                            .is_some_and(|t| t.hit_test(buffer, s))
                    })
                })
                .collect();

            let mut distinct = ordered.clone();
            distinct.sort_unstable();
            distinct.dedup();
            if distinct.len() == TileGroup::SIZE {
                group.members = ordered;
            } else {
                log::warn!(
                    "Could not order group at {:?}, found {} of 6 cells",
                    group.anchor,
                    distinct.len()
                );
            }
        }
    }

    /// Spin a group's tiles about its anchor
    pub fn rotate_tile_group(&mut self, group: usize, angle: f32) {
        let Some(g) = self.groups.get(group) else {
            return;
        };
        let (anchor, members) = (g.anchor, g.members.clone());
        for id in members {
            self.mesh.rotate_tile(id, anchor, angle);
        }
    }

    /// Draggable group at a group grid coordinate
    pub fn tile_group_at(&self, grid: GridCoord) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.draggable && g.grid == grid)
    }

    /// Draggable group whose anchor was pressed
    pub fn hit_test_anchor(&self, point: Vec2) -> Option<usize> {
        self.groups
            .iter()
            .position(|g| g.draggable && geom::same_point(g.anchor, point, ANCHOR_HIT_EPS))
    }

    /// Group with the closest anchor
    pub fn nearest_anchor_group(&self, point: Vec2) -> Option<usize> {
        self.groups
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                a.anchor
                    .distance_squared(point)
                    .total_cmp(&b.anchor.distance_squared(point))
            })
            .map(|(i, _)| i)
    }

    /// Some group containing the tile
    pub fn group_of(&self, tile: TileId) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(tile))
    }

    /// Anchor marker under a point
    pub fn anchor_tile_at(&self, point: Vec2) -> Option<usize> {
        self.markers
            .iter()
            .position(|m| m.hit_test(&self.marker_buffer, point))
    }

    /// Move a group's tiles to a draw layer
    pub fn set_group_depth(&mut self, group: usize, depth: f32) {
        let Some(g) = self.groups.get(group) else {
            return;
        };
        let slots: Vec<usize> = g
            .members
            .iter()
            .filter_map(|&id| self.mesh.tile(id).map(|t| t.slot()))
            .collect();
        for slot in slots {
            self.mesh.buffer_mut().set_depth(slot, depth);
        }
    }

    /// Roll the row (left/right) or column (up/down) of draggable groups
    /// through `grid` one group along. Each group's tiles take the positions
    /// of the next group's tiles; the last wraps to the first.
    pub fn roll_tile_groups(&mut self, grid: GridCoord, dir: Direction) -> bool {
        let line: Vec<GridCoord> = if dir.is_vertical() {
            (0..self.rows as i32).map(|r| GridCoord::new(r, grid.col)).collect()
        } else {
            (0..self.columns as i32).map(|c| GridCoord::new(grid.row, c)).collect()
        };

        let mut members = Vec::with_capacity(line.len());
        for cell in &line {
            match self.tile_group_at(*cell).and_then(|g| self.groups.get(g)) {
                Some(g) if g.is_complete() => members.push(g.members.clone()),
                _ => {
                    log::warn!("Roll {:?} through {:?} skipped: no complete group at {:?}", dir, grid, cell);
                    return false;
                }
            }
        }

        // Read every source before writing any destination
        let snapshot: Vec<Vec<Vec<Vec3>>> = members
            .iter()
            .map(|ids| {
                ids.iter()
                    .filter_map(|&id| self.mesh.tile(id).map(|t| t.positions(self.mesh.buffer())))
                    .collect()
            })
            .collect();

        let n = members.len();
        for (k, ids) in members.iter().enumerate() {
            let source = match dir {
                Direction::Down | Direction::Right => (k + 1) % n,
                Direction::Up | Direction::Left => (k + n - 1) % n,
            };
            for (m, &id) in ids.iter().enumerate() {
                let Some(slot) = self.mesh.tile(id).map(|t| t.slot()) else {
                    continue;
                };
                self.mesh.buffer_mut().set_positions(slot, &snapshot[source][m]);
            }
        }

        self.process_anchor_groups();
        log::debug!("Rolled {} groups through {:?} {:?}", n, grid, dir);
        true
    }

    /// Pull every vertex within tolerance of a lattice point onto it
    pub fn snap_to_position(&mut self) {
        let slots: Vec<usize> = self.mesh.tiles().iter().map(|t| t.slot()).collect();
        for slot in slots {
            let snapped: Vec<Vec3> = self
                .mesh
                .buffer()
                .get(slot)
                .iter()
                .map(|v| {
                    let p = v.pos();
                    self.lattice
                        .iter()
                        .filter(|&&q| geom::same_point(p.truncate(), q, SNAP_EPS))
                        .min_by(|a, b| {
                            a.distance_squared(p.truncate())
                                .total_cmp(&b.distance_squared(p.truncate()))
                        })
                        .map_or(p, |q| Vec3::new(q.x, q.y, p.z))
                })
                .collect();
            self.mesh.buffer_mut().set_positions(slot, &snapped);
        }
    }

    /// Random 60 degree spins of random groups
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.groups.is_empty() {
            log::warn!("Hex board has no anchor groups to shuffle");
            return;
        }
        for _ in 0..SHUFFLE_PASSES {
            let group = rng.random_range(0..self.groups.len());
            let angle = if rng.random_bool(0.5) { PI_3 } else { -PI_3 };
            self.rotate_tile_group(group, angle);
            self.snap_to_position();
            self.process_anchor_groups();
        }
        log::info!("Shuffled hex board with {} spins", SHUFFLE_PASSES);
    }

    /// Every tile back on its initial vertices, in its initial orientation
    pub fn is_solved(&self) -> bool {
        self.mesh.at_initial_positions()
    }

    fn build_markers(&mut self, grid_side: u32) {
        let side = board_width() / grid_side.max(1) as f32 / 1.5;
        let mut buffer = VertexBuffer::new(Shape::Quad, self.groups.len());
        let markers: Vec<Tile> = self
            .groups
            .iter()
            .enumerate()
            .map(|(slot, group)| {
                let marker = Tile::new(
                    TileLayout {
                        id: format!("anch{slot}"),
                        number: slot as u32 + 1,
                        shape: Shape::Quad,
                        grid: group.grid,
                        top_left: group.anchor + Vec2::new(-side / 2.0, side / 2.0),
                        size: Vec2::splat(side),
                        depth: ANCHOR_DEPTH,
                        slot,
                        tex_index: 0,
                        tex_width: ANCHOR_TEX_WIDTH,
                    },
                    &mut buffer,
                );
                if group.draggable {
                    buffer.set_normals(slot, Vec3::ONE);
                }
                marker
            })
            .collect();
        self.markers = markers;
        self.marker_buffer = buffer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn board() -> HexBoard {
        HexBoard::new(2, 2, 4)
    }

    fn draggable(board: &HexBoard) -> Vec<&TileGroup> {
        board.groups().iter().filter(|g| g.draggable).collect()
    }

    fn assert_groups_valid(board: &HexBoard) {
        for g in board.groups() {
            assert_eq!(g.members.len(), 6, "group at {:?}", g.anchor);
        }
        assert_eq!(draggable(board).len(), 4);
        for t in board.mesh().tiles() {
            assert!(t.area(board.mesh().buffer()) > 1e-4);
        }
    }

    #[test]
    fn test_layout() {
        let board = board();
        assert_eq!(board.mesh().len(), 24);
        assert_eq!(board.groups().len(), 6);
        let mut grids: Vec<GridCoord> = draggable(&board).iter().map(|g| g.grid).collect();
        grids.sort_by_key(|g| (g.row, g.col));
        assert_eq!(
            grids,
            vec![
                GridCoord::new(0, 0),
                GridCoord::new(0, 1),
                GridCoord::new(1, 0),
                GridCoord::new(1, 1)
            ]
        );
        assert_groups_valid(&board);
        assert!(board.is_solved());
    }

    #[test]
    fn test_draggable_groups_partition_tiles() {
        let board = board();
        let mut ids: Vec<TileId> = draggable(&board)
            .iter()
            .flat_map(|g| g.members.iter().copied())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn test_centroid_hit_test() {
        let board = board();
        for id in 0..board.mesh().len() {
            let c = board.mesh().centroid(id).unwrap();
            assert_eq!(board.mesh().hit_test(c), Some(id));
        }
    }

    #[test]
    fn test_anchor_lookups() {
        let board = board();
        let g = board.tile_group_at(GridCoord::new(1, 1)).unwrap();
        let anchor = board.groups()[g].anchor;
        assert_eq!(board.hit_test_anchor(anchor + Vec2::splat(0.03)), Some(g));
        assert_eq!(board.hit_test_anchor(anchor + Vec2::splat(0.2)), None);
        assert_eq!(board.nearest_anchor_group(anchor + Vec2::splat(0.1)), Some(g));
        assert_eq!(board.anchor_tile_at(anchor), Some(g));
        assert_eq!(board.tile_group_at(GridCoord::new(5, 5)), None);

        let normals = board.marker_buffer().get(g);
        assert_eq!(normals[0].normal, [1.0, 1.0, 1.0]);
        assert_eq!(board.markers()[g].id(), format!("anch{g}"));
    }

    #[test]
    fn test_full_turn_restores_board() {
        let mut board = board();
        let g = board.tile_group_at(GridCoord::new(0, 0)).unwrap();
        for _ in 0..6 {
            board.rotate_tile_group(g, PI_3);
        }
        board.snap_to_position();
        board.process_anchor_groups();
        assert!(board.is_solved());
    }

    #[test]
    fn test_rotation_then_inverse() {
        let mut board = board();
        let g = board.tile_group_at(GridCoord::new(1, 0)).unwrap();
        board.rotate_tile_group(g, 0.3);
        assert!(!board.is_solved());
        board.rotate_tile_group(g, -0.3);
        assert!(board.is_solved());
    }

    #[test]
    fn test_single_spin_keeps_groups() {
        let mut board = board();
        let g = board.tile_group_at(GridCoord::new(0, 1)).unwrap();
        let members = board.groups()[g].members.clone();
        board.rotate_tile_group(g, PI_3);
        board.snap_to_position();
        board.process_anchor_groups();
        assert_groups_valid(&board);
        assert!(!board.is_solved());

        // Same cells, different tiles in them
        let g = board.tile_group_at(GridCoord::new(0, 1)).unwrap();
        let mut after = board.groups()[g].members.clone();
        assert_ne!(after, members);
        after.sort_unstable();
        let mut before = members;
        before.sort_unstable();
        assert_eq!(after, before);
    }

    #[test]
    fn test_roll_moves_groups_along_row() {
        let mut board = board();
        let left = board.tile_group_at(GridCoord::new(0, 0)).unwrap();
        let right = board.tile_group_at(GridCoord::new(0, 1)).unwrap();
        let left_members = board.groups()[left].members.clone();
        let right_members = board.groups()[right].members.clone();

        assert!(board.roll_tile_groups(GridCoord::new(0, 0), Direction::Right));
        assert_groups_valid(&board);
        let right = board.tile_group_at(GridCoord::new(0, 1)).unwrap();
        let left = board.tile_group_at(GridCoord::new(0, 0)).unwrap();
        assert_eq!(board.groups()[right].members, left_members);
        assert_eq!(board.groups()[left].members, right_members);

        assert!(board.roll_tile_groups(GridCoord::new(0, 1), Direction::Left));
        assert!(board.is_solved());
    }

    #[test]
    fn test_roll_column_wraps() {
        let mut board = HexBoard::new(3, 1, 3);
        let before: Vec<Vec<TileId>> = (0..3)
            .map(|r| {
                let g = board.tile_group_at(GridCoord::new(r, 0)).unwrap();
                board.groups()[g].members.clone()
            })
            .collect();
        assert!(board.roll_tile_groups(GridCoord::new(1, 0), Direction::Down));
        let g = board.tile_group_at(GridCoord::new(0, 0)).unwrap();
        assert_eq!(board.groups()[g].members, before[2]);
        let g = board.tile_group_at(GridCoord::new(1, 0)).unwrap();
        assert_eq!(board.groups()[g].members, before[0]);
        for _ in 0..2 {
            board.roll_tile_groups(GridCoord::new(0, 0), Direction::Down);
        }
        assert!(board.is_solved());
    }

    #[test]
    fn test_roll_missing_group_is_noop() {
        let mut board = board();
        let revision = board.mesh().buffer().revision();
        assert!(!board.roll_tile_groups(GridCoord::new(7, 0), Direction::Left));
        assert_eq!(board.mesh().buffer().revision(), revision);
    }

    #[test]
    fn test_group_depth() {
        let mut board = board();
        let g = board.tile_group_at(GridCoord::new(0, 0)).unwrap();
        board.set_group_depth(g, 0.9);
        let slot = board.groups()[g].members[0];
        assert_eq!(board.mesh().buffer().get(slot)[0].position[2], 0.9);
        board.set_group_depth(g, TILE_DEPTH);
        assert!(board.mesh().buffer().vertices().iter().all(|v| v.position[2] == 0.0));
    }

    #[test]
    fn test_shuffle_scenario() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut board = board();
        board.shuffle(&mut rng);
        assert_groups_valid(&board);
        assert!(!board.is_solved());
        for id in 0..board.mesh().len() {
            let c = board.mesh().centroid(id).unwrap();
            assert_eq!(board.mesh().hit_test(c), Some(id));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn test_groups_stay_complete(ops in prop::collection::vec((0usize..6, any::<bool>(), 0usize..4), 1..12)) {
            let mut board = board();
            for (group, clockwise, dir_index) in ops {
                if clockwise {
                    board.rotate_tile_group(group, -PI_3);
                    board.snap_to_position();
                    board.process_anchor_groups();
                } else {
                    let g = &board.groups()[group];
                    let grid = if g.draggable { g.grid } else { GridCoord::new(0, 0) };
                    board.roll_tile_groups(grid, Direction::ALL[dir_index]);
                }
                prop_assert_eq!(board.groups().len(), 6);
                for g in board.groups() {
                    prop_assert_eq!(g.members.len(), 6);
                }
            }
        }
    }
}
