//! Tile collection and vertex buffers shared by every board variant

use std::fmt;

use glam::Vec2;

use super::tile::{Shape, Tile, TileLayout};
use super::vertex::VertexBuffer;
use super::{Direction, GridCoord, TileId};
use crate::config::Border;
use crate::consts::{
    BORDER_DEPTH, BORDER_TEX_WIDTH, EPS, HIGH_Y, LOW_X, TILE_DEPTH, TILE_SCALE_FACTOR,
    TILE_TEX_WIDTH,
};
use crate::{board_height, board_width, geom};

/// Tiles of one board plus the buffers a renderer draws from
#[derive(Debug, Clone)]
pub struct Mesh {
    tiles: Vec<Tile>,
    buffer: VertexBuffer,
    rows: i32,
    columns: i32,
    border_tiles: Vec<Tile>,
    border_buffer: Option<VertexBuffer>,
}

/// Row-major layouts for a `side x side` grid of square tiles
pub fn quad_layouts(side: u32) -> Vec<TileLayout> {
    let size = Vec2::new(board_width(), board_height()) * TILE_SCALE_FACTOR / side as f32;
    let mut layouts = Vec::with_capacity((side * side) as usize);
    for row in 0..side as i32 {
        for col in 0..side as i32 {
            let slot = layouts.len();
            layouts.push(TileLayout {
                id: format!("tile{row}{col}"),
                number: slot as u32 + 1,
                shape: Shape::Quad,
                grid: GridCoord::new(row, col),
                top_left: Vec2::new(LOW_X + col as f32 * size.x, HIGH_Y - row as f32 * size.y),
                size,
                depth: TILE_DEPTH,
                slot,
                tex_index: slot as u32,
                tex_width: TILE_TEX_WIDTH,
            });
        }
    }
    layouts
}

impl Mesh {
    /// Allocate one buffer slot per layout and create the tiles
    pub fn from_layouts(shape: Shape, rows: u32, columns: u32, layouts: Vec<TileLayout>) -> Self {
        let mut buffer = VertexBuffer::new(shape, layouts.len());
        let tiles: Vec<Tile> = layouts
            .into_iter()
            .map(|layout| Tile::new(layout, &mut buffer))
            .collect();
        log::debug!("Laid out {} {:?} tiles on a {}x{} grid", tiles.len(), shape, rows, columns);
        Self {
            tiles,
            buffer,
            rows: rows as i32,
            columns: columns as i32,
            border_tiles: Vec::new(),
            border_buffer: None,
        }
    }

    /// Square grid of quads
    pub fn quad_grid(side: u32) -> Self {
        Self::from_layouts(Shape::Quad, side, side, quad_layouts(side))
    }

    /// Add the four border strips, measured in cells of a `grid_side` grid
    pub fn with_border(mut self, border: Option<Border>, grid_side: u32) -> Self {
        let Some(border) = border else {
            return self;
        };

        let cell = board_width() / grid_side.max(1) as f32;
        let thickness = 0.1 * cell;
        let left = LOW_X + border.left as f32 * cell;
        let top = HIGH_Y - border.top as f32 * cell;
        let width = border.width as f32 * cell;
        let height = border.height as f32 * cell;
        let horizontal = Vec2::new(width, thickness);
        let vertical = Vec2::new(thickness, height);

        let strips = [
            ("top", Vec2::new(left, top), horizontal, 0),
            ("bottom", Vec2::new(left, top - height + thickness), horizontal, 0),
            ("left", Vec2::new(left, top), vertical, 1),
            ("right", Vec2::new(left + width - thickness, top), vertical, 1),
        ];

        let mut buffer = VertexBuffer::new(Shape::Quad, strips.len());
        self.border_tiles = strips
            .into_iter()
            .enumerate()
            .map(|(slot, (name, top_left, size, tex_index))| {
                Tile::new(
                    TileLayout {
                        id: format!("border_{name}"),
                        number: slot as u32 + 1,
                        shape: Shape::Quad,
                        grid: GridCoord::NONE,
                        top_left,
                        size,
                        depth: BORDER_DEPTH,
                        slot,
                        tex_index,
                        tex_width: BORDER_TEX_WIDTH,
                    },
                    &mut buffer,
                )
            })
            .collect();
        self.border_buffer = Some(buffer);
        log::debug!("Border at cells {:?}", border);
        self
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn buffer(&self) -> &VertexBuffer {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut VertexBuffer {
        &mut self.buffer
    }

    pub fn border_tiles(&self) -> &[Tile] {
        &self.border_tiles
    }

    pub fn border_buffer(&self) -> Option<&VertexBuffer> {
        self.border_buffer.as_ref()
    }

    /// Tile currently holding a grid coordinate
    pub fn tile_at(&self, grid: GridCoord) -> Option<TileId> {
        self.tiles.iter().position(|t| t.grid() == grid)
    }

    /// Look a tile up by its string id
    pub fn find(&self, id: &str) -> Option<TileId> {
        self.tiles.iter().position(|t| t.id() == id)
    }

    /// First drawable tile containing `point`
    pub fn hit_test(&self, point: Vec2) -> Option<TileId> {
        self.tiles
            .iter()
            .position(|t| !t.is_blank() && t.hit_test(&self.buffer, point))
    }

    pub fn centroid(&self, id: TileId) -> Option<Vec2> {
        self.tile(id).map(|t| t.centroid(&self.buffer))
    }

    /// Whether every tile sits exactly on its initial vertices
    pub fn at_initial_positions(&self) -> bool {
        self.tiles.iter().all(|t| {
            t.positions(&self.buffer)
                .iter()
                .zip(t.initial_vertices())
                .all(|(p, q)| geom::same_point(p.truncate(), q.truncate(), EPS))
        })
    }

    /// Which tile's centroid currently lies in the cell `home` started in
    pub fn occupant(&self, home: TileId) -> Option<TileId> {
        let tile = self.tile(home)?;
        let initial = tile.initial_vertices();
        let target = initial.iter().map(|v| v.truncate()).sum::<Vec2>() / initial.len() as f32;
        let tolerance = 0.25 * tile.size().x.min(tile.size().y);
        self.tiles
            .iter()
            .position(|t| geom::same_point(t.centroid(&self.buffer), target, tolerance))
    }

    pub(crate) fn swap_tiles(&mut self, a: TileId, b: TileId) {
        if a == b || a >= self.tiles.len() || b >= self.tiles.len() {
            return;
        }
        let (lo, hi) = (a.min(b), a.max(b));
        let (head, tail) = self.tiles.split_at_mut(hi);
        head[lo].swap(&mut tail[0], &mut self.buffer);
    }

    pub(crate) fn rotate_tile(&mut self, id: TileId, pivot: Vec2, angle: f32) {
        if let Some(tile) = self.tiles.get(id) {
            tile.rotate_at_anchor(&mut self.buffer, pivot, angle);
        }
    }

    pub(crate) fn translate_tile(&mut self, id: TileId, dir: Direction) {
        let (rows, columns) = (self.rows, self.columns);
        if let Some(tile) = self.tiles.get_mut(id) {
            tile.translate(&mut self.buffer, dir, rows, columns);
        }
    }
}

impl fmt::Display for Mesh {
    /// Tile numbers laid out by the cell each tile currently occupies
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let home = (row * self.columns + col) as usize;
                match self.occupant(home).and_then(|id| self.tile(id)) {
                    Some(tile) if !tile.is_blank() => write!(f, "{:>4}", tile.number())?,
                    _ => write!(f, "{:>4}", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_grid_layout() {
        let mesh = Mesh::quad_grid(4);
        assert_eq!(mesh.len(), 16);
        assert_eq!(mesh.buffer().shape_count(), 16);
        assert_eq!(mesh.tile_at(GridCoord::new(2, 3)), Some(11));
        assert_eq!(mesh.find("tile23"), Some(11));
        assert_eq!(mesh.tile(11).map(|t| t.number()), Some(12));
        assert!(mesh.at_initial_positions());
    }

    #[test]
    fn test_centroid_hit_test_round_trip() {
        let mesh = Mesh::quad_grid(5);
        for id in 0..mesh.len() {
            let c = mesh.centroid(id).unwrap();
            assert_eq!(mesh.hit_test(c), Some(id));
        }
        assert_eq!(mesh.hit_test(Vec2::new(1.5, 0.0)), None);
    }

    #[test]
    fn test_swap_tiles_and_occupant() {
        let mut mesh = Mesh::quad_grid(3);
        mesh.swap_tiles(0, 8);
        assert_eq!(mesh.tile(0).unwrap().grid(), GridCoord::new(2, 2));
        assert_eq!(mesh.occupant(8), Some(0));
        assert_eq!(mesh.occupant(0), Some(8));
        assert!(!mesh.at_initial_positions());
        mesh.swap_tiles(8, 0);
        assert!(mesh.at_initial_positions());
    }

    #[test]
    fn test_border_strips() {
        let border = Border {
            top: 1,
            left: 1,
            width: 4,
            height: 4,
        };
        let mesh = Mesh::quad_grid(5).with_border(Some(border), 5);
        let buffer = mesh.border_buffer().unwrap();
        assert_eq!(buffer.shape_count(), 4);

        let cell = 2.0 / 5.0;
        let top = &mesh.border_tiles()[0];
        assert!((top.top_left() - Vec2::new(-1.0 + cell, 1.0 - cell)).length() < 1e-6);
        assert!((top.size() - Vec2::new(4.0 * cell, 0.1 * cell)).length() < 1e-6);

        let right = &mesh.border_tiles()[3];
        assert!((right.top_left().x - (-1.0 + 5.0 * cell - 0.1 * cell)).abs() < 1e-6);
        assert!(buffer.vertices().iter().all(|v| v.position[2] == BORDER_DEPTH));
    }

    #[test]
    fn test_display_grid() {
        let mesh = Mesh::quad_grid(2);
        assert_eq!(mesh.to_string(), "   1   2\n   3   4\n");
    }
}
