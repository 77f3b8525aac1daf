//! A single puzzle piece: logical grid cell plus its polygon in the vertex arena

use glam::{Vec2, Vec3};
use serde::Serialize;
use std::f32::consts::PI;

use super::vertex::VertexBuffer;
use super::{Direction, GridCoord};
use crate::consts::EPS;
use crate::geom::{self, Z_AXIS};

/// Polygon kind of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned square (slider, roller, borders, anchor markers)
    Quad,
    /// Equilateral triangle (hex spinner)
    Triangle,
}

impl Shape {
    pub const fn vertex_count(&self) -> usize {
        match self {
            Shape::Quad => 4,
            Shape::Triangle => 3,
        }
    }

    pub const fn index_count(&self) -> usize {
        match self {
            Shape::Quad => 6,
            Shape::Triangle => 3,
        }
    }
}

/// Everything needed to place a tile when a board is built
#[derive(Debug, Clone)]
pub struct TileLayout {
    pub id: String,
    pub number: u32,
    pub shape: Shape,
    pub grid: GridCoord,
    pub top_left: Vec2,
    pub size: Vec2,
    pub depth: f32,
    /// Slot in the board's vertex buffer
    pub slot: usize,
    /// Cell in the texture atlas
    pub tex_index: u32,
    pub tex_width: f32,
}

/// A puzzle piece
///
/// Vertex positions live in the board's [`VertexBuffer`] at `slot`. The
/// positions computed at construction are kept as the tile's initial
/// snapshot and never change afterwards; position snapping after a drag
/// compares against them.
#[derive(Debug, Clone)]
pub struct Tile {
    id: String,
    number: u32,
    shape: Shape,
    grid: GridCoord,
    top_left: Vec2,
    size: Vec2,
    depth: f32,
    slot: usize,
    blank: bool,
    initial: Vec<Vec3>,
}

impl Tile {
    /// Create a tile and write its vertices, texture coordinates and indices
    pub fn new(layout: TileLayout, buffer: &mut VertexBuffer) -> Self {
        debug_assert_eq!(layout.shape, buffer.shape());
        let mut tile = Self {
            id: layout.id,
            number: layout.number,
            shape: layout.shape,
            grid: layout.grid,
            top_left: layout.top_left,
            size: layout.size,
            depth: layout.depth,
            slot: layout.slot,
            blank: false,
            initial: Vec::new(),
        };
        tile.initial = tile.layout_vertices();
        buffer.set_positions(tile.slot, &tile.initial);
        buffer.set_normals(tile.slot, Vec3::ZERO);
        buffer.set_tex_coords(tile.slot, &tile.tex_coords(layout.tex_index, layout.tex_width));
        buffer.set_indices(tile.slot, &tile.local_indices());
        tile
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn grid(&self) -> GridCoord {
        self.grid
    }

    pub fn top_left(&self) -> Vec2 {
        self.top_left
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn is_blank(&self) -> bool {
        self.blank
    }

    pub(crate) fn mark_blank(&mut self) {
        self.blank = true;
    }

    /// Positions captured when the tile was created
    pub fn initial_vertices(&self) -> &[Vec3] {
        &self.initial
    }

    /// Current corner positions
    pub fn positions(&self, buffer: &VertexBuffer) -> Vec<Vec3> {
        buffer.get(self.slot).iter().map(|v| v.pos()).collect()
    }

    pub fn centroid(&self, buffer: &VertexBuffer) -> Vec2 {
        let verts = buffer.get(self.slot);
        verts.iter().map(|v| v.pos2()).sum::<Vec2>() / verts.len() as f32
    }

    /// Area of the tile's polygon in the board plane
    pub fn area(&self, buffer: &VertexBuffer) -> f32 {
        let p = self.positions(buffer);
        match self.shape {
            Shape::Quad => ((p[1].x - p[0].x) * (p[2].y - p[0].y)).abs(),
            Shape::Triangle => geom::triangle_area(p[0], p[1], p[2]),
        }
    }

    /// Whether a triangle currently points down
    pub fn is_inverted(&self, buffer: &VertexBuffer) -> bool {
        let verts = buffer.get(self.slot);
        verts[2].position[1] < verts[0].position[1]
    }

    /// Rewrite the vertex slot from the tile's top-left, size and depth
    pub fn compute_vertices(&self, buffer: &mut VertexBuffer) {
        buffer.set_positions(self.slot, &self.layout_vertices());
    }

    fn layout_vertices(&self) -> Vec<Vec3> {
        let Vec2 { x, y } = self.top_left;
        let Vec2 { x: w, y: h } = self.size;
        let z = self.depth;
        match self.shape {
            // bottom left, bottom right, top left, top right
            Shape::Quad => vec![
                Vec3::new(x, y - h, z),
                Vec3::new(x + w, y - h, z),
                Vec3::new(x, y, z),
                Vec3::new(x + w, y, z),
            ],
            Shape::Triangle => {
                let upright = [
                    Vec3::new(x, y - h, z),
                    Vec3::new(x + w, y - h, z),
                    Vec3::new(x + 0.5 * w, y, z),
                ];
                if self.points_up() {
                    upright.to_vec()
                } else {
                    // Flip about the base midpoint, then lift back into the cell row
                    let pivot = Vec3::new(x + 0.5 * w, y - h, z);
                    let lift = Vec3::new(0.0, h, 0.0);
                    upright
                        .iter()
                        .map(|&p| geom::translate(geom::rotate_about(p, PI, Z_AXIS, pivot), lift))
                        .collect()
                }
            }
        }
    }

    /// Checkerboard rule for triangles: within each group of three columns
    /// the middle column is inverted on even rows and upright on odd rows
    fn points_up(&self) -> bool {
        let middle = self.grid.col.rem_euclid(3) == 1;
        if self.grid.row.rem_euclid(2) == 1 {
            middle
        } else {
            !middle
        }
    }

    fn tex_coords(&self, index: u32, width: f32) -> Vec<Vec2> {
        let i = index as f32;
        match self.shape {
            Shape::Quad => vec![
                Vec2::new(width * i, 0.0),
                Vec2::new(width * (i + 1.0), 0.0),
                Vec2::new(width * i, 1.0),
                Vec2::new(width * (i + 1.0), 1.0),
            ],
            Shape::Triangle => vec![
                Vec2::new(width * i, 0.0),
                Vec2::new(width * (i + 0.9), 0.0),
                Vec2::new(width * (i + 0.9), 0.4),
            ],
        }
    }

    fn local_indices(&self) -> Vec<u16> {
        let o = (self.slot * self.shape.vertex_count()) as u16;
        match self.shape {
            Shape::Quad => vec![o, o + 1, o + 2, o + 3, o + 2, o + 1],
            Shape::Triangle => vec![o, o + 1, o + 2],
        }
    }

    /// Move one cell in `dir` with toroidal wraparound on a `rows x columns`
    /// grid. A tile pushed off one edge re-enters at the opposite edge.
    pub fn translate(&mut self, buffer: &mut VertexBuffer, dir: Direction, rows: i32, columns: i32) {
        let before = self.top_left;
        match dir {
            Direction::Up => {
                self.grid.row -= 1;
                self.top_left.y += self.size.y;
                if self.grid.row < 0 {
                    self.grid.row = rows - 1;
                    self.top_left.y -= rows as f32 * self.size.y;
                }
            }
            Direction::Down => {
                self.grid.row += 1;
                self.top_left.y -= self.size.y;
                if self.grid.row > rows - 1 {
                    self.grid.row = 0;
                    self.top_left.y += rows as f32 * self.size.y;
                }
            }
            Direction::Left => {
                self.grid.col -= 1;
                self.top_left.x -= self.size.x;
                if self.grid.col < 0 {
                    self.grid.col = columns - 1;
                    self.top_left.x += columns as f32 * self.size.x;
                }
            }
            Direction::Right => {
                self.grid.col += 1;
                self.top_left.x += self.size.x;
                if self.grid.col > columns - 1 {
                    self.grid.col = 0;
                    self.top_left.x -= columns as f32 * self.size.x;
                }
            }
        }

        match self.shape {
            Shape::Quad => self.compute_vertices(buffer),
            Shape::Triangle => {
                // Triangles may be rotated away from their layout, so shift what is there
                let offset = geom::on_plane(self.top_left - before);
                let moved: Vec<Vec3> = self
                    .positions(buffer)
                    .into_iter()
                    .map(|p| geom::translate(p, offset))
                    .collect();
                buffer.set_positions(self.slot, &moved);
            }
        }
    }

    /// Rotate the current polygon about `pivot`; the grid coordinate is untouched
    pub fn rotate_at_anchor(&self, buffer: &mut VertexBuffer, pivot: Vec2, angle: f32) {
        let pivot = geom::on_plane(pivot);
        let rotated: Vec<Vec3> = self
            .positions(buffer)
            .into_iter()
            .map(|p| {
                // Keep the layer depth; only the board-plane position turns
                let r = geom::rotate_about(Vec3::new(p.x, p.y, 0.0), angle, Z_AXIS, pivot);
                Vec3::new(r.x, r.y, p.z)
            })
            .collect();
        buffer.set_positions(self.slot, &rotated);
    }

    /// Exchange positions and grid coordinates with another tile
    pub fn swap(&mut self, other: &mut Tile, buffer: &mut VertexBuffer) {
        std::mem::swap(&mut self.top_left, &mut other.top_left);
        std::mem::swap(&mut self.grid, &mut other.grid);
        self.compute_vertices(buffer);
        other.compute_vertices(buffer);
    }

    /// Point-in-polygon test in the board plane
    pub fn hit_test(&self, buffer: &VertexBuffer, point: Vec2) -> bool {
        let v = buffer.get(self.slot);
        match self.shape {
            Shape::Quad => {
                v[0].position[0] <= point.x
                    && v[1].position[0] >= point.x
                    && v[0].position[1] <= point.y
                    && v[2].position[1] >= point.y
            }
            Shape::Triangle => {
                geom::triangle_contains(v[0].pos(), v[1].pos(), v[2].pos(), geom::on_plane(point))
            }
        }
    }

    /// Whether any corner lies within tolerance of `point`
    pub fn has_vertex(&self, buffer: &VertexBuffer, point: Vec2) -> bool {
        buffer
            .get(self.slot)
            .iter()
            .any(|v| geom::same_point(v.pos2(), point, EPS))
    }

    pub fn same_row(&self, other: &Tile) -> bool {
        self.grid.row == other.grid.row
    }

    pub fn same_column(&self, other: &Tile) -> bool {
        self.grid.col == other.grid.col
    }

    /// Direction from this tile toward `other` along a shared row or column
    pub fn direction_to(&self, other: &Tile) -> Option<Direction> {
        if self.same_column(other) && !self.same_row(other) {
            Some(if other.grid.row > self.grid.row {
                Direction::Down
            } else {
                Direction::Up
            })
        } else if self.same_row(other) && !self.same_column(other) {
            Some(if other.grid.col > self.grid.col {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            None
        }
    }
}
