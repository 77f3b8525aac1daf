//! Vertex records and the shared per-board vertex arena
//!
//! Each tile owns one fixed-size slot (a "shape") in a [`VertexBuffer`].
//! Tiles refer to their slot by index, so moving tiles never reallocates
//! and the whole buffer can be handed to a renderer as one contiguous upload.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use super::tile::Shape;

/// One tile corner: position, normal and texture coordinate (32 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    pub const fn new(position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[inline]
    pub fn pos2(&self) -> Vec2 {
        Vec2::new(self.position[0], self.position[1])
    }
}

/// Arena of equally sized vertex shapes plus their triangle indices
///
/// `revision` increases on every write so a renderer can tell when it has to
/// re-upload.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    shape: Shape,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
    revision: u64,
}

impl VertexBuffer {
    /// Allocate `shape_count` zeroed shapes
    pub fn new(shape: Shape, shape_count: usize) -> Self {
        Self {
            shape,
            vertices: vec![Vertex::zeroed(); shape_count * shape.vertex_count()],
            indices: vec![0; shape_count * shape.index_count()],
            revision: 0,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn shape_count(&self) -> usize {
        self.vertices.len() / self.shape.vertex_count()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Raw vertex bytes for GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Raw index bytes for GPU upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    /// Vertices of one slot
    pub fn get(&self, slot: usize) -> &[Vertex] {
        let n = self.shape.vertex_count();
        &self.vertices[slot * n..(slot + 1) * n]
    }

    /// Indices of one slot
    pub fn get_index(&self, slot: usize) -> &[u16] {
        let n = self.shape.index_count();
        &self.indices[slot * n..(slot + 1) * n]
    }

    fn get_mut(&mut self, slot: usize) -> &mut [Vertex] {
        self.revision = self.revision.wrapping_add(1);
        let n = self.shape.vertex_count();
        &mut self.vertices[slot * n..(slot + 1) * n]
    }

    pub fn set_positions(&mut self, slot: usize, positions: &[Vec3]) {
        for (v, p) in self.get_mut(slot).iter_mut().zip(positions) {
            v.position = p.to_array();
        }
    }

    pub fn set_normals(&mut self, slot: usize, normal: Vec3) {
        for v in self.get_mut(slot) {
            v.normal = normal.to_array();
        }
    }

    pub fn set_tex_coords(&mut self, slot: usize, tex_coords: &[Vec2]) {
        for (v, t) in self.get_mut(slot).iter_mut().zip(tex_coords) {
            v.tex_coords = t.to_array();
        }
    }

    /// Move every vertex of the slot to depth `z`
    pub fn set_depth(&mut self, slot: usize, z: f32) {
        for v in self.get_mut(slot) {
            v.position[2] = z;
        }
    }

    pub fn set_indices(&mut self, slot: usize, indices: &[u16]) {
        self.revision = self.revision.wrapping_add(1);
        let n = self.shape.index_count();
        self.indices[slot * n..(slot + 1) * n].copy_from_slice(indices);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn test_slots_and_revision() {
        let mut vb = VertexBuffer::new(Shape::Quad, 2);
        assert_eq!(vb.shape_count(), 2);
        assert_eq!(vb.vertices().len(), 8);
        assert_eq!(vb.indices().len(), 12);
        assert_eq!(vb.revision(), 0);

        vb.set_positions(1, &[Vec3::ONE; 4]);
        assert_eq!(vb.revision(), 1);
        assert_eq!(vb.get(1)[3].pos(), Vec3::ONE);
        assert_eq!(vb.get(0)[0].pos(), Vec3::ZERO);

        vb.set_depth(1, 0.5);
        assert_eq!(vb.get(1)[0].position[2], 0.5);
        assert_eq!(vb.vertex_bytes().len(), 8 * 32);
    }
}
