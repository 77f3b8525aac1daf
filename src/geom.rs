//! Stateless vector math for tile geometry
//!
//! Every transform is built as a 4x4 homogeneous matrix and applied to the
//! point, so translate/rotate/translate-back compose into one product.

use glam::{Mat4, Vec2, Vec3};

use crate::consts::EPS;

/// The board plane's normal, used as the rotation axis for all tile spins
pub const Z_AXIS: Vec3 = Vec3::Z;

/// Translate a point by an offset
#[inline]
pub fn translate(point: Vec3, offset: Vec3) -> Vec3 {
    Mat4::from_translation(offset).transform_point3(point)
}

/// Rotate a point about an axis through the origin (counter-clockwise for
/// positive angles when looking down the axis)
#[inline]
pub fn rotate(point: Vec3, angle: f32, axis: Vec3) -> Vec3 {
    Mat4::from_axis_angle(axis.normalize(), angle).transform_point3(point)
}

/// Rotate a point about an axis passing through `pivot`
pub fn rotate_about(point: Vec3, angle: f32, axis: Vec3, pivot: Vec3) -> Vec3 {
    let mat = Mat4::from_translation(pivot)
        * Mat4::from_axis_angle(axis.normalize(), angle)
        * Mat4::from_translation(-pivot);
    mat.transform_point3(point)
}

/// Angle between two vectors in radians, `None` if either is zero-length
pub fn angle_between(v1: Vec3, v2: Vec3) -> Option<f32> {
    let mag = v1.length() * v2.length();
    if mag <= f32::EPSILON {
        return None;
    }
    // Clamp guards acos against rounding just outside [-1, 1]
    Some((v1.dot(v2) / mag).clamp(-1.0, 1.0).acos())
}

#[inline]
pub fn cross(v1: Vec3, v2: Vec3) -> Vec3 {
    v1.cross(v2)
}

#[inline]
pub fn dot(v1: Vec3, v2: Vec3) -> f32 {
    v1.dot(v2)
}

#[inline]
pub fn distance(v1: Vec3, v2: Vec3) -> f32 {
    v1.distance(v2)
}

/// Lift a board-plane point into 3D at z = 0
#[inline]
pub fn on_plane(point: Vec2) -> Vec3 {
    point.extend(0.0)
}

/// Point equality in the board plane with a fixed absolute tolerance
#[inline]
pub fn same_point(a: Vec2, b: Vec2, eps: f32) -> bool {
    (a.x - b.x).abs() <= eps && (a.y - b.y).abs() <= eps
}

/// Unsigned area of the triangle (v1, v2, v3) projected onto the board plane
pub fn triangle_area(v1: Vec3, v2: Vec3, v3: Vec3) -> f32 {
    ((v1.x * (v2.y - v3.y) + v2.x * (v3.y - v1.y) + v3.x * (v1.y - v2.y)) / 2.0).abs()
}

/// Point-in-triangle test by comparing the triangle's area with the sum of
/// the three sub-triangles formed with `p`
pub fn triangle_contains(v1: Vec3, v2: Vec3, v3: Vec3, p: Vec3) -> bool {
    let area = triangle_area(v1, v2, v3);
    let a1 = triangle_area(p, v2, v3);
    let a2 = triangle_area(v1, p, v3);
    let a3 = triangle_area(v1, v2, p);
    (area - (a1 + a2 + a3)).abs() <= EPS
}
