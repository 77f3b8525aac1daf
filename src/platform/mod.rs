//! Platform glue
//!
//! Handles browser/native differences for:
//! - Logger setup (console on web, env_logger natively)
//! - Mapping pointer pixels into the board's clip space

use glam::{Mat4, Vec2, Vec4};

/// Drawing rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn contains(&self, pixel: Vec2) -> bool {
        pixel.x >= self.left
            && pixel.x <= self.left + self.width
            && pixel.y >= self.top
            && pixel.y <= self.top + self.height
    }
}

/// Convert a pointer position in pixels (y down) to board coordinates by
/// unprojecting normalized device coordinates through `projection`
///
/// Returns `None` for an empty viewport or a singular projection.
pub fn normalize_view_coord(pixel: Vec2, viewport: &Viewport, projection: &Mat4) -> Option<Vec2> {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return None;
    }
    let inverse = projection.inverse();
    if !inverse.is_finite() {
        log::warn!("Projection matrix is not invertible");
        return None;
    }

    let ndc = Vec4::new(
        (pixel.x - viewport.left) * 2.0 / viewport.width - 1.0,
        -(pixel.y - viewport.top) * 2.0 / viewport.height + 1.0,
        0.0,
        1.0,
    );
    let clip = inverse * ndc;
    if clip.w != 0.0 {
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    } else {
        Some(Vec2::new(clip.x, clip.y))
    }
}

/// Install the logger for the current platform. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the logger for the current platform. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_projection() {
        let vp = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let centre = normalize_view_coord(Vec2::new(400.0, 300.0), &vp, &Mat4::IDENTITY).unwrap();
        assert!(centre.length() < 1e-6);

        let corner = normalize_view_coord(Vec2::ZERO, &vp, &Mat4::IDENTITY).unwrap();
        assert!((corner - Vec2::new(-1.0, 1.0)).length() < 1e-6);

        let bottom_right = normalize_view_coord(Vec2::new(800.0, 600.0), &vp, &Mat4::IDENTITY).unwrap();
        assert!((bottom_right - Vec2::new(1.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_offset_viewport_and_scale() {
        let vp = Viewport::new(100.0, 50.0, 200.0, 200.0);
        let projection = Mat4::from_scale(glam::Vec3::new(0.5, 0.5, 1.0));
        let p = normalize_view_coord(Vec2::new(150.0, 100.0), &vp, &projection).unwrap();
        // ndc (-0.5, 0.5) undone by the half scale
        assert!((p - Vec2::new(-1.0, 1.0)).length() < 1e-5);
        assert!(vp.contains(Vec2::new(150.0, 100.0)));
        assert!(!vp.contains(Vec2::new(50.0, 100.0)));
    }

    #[test]
    fn test_degenerate_inputs() {
        let vp = Viewport::new(0.0, 0.0, 0.0, 600.0);
        assert!(normalize_view_coord(Vec2::ZERO, &vp, &Mat4::IDENTITY).is_none());

        let vp = Viewport::new(0.0, 0.0, 800.0, 600.0);
        assert!(normalize_view_coord(Vec2::ZERO, &vp, &Mat4::ZERO).is_none());
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging();
        init_logging();
    }
}
