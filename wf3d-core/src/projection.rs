/// Perspective projection and viewport mapping (view -> clip -> screen)
use nalgebra::Point3;
use thiserror::Error;

pub const DEFAULT_FOVY_DEGREES: f32 = 60.0;
pub const DEFAULT_NEAR: f32 = 0.1;
pub const DEFAULT_FAR: f32 = 100.0;

/// View-space depths closer to zero than this cannot be divided by.
pub const DEPTH_EPSILON: f32 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProjectionError {
    #[error("vertex at depth {z} lies on the camera plane and cannot be projected")]
    DegenerateDepth { z: f32 },
}

/// Parameters of the viewing frustum at the near plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub near: f32,
    pub far: f32,
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl Frustum {
    /// Build a symmetric frustum from a vertical field of view in degrees
    pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let top = near * (fovy_degrees.to_radians() / 2.0).tan();
        let right = top * aspect;
        Self {
            near,
            far,
            left: -right,
            right,
            bottom: -top,
            top,
        }
    }

    pub fn with_aspect(aspect: f32) -> Self {
        Self::perspective(DEFAULT_FOVY_DEGREES, aspect, DEFAULT_NEAR, DEFAULT_FAR)
    }
}

/// Project a view-space vertex onto the near plane and normalize by the
/// frustum extents. The depth component is dropped.
///
/// Vertices outside the frustum (including behind the camera) are projected
/// as-is; only a depth of zero is refused.
pub fn view_to_clip(frustum: &Frustum, view: &Point3<f32>) -> Result<Point3<f32>, ProjectionError> {
    if view.z.abs() < DEPTH_EPSILON {
        return Err(ProjectionError::DegenerateDepth { z: view.z });
    }

    let xp = view.x * -frustum.near / view.z;
    let yp = view.y * -frustum.near / view.z;
    Ok(Point3::new(xp / frustum.right, yp / frustum.top, 0.0))
}

/// Pixel dimensions of the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// An integer pixel position. Y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Map normalized device coordinates to pixels, flipping the vertical axis
pub fn clip_to_screen(viewport: &Viewport, clip: &Point3<f32>) -> ScreenPoint {
    let width = viewport.width as f32;
    let height = viewport.height as f32;
    ScreenPoint {
        x: (width * (clip.x + 1.0) / 2.0) as i32,
        y: (height - height * (clip.y + 1.0) / 2.0) as i32,
    }
}
