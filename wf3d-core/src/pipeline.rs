/// The full vertex pipeline: local -> world -> view -> clip -> screen
use nalgebra::Point3;

use crate::geometry::{Mesh, Vertex};
use crate::projection::{clip_to_screen, view_to_clip, Frustum, ProjectionError, ScreenPoint, Viewport};
use crate::raster::{Color, LineRenderer};
use crate::transform::{Camera, Transform};

/// Which coordinate-space conversions run for each vertex.
///
/// A disabled stage passes its input straight through, so meshes can be
/// authored directly in any of the intermediate spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub local_to_world: bool,
    pub world_to_view: bool,
    pub view_to_clip: bool,
    pub clip_to_screen: bool,
}

impl Stages {
    pub fn full() -> Self {
        Self {
            local_to_world: true,
            world_to_view: true,
            view_to_clip: true,
            clip_to_screen: true,
        }
    }

    /// Objects are placed in the world; the camera sits at the origin.
    pub fn model_only() -> Self {
        Self {
            world_to_view: false,
            ..Self::full()
        }
    }

    /// Vertices are authored in view space.
    pub fn view_only() -> Self {
        Self {
            local_to_world: false,
            world_to_view: false,
            ..Self::full()
        }
    }

    /// Vertices are authored in normalized device coordinates.
    pub fn clip_only() -> Self {
        Self {
            view_to_clip: false,
            ..Self::view_only()
        }
    }

    /// Vertices are authored in pixels.
    pub fn screen_only() -> Self {
        Self {
            clip_to_screen: false,
            ..Self::clip_only()
        }
    }
}

impl Default for Stages {
    fn default() -> Self {
        Self::full()
    }
}

/// Triangles handled by one `draw_mesh` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub drawn: usize,
    pub skipped: usize,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, other: Self) {
        self.drawn += other.drawn;
        self.skipped += other.skipped;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipeline {
    pub stages: Stages,
    pub frustum: Frustum,
    pub viewport: Viewport,
}

impl Pipeline {
    pub fn new(stages: Stages, frustum: Frustum, viewport: Viewport) -> Self {
        Self {
            stages,
            frustum,
            viewport,
        }
    }

    /// Default frustum matched to the viewport's aspect ratio
    pub fn for_viewport(stages: Stages, viewport: Viewport) -> Self {
        Self::new(stages, Frustum::with_aspect(viewport.aspect()), viewport)
    }

    /// Track a new render target size. The frustum is left alone.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Run a vertex through the enabled stages, stopping at clip space
    pub fn to_clip(
        &self,
        transform: &Transform,
        camera: &Camera,
        vertex: &Vertex,
    ) -> Result<Point3<f32>, ProjectionError> {
        let mut point = vertex.position;
        if self.stages.local_to_world {
            point = transform.apply(&point);
        }
        if self.stages.world_to_view {
            point = camera.to_view(&point);
        }
        if self.stages.view_to_clip {
            point = view_to_clip(&self.frustum, &point)?;
        }
        Ok(point)
    }

    pub fn project_vertex(
        &self,
        transform: &Transform,
        camera: &Camera,
        vertex: &Vertex,
    ) -> Result<ScreenPoint, ProjectionError> {
        let point = self.to_clip(transform, camera, vertex)?;
        if self.stages.clip_to_screen {
            Ok(clip_to_screen(&self.viewport, &point))
        } else {
            Ok(ScreenPoint::new(point.x as i32, point.y as i32))
        }
    }

    /// Project all three corners, or `None` if any of them is degenerate
    pub fn project_triangle(
        &self,
        transform: &Transform,
        camera: &Camera,
        triangle: [&Vertex; 3],
    ) -> Option<[ScreenPoint; 3]> {
        let mut screen = [ScreenPoint::new(0, 0); 3];
        for (out, vertex) in screen.iter_mut().zip(triangle) {
            match self.project_vertex(transform, camera, vertex) {
                Ok(point) => *out = point,
                Err(e) => {
                    log::trace!("skipping triangle: {}", e);
                    return None;
                }
            }
        }
        Some(screen)
    }

    /// Outline every triangle of `mesh` in index order
    pub fn draw_mesh<R: LineRenderer + ?Sized>(
        &self,
        renderer: &mut R,
        mesh: &Mesh,
        transform: &Transform,
        camera: &Camera,
        color: Color,
    ) -> DrawStats {
        let mut stats = DrawStats::default();
        for triangle in mesh.triangles() {
            match self.project_triangle(transform, camera, triangle) {
                Some([a, b, c]) => {
                    renderer.draw_triangle(a, b, c, color);
                    stats.drawn += 1;
                }
                None => stats.skipped += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::FrameBuffer;
    use nalgebra::Vector3;

    /// Records every edge instead of drawing it
    #[derive(Default)]
    struct EdgeLog {
        edges: Vec<(ScreenPoint, ScreenPoint, Color)>,
    }

    impl LineRenderer for EdgeLog {
        fn draw_line(&mut self, start: ScreenPoint, end: ScreenPoint, color: Color) {
            self.edges.push((start, end, color));
        }
    }

    fn viewport() -> Viewport {
        Viewport::new(800, 600)
    }

    #[test]
    fn test_screen_only_passes_pixels_through() {
        let pipeline = Pipeline::for_viewport(Stages::screen_only(), viewport());
        let mut log = EdgeLog::default();
        let stats = pipeline.draw_mesh(
            &mut log,
            &Mesh::house_pixels(),
            &Transform::at(Vector3::new(100.0, 100.0, 100.0)),
            &Camera::origin(),
            Color::WHITE,
        );

        assert_eq!(stats, DrawStats { drawn: 3, skipped: 0 });
        assert_eq!(log.edges.len(), 9);
        assert_eq!(log.edges[0].0, ScreenPoint::new(300, 300));
        assert_eq!(log.edges[0].1, ScreenPoint::new(600, 300));
    }

    #[test]
    fn test_clip_only_maps_house_to_viewport() {
        let pipeline = Pipeline::for_viewport(Stages::clip_only(), viewport());
        let roof = pipeline
            .project_vertex(&Transform::identity(), &Camera::origin(), &Vertex::new(0.0, 0.5, 0.0))
            .unwrap();
        assert_eq!(roof, ScreenPoint::new(400, 150));
    }

    #[test]
    fn test_camera_stage_only_applies_when_enabled() {
        let camera = Camera::new(Vector3::new(0.0, 0.0, 3.0), Vector3::zeros());
        let vertex = Vertex::new(0.5, 0.0, 0.0);

        let full = Pipeline::for_viewport(Stages::full(), viewport());
        let clip = full.to_clip(&Transform::identity(), &camera, &vertex).unwrap();
        let expected = view_to_clip(&full.frustum, &Point3::new(0.5, 0.0, -3.0)).unwrap();
        assert!((clip - expected).norm() < 1e-6);

        let model_only = Pipeline::for_viewport(Stages::model_only(), viewport());
        assert!(model_only.to_clip(&Transform::identity(), &camera, &vertex).is_err());
    }

    #[test]
    fn test_degenerate_triangles_are_skipped() {
        let pipeline = Pipeline::for_viewport(Stages::full(), viewport());
        let mut log = EdgeLog::default();
        // A flat mesh at z = 0 lies on the camera plane.
        let flat = Mesh::house();
        let stats = pipeline.draw_mesh(&mut log, &flat, &Transform::identity(), &Camera::origin(), Color::RED);

        assert_eq!(stats, DrawStats { drawn: 0, skipped: 3 });
        assert!(log.edges.is_empty());
    }

    #[test]
    fn test_triangle_grazing_the_camera_plane_draws_clipped() {
        // Just outside the degenerate band, the first two corners project to
        // saturated pixel coordinates.
        let mesh = Mesh::new(
            vec![
                Vertex::new(1000.0, 0.0, -1e-5),
                Vertex::new(-1000.0, 0.0, -1e-5),
                Vertex::new(0.0, 1.0, -3.0),
            ],
            vec![0, 1, 2],
        )
        .unwrap();
        let pipeline = Pipeline::for_viewport(Stages::view_only(), viewport());
        let mut buffer = FrameBuffer::new(800, 600);

        let stats = pipeline.draw_mesh(&mut buffer, &mesh, &Transform::identity(), &Camera::origin(), Color::WHITE);

        assert_eq!(stats, DrawStats { drawn: 1, skipped: 0 });
        assert_eq!(buffer.pixel(0, 300), Some(Color::WHITE));
        assert_eq!(buffer.pixel(799, 300), Some(Color::WHITE));
        assert_eq!(buffer.pixel(400, 100), Some(Color::BLACK));
    }

    #[test]
    fn test_draw_stats_accumulate() {
        let mut total = DrawStats::default();
        total += DrawStats { drawn: 2, skipped: 1 };
        total += DrawStats { drawn: 3, skipped: 0 };
        assert_eq!(total, DrawStats { drawn: 5, skipped: 1 });
    }
}
