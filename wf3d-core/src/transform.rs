/// Object placement and camera transforms (local -> world -> view)
///
/// Orientation vectors hold Euler angles in radians: `x` is pitch, `y` is yaw
/// and `z` is roll. Objects are placed by rotating (yaw, then pitch, then
/// roll), scaling and translating, in that order.
use nalgebra::{Matrix4, Point3, Vector3};

/// Rotate about the Y axis.
fn yaw(p: Point3<f32>, angle: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(p.x * cos + p.z * sin, p.y, -p.x * sin + p.z * cos)
}

/// Rotate about the X axis.
fn pitch(p: Point3<f32>, angle: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(p.x, p.y * cos - p.z * sin, p.y * sin + p.z * cos)
}

/// Rotate about the Z axis.
fn roll(p: Point3<f32>, angle: f32) -> Point3<f32> {
    let (sin, cos) = angle.sin_cos();
    Point3::new(p.x * cos - p.y * sin, p.x * sin + p.y * cos, p.z)
}

/// Transform a local-space vertex into world space.
///
/// Rotation happens before scaling and translation; the position must never
/// feed into the rotation.
pub fn local_to_world(
    position: &Vector3<f32>,
    orientation: &Vector3<f32>,
    scale: &Vector3<f32>,
    vertex: &Point3<f32>,
) -> Point3<f32> {
    let rotated = roll(pitch(yaw(*vertex, orientation.y), orientation.x), orientation.z);
    let scaled = rotated.coords.component_mul(scale);
    Point3::from(scaled + position)
}

/// Transform a world-space vertex into view space for a camera placed by
/// orienting it and then translating it to `camera_position`.
///
/// The camera placement is undone in reverse: translate back, then roll,
/// pitch and yaw by the negated angles. The result is relative to a camera
/// at the origin looking down -Z.
pub fn world_to_view(
    camera_position: &Vector3<f32>,
    camera_orientation: &Vector3<f32>,
    vertex: &Point3<f32>,
) -> Point3<f32> {
    let inverse = -camera_orientation;
    let translated = vertex - camera_position;
    yaw(pitch(roll(translated, inverse.z), inverse.x), inverse.y)
}

/// Position, orientation and scale of an object in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub orientation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn new(position: Vector3<f32>, orientation: Vector3<f32>, scale: Vector3<f32>) -> Self {
        Self {
            position,
            orientation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros(), Vector3::repeat(1.0))
    }

    /// Identity rotation and scale at `position`
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    pub fn with_orientation(mut self, orientation: Vector3<f32>) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vector3::repeat(scale))
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, delta: &Vector3<f32>) {
        self.orientation += delta;
    }

    pub fn apply(&self, vertex: &Point3<f32>) -> Point3<f32> {
        local_to_world(&self.position, &self.orientation, &self.scale, vertex)
    }

    /// The same placement as a 4x4 model matrix: T * S * Rz * Rx * Ry
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.position)
            * Matrix4::new_nonuniform_scaling(&self.scale)
            * rotation_matrix(&self.orientation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Yaw, then pitch, then roll as a single matrix
pub fn rotation_matrix(orientation: &Vector3<f32>) -> Matrix4<f32> {
    let rx = Matrix4::new_rotation(Vector3::new(orientation.x, 0.0, 0.0));
    let ry = Matrix4::new_rotation(Vector3::new(0.0, orientation.y, 0.0));
    let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, orientation.z));

    rz * rx * ry
}

/// A camera is placed like an object but has no scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vector3<f32>,
    pub orientation: Vector3<f32>,
}

impl Camera {
    pub fn new(position: Vector3<f32>, orientation: Vector3<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// Camera at the origin looking down -Z
    pub fn origin() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    pub fn to_view(&self, vertex: &Point3<f32>) -> Point3<f32> {
        world_to_view(&self.position, &self.orientation, vertex)
    }

    /// Inverse of the camera placement as a matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        let inverse = -self.orientation;
        let rx = Matrix4::new_rotation(Vector3::new(inverse.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, inverse.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, inverse.z));

        ry * rx * rz * Matrix4::new_translation(&-self.position)
    }

    pub fn snap_to(&mut self, preset: CameraPreset) {
        *self = preset.camera();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::origin()
    }
}

/// Fixed camera placements selected with the digit keys 1-4
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPreset {
    Front,
    Back,
    Close,
    Side,
}

impl CameraPreset {
    pub const ALL: [CameraPreset; 4] = [Self::Front, Self::Back, Self::Close, Self::Side];

    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            1 => Some(Self::Front),
            2 => Some(Self::Back),
            3 => Some(Self::Close),
            4 => Some(Self::Side),
            _ => None,
        }
    }

    pub fn camera(self) -> Camera {
        match self {
            Self::Front => Camera::new(Vector3::new(0.0, 0.0, 3.0), Vector3::zeros()),
            Self::Back => Camera::new(Vector3::new(0.0, 0.0, 5.0), Vector3::zeros()),
            Self::Close => Camera::new(Vector3::new(0.0, 0.0, 2.0), Vector3::zeros()),
            Self::Side => Camera::new(
                Vector3::new(1.5, 0.0, 2.6),
                Vector3::new(0.0, std::f32::consts::PI / 6.0, 0.0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-4;

    fn assert_close(a: &Point3<f32>, b: &Point3<f32>) {
        assert!((a - b).norm() < EPSILON, "{:?} != {:?}", a, b);
    }

    fn sample_points() -> Vec<Point3<f32>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, -0.5),
            Point3::new(-1.25, 3.0, 0.75),
            Point3::new(10.0, -4.0, 2.5),
        ]
    }

    fn sample_orientations() -> Vec<Vector3<f32>> {
        vec![
            Vector3::zeros(),
            Vector3::new(PI / 12.0, PI / 8.0, 0.0),
            Vector3::new(0.0, 0.0, PI / 12.0),
            Vector3::new(-0.7, 2.1, 1.3),
        ]
    }

    #[test]
    fn test_identity_transform() {
        let transform = Transform::identity();
        for p in sample_points() {
            assert_close(&transform.apply(&p), &p);
        }
    }

    #[test]
    fn test_pure_translation() {
        let offset = Vector3::new(1.0, -2.0, -3.0);
        let transform = Transform::at(offset);
        for p in sample_points() {
            assert_close(&transform.apply(&p), &(p + offset));
        }
    }

    #[test]
    fn test_pure_scale() {
        let scale = Vector3::new(2.0, 0.5, 9.0);
        let transform = Transform::identity().with_scale(scale);
        for p in sample_points() {
            let expected = Point3::from(p.coords.component_mul(&scale));
            assert_close(&transform.apply(&p), &expected);
        }
    }

    #[test]
    fn test_yaw_quarter_turn() {
        let transform = Transform::identity().with_orientation(Vector3::new(0.0, PI / 2.0, 0.0));
        // +X swings round to -Z
        assert_close(&transform.apply(&Point3::new(1.0, 0.0, 0.0)), &Point3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_rotation_applied_before_translation() {
        let transform = Transform::at(Vector3::new(5.0, 0.0, 0.0))
            .with_orientation(Vector3::new(0.0, 0.0, PI / 2.0));
        // Roll of +X gives +Y; the position is added afterwards, untouched.
        assert_close(&transform.apply(&Point3::new(1.0, 0.0, 0.0)), &Point3::new(5.0, 1.0, 0.0));
    }

    #[test]
    fn test_world_to_view_undoes_placement() {
        let positions = [
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 3.0),
            Vector3::new(1.5, -2.0, 2.6),
        ];
        for c in positions {
            for o in sample_orientations() {
                for v in sample_points() {
                    let world = local_to_world(&c, &o, &Vector3::repeat(1.0), &v);
                    assert_close(&world_to_view(&c, &o, &world), &v);
                }
            }
        }
    }

    #[test]
    fn test_model_matrix_matches_explicit_math() {
        for o in sample_orientations() {
            let transform = Transform::new(Vector3::new(-1.5, 0.0, -3.0), o, Vector3::new(1.0, 2.0, 3.0));
            let matrix = transform.model_matrix();
            for p in sample_points() {
                assert_close(&matrix.transform_point(&p), &transform.apply(&p));
            }
        }
    }

    #[test]
    fn test_view_matrix_matches_explicit_math() {
        for preset in CameraPreset::ALL {
            let camera = preset.camera();
            let matrix = camera.view_matrix();
            for p in sample_points() {
                assert_close(&matrix.transform_point(&p), &camera.to_view(&p));
            }
        }
    }

    #[test]
    fn test_rotation_state() {
        let mut transform = Transform::identity();
        transform.rotate(&Vector3::new(0.1, 0.2, 0.3));
        assert!((transform.orientation.x - 0.1).abs() < 1e-6);
        assert!((transform.orientation.y - 0.2).abs() < 1e-6);
        assert!((transform.orientation.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = rotation_matrix(&Vector3::zeros());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_camera_presets() {
        assert_eq!(CameraPreset::from_digit(1), Some(CameraPreset::Front));
        assert_eq!(CameraPreset::from_digit(4), Some(CameraPreset::Side));
        assert_eq!(CameraPreset::from_digit(0), None);
        assert_eq!(CameraPreset::from_digit(5), None);

        let mut camera = Camera::origin();
        camera.snap_to(CameraPreset::Back);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.orientation, Vector3::zeros());
    }
}
