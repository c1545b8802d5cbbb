/// Scene contents and the per-frame state update
use std::f32::consts::PI;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use nalgebra::Vector3;

use crate::geometry::Mesh;
use crate::loader::{LoadError, MeshLoader};
use crate::pipeline::{DrawStats, Pipeline, Stages};
use crate::raster::{Color, LineRenderer};
use crate::transform::{Camera, CameraPreset, Transform};

/// The pipeline stages, one scene each, in teaching order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Demo {
    /// A house drawn straight from pixel coordinates
    Pixels,
    /// The same house in normalized device coordinates
    Clip,
    /// A cube authored in view space and projected
    View,
    /// Three cubes placed in the world, camera fixed at the origin
    World,
    /// Three cubes seen through a movable camera
    Camera,
    /// A mesh loaded from disk, spinning in front of the camera
    Model,
}

impl Demo {
    pub const ALL: [Demo; 6] = [
        Self::Pixels,
        Self::Clip,
        Self::View,
        Self::World,
        Self::Camera,
        Self::Model,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pixels => "pixels",
            Self::Clip => "clip",
            Self::View => "view",
            Self::World => "world",
            Self::Camera => "camera",
            Self::Model => "model",
        }
    }

    pub fn stages(self) -> Stages {
        match self {
            Self::Pixels => Stages::screen_only(),
            Self::Clip => Stages::clip_only(),
            Self::View => Stages::view_only(),
            Self::World | Self::Model => Stages::model_only(),
            Self::Camera => Stages::full(),
        }
    }

    pub fn needs_model(self) -> bool {
        self == Self::Model
    }
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|demo| demo.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown demo '{}'", s))
    }
}

/// One placed instance of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// Index into `Scene::meshes`
    pub mesh: usize,
    pub transform: Transform,
    pub color: Color,
    /// Angular velocity in radians per second
    pub spin: Vector3<f32>,
}

impl SceneObject {
    pub fn new(mesh: usize, transform: Transform, color: Color) -> Self {
        Self {
            mesh,
            transform,
            color,
            spin: Vector3::zeros(),
        }
    }

    pub fn spinning(mut self, spin: Vector3<f32>) -> Self {
        self.spin = spin;
        self
    }
}

/// Everything that changes between frames
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    pub objects: Vec<SceneObject>,
    pub camera: Camera,
}

/// Input gathered during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub camera_preset: Option<CameraPreset>,
    pub close_requested: bool,
}

/// Advance the scene by one frame.
///
/// A camera preset replaces the camera outright. Spinning objects turn by
/// `spin * elapsed`, so the animation speed does not depend on frame rate.
pub fn update(state: &SceneState, input: &FrameInput, elapsed: Duration) -> SceneState {
    let mut next = state.clone();

    if let Some(preset) = input.camera_preset {
        next.camera.snap_to(preset);
    }

    let dt = elapsed.as_secs_f32();
    for object in &mut next.objects {
        object.transform.rotate(&(object.spin * dt));
    }

    next
}

/// Yaw rate of the animated cube and loaded model
const SPIN_RATE: f32 = 0.5;

pub struct Scene {
    pub meshes: Vec<Mesh>,
    pub stages: Stages,
    pub state: SceneState,
}

impl Scene {
    /// Build the scene for `demo`. The loader is only consulted for
    /// [`Demo::Model`].
    pub fn load<L: MeshLoader + ?Sized>(demo: Demo, loader: &L, model_path: &Path) -> Result<Self, LoadError> {
        let scene = match demo {
            Demo::Pixels => Self::single(demo, Mesh::house_pixels(), Color::WHITE),
            Demo::Clip => Self::single(demo, Mesh::house(), Color::WHITE),
            Demo::View => Self::single(
                demo,
                Mesh::cube().translated(Vector3::new(0.0, 0.0, -3.0)),
                Color::WHITE,
            ),
            Demo::World => Self::three_cubes(
                demo,
                [
                    Vector3::new(-1.5, 0.0, -3.0),
                    Vector3::new(0.0, 0.0, -6.0),
                    Vector3::new(0.5, 0.0, -2.0),
                ],
                Camera::origin(),
            ),
            Demo::Camera => Self::three_cubes(
                demo,
                [
                    Vector3::new(-1.5, 0.0, 0.0),
                    Vector3::new(0.0, 0.0, -3.0),
                    Vector3::new(0.5, 0.0, 1.0),
                ],
                CameraPreset::Front.camera(),
            ),
            Demo::Model => {
                let mesh = loader.load(model_path)?;
                log::info!(
                    "{}: {} vertices, {} triangles",
                    model_path.display(),
                    mesh.vertices().len(),
                    mesh.triangle_count()
                );
                let transform = Transform::at(Vector3::new(0.0, -1.0, -2.5)).with_uniform_scale(9.0);
                Self {
                    meshes: vec![mesh],
                    stages: demo.stages(),
                    state: SceneState {
                        objects: vec![SceneObject::new(0, transform, Color::WHITE)
                            .spinning(Vector3::new(0.0, SPIN_RATE, 0.0))],
                        camera: Camera::origin(),
                    },
                }
            }
        };
        Ok(scene)
    }

    fn single(demo: Demo, mesh: Mesh, color: Color) -> Self {
        Self {
            meshes: vec![mesh],
            stages: demo.stages(),
            state: SceneState {
                objects: vec![SceneObject::new(0, Transform::identity(), color)],
                camera: Camera::origin(),
            },
        }
    }

    fn three_cubes(demo: Demo, positions: [Vector3<f32>; 3], camera: Camera) -> Self {
        let [first, second, third] = positions;
        let objects = vec![
            SceneObject::new(
                0,
                Transform::at(first).with_orientation(Vector3::new(PI / 12.0, PI / 8.0, 0.0)),
                Color::RED,
            )
            .spinning(Vector3::new(0.0, SPIN_RATE, 0.0)),
            SceneObject::new(0, Transform::at(second).with_uniform_scale(2.0), Color::GREEN),
            SceneObject::new(
                0,
                Transform::at(third).with_orientation(Vector3::new(0.0, 0.0, PI / 12.0)),
                Color::BLUE,
            ),
        ];
        Self {
            meshes: vec![Mesh::cube()],
            stages: demo.stages(),
            state: SceneState { objects, camera },
        }
    }

    pub fn advance(&mut self, input: &FrameInput, elapsed: Duration) {
        self.state = update(&self.state, input, elapsed);
    }

    /// Draw every object in order. Later objects overdraw earlier ones.
    pub fn draw<R: LineRenderer + ?Sized>(&self, pipeline: &Pipeline, renderer: &mut R) -> DrawStats {
        let mut stats = DrawStats::default();
        for object in &self.state.objects {
            let Some(mesh) = self.meshes.get(object.mesh) else {
                log::warn!("object refers to missing mesh {}", object.mesh);
                continue;
            };
            stats += pipeline.draw_mesh(renderer, mesh, &object.transform, &self.state.camera, object.color);
        }
        stats
    }
}
