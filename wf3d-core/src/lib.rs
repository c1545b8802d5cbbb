//! WF3D Core Library - the software wireframe transform pipeline
//!
//! Meshes go through local, world, view, clip and screen space and are
//! outlined into a framebuffer. Nothing here depends on a window or terminal;
//! front ends supply a [`LineRenderer`] and drive [`Scene`] each frame.

pub mod geometry;
pub mod loader;
pub mod pipeline;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod timing;
pub mod transform;

// Re-export commonly used types
pub use geometry::{Mesh, MeshError, Vertex};
pub use loader::{load_mesh, FileLoader, LoadError, MeshLoader};
pub use pipeline::{DrawStats, Pipeline, Stages};
pub use projection::{clip_to_screen, view_to_clip, Frustum, ProjectionError, ScreenPoint, Viewport};
pub use raster::{Color, FrameBuffer, LineRenderer};
pub use scene::{update, Demo, FrameInput, Scene, SceneObject, SceneState};
pub use timing::{FrameClock, FrameTick};
pub use transform::{local_to_world, world_to_view, Camera, CameraPreset, Transform};
