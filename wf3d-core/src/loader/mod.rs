//! Mesh sources backed by files on disk.
//!
//! Only positions and triangle indices are read. Anything that is not a plain
//! triangle list is rejected rather than guessed at.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::{Mesh, MeshError};

pub mod obj;
pub mod stl;

pub use obj::ObjLoader;
pub use stl::{StlError, StlLoader};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse OBJ: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("failed to parse STL: {0}")]
    Stl(#[from] StlError),

    #[error("face {face} has {arity} vertices; only triangles are supported")]
    NonTriangularFace { face: usize, arity: u32 },

    #[error("line {line} declares a {element}; only triangle faces are supported")]
    NonFaceElement { line: usize, element: &'static str },

    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    #[error("file contains no meshes")]
    Empty,

    #[error("invalid mesh: {0}")]
    InvalidMesh(#[from] MeshError),
}

/// Capability to turn a path into a mesh
pub trait MeshLoader {
    fn load(&self, path: &Path) -> Result<Mesh, LoadError>;
}

/// Chooses a loader from the file extension
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl MeshLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Mesh, LoadError> {
        load_mesh(path)
    }
}

pub fn load_mesh(path: &Path) -> Result<Mesh, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let mesh = match extension.as_str() {
        "obj" => ObjLoader.load(path)?,
        "stl" => StlLoader.load(path)?,
        _ => return Err(LoadError::UnsupportedFormat(path.display().to_string())),
    };

    log::debug!(
        "loaded {}: {} vertices, {} triangles",
        path.display(),
        mesh.vertices().len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}
