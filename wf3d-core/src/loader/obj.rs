/// Wavefront OBJ loading through `tobj`
use std::path::Path;

use super::{LoadError, MeshLoader};
use crate::geometry::{Mesh, Vertex};

/// Loads the first mesh of an OBJ file.
///
/// Faces are not triangulated: a quad or polygon in the file is an error, as
/// are points and lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjLoader;

impl ObjLoader {
    fn options() -> tobj::LoadOptions {
        tobj::LoadOptions {
            triangulate: false,
            single_index: false,
            ..Default::default()
        }
    }

    /// Parse OBJ text. Material libraries are not consulted.
    pub fn parse(text: &str) -> Result<Mesh, LoadError> {
        reject_non_faces(text)?;

        let mut reader = text.as_bytes();
        let (models, _) = tobj::load_obj_buf(&mut reader, &Self::options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })?;
        first_mesh(models)
    }
}

impl MeshLoader for ObjLoader {
    fn load(&self, path: &Path) -> Result<Mesh, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }
}

// tobj hands polylines back with the same index layout as faces, so they
// have to be caught in the source text.
fn reject_non_faces(text: &str) -> Result<(), LoadError> {
    for (number, line) in text.lines().enumerate() {
        let element = match line.split_whitespace().next() {
            Some("l") => "line",
            Some("p") => "point",
            _ => continue,
        };
        return Err(LoadError::NonFaceElement {
            line: number + 1,
            element,
        });
    }
    Ok(())
}

fn first_mesh(models: Vec<tobj::Model>) -> Result<Mesh, LoadError> {
    if models.len() > 1 {
        log::debug!("using the first of {} models", models.len());
    }
    // Objects without faces carry nothing to draw
    let model = models
        .into_iter()
        .find(|model| !model.mesh.indices.is_empty())
        .ok_or(LoadError::Empty)?;
    let mesh = model.mesh;

    // An empty arity list means every face is a triangle
    if let Some((face, &arity)) = mesh
        .face_arities
        .iter()
        .enumerate()
        .find(|&(_, &arity)| arity != 3)
    {
        return Err(LoadError::NonTriangularFace { face, arity });
    }

    let vertices = mesh
        .positions
        .chunks_exact(3)
        .map(|p| Vertex::new(p[0], p[1], p[2]))
        .collect();

    Ok(Mesh::new(vertices, mesh.indices)?)
}
