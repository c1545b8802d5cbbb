/// Geometry primitives: vertices and indexed triangle meshes
use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Indices consumed per triangle.
pub const VERTICES_PER_FACE: usize = 3;

/// Reasons a vertex/index pair cannot form a mesh
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    #[error("face index list has {len} entries, which is not a multiple of 3")]
    IncompleteFace { len: usize },

    #[error("face index {index} at position {position} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        position: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// A 3D vertex. Only the position is carried; the pipeline is wireframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
        }
    }
}

impl From<Point3<f32>> for Vertex {
    fn from(position: Point3<f32>) -> Self {
        Self { position }
    }
}

/// An indexed triangle mesh.
///
/// `faces` is consumed three indices at a time. Construction validates that
/// every index names a vertex and that no face is left incomplete, so the
/// accessors below never index out of bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    faces: Vec<u32>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<u32>) -> Result<Self, MeshError> {
        if faces.len() % VERTICES_PER_FACE != 0 {
            return Err(MeshError::IncompleteFace { len: faces.len() });
        }

        if let Some((position, &index)) = faces
            .iter()
            .enumerate()
            .find(|&(_, &index)| index as usize >= vertices.len())
        {
            return Err(MeshError::IndexOutOfRange {
                position,
                index,
                vertex_count: vertices.len(),
            });
        }

        Ok(Self { vertices, faces })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len() / VERTICES_PER_FACE
    }

    /// Iterate triangles in index order
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.faces.chunks_exact(VERTICES_PER_FACE).map(move |face| {
            [
                &self.vertices[face[0] as usize],
                &self.vertices[face[1] as usize],
                &self.vertices[face[2] as usize],
            ]
        })
    }

    /// Copy of this mesh with every vertex offset by `offset`.
    pub fn translated(&self, offset: Vector3<f32>) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| Vertex::from(v.position + offset))
                .collect(),
            faces: self.faces.clone(),
        }
    }

    /// A flat house outline (square body, triangular roof) in clip coordinates.
    pub fn house() -> Self {
        Self::from_literal(
            &[
                [-0.5, 0.0, 0.0],
                [0.5, 0.0, 0.0],
                [-0.5, -0.5, 0.0],
                [0.5, -0.5, 0.0],
                [0.0, 0.5, 0.0],
            ],
            &HOUSE_FACES,
        )
    }

    /// The same house laid out directly in pixel coordinates of a 1200x800 window.
    pub fn house_pixels() -> Self {
        Self::from_literal(
            &[
                [300.0, 300.0, 0.0],
                [600.0, 300.0, 0.0],
                [300.0, 500.0, 0.0],
                [600.0, 500.0, 0.0],
                [450.0, 150.0, 0.0],
            ],
            &HOUSE_FACES,
        )
    }

    /// Unit cube centered at the origin: 8 vertices, 12 triangles
    pub fn cube() -> Self {
        Self::from_literal(
            &[
                [0.5, 0.5, -0.5],
                [-0.5, 0.5, -0.5],
                [-0.5, -0.5, -0.5],
                [0.5, -0.5, -0.5],
                [0.5, 0.5, 0.5],
                [-0.5, 0.5, 0.5],
                [-0.5, -0.5, 0.5],
                [0.5, -0.5, 0.5],
            ],
            &CUBE_FACES,
        )
    }

    // Built-in shapes are known to be well formed.
    fn from_literal(points: &[[f32; 3]], faces: &[u32]) -> Self {
        Self {
            vertices: points.iter().map(|p| Vertex::new(p[0], p[1], p[2])).collect(),
            faces: faces.to_vec(),
        }
    }
}

const HOUSE_FACES: [u32; 9] = [0, 1, 2, 1, 3, 2, 0, 4, 1];

const CUBE_FACES: [u32; 36] = [
    0, 1, 2, //
    0, 2, 3, //
    4, 0, 3, //
    4, 3, 7, //
    5, 4, 7, //
    5, 7, 6, //
    1, 5, 6, //
    1, 6, 2, //
    4, 5, 1, //
    4, 1, 0, //
    2, 6, 7, //
    2, 7, 3,
];
