/// STL file parser for binary and ASCII formats
use std::path::Path;

use nom::{
    bytes::complete::{tag, take},
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16},
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;

use super::{LoadError, MeshLoader};
use crate::geometry::{Mesh, Vertex};

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StlError {
    #[error("file too small to be a valid STL ({len} bytes)")]
    TooShort { len: usize },

    #[error("expected {expected} bytes for {triangles} triangles, found {actual}")]
    Truncated {
        triangles: u32,
        expected: usize,
        actual: usize,
    },

    #[error("malformed binary facet: {0}")]
    Binary(String),

    #[error("malformed ASCII STL: {0}")]
    Ascii(String),
}

type Facet = [[f32; 3]; 3];

#[derive(Debug, Clone, Copy, Default)]
pub struct StlLoader;

impl MeshLoader for StlLoader {
    fn load(&self, path: &Path) -> Result<Mesh, LoadError> {
        let data = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse_stl(&data)
    }
}

/// Detect and parse STL data (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    // Binary files may also start with "solid", so ASCII is only a first guess
    let mut ascii_error = None;
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            match parse_ascii_stl(text) {
                Ok(mesh) => return Ok(mesh),
                Err(e) => ascii_error = Some(e),
            }
        }
    }

    // A file that reads as broken ASCII is reported as such
    parse_binary_stl(data).map_err(|binary_error| ascii_error.unwrap_or(binary_error))
}

pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooShort { len: data.len() }.into());
    }

    let triangles = u32::from_le_bytes([data[80], data[81], data[82], data[83]]);
    let expected = HEADER_LEN + 4 + triangles as usize * FACET_LEN;
    if data.len() < expected {
        return Err(StlError::Truncated {
            triangles,
            expected,
            actual: data.len(),
        }
        .into());
    }

    let (_, facets) = count(binary_facet, triangles as usize)(&data[HEADER_LEN + 4..])
        .map_err(|e| StlError::Binary(e.map(|e| e.code).to_string()))?;

    facets_to_mesh(facets)
}

pub fn parse_ascii_stl(input: &str) -> Result<Mesh, LoadError> {
    let (_, facets) = ascii_solid(input).map_err(|e| StlError::Ascii(e.map(|e| e.code).to_string()))?;
    facets_to_mesh(facets)
}

// STL facets share no vertices, so each one contributes three new vertices.
fn facets_to_mesh(facets: Vec<Facet>) -> Result<Mesh, LoadError> {
    let mut vertices = Vec::with_capacity(facets.len() * 3);
    let mut faces = Vec::with_capacity(facets.len() * 3);
    for facet in facets {
        for [x, y, z] in facet {
            faces.push(vertices.len() as u32);
            vertices.push(Vertex::new(x, y, z));
        }
    }
    Ok(Mesh::new(vertices, faces)?)
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    // Normal vector, ignored
    let (input, _) = take(12usize)(input)?;
    let (input, a) = binary_vector3(input)?;
    let (input, b) = binary_vector3(input)?;
    let (input, c) = binary_vector3(input)?;
    // Attribute byte count
    let (input, _) = le_u16(input)?;
    Ok((input, [a, b, c]))
}

fn binary_vector3(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z]))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _) = ascii_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;
    Ok((input, [a, b, c]))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    ascii_vector3(input)
}

fn ascii_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}
