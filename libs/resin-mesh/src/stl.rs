//! # STL Input/Output
//!
//! Binary STL writer plus a reader for both binary and ASCII STL.
//!
//! ## Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (0)
//! end
//! ```
//!
//! STL stores a triangle soup. The reader shares vertices with bit-identical
//! positions so loaded meshes have connected topology again.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use config::constants::{MAX_TRIANGLES, STL_HEADER};
use glam::DVec3;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// Writes `mesh` as binary STL. Faces are triangulated on the way out.
///
/// # Errors
///
/// Returns [`MeshError::Io`] when the writer fails and
/// [`MeshError::Unsupported`] when the mesh has more triangles than the
/// format can count.
pub fn write_stl<W: Write>(writer: &mut W, mesh: &Mesh) -> MeshResult<()> {
    let triangles = mesh.triangulate();
    let count = u32::try_from(triangles.len())
        .map_err(|_| MeshError::unsupported(format!("{} triangles", triangles.len())))?;

    let mut header = [b' '; HEADER_SIZE];
    header[..STL_HEADER.len()].copy_from_slice(STL_HEADER);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    for [a, b, c] in triangles {
        let (v0, v1, v2) = (mesh.vertex(a), mesh.vertex(b), mesh.vertex(c));
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();

        for v in [normal, v0, v1, v2] {
            write_vec3(writer, v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Writes `mesh` as binary STL to `path`, replacing any existing file.
pub fn write_stl_file(path: impl AsRef<Path>, mesh: &Mesh) -> MeshResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_stl(&mut writer, mesh)?;
    writer.flush()?;
    Ok(())
}

fn write_vec3<W: Write>(writer: &mut W, v: DVec3) -> MeshResult<()> {
    // STL stores f32
    for component in [v.x as f32, v.y as f32, v.z as f32] {
        writer.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}

/// Reads an STL mesh, detecting binary or ASCII content.
///
/// # Errors
///
/// Returns [`MeshError::InvalidStl`] for truncated or malformed content.
pub fn read_stl<R: Read>(reader: &mut R) -> MeshResult<Mesh> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    if is_binary(&bytes) {
        read_binary(&bytes)
    } else if String::from_utf8_lossy(&bytes[..bytes.len().min(HEADER_SIZE)])
        .trim_start()
        .starts_with("solid")
    {
        read_ascii(&String::from_utf8_lossy(&bytes))
    } else {
        read_binary(&bytes)
    }
}

/// Reads an STL mesh from `path`.
pub fn read_stl_file(path: impl AsRef<Path>) -> MeshResult<Mesh> {
    read_stl(&mut File::open(path)?)
}

/// A binary file's size matches its triangle count exactly, which an
/// ASCII file starting with "solid" practically never does.
fn is_binary(bytes: &[u8]) -> bool {
    triangle_count(bytes).is_some_and(|count| {
        HEADER_SIZE + 4 + count * TRIANGLE_SIZE == bytes.len()
    })
}

fn triangle_count(bytes: &[u8]) -> Option<usize> {
    let raw = bytes.get(HEADER_SIZE..HEADER_SIZE + 4)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]) as usize)
}

fn read_binary(bytes: &[u8]) -> MeshResult<Mesh> {
    let count = triangle_count(bytes)
        .ok_or_else(|| MeshError::invalid_stl(format!("{} bytes is too short", bytes.len())))?;
    if count > MAX_TRIANGLES {
        return Err(MeshError::invalid_stl(format!(
            "{count} triangles exceeds the limit of {MAX_TRIANGLES}"
        )));
    }

    let body = &bytes[HEADER_SIZE + 4..];
    if body.len() < count * TRIANGLE_SIZE {
        return Err(MeshError::invalid_stl(format!(
            "expected {count} triangles, found {}",
            body.len() / TRIANGLE_SIZE
        )));
    }

    let mut builder = SoupBuilder::with_capacity(count);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(count) {
        // Skip the stored normal
        builder.push([
            read_vec3(&record[12..24]),
            read_vec3(&record[24..36]),
            read_vec3(&record[36..48]),
        ]);
    }
    Ok(builder.finish())
}

fn read_vec3(buf: &[u8]) -> DVec3 {
    let component = |i: usize| {
        f64::from(f32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]))
    };
    DVec3::new(component(0), component(4), component(8))
}

fn read_ascii(text: &str) -> MeshResult<Mesh> {
    let mut builder = SoupBuilder::with_capacity(0);
    let mut corners: Vec<DVec3> = Vec::with_capacity(3);

    for (number, line) in text.lines().enumerate() {
        let mut parts = line.split_whitespace();
        match parts.next().map(str::to_ascii_lowercase).as_deref() {
            Some("outer") => corners.clear(),
            Some("vertex") => {
                let mut coords = [0.0; 3];
                for coord in &mut coords {
                    let token = parts.next().ok_or_else(|| {
                        MeshError::invalid_stl(format!("line {}: short vertex", number + 1))
                    })?;
                    *coord = token.parse().map_err(|_| {
                        MeshError::invalid_stl(format!("line {}: bad number {token:?}", number + 1))
                    })?;
                }
                corners.push(DVec3::from_array(coords));
            }
            Some("endloop") => {
                let [a, b, c] = corners[..] else {
                    return Err(MeshError::invalid_stl(format!(
                        "line {}: facet has {} vertices",
                        number + 1,
                        corners.len()
                    )));
                };
                if builder.triangles >= MAX_TRIANGLES {
                    return Err(MeshError::invalid_stl(format!(
                        "more than {MAX_TRIANGLES} triangles"
                    )));
                }
                builder.push([a, b, c]);
            }
            Some("endsolid") => break,
            _ => {}
        }
    }

    Ok(builder.finish())
}

/// Collects triangles, sharing bit-identical positions.
struct SoupBuilder {
    mesh: Mesh,
    index: HashMap<[u64; 3], u32>,
    triangles: usize,
}

impl SoupBuilder {
    fn with_capacity(triangles: usize) -> Self {
        Self {
            mesh: Mesh::with_capacity(triangles / 2, triangles),
            index: HashMap::with_capacity(triangles / 2),
            triangles: 0,
        }
    }

    fn push(&mut self, corners: [DVec3; 3]) {
        let [a, b, c] = corners.map(|p| {
            // -0.0 and 0.0 are the same point
            let p = p + DVec3::ZERO;
            let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
            *self
                .index
                .entry(key)
                .or_insert_with(|| self.mesh.add_vertex(p))
        });
        self.triangles += 1;
        if a != b && b != c && a != c {
            self.mesh.add_triangle(a, b, c);
        }
    }

    fn finish(self) -> Mesh {
        self.mesh
    }
}
