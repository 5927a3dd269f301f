//! Triangle mesh container used as input to navigation mesh builds

use crate::{Error, Result};
use glam::Vec3;

use std::fs;
use std::path::Path;

/// A simple indexed triangle mesh
///
/// Vertices are stored as a flat array of `[x, y, z]` coordinates and
/// indices reference them in groups of three per triangle.
#[derive(Debug, Clone, Default)]
pub struct TriMesh {
    /// The vertices of the mesh as a flat array of [x, y, z] coordinates
    pub vertices: Vec<f32>,
    /// The indices of the mesh, 3 per triangle
    pub indices: Vec<u32>,
}

impl TriMesh {
    /// Creates a new empty triangle mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh from existing flat buffers
    pub fn from_buffers(vertices: Vec<f32>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// The number of vertices in the mesh
    pub fn vert_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// The number of triangles in the mesh
    pub fn tri_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Loads a mesh from an OBJ file
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_obj_str(&fs::read_to_string(path)?)
    }

    /// Parses OBJ content from a string
    ///
    /// Faces with more than 3 vertices are fan-triangulated. Normals,
    /// texture coordinates and comments are skipped.
    ///
    /// # Example
    ///
    /// ```
    /// use navmesh_common::TriMesh;
    ///
    /// let obj = "v 0 0 0\nv 1 0 0\nv 0.5 0 1\nf 1 2 3\n";
    /// let mesh = TriMesh::from_obj_str(obj).unwrap();
    /// assert_eq!(mesh.vert_count(), 3);
    /// assert_eq!(mesh.tri_count(), 1);
    /// ```
    pub fn from_obj_str(content: &str) -> Result<Self> {
        let mut mesh = Self::new();

        for line in content.lines() {
            Self::parse_obj_line(line, &mut mesh)?;
        }

        Ok(mesh)
    }

    fn parse_obj_line(line: &str, mesh: &mut Self) -> Result<()> {
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                for axis in ["x", "y", "z"] {
                    let value = tokens
                        .next()
                        .ok_or_else(|| {
                            Error::InvalidMesh(format!("vertex is missing its {axis} coordinate"))
                        })?
                        .parse::<f32>()
                        .map_err(|_| {
                            Error::InvalidMesh(format!("vertex {axis} coordinate is not a number"))
                        })?;
                    mesh.vertices.push(value);
                }
            }
            Some("f") => {
                let mut face = Vec::new();

                for token in tokens {
                    // Face entries may be v, v/vt, or v/vt/vn; only the
                    // vertex index matters here. OBJ indices are 1-based.
                    let index_str = token.split('/').next().ok_or_else(|| {
                        Error::InvalidMesh("face is missing a vertex index".to_string())
                    })?;
                    let index = index_str.parse::<i64>().map_err(|_| {
                        Error::InvalidMesh("face vertex index is not a number".to_string())
                    })? - 1;
                    if index < 0 {
                        return Err(Error::InvalidMesh(
                            "face vertex index is not positive".to_string(),
                        ));
                    }
                    face.push(index as u32);
                }

                if face.len() < 3 {
                    return Err(Error::InvalidMesh(
                        "face has fewer than 3 vertices".to_string(),
                    ));
                }

                // Fan triangulation for faces with more than 3 vertices
                for i in 1..(face.len() - 1) {
                    mesh.indices.push(face[0]);
                    mesh.indices.push(face[i]);
                    mesh.indices.push(face[i + 1]);
                }
            }
            _ => {
                // Skip normals, texture coordinates, comments, etc.
            }
        }

        Ok(())
    }

    /// Calculates the axis-aligned bounding box of the mesh
    pub fn bounds(&self) -> (Vec3, Vec3) {
        if self.vertices.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let mut bmin = Vec3::splat(f32::MAX);
        let mut bmax = Vec3::splat(f32::MIN);

        for v in self.vertices.chunks_exact(3) {
            let p = Vec3::new(v[0], v[1], v[2]);
            bmin = bmin.min(p);
            bmax = bmax.max(p);
        }

        (bmin, bmax)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_obj_str_simple_triangle() {
        let obj = r#"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 1.0 0.0
f 1 2 3
"#;
        let mesh = TriMesh::from_obj_str(obj).unwrap();
        assert_eq!(mesh.vert_count(), 3);
        assert_eq!(mesh.tri_count(), 1);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_from_obj_str_quad_triangulation() {
        let obj = r#"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
f 1 2 3 4
"#;
        let mesh = TriMesh::from_obj_str(obj).unwrap();
        assert_eq!(mesh.vert_count(), 4);
        assert_eq!(mesh.tri_count(), 2);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_from_obj_str_with_texture_coords_and_normals() {
        let obj = r#"
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.5 1.0 0.0
vt 0.0 0.0
vn 0.0 0.0 1.0
f 1/1/1 2/1/1 3/1/1
"#;
        let mesh = TriMesh::from_obj_str(obj).unwrap();
        assert_eq!(mesh.vert_count(), 3);
        assert_eq!(mesh.tri_count(), 1);
    }

    #[test]
    fn test_from_obj_str_skips_comments() {
        let obj = "# comment\nv 0 0 0\nv 1 0 0\nv 0 0 1\nf 1 2 3\n";
        let mesh = TriMesh::from_obj_str(obj).unwrap();
        assert_eq!(mesh.tri_count(), 1);
    }

    #[test]
    fn test_from_obj_str_invalid_vertex() {
        assert!(TriMesh::from_obj_str("v 0.0 0.0").is_err());
    }

    #[test]
    fn test_from_obj_str_invalid_face() {
        assert!(TriMesh::from_obj_str("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
    }

    #[test]
    fn test_bounds() {
        let mesh = TriMesh::from_buffers(vec![-1.0, 0.0, 2.0, 3.0, -4.0, 5.0], vec![]);
        let (bmin, bmax) = mesh.bounds();
        assert_eq!(bmin, Vec3::new(-1.0, -4.0, 2.0));
        assert_eq!(bmax, Vec3::new(3.0, 0.0, 5.0));
    }
}
