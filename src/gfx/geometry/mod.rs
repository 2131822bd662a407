//! # Procedural Geometry Generation
//!
//! This module provides functions to generate common 3D primitive shapes procedurally,
//! plus an OBJ loader for everything else.
//!
//! ## Supported Primitives
//!
//! - **Box**: Axis-aligned box with configurable extents
//! - **Sphere**: UV sphere with configurable resolution
//! - **Plane**: Flat plane in XY with configurable size and subdivisions
//! - **Torus**: Ring with configurable radius and tube
//! - **Cylinder / Cone**: Y-aligned, with end caps
//!
//! ## Usage
//!
//! ```rust
//! use vista::gfx::geometry::GeometryDesc;
//!
//! let cube = GeometryDesc::cube(1.0).build();
//! assert_eq!(cube.triangle_count(), 12);
//! ```

pub mod obj;
pub mod primitives;

pub use primitives::*;

use crate::gfx::rendering::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the renderer's vertex format
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }

    /// Line-list indices covering every triangle edge once
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut seen = std::collections::HashSet::new();
        let mut lines = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }

    /// Recomputes smooth vertex normals by averaging the face normals of the
    /// triangles touching each vertex
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![[0.0f32; 3]; self.vertices.len()];

        for triangle in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [
                triangle[0] as usize,
                triangle[1] as usize,
                triangle[2] as usize,
            ];
            let (v0, v1, v2) = (self.vertices[i0], self.vertices[i1], self.vertices[i2]);

            let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
            let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
            let face_normal = [
                edge1[1] * edge2[2] - edge1[2] * edge2[1],
                edge1[2] * edge2[0] - edge1[0] * edge2[2],
                edge1[0] * edge2[1] - edge1[1] * edge2[0],
            ];

            for &vertex_idx in &[i0, i1, i2] {
                for k in 0..3 {
                    normals[vertex_idx][k] += face_normal[k];
                }
            }
        }

        for n in normals.iter_mut() {
            let length = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if length > 0.0 {
                n.iter_mut().for_each(|c| *c /= length);
            }
        }

        self.normals = normals;
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of a procedural primitive
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryDesc {
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

impl GeometryDesc {
    pub fn cube(size: f32) -> Self {
        GeometryDesc::Box {
            width: size,
            height: size,
            depth: size,
        }
    }

    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        GeometryDesc::Sphere {
            radius,
            width_segments,
            height_segments,
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        GeometryDesc::Plane {
            width,
            height,
            width_segments: 1,
            height_segments: 1,
        }
    }

    pub fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> Self {
        GeometryDesc::Torus {
            radius,
            tube,
            radial_segments,
            tubular_segments,
        }
    }

    pub fn cone(radius: f32, height: f32, radial_segments: u32) -> Self {
        GeometryDesc::Cylinder {
            radius_top: 0.0,
            radius_bottom: radius,
            height,
            radial_segments,
        }
    }

    /// Generates the vertex data for this primitive
    pub fn build(&self) -> GeometryData {
        match *self {
            GeometryDesc::Box {
                width,
                height,
                depth,
            } => generate_box(width, height, depth),
            GeometryDesc::Sphere {
                radius,
                width_segments,
                height_segments,
            } => generate_sphere(radius, width_segments, height_segments),
            GeometryDesc::Plane {
                width,
                height,
                width_segments,
                height_segments,
            } => generate_plane(width, height, width_segments, height_segments),
            GeometryDesc::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => generate_torus(radius, tube, radial_segments, tubular_segments),
            GeometryDesc::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => generate_cylinder(radius_top, radius_bottom, height, radial_segments),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wireframe_shares_edges() {
        // Two triangles of a quad share one diagonal: 5 unique edges
        let plane = generate_plane(1.0, 1.0, 1, 1);
        assert_eq!(plane.wireframe_indices().len(), 10);
    }

    #[test]
    fn test_compute_vertex_normals_on_flat_triangle() {
        let mut data = GeometryData::new();
        data.vertices = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        data.indices = vec![0, 1, 2];
        data.compute_vertex_normals();
        assert_eq!(data.normals, vec![[0.0, 0.0, 1.0]; 3]);
    }

    #[test]
    fn test_desc_builds_matching_primitive() {
        let sphere = GeometryDesc::sphere(0.5, 16, 16).build();
        assert_eq!(sphere.vertex_count(), 17 * 17);
    }
}
