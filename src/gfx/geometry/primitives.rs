//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are generated with proper normals and texture coordinates, Y up.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate an axis-aligned box centered at the origin
///
/// Each face has its own four vertices so normals stay flat per face,
/// and UV coordinates run from 0 to 1 across every face.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new();
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);

    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // Front face (positive Z)
        ([0.0, 0.0, 1.0], [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
        // Back face (negative Z)
        ([0.0, 0.0, -1.0], [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]]),
        // Left face (negative X)
        ([-1.0, 0.0, 0.0], [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]]),
        // Right face (positive X)
        ([1.0, 0.0, 0.0], [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]]),
        // Top face (positive Y)
        ([0.0, 1.0, 0.0], [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]]),
        // Bottom face (negative Y)
        ([0.0, -1.0, 0.0], [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]]),
    ];
    let uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    for (normal, corners) in faces.iter() {
        let base = data.vertices.len() as u32;
        for (corner, uv) in corners.iter().zip(uvs.iter()) {
            data.vertices.push(*corner);
            data.normals.push(*normal);
            data.tex_coords.push(*uv);
        }
        // 2 triangles per face, counter-clockwise
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a UV sphere with specified resolution
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of vertical segments (longitude lines)
/// * `height_segments` - Number of horizontal segments (latitude lines)
pub fn generate_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = width_segments.max(3);
    let lat_segs = height_segments.max(2);

    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let (sin_phi, cos_phi) = phi.sin_cos();

            let x = sin_theta * cos_phi;
            let y = cos_theta;
            let z = sin_theta * sin_phi;

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);
            data.tex_coords
                .push([long as f32 / long_segs as f32, lat as f32 / lat_segs as f32]);
        }
    }

    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.extend_from_slice(&[first, second, first + 1]);
            data.indices
                .extend_from_slice(&[second, second + 1, first + 1]);
        }
    }

    data
}

/// Generate a plane in the XY plane with its normal along positive Z
///
/// Rotate the owning node by -PI/2 around X to lay it flat as a floor.
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
pub fn generate_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices
                .extend_from_slice(&[next_row, i + 1, next_row + 1]);
        }
    }

    data
}

/// Generate a torus lying in the XY plane
///
/// # Arguments
/// * `radius` - Distance from the center to the middle of the tube
/// * `tube` - Tube radius
/// * `radial_segments` - Segments around the tube
/// * `tubular_segments` - Segments around the ring
pub fn generate_torus(
    radius: f32,
    tube: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let x = (radius + tube * cos_v) * cos_u;
            let y = (radius + tube * cos_v) * sin_u;
            let z = tube * sin_v;
            data.vertices.push([x, y, z]);

            // Normal points from the tube center toward the vertex
            let center = [radius * cos_u, radius * sin_u, 0.0];
            let n = [x - center[0], y - center[1], z - center[2]];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt().max(f32::EPSILON);
            data.normals.push([n[0] / len, n[1] / len, n[2] / len]);

            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    for j in 1..=radial {
        for i in 1..=tubular {
            let a = (tubular + 1) * j + i - 1;
            let b = (tubular + 1) * (j - 1) + i - 1;
            let c = (tubular + 1) * (j - 1) + i;
            let d = (tubular + 1) * j + i;

            data.indices.extend_from_slice(&[a, b, d]);
            data.indices.extend_from_slice(&[b, c, d]);
        }
    }

    data
}

/// Generate a Y-aligned cylinder with end caps
///
/// A zero `radius_top` produces a cone; its top cap is skipped.
pub fn generate_cylinder(
    radius_top: f32,
    radius_bottom: f32,
    height: f32,
    radial_segments: u32,
) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = radial_segments.max(3);
    let half_height = height * 0.5;
    // Slope of the side wall, tilts normals for cones
    let slope = (radius_bottom - radius_top) / height.max(f32::EPSILON);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();

        let n = [sin_a, slope, cos_a];
        let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
        let normal = [n[0] / len, n[1] / len, n[2] / len];

        // Bottom vertex
        data.vertices
            .push([radius_bottom * sin_a, -half_height, radius_bottom * cos_a]);
        data.normals.push(normal);
        data.tex_coords.push([i as f32 / segs as f32, 0.0]);

        // Top vertex
        data.vertices
            .push([radius_top * sin_a, half_height, radius_top * cos_a]);
        data.normals.push(normal);
        data.tex_coords.push([i as f32 / segs as f32, 1.0]);
    }

    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices
            .extend_from_slice(&[bottom_current, bottom_next, top_current]);
        data.indices
            .extend_from_slice(&[top_current, bottom_next, top_next]);
    }

    add_cap(&mut data, radius_bottom, -half_height, segs, false);
    if radius_top > 0.0 {
        add_cap(&mut data, radius_top, half_height, segs, true);
    }

    data
}

/// Appends a flat disc cap at height `y`
fn add_cap(data: &mut GeometryData, radius: f32, y: f32, segs: u32, top: bool) {
    let normal = if top { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };

    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, y, 0.0]);
    data.normals.push(normal);
    data.tex_coords.push([0.5, 0.5]);

    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let (sin_a, cos_a) = angle.sin_cos();
        data.vertices.push([radius * sin_a, y, radius * cos_a]);
        data.normals.push(normal);
        data.tex_coords.push([0.5 + sin_a * 0.5, 0.5 + cos_a * 0.5]);
    }

    for i in 0..segs {
        let current = center + 1 + i;
        let next = current + 1;
        if top {
            data.indices.extend_from_slice(&[center, current, next]);
        } else {
            data.indices.extend_from_slice(&[center, next, current]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_generation() {
        let cube = generate_box(1.0, 1.0, 1.0);
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }

    #[test]
    fn test_box_extents() {
        let b = generate_box(2.0, 4.0, 6.0);
        let max_y = b.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 2.0);
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(1.0, 8, 6);
        assert!(!sphere.vertices.is_empty());
        assert!(!sphere.indices.is_empty());
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_torus_vertices_within_outer_radius() {
        let torus = generate_torus(0.3, 0.2, 16, 32);
        assert_eq!(torus.vertex_count(), 17 * 33);
        for v in &torus.vertices {
            let r = (v[0] * v[0] + v[1] * v[1]).sqrt();
            assert!(r <= 0.5 + 1e-5);
        }
    }

    #[test]
    fn test_cone_has_single_cap() {
        let cone = generate_cylinder(0.0, 1.0, 2.0, 8);
        let cylinder = generate_cylinder(1.0, 1.0, 2.0, 8);
        assert!(cone.triangle_count() < cylinder.triangle_count());
        assert_eq!(cylinder.triangle_count(), 8 * 2 + 8 * 2);
    }
}
