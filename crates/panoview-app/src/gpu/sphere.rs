//! Inward-facing UV sphere for panoramic projection.
//!
//! The viewer sits at the center, so the X axis is negated during generation
//! (the mesh is mirrored); without it the equirectangular frame plays back
//! left-right reversed from the inside.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};

pub const SPHERE_RADIUS: f32 = 500.0;
pub const LON_SEGMENTS: u32 = 60;
pub const LAT_SEGMENTS: u32 = 40;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: (std::mem::size_of::<[f32; 3]>()) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

pub struct SphereMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Build the sphere with one vertex per (lat, lon) grid point and a shared
/// seam column so UVs stay continuous across the wrap.
pub fn build() -> SphereMesh {
    let mut vertices =
        Vec::with_capacity(((LON_SEGMENTS + 1) * (LAT_SEGMENTS + 1)) as usize);
    for lat in 0..=LAT_SEGMENTS {
        let v = lat as f32 / LAT_SEGMENTS as f32;
        let theta = v * PI; // 0 at the top pole
        for lon in 0..=LON_SEGMENTS {
            let u = lon as f32 / LON_SEGMENTS as f32;
            let phi = u * 2.0 * PI;
            let ring = theta.sin() * SPHERE_RADIUS;
            vertices.push(Vertex {
                // Negated X mirrors the sphere for the interior view.
                position: [
                    -(ring * phi.cos()),
                    theta.cos() * SPHERE_RADIUS,
                    ring * phi.sin(),
                ],
                uv: [u, v],
            });
        }
    }

    let mut indices = Vec::with_capacity((LON_SEGMENTS * LAT_SEGMENTS * 6) as usize);
    let row = LON_SEGMENTS + 1;
    for lat in 0..LAT_SEGMENTS {
        for lon in 0..LON_SEGMENTS {
            let a = lat * row + lon;
            let b = a + row;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    SphereMesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions() {
        let mesh = build();
        assert_eq!(
            mesh.vertices.len(),
            ((LON_SEGMENTS + 1) * (LAT_SEGMENTS + 1)) as usize
        );
        assert_eq!(mesh.indices.len(), (LON_SEGMENTS * LAT_SEGMENTS * 6) as usize);
    }

    #[test]
    fn every_vertex_on_the_sphere() {
        for v in build().vertices {
            let [x, y, z] = v.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - SPHERE_RADIUS).abs() < 1e-2, "radius {r}");
        }
    }

    #[test]
    fn uvs_cover_the_unit_square() {
        let mesh = build();
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        assert!(mesh.vertices.iter().any(|v| v.uv[0] == 0.0));
        assert!(mesh.vertices.iter().any(|v| v.uv[0] == 1.0));
    }

    #[test]
    fn mirrored_along_x() {
        // The equator vertex at phi = 0 must sit on the negative X side.
        let mesh = build();
        let row = (LON_SEGMENTS + 1) as usize;
        let equator_start = (LAT_SEGMENTS as usize / 2) * row;
        let v = &mesh.vertices[equator_start];
        assert!(v.position[0] < 0.0, "x = {}", v.position[0]);
    }

    #[test]
    fn indices_in_range() {
        let mesh = build();
        let max = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < max));
    }
}
