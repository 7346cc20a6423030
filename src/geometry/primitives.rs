//! Primitive generators behind the curve/mesh primitive nodes.

use std::f32::consts::TAU;

use glam::Vec3;

use super::buffer::{GeoBuffer, MeshBuilder};

/// Lattice coordinate along one axis: `size * (i/n - 0.5)`.
///
/// The same expression is used for every face of the cube so shared edge
/// points come out bit-identical and weld.
fn lattice_coord(size: f32, i: usize, n: usize) -> f32 {
    size * (i as f32 / n as f32 - 0.5)
}

/// Axis-aligned cuboid centered at the origin with welded vertices.
///
/// `subdivisions` is the segment count per axis (1 gives the plain
/// 8-vertex cube). Faces are grids whose shared edges weld, so the
/// vertex count is the surface of the (nx+1)×(ny+1)×(nz+1) lattice.
pub fn cube(size: Vec3, subdivisions: [usize; 3]) -> GeoBuffer {
    let n = [
        subdivisions[0].max(1),
        subdivisions[1].max(1),
        subdivisions[2].max(1),
    ];
    let size = [size.x, size.y, size.z];
    let mut builder = MeshBuilder::new();

    // (fixed axis, u axis, v axis) with u×v pointing outward.
    let faces: [(usize, usize, usize, bool); 6] = [
        (0, 1, 2, true),  // +X
        (0, 2, 1, false), // -X
        (1, 2, 0, true),  // +Y
        (1, 0, 2, false), // -Y
        (2, 0, 1, true),  // +Z
        (2, 1, 0, false), // -Z
    ];

    for &(fixed, u_axis, v_axis, positive) in &faces {
        let fixed_coord = if positive {
            lattice_coord(size[fixed], n[fixed], n[fixed])
        } else {
            lattice_coord(size[fixed], 0, n[fixed])
        };
        let (nu, nv) = (n[u_axis], n[v_axis]);

        let grid_point = |i: usize, j: usize| {
            let mut p = [0.0f32; 3];
            p[fixed] = fixed_coord;
            p[u_axis] = lattice_coord(size[u_axis], i, nu);
            p[v_axis] = lattice_coord(size[v_axis], j, nv);
            Vec3::from_array(p)
        };

        for j in 0..nv {
            for i in 0..nu {
                let p00 = builder.vertex(grid_point(i, j));
                let p10 = builder.vertex(grid_point(i + 1, j));
                let p11 = builder.vertex(grid_point(i + 1, j + 1));
                let p01 = builder.vertex(grid_point(i, j + 1));
                builder.quad(p00, p10, p11, p01);
            }
        }
    }

    builder.build()
}

/// Capped cylinder around the Y axis, `depth` tall.
pub fn cylinder(vertices: usize, side_segments: usize, radius: f32, depth: f32) -> GeoBuffer {
    let vertices = vertices.max(3);
    let side_segments = side_segments.max(1);
    let mut builder = MeshBuilder::new();

    let ring_point = |segment: usize, ring: usize| {
        let angle = TAU * segment as f32 / vertices as f32;
        let y = depth * (ring as f32 / side_segments as f32 - 0.5);
        Vec3::new(radius * angle.cos(), y, radius * angle.sin())
    };

    // Side wall.
    for ring in 0..side_segments {
        for segment in 0..vertices {
            let next = (segment + 1) % vertices;
            let p00 = builder.vertex(ring_point(segment, ring));
            let p10 = builder.vertex(ring_point(next, ring));
            let p11 = builder.vertex(ring_point(next, ring + 1));
            let p01 = builder.vertex(ring_point(segment, ring + 1));
            builder.quad(p00, p01, p11, p10);
        }
    }

    // Caps, fanned from the axis.
    let bottom_center = builder.vertex(Vec3::new(0.0, depth * -0.5, 0.0));
    let top_center = builder.vertex(Vec3::new(0.0, depth * 0.5, 0.0));
    for segment in 0..vertices {
        let next = (segment + 1) % vertices;
        let b0 = builder.vertex(ring_point(segment, 0));
        let b1 = builder.vertex(ring_point(next, 0));
        builder.triangle(bottom_center, b0, b1);
        let t0 = builder.vertex(ring_point(segment, side_segments));
        let t1 = builder.vertex(ring_point(next, side_segments));
        builder.triangle(top_center, t1, t0);
    }

    builder.build()
}

/// UV sphere centered at the origin.
pub fn uv_sphere(segments: usize, rings: usize, radius: f32) -> GeoBuffer {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut builder = MeshBuilder::new();

    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let phi = std::f32::consts::PI * v;
        for segment in 0..=segments {
            let u = segment as f32 / segments as f32;
            let theta = TAU * u;
            builder.raw_vertex(
                Vec3::new(
                    phi.sin() * theta.cos(),
                    phi.cos(),
                    phi.sin() * theta.sin(),
                ) * radius,
            );
        }
    }

    let stride = (segments + 1) as u32;
    let mut index = Vec::new();
    for ring in 0..rings as u32 {
        for segment in 0..segments as u32 {
            let i0 = ring * stride + segment;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            if ring == 0 {
                index.extend_from_slice(&[i0, i2, i3]);
            } else if ring == rings as u32 - 1 {
                index.extend_from_slice(&[i0, i2, i1]);
            } else {
                index.extend_from_slice(&[i0, i2, i3, i0, i3, i1]);
            }
        }
    }

    let mut buffer = builder.build();
    buffer.index = Some(index);
    buffer
}

/// Flat grid in the XY plane, centered at the origin.
pub fn grid(size_x: f32, size_y: f32, segments_x: usize, segments_y: usize) -> GeoBuffer {
    let nx = segments_x.max(1);
    let ny = segments_y.max(1);
    let mut builder = MeshBuilder::new();

    let point = |i: usize, j: usize| {
        Vec3::new(
            lattice_coord(size_x, i, nx),
            lattice_coord(size_y, j, ny),
            0.0,
        )
    };

    for j in 0..ny {
        for i in 0..nx {
            let p00 = builder.vertex(point(i, j));
            let p10 = builder.vertex(point(i + 1, j));
            let p11 = builder.vertex(point(i + 1, j + 1));
            let p01 = builder.vertex(point(i, j + 1));
            builder.quad(p00, p10, p11, p01);
        }
    }

    builder.build()
}

/// Open polyline of `count` points stepping from `start` by `offset`.
pub fn line(count: usize, start: Vec3, offset: Vec3) -> GeoBuffer {
    let mut positions = Vec::with_capacity(count * 3);
    for i in 0..count {
        let p = start + offset * i as f32;
        positions.extend_from_slice(&[p.x, p.y, p.z]);
    }
    GeoBuffer::curve(positions, None)
}

/// Closed circle curve in the XY plane.
pub fn circle(resolution: usize, radius: f32) -> GeoBuffer {
    let n = resolution.max(3);
    let mut positions = Vec::with_capacity(n * 3);
    for i in 0..n {
        let angle = TAU * i as f32 / n as f32;
        positions.extend_from_slice(&[radius * angle.cos(), radius * angle.sin(), 0.0]);
    }
    let mut index: Vec<u32> = (0..n as u32).collect();
    index.push(0);
    GeoBuffer::curve(positions, Some(index))
}

/// Closed rectangle curve in the XZ plane.
pub fn quadrilateral(width: f32, height: f32) -> GeoBuffer {
    let (w, h) = (width * 0.5, height * 0.5);
    let positions = vec![w, 0.0, h, -w, 0.0, h, -w, 0.0, -h, w, 0.0, -h];
    GeoBuffer::curve(positions, Some(vec![0, 1, 2, 3, 0]))
}

/// Box mesh spanning the given corners (used by Bounding Box).
pub fn box_between(min: Vec3, max: Vec3) -> GeoBuffer {
    let mut buffer = cube(max - min, [1, 1, 1]);
    let center = (min + max) * 0.5;
    for chunk in buffer.positions.chunks_exact_mut(3) {
        chunk[0] += center.x;
        chunk[1] += center.y;
        chunk[2] += center.z;
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_cube_has_eight_vertices() {
        let buffer = cube(Vec3::splat(2.0), [1, 1, 1]);
        assert_eq!(buffer.positions.len(), 24);
        assert_eq!(buffer.index.as_ref().unwrap().len(), 6 * 2 * 3);
        let (min, max) = buffer.bounds().unwrap();
        assert_eq!(min, Vec3::splat(-1.0));
        assert_eq!(max, Vec3::splat(1.0));
    }

    #[test]
    fn subdivided_cube_welds_shared_edges() {
        // 2 segments per axis: 3^3 lattice minus the interior point.
        let buffer = cube(Vec3::splat(1.0), [2, 2, 2]);
        assert_eq!(buffer.vertex_count(), 26);
    }

    #[test]
    fn grid_vertex_count() {
        let buffer = grid(1.0, 1.0, 2, 3);
        assert_eq!(buffer.vertex_count(), 3 * 4);
    }

    #[test]
    fn circle_is_closed() {
        let buffer = circle(8, 1.0);
        assert_eq!(buffer.vertex_count(), 8);
        let index = buffer.index.as_ref().unwrap();
        assert_eq!(index.first(), index.last());
    }

    #[test]
    fn cylinder_caps_share_ring_vertices() {
        let buffer = cylinder(8, 1, 1.0, 2.0);
        // Two rings of 8 plus the two cap centers.
        assert_eq!(buffer.vertex_count(), 18);
    }

    #[test]
    fn line_steps_by_offset() {
        let buffer = line(3, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.5));
        assert_eq!(buffer.position(2), Vec3::new(0.0, 0.0, 3.0));
    }
}
