//! Curve-to-mesh sweep: place a profile ring at every path point and
//! stitch the rings into a tube.

use glam::Vec3;

use super::buffer::{GeoBuffer, MeshBuilder};

/// Polyline extracted from a curve buffer: ordered points plus whether the
/// loop closes. A closed curve's index repeats its first entry at the end.
fn polyline(buffer: &GeoBuffer) -> (Vec<Vec3>, bool) {
    match &buffer.index {
        Some(index) => {
            let closed = index.len() > 1 && index.first() == index.last();
            let take = if closed { index.len() - 1 } else { index.len() };
            let points = index[..take]
                .iter()
                .map(|&i| buffer.position(i as usize))
                .collect();
            (points, closed)
        }
        None => (buffer.points(), false),
    }
}

/// Orthonormal (right, up) frame perpendicular to `forward`.
fn build_frame(forward: Vec3) -> (Vec3, Vec3) {
    let up_hint = if forward.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
    let right = forward.cross(up_hint).normalize_or_zero();
    let up = right.cross(forward).normalize_or_zero();
    (right, up)
}

/// Sweep `profile` (a closed planar curve, read in its XY plane) along
/// `path`, producing a tube mesh. Closed paths produce closed tubes.
pub fn sweep_profile(path: &GeoBuffer, profile: &GeoBuffer) -> GeoBuffer {
    let (path_points, closed) = polyline(path);
    let (profile_points, _) = polyline(profile);
    if path_points.len() < 2 || profile_points.len() < 3 {
        return GeoBuffer::mesh(Vec::new(), Some(Vec::new()));
    }

    let rings = path_points.len();
    let n = profile_points.len();
    let mut builder = MeshBuilder::new();

    for (i, &pos) in path_points.iter().enumerate() {
        let tangent = if closed {
            let prev = path_points[(i + rings - 1) % rings];
            let next = path_points[(i + 1) % rings];
            ((next - prev) * 0.5).normalize_or_zero()
        } else if i == 0 {
            (path_points[1] - path_points[0]).normalize_or_zero()
        } else if i == rings - 1 {
            (path_points[i] - path_points[i - 1]).normalize_or_zero()
        } else {
            ((path_points[i + 1] - path_points[i - 1]) * 0.5).normalize_or_zero()
        };
        let (right, up) = build_frame(tangent);

        for p in &profile_points {
            builder.raw_vertex(pos + right * p.x + up * p.y);
        }
    }

    let segments = if closed { rings } else { rings - 1 };
    let mut index = Vec::with_capacity(segments * n * 6);
    for s in 0..segments {
        let base_current = (s * n) as u32;
        let base_next = (((s + 1) % rings) * n) as u32;
        for i in 0..n as u32 {
            let i_next = (i + 1) % n as u32;
            let v0 = base_current + i;
            let v1 = base_current + i_next;
            let v2 = base_next + i_next;
            let v3 = base_next + i;
            index.extend_from_slice(&[v0, v1, v2, v0, v2, v3]);
        }
    }

    let mut buffer = builder.build();
    buffer.index = Some(index);
    buffer
}
