use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

/// Discriminates polyline buffers from triangulated ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeoKind {
    Mesh,
    Curve,
}

/// A freshly allocated geometric buffer: flat position array plus optional
/// index and attribute arrays.
///
/// For curve buffers the index, when present, is the polyline ordering; a
/// closed loop repeats its first entry at the end. A buffer whose
/// `translation` attribute is present is instanced: `positions`/`index`
/// describe the shared base shape and `translation` (3 floats),
/// `rotation` (quaternion xyzw, 4 floats) and `scale` (3 floats) hold one
/// transform per instance. On plain buffers `scale` may instead be a
/// per-vertex attribute (see Group Output).
#[derive(Clone, Debug, PartialEq)]
pub struct GeoBuffer {
    pub kind: GeoKind,
    pub positions: Vec<f32>,
    pub index: Option<Vec<u32>>,
    pub translation: Option<Vec<f32>>,
    pub rotation: Option<Vec<f32>>,
    pub scale: Option<Vec<f32>>,
}

impl GeoBuffer {
    pub fn mesh(positions: Vec<f32>, index: Option<Vec<u32>>) -> Self {
        Self {
            kind: GeoKind::Mesh,
            positions,
            index,
            translation: None,
            rotation: None,
            scale: None,
        }
    }

    pub fn curve(positions: Vec<f32>, index: Option<Vec<u32>>) -> Self {
        Self {
            kind: GeoKind::Curve,
            positions,
            index,
            translation: None,
            rotation: None,
            scale: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_instanced(&self) -> bool {
        self.translation.is_some()
    }

    pub fn instance_count(&self) -> usize {
        self.translation.as_ref().map_or(0, |t| t.len() / 3)
    }

    pub fn position(&self, vertex: usize) -> Vec3 {
        Vec3::new(
            self.positions[vertex * 3],
            self.positions[vertex * 3 + 1],
            self.positions[vertex * 3 + 2],
        )
    }

    /// Vertex positions as vectors.
    pub fn points(&self) -> Vec<Vec3> {
        (0..self.vertex_count()).map(|i| self.position(i)).collect()
    }

    /// Axis-aligned min/max of the positions. `None` for an empty buffer.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut points = (0..self.vertex_count()).map(|i| self.position(i));
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some((min, max))
    }

    /// Apply a transform matrix to every position in place.
    pub fn apply_transform(&mut self, matrix: &Mat4) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let p = matrix.transform_point3(Vec3::new(chunk[0], chunk[1], chunk[2]));
            chunk[0] = p.x;
            chunk[1] = p.y;
            chunk[2] = p.z;
        }
    }

    /// Expand an instanced buffer into a plain buffer: one discrete copy
    /// of the base geometry per instance, positioned by its transform.
    /// Plain buffers pass through unchanged.
    pub fn realize_instances(self) -> GeoBuffer {
        if !self.is_instanced() {
            return self;
        }
        let translation = self.translation.as_deref().unwrap_or(&[]);
        let rotation = self.rotation.as_deref().unwrap_or(&[]);
        let scale = self.scale.as_deref().unwrap_or(&[]);
        let count = translation.len() / 3;
        let base_vertices = self.vertex_count();

        let mut positions = Vec::with_capacity(self.positions.len() * count);
        let index = self.index.as_ref().map(|idx| {
            let mut merged = Vec::with_capacity(idx.len() * count);
            for instance in 0..count {
                let offset = (instance * base_vertices) as u32;
                merged.extend(idx.iter().map(|i| i + offset));
            }
            merged
        });

        for instance in 0..count {
            let t = Vec3::new(
                translation[instance * 3],
                translation[instance * 3 + 1],
                translation[instance * 3 + 2],
            );
            let r = if rotation.len() >= (instance + 1) * 4 {
                Quat::from_xyzw(
                    rotation[instance * 4],
                    rotation[instance * 4 + 1],
                    rotation[instance * 4 + 2],
                    rotation[instance * 4 + 3],
                )
            } else {
                Quat::IDENTITY
            };
            let s = if scale.len() >= (instance + 1) * 3 {
                Vec3::new(
                    scale[instance * 3],
                    scale[instance * 3 + 1],
                    scale[instance * 3 + 2],
                )
            } else {
                Vec3::ONE
            };
            let matrix = Mat4::from_scale_rotation_translation(s, r, t);
            for vertex in 0..base_vertices {
                let p = matrix.transform_point3(self.position(vertex));
                positions.extend_from_slice(&[p.x, p.y, p.z]);
            }
        }

        GeoBuffer {
            kind: self.kind,
            positions,
            index,
            translation: None,
            rotation: None,
            scale: None,
        }
    }

    /// Merge buffers by concatenation, realizing instanced inputs first.
    /// Returns `None` for an empty sequence.
    pub fn merge(buffers: Vec<GeoBuffer>) -> Option<GeoBuffer> {
        if buffers.is_empty() {
            return None;
        }
        let buffers: Vec<GeoBuffer> = buffers
            .into_iter()
            .map(GeoBuffer::realize_instances)
            .collect();

        let kind = if buffers.iter().any(|b| b.kind == GeoKind::Mesh) {
            GeoKind::Mesh
        } else {
            GeoKind::Curve
        };
        let any_indexed = buffers.iter().any(|b| b.index.is_some());

        let mut positions = Vec::new();
        let mut index = if any_indexed { Some(Vec::new()) } else { None };
        for buffer in buffers {
            let offset = (positions.len() / 3) as u32;
            if let Some(merged) = index.as_mut() {
                match &buffer.index {
                    Some(idx) => merged.extend(idx.iter().map(|i| i + offset)),
                    // Unindexed part: identity ordering.
                    None => merged.extend((0..buffer.vertex_count() as u32).map(|i| i + offset)),
                }
            }
            positions.extend_from_slice(&buffer.positions);
        }

        let mut merged = GeoBuffer::mesh(positions, index);
        merged.kind = kind;
        Some(merged)
    }
}

/// Incremental mesh construction with position welding.
///
/// Welding keys on the exact bit pattern of the coordinates, so two faces
/// that compute a shared edge point with the same arithmetic share the
/// vertex.
pub struct MeshBuilder {
    positions: Vec<f32>,
    index: Vec<u32>,
    welded: HashMap<[u32; 3], u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            index: Vec::new(),
            welded: HashMap::new(),
        }
    }

    /// Add a vertex, reusing an existing one at the identical position.
    pub fn vertex(&mut self, p: Vec3) -> u32 {
        let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
        if let Some(&idx) = self.welded.get(&key) {
            return idx;
        }
        let idx = (self.positions.len() / 3) as u32;
        self.positions.extend_from_slice(&[p.x, p.y, p.z]);
        self.welded.insert(key, idx);
        idx
    }

    /// Add a vertex without welding.
    pub fn raw_vertex(&mut self, p: Vec3) -> u32 {
        let idx = (self.positions.len() / 3) as u32;
        self.positions.extend_from_slice(&[p.x, p.y, p.z]);
        idx
    }

    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        self.index.extend_from_slice(&[a, b, c]);
    }

    pub fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    pub fn build(self) -> GeoBuffer {
        GeoBuffer::mesh(self.positions, Some(self.index))
    }
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}
