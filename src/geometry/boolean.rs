//! Boolean mesh operations (CSG) via BSP trees.
//!
//! Both meshes are converted to polygon soups, each is clipped against the
//! other's BSP tree, and the surviving polygons are re-triangulated into a
//! fresh buffer.

use glam::Vec3;

use super::buffer::GeoBuffer;

const EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy)]
struct Plane {
    normal: Vec3,
    distance: f32,
}

impl Plane {
    fn new(point: Vec3, normal: Vec3) -> Self {
        let normal = normal.normalize();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    fn from_points(a: Vec3, b: Vec3, c: Vec3) -> Option<Self> {
        let normal = (b - a).cross(c - a);
        if normal.length_squared() < EPSILON * EPSILON {
            return None;
        }
        Some(Self::new(a, normal))
    }

    fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    fn classify_point(&self, point: Vec3) -> PointSide {
        let dist = self.distance_to(point);
        if dist > EPSILON {
            PointSide::Front
        } else if dist < -EPSILON {
            PointSide::Back
        } else {
            PointSide::OnPlane
        }
    }

    fn flip(&mut self) {
        self.normal = -self.normal;
        self.distance = -self.distance;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PointSide {
    Front,
    Back,
    OnPlane,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PolygonSide {
    Front,
    Back,
    OnPlaneSame,
    OnPlaneOpposite,
    Spanning,
}

#[derive(Debug, Clone)]
struct Polygon {
    vertices: Vec<Vec3>,
    plane: Plane,
}

impl Polygon {
    fn new(vertices: Vec<Vec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }

    fn classify(&self, plane: &Plane) -> PolygonSide {
        let mut front = 0;
        let mut back = 0;
        for &v in &self.vertices {
            match plane.classify_point(v) {
                PointSide::Front => front += 1,
                PointSide::Back => back += 1,
                PointSide::OnPlane => {}
            }
        }
        if front > 0 && back > 0 {
            PolygonSide::Spanning
        } else if front > 0 {
            PolygonSide::Front
        } else if back > 0 {
            PolygonSide::Back
        } else if self.plane.normal.dot(plane.normal) > 0.0 {
            PolygonSide::OnPlaneSame
        } else {
            PolygonSide::OnPlaneOpposite
        }
    }

    fn split(&self, plane: &Plane) -> (Vec<Polygon>, Vec<Polygon>) {
        let mut front = Vec::new();
        let mut back = Vec::new();

        match self.classify(plane) {
            PolygonSide::Front | PolygonSide::OnPlaneSame => front.push(self.clone()),
            PolygonSide::Back | PolygonSide::OnPlaneOpposite => back.push(self.clone()),
            PolygonSide::Spanning => {
                let mut front_verts = Vec::new();
                let mut back_verts = Vec::new();

                for i in 0..self.vertices.len() {
                    let j = (i + 1) % self.vertices.len();
                    let vi = self.vertices[i];
                    let vj = self.vertices[j];
                    let ti = plane.classify_point(vi);
                    let tj = plane.classify_point(vj);

                    if ti != PointSide::Back {
                        front_verts.push(vi);
                    }
                    if ti != PointSide::Front {
                        back_verts.push(vi);
                    }
                    if (ti == PointSide::Front && tj == PointSide::Back)
                        || (ti == PointSide::Back && tj == PointSide::Front)
                    {
                        let t = (plane.distance - plane.normal.dot(vi))
                            / plane.normal.dot(vj - vi);
                        let intersection = vi + (vj - vi) * t;
                        front_verts.push(intersection);
                        back_verts.push(intersection);
                    }
                }

                front.extend(Polygon::new(front_verts));
                back.extend(Polygon::new(back_verts));
            }
        }

        (front, back)
    }
}

#[derive(Debug, Clone, Default)]
struct BspNode {
    plane: Option<Plane>,
    polygons: Vec<Polygon>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    fn from_polygons(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    fn build(&mut self, polygons: Vec<Polygon>) {
        if polygons.is_empty() {
            return;
        }
        if self.plane.is_none() {
            self.plane = Some(polygons[0].plane);
        }
        let plane = self.plane.unwrap();

        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in polygons {
            match poly.classify(&plane) {
                PolygonSide::OnPlaneSame | PolygonSide::OnPlaneOpposite => {
                    self.polygons.push(poly)
                }
                _ => {
                    let (mut f, mut b) = poly.split(&plane);
                    front_polys.append(&mut f);
                    back_polys.append(&mut b);
                }
            }
        }

        if !front_polys.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BspNode::default()))
                .build(front_polys);
        }
        if !back_polys.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BspNode::default()))
                .build(back_polys);
        }
    }

    fn invert(&mut self) {
        for poly in &mut self.polygons {
            poly.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        std::mem::swap(&mut self.front, &mut self.back);
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
    }

    /// Remove the parts of `polygons` inside this tree's solid.
    fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = self.plane else {
            return polygons;
        };

        let mut front_polys = Vec::new();
        let mut back_polys = Vec::new();
        for poly in polygons {
            let (mut f, mut b) = poly.split(&plane);
            front_polys.append(&mut f);
            back_polys.append(&mut b);
        }

        if let Some(front) = &self.front {
            front_polys = front.clip_polygons(front_polys);
        }
        match &self.back {
            Some(back) => back_polys = back.clip_polygons(back_polys),
            None => back_polys.clear(),
        }

        front_polys.extend(back_polys);
        front_polys
    }

    fn clip_to(&mut self, other: &BspNode) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    fn all_polygons(&self) -> Vec<Polygon> {
        let mut result = self.polygons.clone();
        if let Some(front) = &self.front {
            result.extend(front.all_polygons());
        }
        if let Some(back) = &self.back {
            result.extend(back.all_polygons());
        }
        result
    }
}

fn buffer_to_polygons(buffer: &GeoBuffer) -> Vec<Polygon> {
    let mut polygons = Vec::new();
    match &buffer.index {
        Some(index) => {
            for tri in index.chunks_exact(3) {
                polygons.extend(Polygon::new(vec![
                    buffer.position(tri[0] as usize),
                    buffer.position(tri[1] as usize),
                    buffer.position(tri[2] as usize),
                ]));
            }
        }
        // Unindexed buffer: triangle soup.
        None => {
            for tri in (0..buffer.vertex_count()).collect::<Vec<_>>().chunks_exact(3) {
                polygons.extend(Polygon::new(vec![
                    buffer.position(tri[0]),
                    buffer.position(tri[1]),
                    buffer.position(tri[2]),
                ]));
            }
        }
    }
    polygons
}

fn polygons_to_buffer(polygons: &[Polygon]) -> GeoBuffer {
    let mut positions = Vec::new();
    let mut index = Vec::new();
    for poly in polygons {
        let base = (positions.len() / 3) as u32;
        for v in &poly.vertices {
            positions.extend_from_slice(&[v.x, v.y, v.z]);
        }
        // Fan triangulation; split polygons stay convex.
        for i in 1..poly.vertices.len() as u32 - 1 {
            index.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }
    GeoBuffer::mesh(positions, Some(index))
}

/// A ∪ B.
pub fn boolean_union(a: &GeoBuffer, b: &GeoBuffer) -> GeoBuffer {
    let mut a_tree = BspNode::from_polygons(buffer_to_polygons(a));
    let mut b_tree = BspNode::from_polygons(buffer_to_polygons(b));

    a_tree.clip_to(&b_tree);
    b_tree.clip_to(&a_tree);
    b_tree.invert();
    b_tree.clip_to(&a_tree);
    b_tree.invert();

    let mut polygons = a_tree.all_polygons();
    polygons.extend(b_tree.all_polygons());
    polygons_to_buffer(&polygons)
}

/// A − B.
pub fn boolean_subtract(a: &GeoBuffer, b: &GeoBuffer) -> GeoBuffer {
    let mut a_tree = BspNode::from_polygons(buffer_to_polygons(a));
    let mut b_tree = BspNode::from_polygons(buffer_to_polygons(b));

    a_tree.invert();
    a_tree.clip_to(&b_tree);
    b_tree.clip_to(&a_tree);
    b_tree.invert();
    b_tree.clip_to(&a_tree);
    b_tree.invert();
    a_tree.invert();

    let mut polygons = a_tree.all_polygons();
    polygons.extend(b_tree.all_polygons());
    polygons_to_buffer(&polygons)
}

/// A ∩ B.
pub fn boolean_intersect(a: &GeoBuffer, b: &GeoBuffer) -> GeoBuffer {
    let mut a_tree = BspNode::from_polygons(buffer_to_polygons(a));
    let mut b_tree = BspNode::from_polygons(buffer_to_polygons(b));

    a_tree.invert();
    b_tree.clip_to(&a_tree);
    b_tree.invert();
    a_tree.clip_to(&b_tree);
    b_tree.clip_to(&a_tree);

    let mut polygons = a_tree.all_polygons();
    polygons.extend(b_tree.all_polygons());
    let mut result = BspNode::from_polygons(polygons);
    result.invert();
    polygons_to_buffer(&result.all_polygons())
}
