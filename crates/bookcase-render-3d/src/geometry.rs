//! 3D geometry types and operations.

use glam::{Mat4, Vec3};

/// A solid primitive with its placement in model space.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    kind: ShapeKind,
    bounds: BoundingBox,
    transform: Mat4,
}

/// The kind of shape, in its own local frame centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Box { width: f64, height: f64, depth: f64 },
    /// Cylinder extending along the local Y axis.
    Cylinder { radius: f64, height: f64 },
}

impl ShapeKind {
    fn local_bounds(&self) -> BoundingBox {
        match *self {
            ShapeKind::Box { width, height, depth } => {
                let half = Vec3::new(width as f32, height as f32, depth as f32) / 2.0;
                BoundingBox::new(-half, half)
            }
            ShapeKind::Cylinder { radius, height } => {
                let r = radius as f32;
                let h = height as f32 / 2.0;
                BoundingBox::new(Vec3::new(-r, -h, -r), Vec3::new(r, h, r))
            }
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box of the given size centered on `center`.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size / 2.0;
        Self { min: center - half, max: center + half }
    }

    pub fn from_points(points: impl Iterator<Item = Vec3>) -> Option<Self> {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut has_points = false;

        for p in points {
            min = min.min(p);
            max = max.max(p);
            has_points = true;
        }

        has_points.then_some(Self { min, max })
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corners.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    /// Merge with another bounding box.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Same box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> BoundingBox {
        BoundingBox {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Bounds of this box after an arbitrary affine transform.
    pub fn transformed(&self, matrix: Mat4) -> BoundingBox {
        let corners = self.corners();
        BoundingBox::from_points(corners.iter().map(|c| matrix.transform_point3(*c)))
            .unwrap_or(*self)
    }
}

impl Shape {
    /// Create a box shape centered at origin.
    pub fn box_shape(width: f64, height: f64, depth: f64) -> Self {
        Self::from_kind(ShapeKind::Box { width, height, depth })
    }

    /// Create a cylinder shape centered at origin, extending along Y axis.
    pub fn cylinder(radius: f64, height: f64) -> Self {
        Self::from_kind(ShapeKind::Cylinder { radius, height })
    }

    fn from_kind(kind: ShapeKind) -> Self {
        Self {
            bounds: kind.local_bounds(),
            kind,
            transform: Mat4::IDENTITY,
        }
    }

    /// Get the shape kind.
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    /// Bounding box in model space, after the transform.
    pub fn bounding_box(&self) -> BoundingBox {
        self.bounds
    }

    /// Get the transform matrix.
    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    /// Apply a translation.
    pub fn translate(self, offset: Vec3) -> Self {
        self.apply(Mat4::from_translation(offset))
    }

    /// Apply a rotation around the X axis.
    pub fn rotate_x(self, angle: f32) -> Self {
        self.apply(Mat4::from_rotation_x(angle))
    }

    fn apply(mut self, matrix: Mat4) -> Self {
        self.transform = matrix * self.transform;
        self.bounds = self.kind.local_bounds().transformed(self.transform);
        self
    }
}

/// A triangle mesh for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.vertices.iter().copied())
    }

    /// Transform all vertices by a matrix.
    pub fn transform(&mut self, matrix: Mat4) {
        let normal_matrix = matrix.inverse().transpose();

        for v in &mut self.vertices {
            *v = matrix.transform_point3(*v);
        }

        for n in &mut self.normals {
            *n = normal_matrix.transform_vector3(*n).normalize_or_zero();
        }
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}
