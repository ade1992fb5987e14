//! Axis-aligned boxes in model space.

use glam::Vec3;

/// Axis-aligned box given by its minimum corner and its size.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds3 {
    /// Minimum corner
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Extent along each axis
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl Bounds3 {
    /// Create bounds with minimum corner and size.
    pub fn new(x: f64, y: f64, z: f64, width: f64, height: f64, depth: f64) -> Self {
        Self { x, y, z, width, height, depth }
    }

    /// Create bounds from two opposite corners in any order.
    pub fn from_corners(a: [f64; 3], b: [f64; 3]) -> Self {
        let x = a[0].min(b[0]);
        let y = a[1].min(b[1]);
        let z = a[2].min(b[2]);
        Self {
            x,
            y,
            z,
            width: a[0].max(b[0]) - x,
            height: a[1].max(b[1]) - y,
            depth: a[2].max(b[2]) - z,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn front(&self) -> f64 {
        self.z + self.depth
    }

    pub fn center(&self) -> [f64; 3] {
        [
            self.x + self.width / 2.0,
            self.y + self.height / 2.0,
            self.z + self.depth / 2.0,
        ]
    }

    pub fn size(&self) -> [f64; 3] {
        [self.width, self.height, self.depth]
    }

    /// Center as a single-precision vector.
    pub fn center_vec3(&self) -> Vec3 {
        let [x, y, z] = self.center();
        Vec3::new(x as f32, y as f32, z as f32)
    }

    /// Size as a single-precision vector.
    pub fn size_vec3(&self) -> Vec3 {
        Vec3::new(self.width as f32, self.height as f32, self.depth as f32)
    }

    /// Check if a point is inside the bounds.
    pub fn contains(&self, point: [f64; 3]) -> bool {
        point[0] >= self.x
            && point[0] <= self.right()
            && point[1] >= self.y
            && point[1] <= self.top()
            && point[2] >= self.z
            && point[2] <= self.front()
    }

    /// Shrink every side by `amount`, never below zero size.
    pub fn inset(&self, amount: f64) -> Bounds3 {
        let shrink = |origin: f64, extent: f64| {
            let inner = (extent - 2.0 * amount).max(0.0);
            (origin + (extent - inner) / 2.0, inner)
        };
        let (x, width) = shrink(self.x, self.width);
        let (y, height) = shrink(self.y, self.height);
        let (z, depth) = shrink(self.z, self.depth);
        Bounds3 { x, y, z, width, height, depth }
    }

    /// Whether every extent is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.z].iter().all(|v| v.is_finite())
            && [self.width, self.height, self.depth]
                .iter()
                .all(|v| v.is_finite() && *v > 0.0)
    }
}
