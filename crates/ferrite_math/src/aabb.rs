use crate::Vec3;

/// Axis-aligned bounding box over a set of points.
///
/// An empty box has `min` at +infinity and `max` at -infinity, so growing it
/// by any point yields a degenerate box around that point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create an empty AABB (contains nothing).
    pub const fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    /// Create an AABB from two corner points, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Smallest AABB containing every point of the slice.
    pub fn from_positions(positions: &[Vec3]) -> Self {
        positions.iter().fold(Self::empty(), |mut aabb, p| {
            aabb.grow(*p);
            aabb
        })
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Extend the box to include `point`.
    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Center of the box. Undefined (NaN) for an empty box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis; zero for an empty box.
    pub fn extent(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_aabb() {
        let aabb = Aabb::empty();
        assert!(aabb.is_empty());
        assert_eq!(aabb.extent(), Vec3::ZERO);
        assert!(!aabb.contains(Vec3::ZERO));
    }

    #[test]
    fn test_from_positions() {
        let aabb = Aabb::from_positions(&[
            Vec3::new(-1.0, -2.0, -3.0),
            Vec3::new(4.0, 5.0, 6.0),
            Vec3::ZERO,
        ]);

        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Vec3::new(4.0, 5.0, 6.0));
        assert!(aabb.contains(Vec3::new(1.0, 1.0, 1.0)));
        assert!(!aabb.contains(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_surrounding() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_points(Vec3::splat(2.0), Vec3::splat(3.0));
        let both = Aabb::surrounding(&a, &b);

        assert_eq!(both.min, Vec3::ZERO);
        assert_eq!(both.max, Vec3::splat(3.0));
        assert_eq!(both.centroid(), Vec3::splat(1.5));
    }

    #[test]
    fn test_surrounding_empty_is_identity() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let merged = Aabb::surrounding(&a, &Aabb::empty());
        assert_eq!(merged, a);
    }
}
