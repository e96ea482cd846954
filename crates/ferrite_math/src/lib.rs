// Re-export glam for convenience
pub use glam::*;

// Ferrite math types
mod aabb;
pub use aabb::Aabb;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec2_extend() {
        let uv = Vec2::new(0.25, 0.75);
        assert_eq!(uv.extend(0.0), Vec3::new(0.25, 0.75, 0.0));
    }
}
