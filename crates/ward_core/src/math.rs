//! Small geometric helpers on top of `glam`

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WardError};

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create from min and max corners, rejecting inverted boxes
    pub fn new(min: Vec3, max: Vec3) -> Result<Self> {
        if min.x > max.x || min.y > max.y || min.z > max.z {
            return Err(WardError::InvertedBounds {
                min: min.to_array(),
                max: max.to_array(),
            });
        }
        Ok(Self { min, max })
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Check if a point is inside (boundary included)
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }
}

/// Euclidean distance ignoring height
#[inline]
pub fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_inverted_box_rejected() {
        assert!(Aabb::new(Vec3::ONE, Vec3::ZERO).is_err());
        assert!(Aabb::new(Vec3::ZERO, Vec3::ONE).is_ok());
    }

    #[test]
    fn test_contains() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        assert!(aabb.contains_point(Vec3::new(1.0, 0.0, 0.0)));
        assert!(!aabb.contains_point(Vec3::new(0.0, 1.5, 0.0)));
    }

    #[test]
    fn test_horizontal_distance_ignores_height() {
        let d = horizontal_distance(Vec3::new(0.0, 100.0, 0.0), Vec3::new(3.0, -4.0, 4.0));
        assert_relative_eq!(d, 5.0);
    }
}
