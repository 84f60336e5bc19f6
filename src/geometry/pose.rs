use crate::math::{look_rotation, slerp_orientation, Point3, UnitQuaternion, Vector3};

/// World position and orientation of a traveler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point3,
    pub rotation: UnitQuaternion,
}

impl Pose {
    /// Creates a pose from a position and an orientation.
    #[must_use]
    pub fn new(position: Point3, rotation: UnitQuaternion) -> Self {
        Self { position, rotation }
    }

    /// Pose at `position` facing along `direction`.
    #[must_use]
    pub fn facing(position: Point3, direction: &Vector3) -> Self {
        Self {
            position,
            rotation: look_rotation(direction),
        }
    }

    /// Unit forward vector of this pose.
    #[must_use]
    pub fn forward(&self) -> Vector3 {
        self.rotation * crate::math::forward()
    }

    /// Lerps position and slerps rotation towards `other`.
    #[must_use]
    pub fn interpolate(&self, other: &Self, t: f64) -> Self {
        Self {
            position: self.position.lerp(&other.position, t),
            rotation: slerp_orientation(&self.rotation, &other.rotation, t),
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Point3::origin(), UnitQuaternion::identity())
    }
}
