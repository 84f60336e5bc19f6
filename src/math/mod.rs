pub mod intersect_3d;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Unit quaternion used for orientations.
pub type UnitQuaternion = nalgebra::UnitQuaternion<f64>;

/// Rigid transform from a path's local frame to world space.
pub type Isometry3 = nalgebra::Isometry3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// World forward axis (`+Z`).
#[must_use]
pub fn forward() -> Vector3 {
    Vector3::z()
}

/// World up axis (`+Y`).
#[must_use]
pub fn up() -> Vector3 {
    Vector3::y()
}

/// Returns the orientation whose forward axis points along `direction`,
/// keeping `+Y` as up where possible.
///
/// Zero-length directions yield the identity rotation. Directions parallel
/// to up fall back to the shortest-arc rotation from forward.
#[must_use]
pub fn look_rotation(direction: &Vector3) -> UnitQuaternion {
    let Some(dir) = direction.try_normalize(TOLERANCE) else {
        return UnitQuaternion::identity();
    };

    if dir.cross(&up()).norm() < 1e-6 {
        return UnitQuaternion::rotation_between(&forward(), &dir).unwrap_or_else(|| {
            // Anti-parallel to forward: half turn about up.
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f64::consts::PI)
        });
    }

    UnitQuaternion::face_towards(&dir, &up())
}

/// Spherical interpolation that tolerates opposite orientations by
/// snapping to whichever end is closer in `t`.
#[must_use]
pub fn slerp_orientation(from: &UnitQuaternion, to: &UnitQuaternion, t: f64) -> UnitQuaternion {
    from.try_slerp(to, t, 1e-9)
        .unwrap_or(if t < 0.5 { *from } else { *to })
}
