use nalgebra::{Matrix3, Matrix4, Translation3, UnitQuaternion, Vector3};

/// Scale magnitudes at or below this are treated as degenerate.
const DEGENERATE_SCALE: f32 = 1e-8;

/// Inverts a matrix, falling back to identity when it is singular.
///
/// A single degenerate (zero-scale) pose must not abort a whole animation
/// import, so callers compose with the fallback instead of failing.
///
/// # Arguments
///
/// * `matrix` - Matrix to invert.
///
/// # Returns
///
/// The inverse when it exists, otherwise the identity matrix.
pub fn invert_safe(matrix: &Matrix4<f32>) -> Matrix4<f32> {
    matrix.try_inverse().unwrap_or_else(Matrix4::identity)
}

/// Decomposes an affine matrix into translation, rotation and per-axis scale.
///
/// Scale is extracted from the basis column norms, with the X column negated
/// when the basis is left-handed. Degenerate (near-zero) columns fall back to
/// the corresponding unit axis so the result never carries NaN or Inf.
///
/// # Arguments
///
/// * `matrix` - Affine transform matrix to decompose.
///
/// # Returns
///
/// `(translation, rotation, scale)` where `rotation` is a unit quaternion and
/// `scale` is per-axis (uniform inputs may decompose to near-uniform values).
pub fn decompose_trs(matrix: &Matrix4<f32>) -> (Vector3<f32>, UnitQuaternion<f32>, Vector3<f32>) {
    let translation = Vector3::new(matrix[(0, 3)], matrix[(1, 3)], matrix[(2, 3)]);

    let basis_x = Vector3::new(matrix[(0, 0)], matrix[(1, 0)], matrix[(2, 0)]);
    let basis_y = Vector3::new(matrix[(0, 1)], matrix[(1, 1)], matrix[(2, 1)]);
    let basis_z = Vector3::new(matrix[(0, 2)], matrix[(1, 2)], matrix[(2, 2)]);

    let mut scale_x = basis_x.norm();
    let scale_y = basis_y.norm();
    let scale_z = basis_z.norm();

    let mut rot_x = if scale_x > DEGENERATE_SCALE {
        basis_x / scale_x
    } else {
        Vector3::new(1.0, 0.0, 0.0)
    };
    let rot_y = if scale_y > DEGENERATE_SCALE {
        basis_y / scale_y
    } else {
        Vector3::new(0.0, 1.0, 0.0)
    };
    let rot_z = if scale_z > DEGENERATE_SCALE {
        basis_z / scale_z
    } else {
        Vector3::new(0.0, 0.0, 1.0)
    };

    if rot_x.cross(&rot_y).dot(&rot_z) < 0.0 {
        scale_x = -scale_x;
        rot_x = -rot_x;
    }

    let rotation_matrix = Matrix3::from_columns(&[rot_x, rot_y, rot_z]);
    let rotation = UnitQuaternion::from_matrix(&rotation_matrix);

    (translation, rotation, Vector3::new(scale_x, scale_y, scale_z))
}

/// A rigid-plus-uniform-scale pose.
///
/// The group is closed under composition and (non-degenerate) inversion, so
/// parent-relative rewrites stay exact instead of round-tripping through a
/// matrix decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Local translation.
    pub translation: Vector3<f32>,
    /// Local rotation; kept unit-length across composition.
    pub rotation: UnitQuaternion<f32>,
    /// Uniform scale applied on all three axes.
    pub scale: f32,
}

impl Transform {
    /// Returns the identity pose.
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
            scale: 1.0,
        }
    }

    /// Builds the equivalent homogeneous matrix (`T * R * S`).
    pub fn to_matrix(&self) -> Matrix4<f32> {
        Translation3::from(self.translation).to_homogeneous()
            * self.rotation.to_homogeneous()
            * Matrix4::new_scaling(self.scale)
    }

    /// Composes `self ∘ other` (apply `other` first, then `self`).
    ///
    /// The rotation is re-normalized after the product so repeated
    /// composition does not drift off the unit sphere.
    pub fn compose(&self, other: &Transform) -> Transform {
        let mut rotation = self.rotation * other.rotation;
        rotation.renormalize();

        Transform {
            translation: self.translation
                + self.rotation.transform_vector(&other.translation) * self.scale,
            rotation,
            scale: self.scale * other.scale,
        }
    }

    /// Inverts the pose, falling back to identity when the scale is
    /// degenerate (the pose-level analogue of [`invert_safe`]).
    pub fn inverse_safe(&self) -> Transform {
        if self.scale.abs() <= DEGENERATE_SCALE {
            return Transform::identity();
        }

        let inverse_rotation = self.rotation.inverse();
        let inverse_scale = 1.0 / self.scale;

        Transform {
            translation: -(inverse_rotation.transform_vector(&self.translation)) * inverse_scale,
            rotation: inverse_rotation,
            scale: inverse_scale,
        }
    }
}
