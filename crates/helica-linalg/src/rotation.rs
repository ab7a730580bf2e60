use glam::{DMat3, DVec3};

/// Read the element at `row`, `col` of a column-major glam matrix.
#[inline]
pub fn element(m: &DMat3, row: usize, col: usize) -> f64 {
    m.col(col)[row]
}

/// Trace of a 3x3 matrix.
#[inline]
pub fn trace(m: &DMat3) -> f64 {
    m.x_axis.x + m.y_axis.y + m.z_axis.z
}

/// Vector space -> skew-symmetric matrix, such that `hat(a) * b == a.cross(b)`.
pub fn hat(v: DVec3) -> DMat3 {
    DMat3::from_cols(
        DVec3::new(0.0, v.z, -v.y),
        DVec3::new(-v.z, 0.0, v.x),
        DVec3::new(v.y, -v.x, 0.0),
    )
}

/// Antisymmetric part of a rotation matrix as a vector.
///
/// Returns `(R32 - R23, R13 - R31, R21 - R12)`, which equals `2 sin(phi) n` for a
/// rotation of angle `phi` about the unit axis `n`.
pub fn skew_vector(m: &DMat3) -> DVec3 {
    DVec3::new(
        element(m, 2, 1) - element(m, 1, 2),
        element(m, 0, 2) - element(m, 2, 0),
        element(m, 1, 0) - element(m, 0, 1),
    )
}

/// Compute the rotation matrix from an axis and angle (Rodrigues' formula).
///
/// The axis is normalized first. Returns `None` for a zero-length axis.
///
/// Example:
///
/// ```
/// use glam::DVec3;
/// use helica_linalg::rotation::axis_angle_to_rotation;
///
/// let r = axis_angle_to_rotation(DVec3::Z, std::f64::consts::FRAC_PI_2).unwrap();
/// assert!((r * DVec3::X).abs_diff_eq(DVec3::Y, 1e-12));
/// ```
pub fn axis_angle_to_rotation(axis: DVec3, angle: f64) -> Option<DMat3> {
    let magnitude = axis.length();
    if magnitude < 1e-10 || !magnitude.is_finite() {
        return None;
    }
    let n = axis / magnitude;

    let (s, c) = angle.sin_cos();
    let t = 1.0 - c;
    let k = hat(n);

    // R = c I + s [n]x + t n n^T
    let outer = DMat3::from_cols(n * n.x, n * n.y, n * n.z);
    Some(DMat3::IDENTITY * c + k * s + outer * t)
}

/// Build a glam matrix from 9 values in row-major order (`r00 r01 r02 r10 ...`).
pub fn mat3_from_row_major(values: &[f64; 9]) -> DMat3 {
    DMat3::from_cols_array(values).transpose()
}

/// Flatten a glam matrix to 9 values in row-major order.
pub fn mat3_to_row_major(m: &DMat3) -> [f64; 9] {
    m.transpose().to_cols_array()
}

/// Whether `m` is a proper rotation (orthonormal, det = +1) within `tol`.
pub fn is_rotation(m: &DMat3, tol: f64) -> bool {
    (m.transpose() * *m).abs_diff_eq(DMat3::IDENTITY, tol) && (m.determinant() - 1.0).abs() <= tol
}
