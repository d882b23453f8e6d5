//! Three-axis spherical rotation applied before the raw projection.
//!
//! Angles follow the usual web-mapping convention: `[lambda, phi, gamma]` in
//! degrees, where lambda spins around the polar axis, phi tilts toward the
//! viewer and gamma rolls around the view axis.

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    delta_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
    has_phi_gamma: bool,
}

impl Rotation {
    /// Build a rotation from `[lambda, phi, gamma]` degrees.
    pub fn new(angles: [f64; 3]) -> Self {
        let delta_phi = angles[1].to_radians();
        let delta_gamma = angles[2].to_radians();
        Self {
            delta_lambda: angles[0].to_radians() % (2.0 * PI),
            cos_phi: delta_phi.cos(),
            sin_phi: delta_phi.sin(),
            cos_gamma: delta_gamma.cos(),
            sin_gamma: delta_gamma.sin(),
            has_phi_gamma: delta_phi != 0.0 || delta_gamma != 0.0,
        }
    }

    pub fn identity() -> Self {
        Self::new([0.0, 0.0, 0.0])
    }

    /// Rotate `(lambda, phi)` in radians.
    pub fn forward(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let lambda = wrap_radians(lambda + self.delta_lambda);
        if !self.has_phi_gamma {
            return (lambda, phi);
        }

        let cos_p = phi.cos();
        let x = lambda.cos() * cos_p;
        let y = lambda.sin() * cos_p;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;

        (
            (y * self.cos_gamma - k * self.sin_gamma).atan2(x * self.cos_phi - z * self.sin_phi),
            clamped_asin(k * self.cos_gamma + y * self.sin_gamma),
        )
    }

    /// Undo [`Rotation::forward`]; input and output in radians.
    pub fn invert(&self, lambda: f64, phi: f64) -> (f64, f64) {
        let (lambda, phi) = if self.has_phi_gamma {
            let cos_p = phi.cos();
            let x = lambda.cos() * cos_p;
            let y = lambda.sin() * cos_p;
            let z = phi.sin();
            let k = z * self.cos_gamma - y * self.sin_gamma;
            (
                (y * self.cos_gamma + z * self.sin_gamma).atan2(x * self.cos_phi + k * self.sin_phi),
                clamped_asin(k * self.cos_phi - x * self.sin_phi),
            )
        } else {
            (lambda, phi)
        };
        (wrap_radians(lambda - self.delta_lambda), phi)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::identity()
    }
}

fn wrap_radians(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

pub(crate) fn clamped_asin(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_identity_is_noop() {
        let rotation = Rotation::identity();
        let (l, p) = rotation.forward(0.5, 0.25);
        assert_abs_diff_eq!(l, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(p, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_centering_rotation_moves_point_to_origin() {
        // Rotating by (-lon, -lat) brings (lon, lat) to the origin
        let rotation = Rotation::new([-30.0, -45.0, 0.0]);
        let (l, p) = rotation.forward(30f64.to_radians(), 45f64.to_radians());
        assert_abs_diff_eq!(l, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_invert_undoes_forward() {
        let rotation = Rotation::new([120.0, -30.0, 15.0]);
        for &(lon, lat) in &[(10.0_f64, 20.0_f64), (-170.0, 60.0), (45.0, -80.0)] {
            let (l, p) = rotation.forward(lon.to_radians(), lat.to_radians());
            let (l2, p2) = rotation.invert(l, p);
            assert_abs_diff_eq!(l2.to_degrees(), lon, epsilon = 1e-9);
            assert_abs_diff_eq!(p2.to_degrees(), lat, epsilon = 1e-9);
        }
    }
}
