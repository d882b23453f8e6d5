//! Raw spherical projection formulas on the unit sphere.
//!
//! Every formula takes `(lambda, phi)` in radians after rotation and returns
//! planar unit coordinates with y pointing north. Inverses return `None`
//! where the planar point has no geographic meaning.

use crate::projection::rotation::clamped_asin;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawProjection {
    Equirectangular,
    Mercator,
    Orthographic,
    NaturalEarth,
    AzimuthalEqualArea,
    Stereographic,
    ConicEqualArea(ConicEqualArea),
}

impl RawProjection {
    pub fn forward(&self, lambda: f64, phi: f64) -> Option<(f64, f64)> {
        let (x, y) = match self {
            RawProjection::Equirectangular => (lambda, phi),
            RawProjection::Mercator => (lambda, (FRAC_PI_4 + phi / 2.0).tan().ln()),
            RawProjection::Orthographic => azimuthal_forward(lambda, phi, |_| 1.0)?,
            RawProjection::AzimuthalEqualArea => {
                azimuthal_forward(lambda, phi, |cxcy| (2.0 / (1.0 + cxcy)).sqrt())?
            }
            RawProjection::Stereographic => azimuthal_forward(lambda, phi, |cxcy| 1.0 / (1.0 + cxcy))?,
            RawProjection::NaturalEarth => natural_earth_forward(lambda, phi),
            RawProjection::ConicEqualArea(conic) => conic.forward(lambda, phi)?,
        };
        if x.is_finite() && y.is_finite() {
            Some((x, y))
        } else {
            None
        }
    }

    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let (lambda, phi) = match self {
            RawProjection::Equirectangular => (x, y),
            RawProjection::Mercator => (x, 2.0 * y.exp().atan() - FRAC_PI_2),
            RawProjection::Orthographic => azimuthal_invert(x, y, |z| {
                if z > 1.0 + EPSILON {
                    None
                } else {
                    Some(clamped_asin(z))
                }
            })?,
            RawProjection::AzimuthalEqualArea => azimuthal_invert(x, y, |z| {
                if z > 2.0 + EPSILON {
                    None
                } else {
                    Some(2.0 * clamped_asin(z / 2.0))
                }
            })?,
            RawProjection::Stereographic => azimuthal_invert(x, y, |z| Some(2.0 * z.atan()))?,
            RawProjection::NaturalEarth => natural_earth_invert(x, y)?,
            RawProjection::ConicEqualArea(conic) => conic.invert(x, y)?,
        };
        if !lambda.is_finite() || !phi.is_finite() {
            return None;
        }
        if lambda.abs() > PI + EPSILON || phi.abs() > FRAC_PI_2 + EPSILON {
            return None;
        }
        Some((lambda, phi))
    }
}

fn azimuthal_forward(lambda: f64, phi: f64, scale: impl Fn(f64) -> f64) -> Option<(f64, f64)> {
    let cx = lambda.cos();
    let cy = phi.cos();
    let k = scale(cx * cy);
    if !k.is_finite() {
        return None;
    }
    Some((k * cy * lambda.sin(), k * phi.sin()))
}

fn azimuthal_invert(x: f64, y: f64, angle: impl Fn(f64) -> Option<f64>) -> Option<(f64, f64)> {
    let z = (x * x + y * y).sqrt();
    let c = angle(z)?;
    let sc = c.sin();
    let cc = c.cos();
    let phi = if z == 0.0 { 0.0 } else { clamped_asin(y * sc / z) };
    Some(((x * sc).atan2(z * cc), phi))
}

fn natural_earth_forward(lambda: f64, phi: f64) -> (f64, f64) {
    let phi2 = phi * phi;
    let phi4 = phi2 * phi2;
    (
        lambda
            * (0.8707 - 0.131979 * phi2
                + phi4 * (-0.013791 + phi4 * (0.003971 * phi2 - 0.001529 * phi4))),
        phi * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4))),
    )
}

fn natural_earth_invert(x: f64, y: f64) -> Option<(f64, f64)> {
    let mut phi = y;
    for _ in 0..25 {
        let phi2 = phi * phi;
        let phi4 = phi2 * phi2;
        let delta = (phi
            * (1.007226 + phi2 * (0.015085 + phi4 * (-0.044475 + 0.028874 * phi2 - 0.005916 * phi4)))
            - y)
            / (1.007226
                + phi2
                    * (0.015085 * 3.0
                        + phi4 * (-0.044475 * 7.0 + 0.028874 * 9.0 * phi2 - 0.005916 * 11.0 * phi4)));
        phi -= delta;
        if delta.abs() <= EPSILON {
            break;
        }
    }
    if phi.abs() > FRAC_PI_2 + EPSILON {
        return None;
    }
    let phi2 = phi * phi;
    let lambda = x
        / (0.8707
            + phi2 * (-0.131979 + phi2 * (-0.013791 + phi2 * phi2 * phi2 * (0.003971 - 0.001529 * phi2))));
    Some((lambda, phi))
}

/// Albers-style equal-area conic on the sphere, defined by two standard parallels.
///
/// Degenerates to a cylindrical equal-area projection when the parallels are
/// symmetric about the equator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicEqualArea {
    parallels: (f64, f64),
    n: f64,
    c: f64,
    r0: f64,
    cylindrical_cos: Option<f64>,
}

impl ConicEqualArea {
    /// Parallels in degrees.
    pub fn new(parallel_1: f64, parallel_2: f64) -> Self {
        let y0 = parallel_1.to_radians();
        let y1 = parallel_2.to_radians();
        let sy0 = y0.sin();
        let n = (sy0 + y1.sin()) / 2.0;

        if n.abs() < EPSILON {
            return Self {
                parallels: (parallel_1, parallel_2),
                n,
                c: 0.0,
                r0: 0.0,
                cylindrical_cos: Some(y0.cos()),
            };
        }

        let c = 1.0 + sy0 * (2.0 * n - sy0);
        Self {
            parallels: (parallel_1, parallel_2),
            n,
            c,
            r0: c.sqrt() / n,
            cylindrical_cos: None,
        }
    }

    pub fn parallels(&self) -> (f64, f64) {
        self.parallels
    }

    fn forward(&self, lambda: f64, phi: f64) -> Option<(f64, f64)> {
        if let Some(cos_phi0) = self.cylindrical_cos {
            return Some((lambda * cos_phi0, phi.sin() / cos_phi0));
        }
        let radicand = self.c - 2.0 * self.n * phi.sin();
        if radicand < 0.0 {
            return None;
        }
        let r = radicand.sqrt() / self.n;
        let theta = lambda * self.n;
        Some((r * theta.sin(), self.r0 - r * theta.cos()))
    }

    fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if let Some(cos_phi0) = self.cylindrical_cos {
            let s = y * cos_phi0;
            if s.abs() > 1.0 + EPSILON {
                return None;
            }
            return Some((x / cos_phi0, clamped_asin(s)));
        }
        let r0y = self.r0 - y;
        let mut l = x.atan2(r0y.abs()) * r0y.signum();
        if r0y * self.n < 0.0 {
            l -= PI * x.signum() * r0y.signum();
        }
        let s = (self.c - (x * x + r0y * r0y) * self.n * self.n) / (2.0 * self.n);
        if s.abs() > 1.0 + EPSILON {
            return None;
        }
        Some((l / self.n, clamped_asin(s)))
    }
}
