use crate::rtweekend::*;
use rand::RngCore;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

/// Three-component vector, used for points, directions and colors alike.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

pub type Point3 = Vec3;

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    /// True when every component is below `1e-8` in magnitude.
    pub fn near_zero(&self) -> bool {
        const S: f64 = 1e-8;
        self.x.abs() < S && self.y.abs() < S && self.z.abs() < S
    }

    pub fn length_squared(&self) -> f64 {
        self.dot(*self)
    }

    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Unit vector in the same direction. The caller guarantees a non-zero length.
    pub fn normalized(&self) -> Self {
        *self / self.length()
    }

    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self::new(random_f64(rng), random_f64(rng), random_f64(rng))
    }

    pub fn random_interval(rng: &mut dyn RngCore, min: f64, max: f64) -> Self {
        Self::new(
            random_f64_range(rng, min, max),
            random_f64_range(rng, min, max),
            random_f64_range(rng, min, max),
        )
    }

    /// Rejection-sampled point strictly inside the unit sphere.
    pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = Self::random_interval(rng, -1.0, 1.0);
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    pub fn random_unit_vector(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = Self::random_in_unit_sphere(rng);
            // Points too close to the origin lose precision when normalized.
            if p.length_squared() > 1e-160 {
                return p.normalized();
            }
        }
    }

    /// Rejection-sampled point inside the unit disk of the xy plane.
    pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Self {
        loop {
            let p = Self::new(
                random_f64_range(rng, -1.0, 1.0),
                random_f64_range(rng, -1.0, 1.0),
                0.0,
            );
            if p.length_squared() < 1.0 {
                return p;
            }
        }
    }

    /// Mirror `v` about the surface normal `n`.
    pub fn reflect(v: &Self, n: &Self) -> Self {
        *v - 2.0 * v.dot(*n) * *n
    }

    /// Snell's law refraction of the unit vector `uv` through a surface with normal `n`.
    pub fn refract(uv: &Self, n: &Self, etai_over_etat: f64) -> Self {
        let cos_theta = (-*uv).dot(*n).min(1.0);
        let r_out_perp = etai_over_etat * (*uv + cos_theta * *n);
        let r_out_parallel = -((1.0 - r_out_perp.length_squared()).abs().sqrt()) * *n;
        r_out_perp + r_out_parallel
    }
}

macro_rules! componentwise_op {
    ($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:tt) => {
        impl $trait for Vec3 {
            type Output = Self;

            fn $method(self, other: Self) -> Self {
                Self::new(self.x $op other.x, self.y $op other.y, self.z $op other.z)
            }
        }

        impl $assign_trait for Vec3 {
            fn $assign_method(&mut self, other: Self) {
                *self = *self $op other;
            }
        }
    };
}

componentwise_op!(Add, add, AddAssign, add_assign, +);
componentwise_op!(Sub, sub, SubAssign, sub_assign, -);

// Component-wise product, used to apply attenuation to colors.
impl Mul for Vec3 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, t: f64) -> Self {
        Self::new(self.x * t, self.y * t, self.z * t)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl MulAssign<f64> for Vec3 {
    fn mul_assign(&mut self, t: f64) {
        *self = *self * t;
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;

    fn div(self, t: f64) -> Self {
        self * (1.0 / t)
    }
}

impl DivAssign<f64> for Vec3 {
    fn div_assign(&mut self, t: f64) {
        *self = *self / t;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Index<usize> for Vec3 {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index {index} out of bounds"),
        }
    }
}

impl IndexMut<usize> for Vec3 {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vec3 index {index} out of bounds"),
        }
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-9
    }

    #[test]
    fn dot_and_cross() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.dot(y), 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec3::new(3.0, -4.0, 12.0);
        assert!((v.normalized().length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn near_zero_threshold() {
        assert!(Vec3::new(1e-9, -1e-9, 0.0).near_zero());
        assert!(!Vec3::new(1e-7, 0.0, 0.0).near_zero());
    }

    #[test]
    fn reflect_flips_normal_component() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(Vec3::reflect(&v, &n), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn refract_with_unit_ratio_passes_straight_through() {
        let uv = Vec3::new(1.0, -1.0, 0.0).normalized();
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert!(approx_eq(Vec3::refract(&uv, &n, 1.0), uv));
    }

    #[test]
    fn refract_at_normal_incidence_keeps_direction() {
        let uv = Vec3::new(0.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert!(approx_eq(Vec3::refract(&uv, &n, 1.0 / 1.5), uv));
    }

    #[test]
    fn random_samples_respect_their_domains() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            assert!(Vec3::random_in_unit_sphere(&mut rng).length_squared() < 1.0);
            assert!((Vec3::random_unit_vector(&mut rng).length() - 1.0).abs() < 1e-9);
            let d = Vec3::random_in_unit_disk(&mut rng);
            assert_eq!(d.z, 0.0);
            assert!(d.length_squared() < 1.0);
        }
    }

    #[test]
    fn operators() {
        let mut v = Vec3::new(1.0, 2.0, 3.0);
        v += Vec3::splat(1.0);
        assert_eq!(v, Vec3::new(2.0, 3.0, 4.0));
        v -= Vec3::new(2.0, 0.0, 0.0);
        v *= 2.0;
        assert_eq!(v, Vec3::new(0.0, 6.0, 8.0));
        v /= 2.0;
        assert_eq!(v[1], 3.0);
        v[2] = 9.0;
        assert_eq!(-v, Vec3::new(-0.0, -3.0, -9.0));
        assert_eq!(Vec3::new(1.0, 2.0, 3.0) * Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(format!("{}", Vec3::new(1.0, 0.5, 0.0)), "1 0.5 0");
    }
}
