use crate::rtweekend::*;
use rand::RngCore;

/// How a surface responds to an incoming ray.
pub trait Material: Send + Sync {
    /// Returns the scattered ray and its attenuation, or `None` if the ray is absorbed.
    fn scatter(&self, r_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<(Ray, Color)>;
}

/// Ideal diffuse surface.
#[derive(Debug, Clone, Copy)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _r_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<(Ray, Color)> {
        let mut scatter_direction = rec.normal + Vec3::random_unit_vector(rng);
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }
        Some((Ray::new(rec.p, scatter_direction), self.albedo))
    }
}

/// Mirror-like surface; `fuzz` in `[0, 1]` roughens the reflection.
#[derive(Debug, Clone, Copy)]
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, r_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<(Ray, Color)> {
        let mut reflected = Vec3::reflect(&r_in.dir.normalized(), &rec.normal);
        if self.fuzz > 0.0 {
            reflected += self.fuzz * Vec3::random_in_unit_sphere(rng);
        }
        let scattered = Ray::new(rec.p, reflected);

        // Fuzz can push the ray below the surface; treat that as absorbed.
        if scattered.dir.dot(rec.normal) > 0.0 {
            Some((scattered, self.albedo))
        } else {
            None
        }
    }
}

/// Clear refractive material such as glass or water.
#[derive(Debug, Clone, Copy)]
pub struct Dielectric {
    /// Refractive index relative to the surrounding medium.
    refraction_index: f64,
}

impl Dielectric {
    pub fn new(refraction_index: f64) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation of Fresnel reflectance.
    fn reflectance(cosine: f64, refraction_index: f64) -> f64 {
        let r0 = (1.0 - refraction_index) / (1.0 + refraction_index);
        let r0 = r0 * r0;
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }

    /// False under total internal reflection.
    fn can_refract(ri: f64, cos_theta: f64) -> bool {
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
        ri * sin_theta <= 1.0
    }
}

impl Material for Dielectric {
    fn scatter(&self, r_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<(Ray, Color)> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = r_in.dir.normalized();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);

        let direction = if !Self::can_refract(ri, cos_theta)
            || Self::reflectance(cos_theta, ri) > random_f64(rng)
        {
            Vec3::reflect(&unit_direction, &rec.normal)
        } else {
            Vec3::refract(&unit_direction, &rec.normal, ri)
        };

        Some((Ray::new(rec.p, direction), Color::splat(1.0)))
    }
}
