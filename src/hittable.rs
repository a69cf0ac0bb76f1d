use crate::rtweekend::*;

/// Result of a successful ray/surface intersection.
#[derive(Clone)]
pub struct HitRecord {
    pub p: Point3,
    /// Unit normal, always facing against the incoming ray.
    pub normal: Vec3,
    pub t: f64,
    pub mat: Arc<dyn Material>,
    pub front_face: bool,
}

impl HitRecord {
    /// Builds a record, orienting `outward_normal` (assumed unit length) against `r`.
    pub fn new(r: &Ray, t: f64, outward_normal: Vec3, mat: Arc<dyn Material>) -> Self {
        let mut rec = Self {
            p: r.at(t),
            normal: outward_normal,
            t,
            mat,
            front_face: true,
        };
        rec.set_face_normal(r, outward_normal);
        rec
    }

    #[inline]
    pub fn set_face_normal(&mut self, r: &Ray, outward_normal: Vec3) {
        self.front_face = r.dir.dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can intersect. Shared read-only across render workers.
pub trait Hittable: Send + Sync {
    /// Nearest intersection with `t` strictly inside `ray_t`, if any.
    fn hit(&self, r: &Ray, ray_t: Interval) -> Option<HitRecord>;
}
