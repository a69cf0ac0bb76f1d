use crate::rtweekend::*;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use rayon::prelude::*;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Lower bound of the hit interval, keeps scattered rays from re-hitting their origin.
const HIT_EPSILON: f64 = 0.001;

pub struct Camera {
    settings: RenderSettings,

    pixel_sample_scale: f64,
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Validates `settings` and derives the viewport and lens geometry from them.
    pub fn new(settings: RenderSettings) -> Result<Self, RenderError> {
        settings.validate()?;

        let mut cam = Self {
            pixel_sample_scale: 1.0 / settings.samples_per_pixel as f64,
            image_height: settings.image_height(),
            settings,
            center: Point3::zero(),
            pixel00_loc: Point3::zero(),
            pixel_delta_u: Vec3::zero(),
            pixel_delta_v: Vec3::zero(),
            u: Vec3::zero(),
            v: Vec3::zero(),
            w: Vec3::zero(),
            defocus_disk_u: Vec3::zero(),
            defocus_disk_v: Vec3::zero(),
        };
        cam.initialize();
        Ok(cam)
    }

    fn initialize(&mut self) {
        let s = &self.settings;
        self.center = s.lookfrom;

        let h = (degrees_to_radians(s.vfov) / 2.0).tan();
        let viewport_height = 2.0 * h * s.focus_dist;
        let viewport_width =
            viewport_height * (s.image_width as f64 / self.image_height as f64);

        self.w = (s.lookfrom - s.lookat).normalized();
        self.u = s.vup.cross(self.w).normalized();
        self.v = self.w.cross(self.u);

        // Image rows run top to bottom, hence the flipped v.
        let viewport_u = viewport_width * self.u;
        let viewport_v = viewport_height * -self.v;

        self.pixel_delta_u = viewport_u / s.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - s.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        let defocus_radius = s.focus_dist * (degrees_to_radians(s.defocus_angle) / 2.0).tan();
        self.defocus_disk_u = defocus_radius * self.u;
        self.defocus_disk_v = defocus_radius * self.v;

        debug!(
            "camera basis u=({}) v=({}) w=({}), viewport {:.3}x{:.3}, defocus radius {:.4}",
            self.u, self.v, self.w, viewport_width, viewport_height, defocus_radius
        );
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn image_width(&self) -> u32 {
        self.settings.image_width
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Renders `world` into a row-major, top-to-bottom RGB byte buffer.
    ///
    /// Rows are split into contiguous ranges, one per worker thread. Each row
    /// draws from its own random stream seeded from the base seed and the row
    /// index, so a seeded render is reproducible regardless of thread count.
    pub fn render<W: Hittable + ?Sized>(&self, world: &W) -> Result<Vec<u8>, RenderError> {
        let width = self.settings.image_width as usize;
        let height = self.image_height as usize;
        let row_bytes = width * 3;

        let available = rayon::current_num_threads();
        if self.settings.worker_count > available {
            warn!(
                "requested {} workers but only {} threads are available",
                self.settings.worker_count, available
            );
        }
        let workers = self.settings.worker_count.min(available).min(height).max(1);
        let rows_per_worker = height.div_ceil(workers);

        let base_seed = self.settings.seed.unwrap_or_else(|| rand::rng().random());

        info!(
            "rendering {}x{} with {} samples/pixel, max depth {}, {} workers (seed {})",
            width, height, self.settings.samples_per_pixel, self.settings.max_depth, workers, base_seed
        );
        let start = Instant::now();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("render-worker-{i}"))
            .build()?;

        let progress = ScanlineProgress::new(height, self.settings.show_progress);
        let mut pixels = vec![0u8; height * row_bytes];

        pool.install(|| {
            pixels
                .par_chunks_mut(rows_per_worker * row_bytes)
                .enumerate()
                .for_each(|(worker, block)| {
                    let first_row = worker * rows_per_worker;
                    for (offset, row) in block.chunks_mut(row_bytes).enumerate() {
                        let j = first_row + offset;
                        let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(j as u64));
                        self.render_row(j as u32, row, world, &mut rng);
                        progress.row_finished();
                    }
                });
        });

        progress.finish();
        info!("render finished in {:.2?}", start.elapsed());

        Ok(pixels)
    }

    fn render_row<W: Hittable + ?Sized>(
        &self,
        j: u32,
        row: &mut [u8],
        world: &W,
        rng: &mut dyn RngCore,
    ) {
        for (i, pixel) in row.chunks_exact_mut(3).enumerate() {
            let mut pixel_color = Color::zero();
            for _sample in 0..self.settings.samples_per_pixel {
                let r = self.get_ray(i as u32, j, rng);
                pixel_color += self.ray_color(&r, self.settings.max_depth, world, rng);
            }
            write_color(pixel, pixel_color * self.pixel_sample_scale);
        }
    }

    /// Radiance carried back along `r`, following at most `depth` bounces.
    pub fn ray_color<W: Hittable + ?Sized>(
        &self,
        r: &Ray,
        depth: u32,
        world: &W,
        rng: &mut dyn RngCore,
    ) -> Color {
        if depth == 0 {
            return Color::zero();
        }

        if let Some(rec) = world.hit(r, Interval::new(HIT_EPSILON, INFINITY)) {
            return match rec.mat.scatter(r, &rec, rng) {
                Some((scattered, attenuation)) => {
                    attenuation * self.ray_color(&scattered, depth - 1, world, rng)
                }
                None => Color::zero(),
            };
        }

        sky_color(r)
    }

    /// Ray from the lens toward a jittered point inside pixel `(i, j)`.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.sample_square(rng);
        let pixel_sample = self.pixel00_loc
            + ((i as f64 + offset.x) * self.pixel_delta_u)
            + ((j as f64 + offset.y) * self.pixel_delta_v);

        let ray_origin = if self.settings.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Offset in `[-0.5, 0.5]^2`; a single sample per pixel always goes through the center.
    fn sample_square(&self, rng: &mut dyn RngCore) -> Vec3 {
        if self.settings.samples_per_pixel == 1 {
            return Vec3::zero();
        }
        Vec3::new(random_f64(rng) - 0.5, random_f64(rng) - 0.5, 0.0)
    }

    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = Vec3::random_in_unit_disk(rng);
        self.center + (p.x * self.defocus_disk_u) + (p.y * self.defocus_disk_v)
    }
}

/// White at the horizon blending into light blue overhead.
fn sky_color(r: &Ray) -> Color {
    let unit_direction = r.dir.normalized();
    let a = 0.5 * (unit_direction.y + 1.0);
    (1.0 - a) * Color::new(1.0, 1.0, 1.0) + a * Color::new(0.5, 0.7, 1.0)
}

/// Completed-row counter shared by all workers.
struct ScanlineProgress {
    completed: Mutex<usize>,
    total: usize,
    enabled: bool,
}

impl ScanlineProgress {
    fn new(total: usize, enabled: bool) -> Self {
        Self {
            completed: Mutex::new(0),
            total,
            enabled,
        }
    }

    fn row_finished(&self) {
        let mut completed = self.completed.lock().unwrap_or_else(PoisonError::into_inner);
        *completed += 1;

        let remaining = self.total - *completed;
        if self.enabled && (remaining % 20 == 0 || remaining == 0) {
            let mut stderr = io::stderr().lock();
            // Progress is best effort; a closed stderr must not abort the render.
            let _ = write!(stderr, "\rScanlines remaining: {remaining:<4}");
            let _ = stderr.flush();
        }
    }

    fn finish(&self) {
        if self.enabled {
            eprintln!("\rDone.                          ");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(width: u32, spp: u32) -> RenderSettings {
        RenderSettings {
            aspect_ratio: 2.0,
            image_width: width,
            samples_per_pixel: spp,
            max_depth: 5,
            focus_dist: 1.0,
            worker_count: 2,
            seed: Some(11),
            show_progress: false,
            ..Default::default()
        }
    }

    #[test]
    fn new_rejects_invalid_settings() {
        let bad = RenderSettings { image_width: 0, ..settings(10, 1) };
        assert!(matches!(Camera::new(bad), Err(RenderError::InvalidSettings(_))));
    }

    #[test]
    fn basis_is_orthonormal() {
        let cam = Camera::new(RenderSettings {
            lookfrom: Point3::new(13.0, 2.0, 3.0),
            lookat: Point3::zero(),
            ..settings(20, 1)
        })
        .expect("settings are valid");

        for axis in [cam.u, cam.v, cam.w] {
            assert!((axis.length() - 1.0).abs() < 1e-12);
        }
        assert!(cam.u.dot(cam.v).abs() < 1e-12);
        assert!(cam.v.dot(cam.w).abs() < 1e-12);
        assert!(cam.u.dot(cam.w).abs() < 1e-12);
    }

    #[test]
    fn single_sample_rays_go_through_pixel_centers() {
        let cam = Camera::new(settings(20, 1)).expect("settings are valid");
        let mut rng = StdRng::seed_from_u64(0);

        let r = cam.get_ray(0, 0, &mut rng);
        assert_eq!(r.orig, Point3::zero());
        assert_eq!(r.dir, cam.pixel00_loc);
        assert_eq!(cam.get_ray(0, 0, &mut rng), r);
    }

    #[test]
    fn jittered_rays_stay_within_the_pixel_footprint() {
        let cam = Camera::new(settings(20, 16)).expect("settings are valid");
        let mut rng = StdRng::seed_from_u64(1);
        let center = cam.pixel00_loc + 5.0 * cam.pixel_delta_u + 3.0 * cam.pixel_delta_v;

        for _ in 0..200 {
            let r = cam.get_ray(5, 3, &mut rng);
            let d = r.dir - center;
            assert!(d.dot(cam.u).abs() <= 0.5 * cam.pixel_delta_u.length() + 1e-12);
            assert!(d.dot(cam.v).abs() <= 0.5 * cam.pixel_delta_v.length() + 1e-12);
        }
    }

    #[test]
    fn defocus_origins_stay_on_the_lens_disk() {
        let cam = Camera::new(RenderSettings {
            defocus_angle: 10.0,
            focus_dist: 3.0,
            ..settings(20, 4)
        })
        .expect("settings are valid");
        let radius = 3.0 * degrees_to_radians(5.0).tan();
        let mut rng = StdRng::seed_from_u64(2);

        let mut moved = false;
        for _ in 0..200 {
            let r = cam.get_ray(10, 5, &mut rng);
            let offset = r.orig - cam.center;
            assert!(offset.length() < radius + 1e-12);
            assert!(offset.dot(cam.w).abs() < 1e-12);
            moved |= offset.length() > 0.0;
        }
        assert!(moved);
    }

    #[test]
    fn zero_depth_is_black_even_for_sky() {
        let cam = Camera::new(settings(10, 1)).expect("settings are valid");
        let world = HittableList::new();
        let up = Ray::new(Point3::zero(), Vec3::new(0.0, 1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(cam.ray_color(&up, 0, &world, &mut rng), Color::zero());
        assert_eq!(cam.ray_color(&up, 1, &world, &mut rng), Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn sky_blends_white_to_blue() {
        let down = sky_color(&Ray::new(Point3::zero(), Vec3::new(0.0, -1.0, 0.0)));
        let up = sky_color(&Ray::new(Point3::zero(), Vec3::new(0.0, 1.0, 0.0)));
        assert_eq!(down, Color::new(1.0, 1.0, 1.0));
        assert_eq!(up, Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn absorbed_and_exhausted_paths_are_black() {
        let cam = Camera::new(settings(10, 1)).expect("settings are valid");
        let mat: Arc<dyn Material> = Arc::new(Lambertian::new(Color::splat(0.5)));
        let world = HittableList::new_with(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -2.0), 1.0, mat)));
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(4);

        assert_eq!(cam.ray_color(&r, 1, &world, &mut rng), Color::zero());
        let lit = cam.ray_color(&r, 5, &world, &mut rng);
        assert!(lit.x >= 0.0 && lit.x <= 0.5);
    }

    #[test]
    fn render_fills_every_row_once() {
        let cam = Camera::new(RenderSettings { worker_count: 3, ..settings(16, 2) })
            .expect("settings are valid");
        let pixels = cam.render(&HittableList::new()).expect("render succeeds");

        assert_eq!(pixels.len(), 16 * 8 * 3);
        // Empty scene: every pixel is sky, never black.
        assert!(pixels.chunks_exact(3).all(|p| p[2] == 255));
    }

    #[test]
    fn seeded_renders_do_not_depend_on_worker_count() {
        let mat: Arc<dyn Material> = Arc::new(Metal::new(Color::splat(0.8), 0.3));
        let world = HittableList::new_with(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, mat)));

        let one = Camera::new(RenderSettings { worker_count: 1, ..settings(24, 4) })
            .expect("settings are valid")
            .render(&world)
            .expect("render succeeds");
        let many = Camera::new(RenderSettings { worker_count: 5, ..settings(24, 4) })
            .expect("settings are valid")
            .render(&world)
            .expect("render succeeds");
        assert_eq!(one, many);
    }
}
