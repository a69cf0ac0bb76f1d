use crate::rtweekend::*;

/// Everything the camera needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Width over height of the output image.
    pub aspect_ratio: f64,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    /// Maximum number of bounces per camera ray.
    pub max_depth: u32,
    /// Vertical field of view in degrees.
    pub vfov: f64,
    pub lookfrom: Point3,
    pub lookat: Point3,
    /// Camera-relative up direction.
    pub vup: Vec3,
    /// Cone angle in degrees of rays through each pixel; zero disables depth of field.
    pub defocus_angle: f64,
    /// Distance from `lookfrom` to the plane in perfect focus.
    pub focus_dist: f64,
    /// Upper bound on render threads.
    pub worker_count: usize,
    /// Base seed for the per-row random streams. `None` draws a fresh one per render.
    pub seed: Option<u64>,
    /// Print scanline progress on stderr.
    pub show_progress: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            image_width: 400,
            samples_per_pixel: 100,
            max_depth: 50,
            vfov: 90.0,
            lookfrom: Point3::zero(),
            lookat: Point3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
            worker_count: rayon::current_num_threads(),
            seed: None,
            show_progress: true,
        }
    }
}

impl RenderSettings {
    /// Output height in pixels, never less than one.
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let invalid = |msg: String| -> Result<(), RenderError> {
            Err(RenderError::InvalidSettings(msg))
        };

        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return invalid(format!("aspect ratio must be positive, got {}", self.aspect_ratio));
        }
        if self.image_width == 0 {
            return invalid("image width must be at least 1".to_string());
        }
        if self.samples_per_pixel == 0 {
            return invalid("samples per pixel must be at least 1".to_string());
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return invalid(format!("vertical field of view must be in (0, 180), got {}", self.vfov));
        }
        if !(self.defocus_angle.is_finite() && self.defocus_angle >= 0.0) {
            return invalid(format!("defocus angle must be non-negative, got {}", self.defocus_angle));
        }
        if !(self.focus_dist.is_finite() && self.focus_dist > 0.0) {
            return invalid(format!("focus distance must be positive, got {}", self.focus_dist));
        }
        if self.worker_count == 0 {
            return invalid("worker count must be at least 1".to_string());
        }
        if (self.lookfrom - self.lookat).near_zero() {
            return invalid(format!("lookfrom and lookat coincide at ({})", self.lookfrom));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = RenderSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.image_height(), 225);
    }

    #[test]
    fn height_is_truncated_and_at_least_one() {
        let settings = RenderSettings {
            image_width: 10,
            aspect_ratio: 100.0,
            ..Default::default()
        };
        assert_eq!(settings.image_height(), 1);

        let settings = RenderSettings {
            image_width: 100,
            aspect_ratio: 1.5,
            ..Default::default()
        };
        assert_eq!(settings.image_height(), 66);
    }

    #[test]
    fn rejects_bad_values() {
        let cases = [
            RenderSettings { image_width: 0, ..Default::default() },
            RenderSettings { aspect_ratio: 0.0, ..Default::default() },
            RenderSettings { samples_per_pixel: 0, ..Default::default() },
            RenderSettings { vfov: 180.0, ..Default::default() },
            RenderSettings { defocus_angle: -1.0, ..Default::default() },
            RenderSettings { focus_dist: 0.0, ..Default::default() },
            RenderSettings { worker_count: 0, ..Default::default() },
            RenderSettings { lookat: Point3::zero(), ..Default::default() },
        ];
        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(RenderError::InvalidSettings(_))),
                "{settings:?} should be rejected"
            );
        }
    }

    #[test]
    fn zero_depth_is_allowed() {
        let settings = RenderSettings { max_depth: 0, ..Default::default() };
        assert!(settings.validate().is_ok());
    }
}
