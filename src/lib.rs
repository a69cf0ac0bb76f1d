//! Offline Monte Carlo path tracer for scenes made of spheres.
//!
//! Build a [`HittableList`] of [`Sphere`]s with shared materials, describe the
//! shot with [`RenderSettings`], and call [`Camera::render`] to get an RGB
//! byte buffer. [`ppm::write_ppm`] turns that buffer into a plain PPM image.

pub mod camera;
pub mod color;
pub mod error;
pub mod hittable;
pub mod hittable_list;
pub mod interval;
pub mod material;
pub mod ppm;
pub mod ray;
pub mod rtweekend;
pub mod settings;
pub mod sphere;
pub mod vec3;

pub use crate::rtweekend::*;
