use anyhow::Context;
use log::info;
use std::io::{self, BufWriter};
use weekend_tracer::ppm::write_ppm;
use weekend_tracer::*;

fn build_world() -> HittableList {
    let material_ground: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let material_matte: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let material_glass: Arc<dyn Material> = Arc::new(Dielectric::new(1.5));
    let material_gold: Arc<dyn Material> = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, material_ground)));
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -1.0), 0.5, material_matte)));
    // Hollow glass: outer shell plus an inward-facing inner wall.
    world.add(Arc::new(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, material_glass.clone())));
    world.add(Arc::new(Sphere::new(Point3::new(-1.0, 0.0, -1.0), -0.4, material_glass)));
    world.add(Arc::new(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, material_gold)));
    world
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let world = build_world();
    info!("scene has {} spheres", world.len());

    let lookfrom = Point3::new(-2.0, 2.0, 1.0);
    let lookat = Point3::new(0.0, 0.0, -1.0);
    let settings = RenderSettings {
        aspect_ratio: 16.0 / 9.0,
        image_width: 400,
        samples_per_pixel: 100,
        max_depth: 50,
        vfov: 20.0,
        lookfrom,
        lookat,
        vup: Vec3::new(0.0, 1.0, 0.0),
        defocus_angle: 10.0,
        focus_dist: (lookfrom - lookat).length(),
        ..Default::default()
    };

    let cam = Camera::new(settings).context("camera setup failed")?;
    let pixels = cam.render(&world).context("render failed")?;

    let mut stdout = BufWriter::new(io::stdout().lock());
    write_ppm(&mut stdout, cam.image_width(), cam.image_height(), &pixels)
        .context("failed to write image to stdout")?;

    Ok(())
}
