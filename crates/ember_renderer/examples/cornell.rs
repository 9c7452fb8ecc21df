//! Cornell box with ceramic walls, a quad light, and a glass sphere.
//!
//! The light quad and the glass sphere are importance-sampled.

use std::sync::Arc;

use ember_renderer::{
    render_parallel, Camera, Color, Fade, Hittable, HittableList, Lambertian, Material, Metal,
    Quad, RenderConfig, Sphere, Vec3, Weathering,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Materials
    let gradient_red = Arc::new(Material::Lambertian(Lambertian::faded(
        Color::new(0.65, 0.05, 0.05),
        Fade {
            target: Color::ONE,
            span: 555.0,
        },
    )));
    let weathered_metal = Arc::new(Material::Metal(Metal::weathered(
        Color::new(0.8, 0.8, 0.9),
        0.2,
        Weathering {
            tint: Color::new(0.8, 0.8, 1.0),
            tint_frequency: 0.05,
            fuzz_span: 555.0,
        },
    )));
    let ceramic = Arc::new(Material::ceramic(Color::new(0.85, 0.82, 0.75), 0.25));
    let light = Arc::new(Material::diffuse_light(Color::new(15.0, 15.0, 15.0)));
    let glass = Arc::new(Material::dielectric(1.5));

    // Box sides
    let mut world = HittableList::new();
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 555.0, 0.0),
        gradient_red.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(0.0, 0.0, -555.0),
        Vec3::new(0.0, 555.0, 0.0),
        weathered_metal.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 555.0, 0.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 555.0),
        ceramic.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(0.0, 0.0, 555.0),
        Vec3::new(555.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, -555.0),
        ceramic.clone(),
    )));
    world.add(Arc::new(Quad::new(
        Vec3::new(555.0, 0.0, 555.0),
        Vec3::new(-555.0, 0.0, 0.0),
        Vec3::new(0.0, 555.0, 0.0),
        ceramic.clone(),
    )));

    // Overhead light
    let light_quad = Arc::new(Quad::new(
        Vec3::new(213.0, 554.0, 227.0),
        Vec3::new(130.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 105.0),
        light,
    ));
    world.add(light_quad.clone());

    // Objects
    let glass_sphere = Arc::new(Sphere::new(Vec3::new(190.0, 90.0, 190.0), 90.0, glass));
    world.add(glass_sphere.clone());
    world.add(Arc::new(Sphere::new(
        Vec3::new(370.0, 120.0, 370.0),
        60.0,
        weathered_metal.clone(),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(120.0, 60.0, 400.0),
        60.0,
        gradient_red,
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(300.0, 40.0, 100.0),
        40.0,
        ceramic,
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(450.0, 40.0, 120.0),
        40.0,
        weathered_metal,
    )));

    // Shapes worth aiming scatter rays at
    let mut lights = HittableList::new();
    lights.add(light_quad);
    lights.add(glass_sphere);

    let mut camera = Camera::new()
        .with_image(1.5, 600)
        .with_position(
            Vec3::new(800.0, 278.0, 278.0),
            Vec3::new(0.0, 278.0, 278.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0);
    camera.initialize()?;

    let config = RenderConfig {
        samples_per_pixel: 200,
        max_depth: 50,
        background: Color::ZERO,
    };

    let image = render_parallel(&camera, &world, Some(&lights as &dyn Hittable), &config, 0);
    image.save_png("cornell.png")?;
    println!("Saved cornell.png");

    Ok(())
}
