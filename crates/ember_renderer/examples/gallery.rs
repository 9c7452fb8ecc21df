//! Open-air gallery: spheres, boxes, and a triangle pyramid with
//! depth of field. Camera and quality come from a settings record.

use std::sync::Arc;

use ember_renderer::{
    render_parallel, Color, Cuboid, HittableList, Lambertian, Material, RenderSettings, Sphere,
    Texture, Triangle, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = RenderSettings::from_json(
        r#"{
            "aspect_ratio": 1.7777778,
            "image_width": 640,
            "samples_per_pixel": 200,
            "max_depth": 50,
            "vfov": 30.0,
            "lookfrom": [2.0, 2.0, 2.0],
            "lookat": [0.0, 0.0, -3.0],
            "vup": [0.0, 1.0, 0.0],
            "defocus_angle": 5.0,
            "focus_dist": 4.0,
            "background": [0.7, 0.8, 1.0]
        }"#,
    )?;
    let (camera, config) = settings.build()?;

    // Materials
    let checker_floor = Arc::new(Material::Lambertian(Lambertian::textured(Arc::new(
        Texture::checker(
            0.5,
            Color::new(0.55, 0.27, 0.07),
            Color::new(0.35, 0.16, 0.07),
        ),
    ))));
    let suede_green = Arc::new(Material::suede(Color::new(0.2, 0.7, 0.3), 0.2));
    let metal = Arc::new(Material::metal(Color::new(0.7, 0.7, 0.9), 0.1));
    let glass = Arc::new(Material::dielectric(1.5));
    let fog = Arc::new(Material::isotropic(Color::new(0.8, 0.8, 0.8)));

    let mut world = HittableList::new();

    // Floor slab
    world.add(Arc::new(Cuboid::new(
        Vec3::new(-4.0, -1.1, -6.0),
        Vec3::new(4.0, -1.0, 2.0),
        checker_floor,
    )));

    // Spheres
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -0.25, -3.0),
        0.75,
        glass,
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(2.0, -0.5, -2.0),
        0.5,
        suede_green.clone(),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-2.0, -0.7, -2.5),
        0.3,
        metal.clone(),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-0.8, -0.6, -1.5),
        0.4,
        fog,
    )));

    // Boxes
    world.add(Arc::new(Cuboid::new(
        Vec3::new(-1.5, -1.0, -4.0),
        Vec3::new(-0.5, 0.0, -3.0),
        suede_green,
    )));

    // Triangle pyramid
    let a = Vec3::new(0.8, -1.0, -2.2);
    let b = Vec3::new(1.8, -1.0, -1.7);
    let c = Vec3::new(1.3, -1.0, -2.7);
    let apex = Vec3::new(1.3, -0.2, -2.2);
    world.add(Arc::new(Triangle::new(a, b, apex, metal.clone())));
    world.add(Arc::new(Triangle::new(b, c, apex, metal.clone())));
    world.add(Arc::new(Triangle::new(c, a, apex, metal)));

    // Lit by the sky alone; no importance-sampled lights
    let image = render_parallel(&camera, &world, None, &config, 0);
    image.save_png("gallery.png")?;
    println!("Saved gallery.png");

    Ok(())
}
