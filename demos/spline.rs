//! A garland laid along a curve, released in the middle and held at the ends.

use nmg_chain::alg;
use nmg_chain::entity;
use nmg_chain::render;
use nmg_chain::spline;
use nmg_chain::chain;
use nmg_chain::components::{self, Component};

fn report(label: &str, points: &[chain::Point]) {
    let pinned = points.iter().filter(|point| !point.free).count();

    match points.get(points.len() / 2) {
        Some(middle) => println!(
            "{}: {} pinned, middle at {}",
            label,
            pinned,
            middle.position,
        ),

        None => println!("{}: empty chain", label),
    }
}

fn main() {
    let mut entities = entity::Manager::new(1);
    let mut container = components::Container::new(1);
    let mut instances = render::Instances::new(1);

    let garland = entities.add();
    container.transforms.register(garland);
    container.chains.register(garland);

    let path = spline::CatmullRom::new(
        &[
            alg::Vec3::new(0., 0., 300.),
            alg::Vec3::new(250., 150., 320.),
            alg::Vec3::new(500., 0., 300.),
            alg::Vec3::new(750., -150., 340.),
        ]
    );

    println!("Spline length {:.2}", spline::Spline::length(&path));

    let settings = chain::Settings {
        segments: 24,
        chain_length: 1.,
        collision: chain::CollisionMode::None,
        ..chain::Settings::default()
    };

    container.chains.init_spline(
        garland,
        settings,
        Box::new(path),
        spline::Curve::default(),
        &container.transforms,
        &mut instances,
    );

    report("Start", &container.chains.get_points(garland));

    for _ in 0..120 {
        container.chains.update(&mut container.transforms, None, &mut instances);
    }

    report("Released", &container.chains.get_points(garland));

    // Pin every point back onto the spline
    container.chains.set_follow_curve(
        garland,
        spline::Curve::constant(0.),
        &container.transforms,
        &mut instances,
    );

    container.chains.update(&mut container.transforms, None, &mut instances);
    report("Held", &container.chains.get_points(garland));
}
