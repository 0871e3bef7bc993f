//! A rope strung between two posts sags onto the floor.

use nmg_chain::alg;
use nmg_chain::config;
use nmg_chain::entity;
use nmg_chain::render;
use nmg_chain::world;
use nmg_chain::chain;
use nmg_chain::components::{self, Component};

const CONFIG: &str = "
[rope]
segments = 16
chain_length = 1.4
end_point = 800, 0, 0
damping = 0.02
friction = 0.5
sound_threshold = 40
sound_skip = 30
";

const FRAMES: usize = 240;

fn main() {
    let ini = match config::parse(CONFIG) {
        Ok(ini) => ini,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };

    let settings = match config::chain_settings(&ini, "rope") {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };

    let mut entities = entity::Manager::new(2);
    let mut container = components::Container::new(2);
    let mut instances = render::Instances::new(1);

    let post = entities.add();
    container.transforms.register(post);
    container.transforms.set_position(post, alg::Vec3::new(0., 0., 200.));

    let mut floor = world::Planes::new(1);
    floor.add(alg::Plane::from_point(alg::Vec3::up(), alg::Vec3::zero()));
    let query: &dyn world::Query = &floor;

    container.chains.register(post);
    container.chains.init_instance(
        post,
        settings,
        &container.transforms,
        &mut instances,
    );

    let mut collisions = 0;
    let mut sounds = 0;

    for frame in 1..=FRAMES {
        container.chains.update(
            &mut container.transforms,
            Some(query),
            &mut instances,
        );

        for event in container.chains.drain_events() {
            match event {
                chain::Event::Collided { .. } => collisions += 1,
                chain::Event::SoundReached { .. } => sounds += 1,
            }
        }

        if frame % 30 == 0 {
            let points = container.chains.get_points(post);
            let lowest = points.iter()
                .map(|point| point.position.z)
                .fold(std::f32::MAX, f32::min);

            println!(
                "Frame {:>3}: lowest point {:>8.2}, {} instances dirty: {}",
                frame,
                lowest,
                instances.get(post).len(),
                instances.take_dirty(),
            );
        }
    }

    println!("{} collisions, {} sound events", collisions, sounds);
}
