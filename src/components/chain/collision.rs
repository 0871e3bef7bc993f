use crate::alg;
use crate::entity;
use crate::world;

use super::Event;
use super::point::Point;
use super::settings::Settings;

// Friction below this is ignored
const SMALL: f32 = 1e-4;

/// Accumulate repulsion from non-adjacent points into the point's force
fn repel(points: &mut [Point], i: usize, settings: &Settings) {
    let width = settings.self_collision_width;
    if width <= 0. {
        return;
    }

    let position = points[i].position;
    let mut force = alg::Vec3::zero();

    for (j, other) in points.iter().enumerate() {
        if (i as isize - j as isize).abs() <= 2 {
            continue;
        }

        let distance = position.dist(other.position);

        if distance < width {
            let repulsion = (position - other.position)
                * ((width - distance) / width);

            if !repulsion.is_nearly_zero(settings.self_collision_threshold) {
                force += repulsion;
            }
        }
    }

    points[i].force += force;
}

/// Push a point out of a blocking hit and strip the velocity into it
fn respond(point: &mut Point, hit: &world::Hit, friction: f32) {
    if hit.start_penetrating {
        point.position += hit.normal * hit.penetration_depth;
    } else {
        point.position = hit.location;
    }

    let delta = point.position - point.previous;
    let into = delta.dot(hit.normal);
    let tangent = delta - hit.normal * into;

    point.previous += hit.normal * into;

    if friction > SMALL {
        point.previous += tangent * friction;
    }
}

/// Sweep every free point against the world, then check the sound threshold
pub fn resolve(
    owner: entity::Handle,
    points: &mut [Point],
    settings: &Settings,
    world: &dyn world::Query,
    frame: u64,
    events: &mut Vec<Event>,
) {
    let radius = 0.5 * settings.chain_width;
    let mut velocity = alg::Vec3::zero();

    for i in 0..points.len() {
        if points[i].free {
            if settings.self_collision {
                repel(points, i, settings);
            }

            let point = &mut points[i];

            let hits = world.sweep_sphere(
                point.position,
                point.position + point.velocity,
                radius,
                &settings.filter,
            );

            if !hits.is_empty() {
                for hit in &hits {
                    respond(point, hit, settings.friction);
                }

                events.push(
                    Event::Collided {
                        owner,
                        point: i,
                        hits,
                    }
                );
            }
        }

        velocity += points[i].velocity;
    }

    if velocity.mag() > settings.sound_threshold
        && frame % settings.sound_interval() == 0
    {
        events.push(Event::SoundReached { owner, velocity });
    }
}
