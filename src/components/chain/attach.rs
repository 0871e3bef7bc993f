use crate::alg;
use crate::entity;
use crate::components::transform;

use super::point::Point;
use super::settings::{Attachment, Follower, Settings};

/// Owners without a transform sit at the origin
pub fn origin(owner: entity::Handle, transforms: &transform::Manager) -> alg::Vec3 {
    transforms.position(owner).unwrap_or_else(alg::Vec3::zero)
}

/// World-space location of the far end of the chain. \
/// An end target that cannot be resolved yields the zero vector.
pub fn end_point(
    owner: entity::Handle,
    settings: &Settings,
    transforms: &transform::Manager,
) -> alg::Vec3 {
    let attachment = &settings.attach_end;

    match attachment.target {
        None => if settings.is_local {
            origin(owner, transforms) + settings.end_point
        } else {
            settings.end_point
        },

        Some(target) => resolve(target, attachment, true, settings, transforms)
            .unwrap_or_else(alg::Vec3::zero),
    }
}

// Socket first, then the target's own transform
fn resolve(
    target: entity::Handle,
    attachment: &Attachment,
    is_end: bool,
    settings: &Settings,
    transforms: &transform::Manager,
) -> Option<alg::Vec3> {
    if let Some(ref socket) = attachment.socket {
        if let Some(location) = transforms.socket_location(target, socket) {
            return Some(location);
        }
    }

    if is_end && settings.is_local {
        transforms.transform_position(target, settings.end_point)
    } else {
        transforms.position(target)
    }
}

/// Location an attached end is pinned to this step, if any
pub fn anchor(
    owner: entity::Handle,
    attachment: &Attachment,
    is_end: bool,
    settings: &Settings,
    transforms: &transform::Manager,
) -> Option<alg::Vec3> {
    match attachment.target {
        None if is_end => Some(
            if settings.is_local {
                origin(owner, transforms) + settings.end_point
            } else {
                settings.end_point
            }
        ),

        None => Some(origin(owner, transforms)),

        Some(target) => resolve(target, attachment, is_end, settings, transforms),
    }
}

/// Pin or release one end of the chain. \
/// An unresolvable target keeps the point pinned where it was.
pub fn bind(
    point: &mut Point,
    owner: entity::Handle,
    attachment: &Attachment,
    is_end: bool,
    settings: &Settings,
    transforms: &transform::Manager,
) {
    if !attachment.enabled {
        point.free = true;
        return;
    }

    point.free = false;

    if let Some(position) = anchor(owner, attachment, is_end, settings, transforms) {
        point.place(position);
    }
}

/// Copy end point transforms onto the follower entities
pub fn write_back(
    points: &[Point],
    settings: &Settings,
    transforms: &mut transform::Manager,
) {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return,
    };

    if let Some(follower) = settings.start_follower {
        follow(follower, first, transforms);
    }

    if let Some(follower) = settings.end_follower {
        follow(follower, last, transforms);
    }
}

fn follow(follower: Follower, point: &Point, transforms: &mut transform::Manager) {
    if !transforms.check(follower.target) {
        return;
    }

    transforms.set_position(follower.target, point.position);

    if follower.rotate {
        transforms.set_orientation(follower.target, point.orientation.to_quat());
    }
}
