use crate::alg;
use crate::entity;

/// Collision channel bits
pub mod channel {
    pub const WORLD_STATIC:  u32 = 1 << 0;
    pub const WORLD_DYNAMIC: u32 = 1 << 1;
    pub const PHYSICS_BODY:  u32 = 1 << 2;
    pub const ALL:           u32 = !0;
}

/// Which geometry a sweep responds to
#[derive(Clone, Debug)]
pub struct Filter {
    pub object_type: u32,
    pub responds_to: u32,
    pub ignore: Vec<entity::Handle>,
}

impl Filter {
    pub fn new(object_type: u32, responds_to: u32) -> Filter {
        Filter {
            object_type,
            responds_to,
            ignore: Vec::new(),
        }
    }

    pub fn ignoring(mut self, entity: entity::Handle) -> Filter {
        self.ignore.push(entity);
        self
    }

    pub fn accepts(&self, channel: u32, owner: Option<entity::Handle>) -> bool {
        if self.responds_to & channel == 0 {
            return false;
        }

        match owner {
            Some(owner) => !self.ignore.contains(&owner),
            None => true,
        }
    }
}

impl Default for Filter {
    fn default() -> Filter {
        Filter::new(channel::WORLD_DYNAMIC, channel::ALL)
    }
}

/// Blocking contact reported by a sweep
#[derive(Clone, Copy, Debug)]
pub struct Hit {
    /// Shape center at the moment of impact
    pub location: alg::Vec3,
    /// Contact point on the blocking surface
    pub impact_point: alg::Vec3,
    pub normal: alg::Vec3,
    /// Only meaningful when `start_penetrating` is set
    pub penetration_depth: f32,
    pub start_penetrating: bool,
    /// Fraction of the sweep travelled before the impact
    pub time: f32,
    pub entity: Option<entity::Handle>,
}

/// Geometry query service consumed by the chain collision pass
pub trait Query {
    /// Sweep a sphere from `start` to `end` and return every blocking hit,
    /// nearest first
    fn sweep_sphere(
        &self,
        start: alg::Vec3,
        end: alg::Vec3,
        radius: f32,
        filter: &Filter,
    ) -> Vec<Hit>;
}

struct Boundary {
    plane: alg::Plane,
    channel: u32,
    owner: Option<entity::Handle>,
}

/// Static world made of solid half-spaces
pub struct Planes {
    boundaries: Vec<Boundary>,
}

impl Planes {
    pub fn new(hint: usize) -> Planes {
        Planes {
            boundaries: Vec::with_capacity(hint),
        }
    }

    pub fn add(&mut self, plane: alg::Plane) {
        self.add_owned(plane, channel::WORLD_STATIC, None);
    }

    pub fn add_owned(
        &mut self,
        plane: alg::Plane,
        channel: u32,
        owner: Option<entity::Handle>,
    ) {
        self.boundaries.push(
            Boundary {
                plane,
                channel,
                owner,
            }
        );
    }

    pub fn count(&self) -> usize {
        self.boundaries.len()
    }

    fn sweep_boundary(
        boundary: &Boundary,
        start: alg::Vec3,
        end: alg::Vec3,
        radius: f32,
    ) -> Option<Hit> {
        let plane = boundary.plane;
        let start_distance = plane.distance(start);

        // Sphere already overlaps the solid side
        if start_distance < radius {
            return Some(
                Hit {
                    location: start,
                    impact_point: start - plane.normal * start_distance,
                    normal: plane.normal,
                    penetration_depth: radius - start_distance,
                    start_penetrating: true,
                    time: 0.,
                    entity: boundary.owner,
                }
            );
        }

        let end_distance = plane.distance(end);

        if end_distance >= radius {
            return None;
        }

        let time = (start_distance - radius) / (start_distance - end_distance);
        let location = start.lerp(end, time);

        Some(
            Hit {
                location,
                impact_point: location - plane.normal * radius,
                normal: plane.normal,
                penetration_depth: 0.,
                start_penetrating: false,
                time,
                entity: boundary.owner,
            }
        )
    }
}

impl Query for Planes {
    fn sweep_sphere(
        &self,
        start: alg::Vec3,
        end: alg::Vec3,
        radius: f32,
        filter: &Filter,
    ) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self.boundaries.iter()
            .filter(|boundary| filter.accepts(boundary.channel, boundary.owner))
            .filter_map(|boundary| {
                Planes::sweep_boundary(boundary, start, end, radius)
            })
            .collect();

        hits.sort_by(|a, b| {
            a.time.partial_cmp(&b.time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        hits
    }
}
