//! Verlet rope simulation rendered as a string of mesh instances.
//!
//! Each step pins the attached ends, integrates gravity, relaxes segment
//! lengths, resolves collisions, then mirrors the points into the render
//! sink and onto any follower entities.

use log::{debug, trace, warn};

use crate::alg;
use crate::entity;
use crate::render;
use crate::graphics;
use crate::debug as debug_draw;
use crate::spline;
use crate::world;
use crate::components;

use crate::components::transform;

pub mod settings;
mod point;
mod solver;
mod collision;
mod attach;

pub use self::settings::{Attachment, CollisionMode, Follower, Settings};
pub use self::point::Point;

// Follow weights below this pin the point to the spline
const FOLLOW_THRESHOLD: f32 = 0.5;

// Gravity is authored in world units per second squared
const GRAVITY_SCALE: f32 = 1000.;

const DEBUG_AXIS_LENGTH: f32 = 5.;
const DEBUG_SPHERE_SEGMENTS: u32 = 4;

/// Notifications queued for the host during `update()`
#[derive(Clone, Debug)]
pub enum Event {
    Collided {
        owner: entity::Handle,
        point: usize,
        hits: Vec<world::Hit>,
    },

    /// Summed point velocity crossed the sound threshold
    SoundReached {
        owner: entity::Handle,
        velocity: alg::Vec3,
    },
}

// Spline the chain is laid along, and the curve gating point freedom
struct Follow {
    spline: Box<dyn spline::Spline>,
    curve: spline::Curve,
}

impl Follow {
    fn gate(&self, points: &mut [Point]) {
        for point in points {
            point.free = self.curve.eval(point.time) >= FOLLOW_THRESHOLD;
        }
    }
}

struct Instance {
    owner: entity::Handle,
    settings: Settings,
    follow: Option<Follow>,

    points: Vec<Point>,
    rest: f32,
    frame: u64,
}

impl Instance {
    fn new(
        owner: entity::Handle,
        settings: Settings,
        follow: Option<Follow>,
        transforms: &transform::Manager,
        sink: &mut dyn render::Sink,
    ) -> Instance {
        let mut instance = Instance {
            owner,
            settings,
            follow,
            points: Vec::new(),
            rest: 0.,
            frame: 0,
        };

        instance.validate(transforms);
        instance.build(transforms);

        sink.clear_instances(owner);

        if sink.instance_count(owner) == 0 {
            for point in &instance.points {
                sink.add_instance(owner, instance.transform(point));
            }
        }

        debug!(
            "Chain {} initialized with {} points, rest length {}",
            owner,
            instance.points.len(),
            instance.rest,
        );

        instance
    }

    fn validate(&self, transforms: &transform::Manager) {
        let settings = &self.settings;

        if settings.segments < 2 {
            warn!(
                "Chain {} has {} segments; at least 2 are required",
                self.owner,
                settings.segments,
            );
        }

        if settings.step_interval().is_none() {
            warn!(
                "Chain {} has a skip of {}; it will never simulate",
                self.owner,
                settings.skip,
            );
        }

        let targets = [
            settings.attach_start.target,
            settings.attach_end.target,
            settings.start_follower.map(|follower| follower.target),
            settings.end_follower.map(|follower| follower.target),
        ];

        for target in targets.iter().flatten() {
            if !transforms.check(*target) {
                warn!(
                    "Chain {} references entity {} without a transform",
                    self.owner,
                    target,
                );
            }
        }
    }

    fn build(&mut self, transforms: &transform::Manager) {
        self.points.clear();
        self.rest = 0.;

        if self.settings.segments < 2 {
            return;
        }

        let count = self.settings.segments as usize;
        let last = (count - 1) as f32;

        match self.follow {
            Some(ref follow) => {
                let length = follow.spline.length();
                self.rest = length / last * self.settings.chain_length;

                for i in 0..count {
                    let position = follow.spline
                        .location_at_distance(i as f32 * self.rest);

                    self.points.push(Point::new(i, i as f32 / last, position));
                }

                follow.gate(&mut self.points);
            }

            None => {
                let start = attach::origin(self.owner, transforms);
                let end = attach::end_point(self.owner, &self.settings, transforms);
                let span = end - start;

                self.rest = span.mag() / last * self.settings.chain_length;

                for i in 0..count {
                    let time = i as f32 / last;
                    self.points.push(Point::new(i, time, start + span * time));
                }
            }
        }

        for i in 0..count {
            solver::orient(&mut self.points, i, self.settings.additive_rotation);
        }
    }

    #[inline]
    fn transform(&self, point: &Point) -> alg::Transform {
        alg::Transform::new(
            point.position,
            point.orientation.to_quat(),
            self.settings.scale,
        )
    }

    fn update(
        &mut self,
        gravity: alg::Vec3,
        transforms: &mut transform::Manager,
        world: Option<&dyn world::Query>,
        sink: &mut dyn render::Sink,
        events: &mut Vec<Event>,
    ) {
        self.frame = self.frame.wrapping_add(1);

        if let Some(ref follow) = self.follow {
            follow.gate(&mut self.points);
        }

        if self.points.len() < 2 {
            return;
        }

        match self.settings.step_interval() {
            Some(interval) if self.frame % interval == 0 => {
                self.step(gravity, transforms, world, sink, events);
            }

            _ => (),
        }
    }

    fn step(
        &mut self,
        gravity: alg::Vec3,
        transforms: &mut transform::Manager,
        world: Option<&dyn world::Query>,
        sink: &mut dyn render::Sink,
        events: &mut Vec<Event>,
    ) {
        let last = self.points.len() - 1;

        // Spline freedom replaces end attachment
        if self.follow.is_none() {
            attach::bind(
                &mut self.points[0],
                self.owner,
                &self.settings.attach_start,
                false,
                &self.settings,
                transforms,
            );

            attach::bind(
                &mut self.points[last],
                self.owner,
                &self.settings.attach_end,
                true,
                &self.settings,
                transforms,
            );
        }

        solver::integrate(
            &mut self.points,
            gravity * self.settings.gravity / GRAVITY_SCALE,
            self.settings.damping,
        );

        solver::solve(
            &mut self.points,
            self.rest,
            self.settings.passes(),
            self.settings.additive_rotation,
        );

        if self.settings.collision == CollisionMode::Query {
            if let Some(world) = world {
                collision::resolve(
                    self.owner,
                    &mut self.points,
                    &self.settings,
                    world,
                    self.frame,
                    events,
                );
            }
        }

        for (i, point) in self.points.iter().enumerate() {
            sink.update_instance(self.owner, i, self.transform(point));
        }

        attach::write_back(&self.points, &self.settings, transforms);

        trace!("Chain {} stepped on frame {}", self.owner, self.frame);
    }

    fn draw_debug(&self, handler: &mut debug_draw::Handler) {
        if !self.settings.draw_debug || self.points.len() < 2 {
            return;
        }

        let width = self.settings.chain_width;
        let last = self.points.len() - 1;

        for (i, point) in self.points.iter().enumerate() {
            let position = point.position;

            if i == 0 || i == last {
                handler.add_sphere(
                    position,
                    width * 2.,
                    DEBUG_SPHERE_SEGMENTS,
                    graphics::Color::green(),
                );

                continue;
            }

            handler.add_sphere(
                position,
                width,
                DEBUG_SPHERE_SEGMENTS,
                graphics::Color::red(),
            );

            let fwd = point.direction.cross(alg::Vec3::fwd());
            let right = point.direction.cross(fwd);

            let axes = [
                (point.direction, graphics::Color::red()),
                (fwd, graphics::Color::green()),
                (right, graphics::Color::blue()),
            ];

            for (axis, color) in axes.iter() {
                handler.add_line(
                    alg::Line::new(position, position + *axis * DEBUG_AXIS_LENGTH),
                    *color,
                );
            }
        }
    }
}

// Data layout assumes chains are sparse among entities
pub struct Manager {
    instances: Vec<Option<Instance>>,
    gravity: alg::Vec3,
    events: Vec<Event>,
}

impl components::Component for Manager {
    fn register(&mut self, entity: entity::Handle) {
        let i = entity.get_index() as usize;

        // Resize array to fit new entity
        while i >= self.instances.len() {
            self.instances.push(None);
        }
    }

    fn count(&self) -> usize {
        self.instances.iter()
            .filter(|instance| instance.is_some())
            .count()
    }
}

impl Manager {
    pub fn new(hint: usize) -> Manager {
        Manager {
            instances: Vec::with_capacity(hint),
            gravity: alg::Vec3::new(0., 0., -980.),
            events: Vec::new(),
        }
    }

    fn instance(&self, entity: entity::Handle) -> Option<&Instance> {
        self.instances.get(entity.get_index() as usize)
            .and_then(|slot| slot.as_ref())
    }

    fn instance_mut(&mut self, entity: entity::Handle) -> Option<&mut Instance> {
        self.instances.get_mut(entity.get_index() as usize)
            .and_then(|slot| slot.as_mut())
    }

    fn set_instance(&mut self, entity: entity::Handle, instance: Instance) {
        if let Some(slot) = self.instances.get_mut(entity.get_index() as usize) {
            *slot = Some(instance);
        }
    }

    // Nothing is built or sent to the sink for unregistered entities
    fn registered(&self, entity: entity::Handle) -> bool {
        let registered = (entity.get_index() as usize) < self.instances.len();

        if !registered {
            warn!("Chain {} is not registered; ignoring init", entity);
        }

        registered
    }

    /// Lay a chain in a straight line from the entity to its end point
    pub fn init_instance(
        &mut self,
        entity: entity::Handle,
        settings: Settings,
        transforms: &transform::Manager,
        sink: &mut dyn render::Sink,
    ) {
        if !self.registered(entity) {
            return;
        }

        let instance = Instance::new(entity, settings, None, transforms, sink);
        self.set_instance(entity, instance);
    }

    /// Lay a chain along a spline; `curve` decides which points follow it
    pub fn init_spline(
        &mut self,
        entity: entity::Handle,
        settings: Settings,
        spline: Box<dyn spline::Spline>,
        curve: spline::Curve,
        transforms: &transform::Manager,
        sink: &mut dyn render::Sink,
    ) {
        if !self.registered(entity) {
            return;
        }

        let follow = Follow { spline, curve };
        let instance = Instance::new(entity, settings, Some(follow), transforms, sink);
        self.set_instance(entity, instance);
    }

    /// Rebuild every point from the current settings
    pub fn reinit(
        &mut self,
        entity: entity::Handle,
        transforms: &transform::Manager,
        sink: &mut dyn render::Sink,
    ) {
        let i = entity.get_index() as usize;

        let previous = match self.instances.get_mut(i).and_then(Option::take) {
            Some(instance) => instance,
            None => return,
        };

        let instance = Instance::new(
            entity,
            previous.settings,
            previous.follow,
            transforms,
            sink,
        );

        self.set_instance(entity, instance);
    }

    pub fn settings(&self, entity: entity::Handle) -> Option<&Settings> {
        self.instance(entity).map(|instance| &instance.settings)
    }

    /// Replace the settings and rebuild the chain
    pub fn set_settings(
        &mut self,
        entity: entity::Handle,
        settings: Settings,
        transforms: &transform::Manager,
        sink: &mut dyn render::Sink,
    ) {
        if let Some(instance) = self.instance_mut(entity) {
            instance.settings = settings;
        } else {
            return;
        }

        self.reinit(entity, transforms, sink);
    }

    /// Replace the follow curve of a spline chain and rebuild it
    pub fn set_follow_curve(
        &mut self,
        entity: entity::Handle,
        curve: spline::Curve,
        transforms: &transform::Manager,
        sink: &mut dyn render::Sink,
    ) {
        match self.instance_mut(entity) {
            Some(instance) => match instance.follow {
                Some(ref mut follow) => {
                    if follow.curve == curve {
                        return;
                    }

                    follow.curve = curve;
                }

                None => {
                    warn!("Chain {} does not follow a spline", entity);
                    return;
                }
            },

            None => return,
        }

        self.reinit(entity, transforms, sink);
    }

    pub fn unregister(&mut self, entity: entity::Handle, sink: &mut dyn render::Sink) {
        if let Some(slot) = self.instances.get_mut(entity.get_index() as usize) {
            if slot.take().is_some() {
                sink.clear_instances(entity);
                debug!("Chain {} unregistered", entity);
            }
        }
    }

    /// Add an impulse to every point within `radius` of `position`. \
    /// Returns the indices of the affected points.
    pub fn apply_force(
        &mut self,
        entity: entity::Handle,
        position: alg::Vec3,
        radius: f32,
        force: alg::Vec3,
    ) -> Vec<usize> {
        let instance = match self.instance_mut(entity) {
            Some(instance) => instance,
            None => return Vec::new(),
        };

        instance.points.iter_mut()
            .filter(|point| point.position.dist(position) <= radius)
            .map(|point| {
                point.force += force;
                point.index
            })
            .collect()
    }

    /// Zero when the chain or the point does not exist
    pub fn get_point(&self, entity: entity::Handle, index: usize) -> alg::Vec3 {
        self.instance(entity)
            .and_then(|instance| instance.points.get(index))
            .map(|point| point.position)
            .unwrap_or_else(alg::Vec3::zero)
    }

    pub fn get_points(&self, entity: entity::Handle) -> Vec<Point> {
        self.instance(entity)
            .map(|instance| instance.points.clone())
            .unwrap_or_default()
    }

    pub fn attach_start_to(
        &mut self,
        entity: entity::Handle,
        target: entity::Handle,
        socket: Option<&str>,
    ) {
        if let Some(instance) = self.instance_mut(entity) {
            instance.settings.attach_start = Attachment::to(target, socket);
        }
    }

    pub fn attach_end_to(
        &mut self,
        entity: entity::Handle,
        target: entity::Handle,
        socket: Option<&str>,
    ) {
        if let Some(instance) = self.instance_mut(entity) {
            instance.settings.attach_end = Attachment::to(target, socket);
        }
    }

    pub fn set_gravity(&mut self, gravity: alg::Vec3) {
        self.gravity = gravity;
    }

    /// Advance every chain by one frame
    pub fn update(
        &mut self,
        transforms: &mut transform::Manager,
        world: Option<&dyn world::Query>,
        sink: &mut dyn render::Sink,
    ) {
        let gravity = self.gravity;
        let events = &mut self.events;

        for slot in self.instances.iter_mut() {
            if let Some(ref mut instance) = *slot {
                instance.update(gravity, transforms, world, sink, events);
            }
        }
    }

    /// Take every event queued since the last call
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::replace(&mut self.events, Vec::new())
    }

    pub fn draw_debug(
        &self,
        entity: entity::Handle,
        handler: &mut debug_draw::Handler,
    ) {
        if let Some(instance) = self.instance(entity) {
            instance.draw_debug(handler);
        }
    }

    pub fn draw_all_debug(&self, handler: &mut debug_draw::Handler) {
        for instance in self.instances.iter().flatten() {
            instance.draw_debug(handler);
        }
    }
}
