use crate::alg;
use crate::entity;
use crate::world;

/// Whether the chain sweeps against the world at all
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CollisionMode {
    None,
    Query,
}

/// Where an end of the chain is pinned
#[derive(Clone, PartialEq, Debug)]
pub struct Attachment {
    pub enabled: bool,
    /// Falls back to the owner when unset
    pub target: Option<entity::Handle>,
    pub socket: Option<String>,
}

impl Attachment {
    pub fn new(enabled: bool) -> Attachment {
        Attachment {
            enabled,
            target: None,
            socket: None,
        }
    }

    pub fn to(target: entity::Handle, socket: Option<&str>) -> Attachment {
        Attachment {
            enabled: true,
            target: Some(target),
            socket: socket.map(|socket| socket.to_string()),
        }
    }
}

/// Entity driven by an end of the chain after every step
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Follower {
    pub target: entity::Handle,
    /// Also copy the point's orientation
    pub rotate: bool,
}

impl Follower {
    pub fn new(target: entity::Handle) -> Follower {
        Follower {
            target,
            rotate: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    /// Number of simulated points
    pub segments: i32,
    /// Slack ratio: rest length multiplier over the anchor span
    pub chain_length: f32,
    /// Per-instance mesh scale
    pub scale: alg::Vec3,
    /// Degrees of twist per point index (pitch, yaw, roll)
    pub additive_rotation: alg::Vec3,

    /// `end_point` is relative to the owner (or end target)
    pub is_local: bool,
    pub end_point: alg::Vec3,

    pub attach_start: Attachment,
    pub attach_end: Attachment,
    pub start_follower: Option<Follower>,
    pub end_follower: Option<Follower>,

    /// Multiplier on world gravity
    pub gravity: f32,
    /// Range 0 - 1; fraction of inferred velocity removed per step
    pub damping: f32,
    /// Constraint relaxation passes per step
    pub stiffness: i32,
    /// Range 0 - 1; tangential damping on contact
    pub friction: f32,

    pub collision: CollisionMode,
    pub chain_width: f32,
    pub filter: world::Filter,

    pub self_collision: bool,
    pub self_collision_width: f32,
    pub self_collision_threshold: f32,

    /// Frames skipped between simulation steps
    pub skip: i32,
    pub draw_debug: bool,

    pub sound_threshold: f32,
    /// Sound events fire on frames divisible by this
    pub sound_skip: i32,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            segments: 10,
            chain_length: 1.5,
            scale: alg::Vec3::one(),
            additive_rotation: alg::Vec3::new(0., 0., 45.),

            is_local: true,
            end_point: alg::Vec3::new(100., 0., 0.),

            attach_start: Attachment::new(true),
            attach_end: Attachment::new(true),
            start_follower: None,
            end_follower: None,

            gravity: 0.98,
            damping: 0.,
            stiffness: 10,
            friction: 0.3,

            collision: CollisionMode::Query,
            chain_width: 20.,
            filter: world::Filter::default(),

            self_collision: false,
            self_collision_width: 20.,
            self_collision_threshold: 0.05,

            skip: 0,
            draw_debug: false,

            sound_threshold: 1.,
            sound_skip: 1,
        }
    }
}

impl Settings {
    /// Simulation runs on frames divisible by this; `None` disables stepping
    pub fn step_interval(&self) -> Option<u64> {
        let interval = i64::from(self.skip) + 1;

        if interval > 0 {
            Some(interval as u64)
        } else {
            None
        }
    }

    pub fn sound_interval(&self) -> u64 {
        self.sound_skip.max(1) as u64
    }

    pub fn passes(&self) -> usize {
        self.stiffness.max(1) as usize
    }
}
