use crate::alg;

/// Single simulated mass along a chain
#[derive(Clone, Copy, Debug)]
pub struct Point {
    pub position: alg::Vec3,
    /// Position at the previous step; velocity is inferred from it
    pub previous: alg::Vec3,
    /// Last integrated displacement, used for sweeps and sound
    pub velocity: alg::Vec3,
    /// Pending impulse, consumed by the next constraint pass
    pub force: alg::Vec3,
    pub free: bool,

    pub orientation: alg::Rotator,
    pub direction: alg::Vec3,

    /// Normalized position along the chain, 0 at start and 1 at end
    pub time: f32,
    pub index: usize,
}

impl Point {
    pub fn new(index: usize, time: f32, position: alg::Vec3) -> Point {
        Point {
            position,
            previous: position,
            velocity: alg::Vec3::zero(),
            force: alg::Vec3::zero(),
            free: true,

            orientation: alg::Rotator::default(),
            direction: alg::Vec3::zero(),

            time,
            index,
        }
    }

    /// Moves the point without introducing velocity
    pub fn place(&mut self, position: alg::Vec3) {
        self.position = position;
        self.previous = position;
    }
}
