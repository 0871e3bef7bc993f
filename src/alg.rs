#![allow(dead_code)] // Library

const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.;
const RAD_TO_DEG: f32 = 180. / std::f32::consts::PI;

#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[repr(C)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Vec3 {
        Vec3 { x, y, z }
    }

    /* World axes are Z-up, X-forward */

    #[inline]
    pub fn fwd() -> Vec3 {
        Vec3::new(1., 0., 0.)
    }

    #[inline]
    pub fn right() -> Vec3 {
        Vec3::new(0., 1., 0.)
    }

    #[inline]
    pub fn up() -> Vec3 {
        Vec3::new(0., 0., 1.)
    }

    #[inline]
    pub fn zero() -> Vec3 {
        Vec3::new(0., 0., 0.)
    }

    #[inline]
    pub fn one() -> Vec3 {
        Vec3::new(1., 1., 1.)
    }

    /// Zero-length input returns the zero vector
    pub fn norm(self) -> Vec3 {
        let len = self.mag();

        if len == 0. {
            return Vec3::zero();
        }

        let inverse_len = 1. / len;

        Vec3::new(
            self.x * inverse_len,
            self.y * inverse_len,
            self.z * inverse_len,
        )
    }

    pub fn mag_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn mag(self) -> f32 {
        self.mag_squared().sqrt()
    }

    pub fn dist(self, other: Vec3) -> f32 {
        (other - self).mag()
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Component-wise product
    pub fn scale(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    pub fn lerp(self, other: Vec3, t: f32) -> Vec3 {
        self + (other - self) * t
    }

    pub fn is_nearly_zero(self, tolerance: f32) -> bool {
        self.x.abs() <= tolerance
            && self.y.abs() <= tolerance
            && self.z.abs() <= tolerance
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
        )
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
        )
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: f32) -> Vec3 {
        Vec3::new(
            self.x * scalar,
            self.y * scalar,
            self.z * scalar,
        )
    }
}

impl std::ops::Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, scalar: f32) -> Vec3 {
        Vec3::new(
            self.x / scalar,
            self.y / scalar,
            self.z / scalar,
        )
    }
}

impl std::ops::AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl std::ops::SubAssign for Vec3 {
    fn sub_assign(&mut self, other: Vec3) {
        *self = *self - other;
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, out: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            out,
            "( {}, {}, {} )",
            self.x, self.y, self.z,
        )
    }
}

/// Row-major 4x4 affine matrix for instance buffers
#[derive(Clone, Copy, PartialEq, Debug)]
#[repr(C)]
pub struct Mat {
    pub rows: [[f32; 4]; 4],
}

impl Mat {
    pub fn from_rows(rows: [[f32; 4]; 4]) -> Mat {
        Mat { rows }
    }

    #[inline]
    pub fn identity() -> Mat {
        Mat::scale(Vec3::one())
    }

    pub fn translation(offset: Vec3) -> Mat {
        let mut mat = Mat::identity();
        mat.rows[0][3] = offset.x;
        mat.rows[1][3] = offset.y;
        mat.rows[2][3] = offset.z;
        mat
    }

    pub fn scale(scale: Vec3) -> Mat {
        Mat::from_rows([
            [scale.x, 0., 0., 0.],
            [0., scale.y, 0., 0.],
            [0., 0., scale.z, 0.],
            [0., 0., 0., 1.],
        ])
    }

    pub fn position(self) -> Vec3 {
        Vec3::new(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }
}

impl std::ops::Mul for Mat {
    type Output = Mat;

    fn mul(self, other: Mat) -> Mat {
        let mut rows = [[0.; 4]; 4];

        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4)
                    .map(|k| self.rows[i][k] * other.rows[k][j])
                    .sum();
            }
        }

        Mat::from_rows(rows)
    }
}

impl std::ops::Mul<Vec3> for Mat {
    type Output = Vec3;

    // Ignores translation
    fn mul(self, vec: Vec3) -> Vec3 {
        let row = |r: [f32; 4]| r[0] * vec.x + r[1] * vec.y + r[2] * vec.z;
        Vec3::new(row(self.rows[0]), row(self.rows[1]), row(self.rows[2]))
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Quat {
    x: f32,
    y: f32,
    z: f32,
    w: f32,
}

impl Quat {
    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Quat {
        Quat { x, y, z, w }
    }

    #[inline]
    pub fn id() -> Quat {
        Quat::new(0., 0., 0., 1.)
    }

    /// Expects a normalized axis
    pub fn angle_axis(axis: Vec3, rad: f32) -> Quat {
        let half = 0.5 * rad;
        let sin = half.sin();

        Quat::new(axis.x * sin, axis.y * sin, axis.z * sin, half.cos())
    }

    pub fn norm(self) -> Quat {
        let len = self.mag();

        if len == 0. {
            return Quat::id();
        }

        let inverse_len = 1. / len;

        Quat {
            x: self.x * inverse_len,
            y: self.y * inverse_len,
            z: self.z * inverse_len,
            w: self.w * inverse_len,
        }
    }

    pub fn mag_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w
    }

    pub fn mag(self) -> f32 {
        self.mag_squared().sqrt()
    }

    pub fn to_mat(self) -> Mat {
        let this = self.norm();

        let x0 = 1. - 2. * this.y * this.y - 2. * this.z * this.z;
        let x1 = 2. * this.x * this.y - 2. * this.z * this.w;
        let x2 = 2. * this.x * this.z + 2. * this.y * this.w;

        let y0 = 2. * this.x * this.y + 2. * this.z * this.w;
        let y1 = 1. - 2. * this.x * this.x - 2. * this.z * this.z;
        let y2 = 2. * this.y * this.z - 2. * this.x * this.w;

        let z0 = 2. * this.x * this.z - 2. * this.y * this.w;
        let z1 = 2. * this.y * this.z + 2. * this.x * this.w;
        let z2 = 1. - 2. * this.x * this.x - 2. * this.y * this.y;

        Mat::from_rows([
            [x0, x1, x2, 0.],
            [y0, y1, y2, 0.],
            [z0, z1, z2, 0.],
            [0., 0., 0., 1.],
        ])
    }
}

impl std::ops::Mul<Vec3> for Quat {
    type Output = Vec3;

    fn mul(self, vec: Vec3) -> Vec3 {
        self.to_mat() * vec
    }
}

impl std::ops::Mul for Quat {
    type Output = Quat;

    // Hamilton product
    fn mul(self, other: Quat) -> Quat {
        Quat {
            x: self.w * other.x + self.x * other.w
                + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z
                + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y
                - self.y * other.x + self.z * other.w,
            w: self.w * other.w - self.x * other.x
                - self.y * other.y - self.z * other.z,
        }
    }
}

/// Euler orientation in degrees (pitch about Y, yaw about Z, roll about X)
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Rotator {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotator {
    pub fn new(pitch: f32, yaw: f32, roll: f32) -> Rotator {
        Rotator { pitch, yaw, roll }
    }

    /// Orientation pointing X-forward along `direction`, without roll
    pub fn from_direction(direction: Vec3) -> Rotator {
        let yaw = direction.y.atan2(direction.x) * RAD_TO_DEG;
        let pitch = direction.z.atan2(
            (direction.x * direction.x + direction.y * direction.y).sqrt()
        ) * RAD_TO_DEG;

        Rotator::new(pitch, yaw, 0.)
    }

    pub fn add(self, pitch: f32, yaw: f32, roll: f32) -> Rotator {
        Rotator::new(self.pitch + pitch, self.yaw + yaw, self.roll + roll)
    }

    pub fn to_quat(self) -> Quat {
        let half = DEG_TO_RAD * 0.5;

        let (sp, cp) = (self.pitch * half).sin_cos();
        let (sy, cy) = (self.yaw * half).sin_cos();
        let (sr, cr) = (self.roll * half).sin_cos();

        Quat::new(
             cr * sp * sy - sr * cp * cy,
            -cr * sp * cy - sr * cp * sy,
             cr * cp * sy - sr * sp * cy,
             cr * cp * cy + sr * sp * sy,
        )
    }

    pub fn is_finite(self) -> bool {
        self.pitch.is_finite() && self.yaw.is_finite() && self.roll.is_finite()
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn new(position: Vec3, orientation: Quat, scale: Vec3) -> Transform {
        Transform {
            position,
            orientation,
            scale,
        }
    }

    #[inline]
    pub fn id() -> Transform {
        Transform::new(Vec3::zero(), Quat::id(), Vec3::one())
    }

    /// Local space to world space
    pub fn transform_position(self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local.scale(self.scale)
    }

    pub fn to_mat(self) -> Mat {
        Mat::translation(self.position)
            * self.orientation.to_mat()
            * Mat::scale(self.scale)
    }
}

impl Default for Transform {
    fn default() -> Transform {
        Transform::id()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3) -> Line {
        Line { start, end }
    }
}

/// Half-space boundary: points with `normal . p + offset >= 0` are outside
#[derive(Clone, Copy, Debug)]
pub struct Plane {
    pub normal: Vec3,
    pub offset: f32,
}

impl Plane {
    pub fn new(normal: Vec3, offset: f32) -> Plane {
        Plane {
            normal: normal.norm(),
            offset,
        }
    }

    pub fn from_point(normal: Vec3, point: Vec3) -> Plane {
        let normal = normal.norm();

        Plane {
            normal,
            offset: -normal.dot(point),
        }
    }

    #[inline]
    pub fn distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).is_nearly_zero(0.0001)
    }

    #[test]
    fn mul_mat() {
        let translation = Mat::translation(Vec3::new(1., 2., 3.));

        assert!(translation * Mat::identity() == translation);
        assert!(Mat::identity() * translation == translation);

        let composed = translation * Mat::scale(Vec3::new(2., 2., 2.));
        assert!(composed.position() == Vec3::new(1., 2., 3.));
        assert!(composed * Vec3::one() == Vec3::new(2., 2., 2.));
    }

    #[test]
    fn mul_vec() {
        let vec = Vec3::new(9., -4., 0.);
        let scale = Mat::scale(Vec3::new(-1., 3., 2.));

        assert!(Mat::identity() * vec == vec);
        assert!(scale * vec == Vec3::new(-9., -12., 0.));

        let mat = Mat::from_rows([
            [1., 1., 1., 0.],
            [0., 1., 0., 0.],
            [0., 0., 0., 0.],
            [0., 0., 0., 0.],
        ]);

        assert!(mat * vec == Vec3::new(5., -4., 0.,));
    }

    #[test]
    fn norm_quat() {
        // Baseline
        let error = (Quat::id().norm().mag() - Quat::id().mag()).abs();

        eprintln!("Error: {}", error);
        assert!(error < 0.0001);

        let quat = Quat::new(-1., 3., 5., 0.);
        let error = (quat.norm().mag() - 1.).abs();

        eprintln!("Error: {}", error);
        assert!(error < 0.0001);
    }

    #[test]
    fn norm_vec() {
        // Baseline
        let error = (Vec3::up().norm().mag() - Vec3::up().mag()).abs();

        eprintln!("Error: {}", error);
        assert!(error < 0.0001);

        let vec = Vec3::new(-1., 3., 5.);
        let error = (vec.norm().mag() - 1.).abs();

        eprintln!("Error: {}", error);
        assert!(error < 0.0001);

        assert!(Vec3::zero().norm() == Vec3::zero());
    }

    #[test]
    fn cross_vec() {
        assert!(Vec3::fwd().cross(Vec3::right()) == Vec3::up());
    }

    #[test]
    fn rotate_quat() {
        let quat = Quat::angle_axis(Vec3::up(), std::f32::consts::FRAC_PI_2);
        assert!(close(quat * Vec3::fwd(), Vec3::right()));

        // Composition matches sequential rotation
        let twice = quat * quat;
        assert!(close(twice * Vec3::fwd(), -Vec3::fwd()));
    }

    #[test]
    fn rotator_direction() {
        let rotator = Rotator::from_direction(Vec3::right());
        assert!((rotator.yaw - 90.).abs() < 0.0001);
        assert!(rotator.pitch.abs() < 0.0001);

        let rotator = Rotator::from_direction(Vec3::up());
        assert!((rotator.pitch - 90.).abs() < 0.0001);

        // Degenerate direction stays finite
        assert!(Rotator::from_direction(Vec3::zero()).is_finite());
    }

    #[test]
    fn rotator_quat() {
        let yaw = Rotator::new(0., 90., 0.).to_quat();
        assert!(close(yaw * Vec3::fwd(), Vec3::right()));

        let pitch = Rotator::new(90., 0., 0.).to_quat();
        assert!(close(pitch * Vec3::fwd(), Vec3::up()));

        // Quaternion points along the direction it was built from
        let direction = Vec3::new(3., -2., 5.).norm();
        let quat = Rotator::from_direction(direction).to_quat();
        assert!(close(quat * Vec3::fwd(), direction));
    }

    #[test]
    fn transform_position() {
        let transform = Transform::new(
            Vec3::new(10., 0., 0.),
            Rotator::new(0., 90., 0.).to_quat(),
            Vec3::new(2., 2., 2.),
        );

        let result = transform.transform_position(Vec3::fwd());
        assert!(close(result, Vec3::new(10., 2., 0.)));

        let matrix = transform.to_mat();
        assert!(close(matrix.position(), transform.position));
    }

    #[test]
    fn plane_distance() {
        let plane = Plane::from_point(Vec3::up(), Vec3::new(0., 0., -5.));

        assert!((plane.distance(Vec3::zero()) - 5.).abs() < 0.0001);
        assert!((plane.distance(Vec3::new(4., 4., -7.)) + 2.).abs() < 0.0001);
    }
}
