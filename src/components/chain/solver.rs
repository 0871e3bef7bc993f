use crate::alg;
use super::point::Point;

// Pairs closer than this (per component) are left alone
const DEGENERATE: f32 = 1e-4;

/// Position Verlet over every free point
pub fn integrate(points: &mut [Point], gravity: alg::Vec3, damping: f32) {
    let retain = 1. - damping.max(0.).min(1.);

    for point in points.iter_mut().filter(|point| point.free) {
        let velocity = (point.position - point.previous) * retain + gravity;

        point.previous = point.position;
        point.position += velocity;
        point.velocity = velocity;
    }
}

/// Pull a pair of points toward the rest length. \
/// Pending impulses are applied to free points and always cleared.
pub fn relax(points: &mut [Point], a: usize, b: usize, rest: f32) {
    debug_assert!(a < points.len() && b < points.len());

    let delta = points[b].position - points[a].position;

    let correction = if delta.is_nearly_zero(DEGENERATE) {
        alg::Vec3::zero()
    } else {
        let distance = delta.mag();
        delta * ((distance - rest) / distance)
    };

    let (free_a, free_b) = (points[a].free, points[b].free);

    if free_a && free_b {
        let half = correction * 0.5;
        points[a].position += half + points[a].force;
        points[b].position += points[b].force - half;
    } else if free_a {
        points[a].position += correction + points[a].force;
    } else if free_b {
        points[b].position += points[b].force - correction;
    }

    points[a].force = alg::Vec3::zero();
    points[b].force = alg::Vec3::zero();
}

/// Recompute the facing of a point from its neighbors
pub fn orient(points: &mut [Point], i: usize, twist: alg::Vec3) {
    let count = points.len();
    if count < 2 {
        return;
    }

    debug_assert!(i < count);

    let tangent = if i == 0 {
        points[1].position - points[0].position
    } else if i == count - 1 {
        points[i].position - points[i - 1].position
    } else {
        points[i + 1].position - points[i - 1].position
    }.norm();

    let fwd = tangent.cross(alg::Vec3::fwd());
    let binormal = tangent.cross(fwd);

    let index = i as f32;

    points[i].direction = tangent;
    points[i].orientation = alg::Rotator::from_direction(binormal).add(
        90. + twist.x * index,
        twist.y * index,
        twist.z * index,
    );
}

/// Forward relaxation sweeps followed by a single reversed sweep
pub fn solve(points: &mut [Point], rest: f32, passes: usize, twist: alg::Vec3) {
    let count = points.len();
    if count < 2 {
        return;
    }

    for _ in 0..passes.max(1) {
        for i in 0..count - 1 {
            relax(points, i, i + 1, rest);
            orient(points, i, twist);
        }

        orient(points, count - 1, twist);
    }

    for i in (0..count - 1).rev() {
        relax(points, i, i + 1, rest);
        orient(points, i + 1, twist);
    }

    orient(points, 0, twist);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn line(count: usize, end: alg::Vec3) -> Vec<Point> {
        (0..count).map(|i| {
            let time = i as f32 / (count - 1) as f32;
            Point::new(i, time, end * time)
        }).collect()
    }

    fn max_error(points: &[Point], rest: f32) -> f32 {
        points.windows(2)
            .map(|pair| (pair[0].position.dist(pair[1].position) - rest).abs())
            .fold(0., f32::max)
    }

    #[test]
    fn integrate_skips_pinned() {
        let mut points = line(3, alg::Vec3::new(200., 0., 0.));
        points[0].free = false;

        let gravity = alg::Vec3::new(0., 0., -1.);
        integrate(&mut points, gravity, 0.);
        integrate(&mut points, gravity, 0.);

        assert!(points[0].position == alg::Vec3::zero());
        assert!(points[0].velocity == alg::Vec3::zero());

        // Second step carries the first step's velocity
        assert!((points[1].position.z + 3.).abs() < 0.0001);
        assert!((points[1].velocity.z + 2.).abs() < 0.0001);
    }

    #[test]
    fn integrate_damping() {
        let mut points = line(2, alg::Vec3::new(100., 0., 0.));
        points[1].previous = points[1].position - alg::Vec3::new(0., 10., 0.);

        integrate(&mut points, alg::Vec3::zero(), 0.5);
        assert!((points[1].velocity.y - 5.).abs() < 0.0001);
    }

    #[test]
    fn relax_splits_between_free_points() {
        let mut points = line(2, alg::Vec3::new(20., 0., 0.));
        relax(&mut points, 0, 1, 10.);

        assert!((points[0].position.x - 5.).abs() < 0.0001);
        assert!((points[1].position.x - 15.).abs() < 0.0001);
    }

    #[test]
    fn relax_moves_only_free_point() {
        let mut points = line(2, alg::Vec3::new(20., 0., 0.));
        points[0].free = false;
        relax(&mut points, 0, 1, 10.);

        assert!(points[0].position == alg::Vec3::zero());
        assert!((points[1].position.x - 10.).abs() < 0.0001);
    }

    #[test]
    fn relax_consumes_force_once() {
        let mut points = line(2, alg::Vec3::new(10., 0., 0.));
        points[1].force = alg::Vec3::new(0., 0., 3.);

        relax(&mut points, 0, 1, 10.);
        assert!(points[1].force == alg::Vec3::zero());
        assert!((points[1].position.z - 3.).abs() < 0.0001);

        let before = points[1].position;
        points[0].free = false;
        let rest = points[0].position.dist(before);
        relax(&mut points, 0, 1, rest);
        assert!((points[1].position - before).is_nearly_zero(0.0001));
    }

    #[test]
    fn relax_coincident_points() {
        let mut points = line(2, alg::Vec3::zero());
        relax(&mut points, 0, 1, 10.);

        for point in &points {
            assert!(point.position.is_finite());
            assert!(point.position == alg::Vec3::zero());
        }

        orient(&mut points, 0, alg::Vec3::new(0., 0., 45.));
        assert!(points[0].orientation.is_finite());
    }

    #[test]
    fn orientation_twists_by_index() {
        let mut points = line(3, alg::Vec3::new(0., 0., -100.));
        let twist = alg::Vec3::new(1., 2., 3.);

        orient(&mut points, 0, twist);
        orient(&mut points, 2, twist);

        assert!((points[0].direction - -alg::Vec3::up()).is_nearly_zero(0.0001));
        assert!((points[2].orientation.roll - points[0].orientation.roll - 6.).abs() < 0.0001);
        assert!((points[2].orientation.pitch - points[0].orientation.pitch - 2.).abs() < 0.0001);
    }

    #[test]
    fn solve_converges_with_passes() {
        let perturbed = || {
            let mut points = line(10, alg::Vec3::new(900., 0., 0.));
            points[0].free = false;
            points[9].free = false;

            for k in 1..9 {
                let i = (k - 1) as f32;
                points[k].position += alg::Vec3::new(
                    0.,
                    40. * (1.3 * i).cos(),
                    40. * i.sin(),
                );
            }

            points
        };

        let rest = 100. * 1.5;
        let mut last = std::f32::MAX;

        for passes in &[1, 2, 4, 8] {
            let mut points = perturbed();
            solve(&mut points, rest, *passes, alg::Vec3::zero());

            let error = max_error(&points, rest);
            eprintln!("Passes: {} Error: {}", passes, error);

            assert!(error < last);
            last = error;
        }

        assert!(last < 0.5);
    }

    #[test]
    fn solve_keeps_pinned_points() {
        let mut rng = rand::thread_rng();
        let mut points = line(12, alg::Vec3::new(500., 0., 0.));

        points[0].free = false;
        points[6].free = false;
        points[11].free = false;

        let pinned: Vec<_> = [0, 6, 11].iter()
            .map(|i| points[*i].position)
            .collect();

        for point in points.iter_mut() {
            point.force = alg::Vec3::new(
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
                rng.gen_range(-50.0..50.0),
            );
        }

        for _ in 0..20 {
            integrate(&mut points, alg::Vec3::new(0., 0., -1.), 0.);
            solve(&mut points, 60., 4, alg::Vec3::new(0., 0., 45.));
        }

        for (slot, i) in [0, 6, 11].iter().enumerate() {
            assert!(points[*i].position == pinned[slot]);
        }

        for point in &points {
            assert!(point.position.is_finite());
            assert!(point.force == alg::Vec3::zero());
            assert!(point.orientation.is_finite());
        }
    }

    #[test]
    fn solve_degenerate_counts() {
        let mut empty: Vec<Point> = Vec::new();
        solve(&mut empty, 10., 4, alg::Vec3::zero());

        let mut single = line(2, alg::Vec3::zero());
        single.truncate(1);
        solve(&mut single, 10., 4, alg::Vec3::zero());
        assert!(single[0].position == alg::Vec3::zero());
    }
}
