use crate::alg;

// Arc-length table resolution
const SAMPLES_PER_SEGMENT: usize = 16;

/// Arc-length parameterized curve in world space
pub trait Spline {
    fn length(&self) -> f32;

    /// Clamped to `[0, length]`
    fn location_at_distance(&self, distance: f32) -> alg::Vec3;

    /// Normalized input: 0 at the first control point, 1 at the last
    fn location_at_time(&self, time: f32) -> alg::Vec3;
}

#[derive(Clone, Copy, Debug)]
struct Sample {
    distance: f32,
    position: alg::Vec3,
}

/// Catmull-Rom spline passing through every control point
pub struct CatmullRom {
    points: Vec<alg::Vec3>,
    samples: Vec<Sample>,
}

impl CatmullRom {
    pub fn new(points: &[alg::Vec3]) -> CatmullRom {
        let mut spline = CatmullRom {
            points: points.to_vec(),
            samples: Vec::new(),
        };

        spline.build_table();
        spline
    }

    pub fn points(&self) -> &[alg::Vec3] {
        &self.points
    }

    fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    // p1 -> p2 with mirrored phantom points at the ends
    fn evaluate(&self, segment: usize, t: f32) -> alg::Vec3 {
        let count = self.points.len();
        debug_assert!(segment + 1 < count);

        let p1 = self.points[segment];
        let p2 = self.points[segment + 1];

        let p0 = if segment == 0 {
            p1 * 2. - p2
        } else {
            self.points[segment - 1]
        };

        let p3 = if segment + 2 < count {
            self.points[segment + 2]
        } else {
            p2 * 2. - p1
        };

        let t2 = t * t;
        let t3 = t2 * t;

        (
              p1 * 2.
            + (p2 - p0) * t
            + (p0 * 2. - p1 * 5. + p2 * 4. - p3) * t2
            + (p1 * 3. - p0 - p2 * 3. + p3) * t3
        ) * 0.5
    }

    fn build_table(&mut self) {
        self.samples.clear();

        let segments = self.segment_count();
        if segments == 0 {
            return;
        }

        let mut distance = 0.;
        let mut last = self.points[0];

        self.samples.push(Sample { distance, position: last });

        for segment in 0..segments {
            for step in 1..=SAMPLES_PER_SEGMENT {
                let t = step as f32 / SAMPLES_PER_SEGMENT as f32;
                let position = self.evaluate(segment, t);

                distance += last.dist(position);
                last = position;

                self.samples.push(Sample { distance, position });
            }
        }
    }
}

impl Spline for CatmullRom {
    fn length(&self) -> f32 {
        self.samples.last()
            .map(|sample| sample.distance)
            .unwrap_or(0.)
    }

    fn location_at_distance(&self, distance: f32) -> alg::Vec3 {
        if self.samples.is_empty() {
            return self.points.first()
                .copied()
                .unwrap_or_else(alg::Vec3::zero);
        }

        let distance = distance.max(0.).min(self.length());

        // First sample at or past the target distance
        let upper = self.samples
            .partition_point(|sample| sample.distance < distance)
            .min(self.samples.len() - 1);

        if upper == 0 {
            return self.samples[0].position;
        }

        let a = self.samples[upper - 1];
        let b = self.samples[upper];
        let span = b.distance - a.distance;

        if span <= std::f32::EPSILON {
            return b.position;
        }

        a.position.lerp(b.position, (distance - a.distance) / span)
    }

    fn location_at_time(&self, time: f32) -> alg::Vec3 {
        let segments = self.segment_count();

        if segments == 0 {
            return self.points.first()
                .copied()
                .unwrap_or_else(alg::Vec3::zero);
        }

        let scaled = time.max(0.).min(1.) * segments as f32;
        let segment = (scaled.floor() as usize).min(segments - 1);

        self.evaluate(segment, scaled - segment as f32)
    }
}

/// Piecewise-linear float curve with clamped ends
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    keys: Vec<(f32, f32)>,
}

impl Curve {
    pub fn new() -> Curve {
        Curve {
            keys: Vec::new(),
        }
    }

    /// Constant value everywhere
    pub fn constant(value: f32) -> Curve {
        let mut curve = Curve::new();
        curve.add_key(0., value);
        curve
    }

    /// Keeps keys ordered by time; replaces a key at the same time
    pub fn add_key(&mut self, time: f32, value: f32) {
        let index = self.keys.partition_point(|key| key.0 < time);

        match self.keys.get(index) {
            Some(key) if key.0 == time => self.keys[index].1 = value,
            _ => self.keys.insert(index, (time, value)),
        }
    }

    pub fn keys(&self) -> &[(f32, f32)] {
        &self.keys
    }

    /// Empty curves evaluate to zero
    pub fn eval(&self, time: f32) -> f32 {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return 0.,
        };

        if time <= first.0 {
            return first.1;
        }

        if time >= last.0 {
            return last.1;
        }

        let upper = self.keys.partition_point(|key| key.0 <= time);
        let (t0, v0) = self.keys[upper - 1];
        let (t1, v1) = self.keys[upper];

        v0 + (v1 - v0) * (time - t0) / (t1 - t0)
    }
}

impl Default for Curve {
    /// Follow fully in the middle, release at both ends
    fn default() -> Curve {
        let mut curve = Curve::new();

        curve.add_key(0.00, 0.);
        curve.add_key(0.05, 1.);
        curve.add_key(0.95, 1.);
        curve.add_key(1.00, 0.);

        curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_spline_length() {
        let spline = CatmullRom::new(
            &[
                alg::Vec3::zero(),
                alg::Vec3::new(100., 0., 0.),
                alg::Vec3::new(200., 0., 0.),
            ]
        );

        assert!((spline.length() - 200.).abs() < 0.01);

        let middle = spline.location_at_distance(50.);
        assert!((middle - alg::Vec3::new(50., 0., 0.)).is_nearly_zero(0.01));

        // Clamped past the end
        let end = spline.location_at_distance(1000.);
        assert!((end - alg::Vec3::new(200., 0., 0.)).is_nearly_zero(0.01));

        let half = spline.location_at_time(0.5);
        assert!((half - alg::Vec3::new(100., 0., 0.)).is_nearly_zero(0.01));
    }

    #[test]
    fn curved_spline_passes_through_points() {
        let points = [
            alg::Vec3::zero(),
            alg::Vec3::new(100., 100., 0.),
            alg::Vec3::new(200., 0., 50.),
        ];

        let spline = CatmullRom::new(&points);

        assert!((spline.location_at_time(0.) - points[0]).is_nearly_zero(0.001));
        assert!((spline.location_at_time(0.5) - points[1]).is_nearly_zero(0.001));
        assert!((spline.location_at_time(1.) - points[2]).is_nearly_zero(0.001));

        // Arc is longer than the chord
        assert!(spline.length() > points[0].dist(points[2]));
    }

    #[test]
    fn degenerate_spline() {
        let empty = CatmullRom::new(&[]);
        assert!(empty.length() == 0.);
        assert!(empty.location_at_distance(5.) == alg::Vec3::zero());

        let single = CatmullRom::new(&[alg::Vec3::one()]);
        assert!(single.location_at_time(0.7) == alg::Vec3::one());
    }

    #[test]
    fn curve_eval() {
        let curve = Curve::default();

        assert!(curve.eval(-1.) == 0.);
        assert!(curve.eval(0.5) == 1.);
        assert!((curve.eval(0.025) - 0.5).abs() < 0.0001);
        assert!(curve.eval(2.) == 0.);

        assert!(Curve::new().eval(0.3) == 0.);
        assert!(Curve::constant(0.7).eval(0.3) == 0.7);
    }

    #[test]
    fn curve_keys_stay_ordered() {
        let mut curve = Curve::new();
        curve.add_key(1., 10.);
        curve.add_key(0., 0.);
        curve.add_key(0.5, 2.);
        curve.add_key(0.5, 5.);

        assert_eq!(curve.keys(), &[(0., 0.), (0.5, 5.), (1., 10.)]);
        assert!((curve.eval(0.75) - 7.5).abs() < 0.0001);
    }
}
