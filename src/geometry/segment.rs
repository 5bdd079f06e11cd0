//! Ignored-segment predicate.
//!
//! Nodes lying on a user-designated segment are never split even when they
//! sit between materials (e.g. a symmetry line or a pre-bonded seam). The
//! classifier treats the predicate as a black box over planar coordinates.

/// Planar predicate consulted for interfacial nodes.
pub trait IgnoredSegment {
    /// Whether the point `(x, y)` lies on the ignored segment.
    fn contains(&self, x: f64, y: f64) -> bool;
}

impl<F> IgnoredSegment for F
where
    F: Fn(f64, f64) -> bool,
{
    fn contains(&self, x: f64, y: f64) -> bool {
        self(x, y)
    }
}

const DEFAULT_TOLERANCE: f64 = 1e-10;

/// A closed planar segment with a distance tolerance.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub tolerance: f64,
}

impl Segment {
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self {
            start,
            end,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Euclidean distance from `(x, y)` to the closed segment.
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        let [ax, ay] = self.start;
        let [bx, by] = self.end;
        let (dx, dy) = (bx - ax, by - ay);
        let len2 = dx * dx + dy * dy;
        // degenerate segment: distance to the single point
        let t = if len2 == 0.0 {
            0.0
        } else {
            (((x - ax) * dx + (y - ay) * dy) / len2).clamp(0.0, 1.0)
        };
        let (px, py) = (ax + t * dx, ay + t * dy);
        ((x - px).powi(2) + (y - py).powi(2)).sqrt()
    }
}

impl IgnoredSegment for Segment {
    fn contains(&self, x: f64, y: f64) -> bool {
        self.distance(x, y) <= self.tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_on_and_off_segment() {
        let s = Segment::new([0.0, 0.0], [2.0, 0.0]);
        assert!(s.contains(1.0, 0.0));
        assert!(s.contains(2.0, 0.0));
        assert!(!s.contains(2.5, 0.0));
        assert!(!s.contains(1.0, 1e-3));
        assert!(s.with_tolerance(1e-2).contains(1.0, 1e-3));
    }

    #[test]
    fn degenerate_segment_is_a_point() {
        let s = Segment::new([1.0, 1.0], [1.0, 1.0]);
        assert!(s.contains(1.0, 1.0));
        assert!((s.distance(4.0, 5.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn closures_are_predicates() {
        let left_half = |x: f64, _y: f64| x < 0.0;
        assert!(left_half.contains(-1.0, 3.0));
        assert!(!left_half.contains(1.0, 3.0));
    }
}
