//! Nearest endpoint pair between two segments.
//!
//! The connecting segment always starts at the two ends that are closest
//! together, so the first step is to rank all four endpoint pairings.

use crate::types::{CandidatePair, FirstEnd, SecondEnd, Segment};

/// Build the four candidate pairings in enumeration order
/// (A-C, A-D, B-C, B-D).
#[must_use]
pub fn candidate_pairs(ab: &Segment, cd: &Segment) -> [CandidatePair; 4] {
    let pair = |from: FirstEnd, to: SecondEnd| {
        let start_point = ab.endpoint(from.into());
        let end_point = cd.endpoint(to.into());
        CandidatePair {
            from,
            to,
            start_point,
            end_point,
            distance: start_point.distance(end_point),
        }
    };

    [
        pair(FirstEnd::A, SecondEnd::C),
        pair(FirstEnd::A, SecondEnd::D),
        pair(FirstEnd::B, SecondEnd::C),
        pair(FirstEnd::B, SecondEnd::D),
    ]
}

/// Find the closest pair of endpoints between `ab` and `cd`.
///
/// Exact distance ties resolve to the earliest pairing in enumeration
/// order, so the result is deterministic for symmetric layouts.
///
/// # Examples
///
/// ```
/// use conduit_geometry::{FirstEnd, Point3, SecondEnd, Segment};
/// use conduit_geometry::nearest::nearest_endpoints;
///
/// let ab = Segment::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0), 1e-9).unwrap();
/// let cd = Segment::new(Point3::new(20.0, 5.0, 0.0), Point3::new(30.0, 5.0, 0.0), 1e-9).unwrap();
/// let pair = nearest_endpoints(&ab, &cd);
/// assert_eq!((pair.from, pair.to), (FirstEnd::B, SecondEnd::C));
/// ```
#[must_use]
pub fn nearest_endpoints(ab: &Segment, cd: &Segment) -> CandidatePair {
    let candidates = candidate_pairs(ab, cd);
    let mut best = candidates[0];
    for candidate in &candidates[1..] {
        // Strict comparison keeps the first minimum.
        if candidate.distance < best.distance {
            best = *candidate;
        }
    }
    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Point3;

    fn seg(a: (f64, f64, f64), b: (f64, f64, f64)) -> Segment {
        Segment::new(
            Point3::new(a.0, a.1, a.2),
            Point3::new(b.0, b.1, b.2),
            1e-9,
        )
        .unwrap()
    }

    #[test]
    fn enumeration_order_is_fixed() {
        let ab = seg((0.0, 0.0, 0.0), (1.0, 0.0, 0.0));
        let cd = seg((5.0, 0.0, 0.0), (6.0, 0.0, 0.0));
        let labels: Vec<_> = candidate_pairs(&ab, &cd)
            .iter()
            .map(|c| (c.from, c.to))
            .collect();
        assert_eq!(
            labels,
            vec![
                (FirstEnd::A, SecondEnd::C),
                (FirstEnd::A, SecondEnd::D),
                (FirstEnd::B, SecondEnd::C),
                (FirstEnd::B, SecondEnd::D),
            ]
        );
    }

    #[test]
    fn end_of_first_to_start_of_second() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((20.0, 5.0, 0.0), (30.0, 5.0, 0.0));
        let pair = nearest_endpoints(&ab, &cd);
        assert_eq!(pair.from, FirstEnd::B);
        assert_eq!(pair.to, SecondEnd::C);
        assert_eq!(pair.start_point, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(pair.end_point, Point3::new(20.0, 5.0, 0.0));
        assert!((pair.distance - 125.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn start_of_first_to_end_of_second() {
        let ab = seg((0.0, 0.0, 0.0), (10.0, 0.0, 0.0));
        let cd = seg((-30.0, 7.0, 0.0), (-4.0, 7.0, 0.0));
        let pair = nearest_endpoints(&ab, &cd);
        assert_eq!((pair.from, pair.to), (FirstEnd::A, SecondEnd::D));
    }

    #[test]
    fn exact_tie_keeps_first_in_enumeration_order() {
        // Both ends of CD are equidistant from both ends of AB.
        let ab = seg((-1.0, 0.0, 0.0), (1.0, 0.0, 0.0));
        let cd = seg((-1.0, 5.0, 0.0), (1.0, 5.0, 0.0));
        let pair = nearest_endpoints(&ab, &cd);
        assert_eq!((pair.from, pair.to), (FirstEnd::A, SecondEnd::C));
    }

    #[test]
    fn tie_between_later_candidates_keeps_earlier() {
        // A-D and B-C tie at distance 1; A-C and B-D are farther.
        let ab = seg((0.0, 0.0, 0.0), (4.0, 0.0, 0.0));
        let cd = seg((5.0, 0.0, 0.0), (-1.0, 0.0, 0.0));
        let pair = nearest_endpoints(&ab, &cd);
        assert_eq!((pair.from, pair.to), (FirstEnd::A, SecondEnd::D));
    }

    #[test]
    fn result_is_minimum_of_all_candidates() {
        let layouts = [
            (seg((0.0, 0.0, 0.0), (3.0, 1.0, 2.0)), seg((7.0, -2.0, 1.0), (4.0, 4.0, 0.0))),
            (seg((-5.0, 2.0, 0.0), (1.0, 1.0, 0.0)), seg((2.0, 9.0, 3.0), (-6.0, 3.0, 0.0))),
            (seg((1.0, 1.0, 1.0), (2.0, 2.0, 2.0)), seg((3.0, 3.0, 3.0), (0.0, 0.0, 0.0))),
        ];
        for (ab, cd) in &layouts {
            let best = nearest_endpoints(ab, cd);
            for candidate in candidate_pairs(ab, cd) {
                assert!(
                    candidate.distance >= best.distance,
                    "{candidate:?} is closer than {best:?}",
                );
            }
        }
    }
}
