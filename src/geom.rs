//! Geometric primitives: points, orientation tests, and angular orderings.

use std::cmp::Ordering;
use std::str::FromStr;

use malachite::num::basic::traits::Zero;
use malachite::Rational;

/// A two-dimensional point with exact rational coordinates.
///
/// Points are ordered by *decreasing* `y` and then increasing `x`, for the
/// convenience of our sweep-line algorithm (which moves downward). The
/// topmost-leftmost point of any set is its minimum.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Point {
    /// Horizontal coordinate; larger values are to the right.
    pub x: Rational,
    /// Vertical coordinate; larger values are up.
    pub y: Rational,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .y
            .cmp(&self.y)
            .then_with(|| self.x.cmp(&other.x))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: Rational, y: Rational) -> Self {
        Point { x, y }
    }
}

impl From<(i64, i64)> for Point {
    fn from((x, y): (i64, i64)) -> Self {
        Point::new(Rational::from(x), Rational::from(y))
    }
}

impl serde::Serialize for Point {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut s = serializer.serialize_struct("Point", 2)?;
        s.serialize_field("x", &self.x.to_string())?;
        s.serialize_field("y", &self.y.to_string())?;
        s.end()
    }
}

impl<'de> serde::Deserialize<'de> for Point {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error as _;

        #[derive(serde::Deserialize)]
        struct Raw {
            x: String,
            y: String,
        }

        let raw = Raw::deserialize(deserializer)?;
        let x = Rational::from_str(&raw.x)
            .map_err(|_| D::Error::custom(format!("invalid rational {:?}", raw.x)))?;
        let y = Rational::from_str(&raw.y)
            .map_err(|_| D::Error::custom(format!("invalid rational {:?}", raw.y)))?;
        Ok(Point { x, y })
    }
}

/// Does the edge from `from` to `to` point downward?
///
/// "Downward" means its target comes later in the sweep: smaller `y`, or
/// equal `y` and larger `x`. Horizontal edges count as descending when they
/// point right and ascending when they point left, which keeps every edge
/// consistently oriented relative to the sweep.
pub fn descends(from: &Point, to: &Point) -> bool {
    from < to
}

/// The sign of the turn at `b` when walking `a -> b -> c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Counter-clockwise turn.
    Left,
    /// Clockwise turn.
    Right,
    /// No turn.
    Colinear,
}

/// Exact orientation of the triple `(a, b, c)`, by the sign of the cross
/// product of `b - a` and `c - b`.
pub fn orientation(a: &Point, b: &Point, c: &Point) -> Orientation {
    let cross = (&b.x - &a.x) * (&c.y - &b.y) - (&b.y - &a.y) * (&c.x - &b.x);
    match cross.cmp(&Rational::ZERO) {
        Ordering::Greater => Orientation::Left,
        Ordering::Less => Orientation::Right,
        Ordering::Equal => Orientation::Colinear,
    }
}

/// The direction of an edge, as a key in the rotational order around its
/// source vertex.
///
/// Directions are bucketed by quadrant (0: rightward, 1: straight up, 2:
/// leftward, 3: straight down) and ordered within the side buckets by exact
/// slope, so the derived lexicographic order runs counter-clockwise starting
/// just past straight-down. No trigonometry is involved; two directions
/// compare equal exactly when they are parallel and point the same way.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeAngle {
    quadrant: u8,
    slope: Option<Rational>,
}

impl EdgeAngle {
    /// The angular key of the direction from `from` towards `to`.
    ///
    /// The two points must be distinct.
    pub fn between(from: &Point, to: &Point) -> EdgeAngle {
        let dx = &to.x - &from.x;
        let dy = &to.y - &from.y;
        debug_assert!(dx != Rational::ZERO || dy != Rational::ZERO);
        match dx.cmp(&Rational::ZERO) {
            Ordering::Greater => EdgeAngle {
                quadrant: 0,
                slope: Some(&dy / &dx),
            },
            Ordering::Less => EdgeAngle {
                quadrant: 2,
                slope: Some(&dy / &dx),
            },
            Ordering::Equal => {
                if dy > Rational::ZERO {
                    EdgeAngle { quadrant: 1, slope: None }
                } else {
                    EdgeAngle { quadrant: 3, slope: None }
                }
            }
        }
    }

    /// Is `self` strictly inside the counter-clockwise angular interval from
    /// `start` to `end`?
    ///
    /// The interval wraps around when `end <= start`; straight down is the
    /// cut point of the underlying order.
    pub fn strictly_between(&self, start: &EdgeAngle, end: &EdgeAngle) -> bool {
        if end > start {
            start < self && self < end
        } else {
            self < end || self > start
        }
    }
}

/// Of two edge directions leaving a common vertex, both ascending or both
/// descending, is the first the one lying further left?
///
/// "Further left" means smaller `x` at heights just beyond the vertex. For
/// ascending pairs the larger angular key always wins; for descending pairs
/// the smaller key wins when both directions leave towards the same side,
/// and the larger when they straddle straight-down.
pub fn leftmost_is_first(a: &EdgeAngle, b: &EdgeAngle, ascending: bool) -> bool {
    debug_assert_ne!(a, b);
    if ascending {
        a > b
    } else if (a.quadrant == 0 && b.quadrant == 0) || (a.quadrant >= 2 && b.quadrant >= 2) {
        a < b
    } else {
        a > b
    }
}

/// Twice the signed area of the ring, by the shoelace formula. Positive for
/// counter-clockwise rings.
pub fn doubled_signed_area(ring: &[Point]) -> Rational {
    let mut acc = Rational::ZERO;
    for i in 0..ring.len() {
        let p = &ring[i];
        let q = &ring[(i + 1) % ring.len()];
        acc += &p.x * &q.y - &q.x * &p.y;
    }
    acc
}

/// The signed area of the ring. Positive for counter-clockwise rings.
pub fn signed_area(ring: &[Point]) -> Rational {
    doubled_signed_area(ring) / Rational::from(2)
}

/// Is this counter-clockwise ring convex? Colinear triples are allowed.
pub fn is_convex(ring: &[Point]) -> bool {
    let n = ring.len();
    (0..n).all(|i| {
        orientation(&ring[i], &ring[(i + 1) % n], &ring[(i + 2) % n]) != Orientation::Right
    })
}

/// Is this ring monotone with respect to the sweep direction?
///
/// A ring is y-monotone when it has exactly one local minimum and one local
/// maximum in sweep order, so each of its two chains can be walked top to
/// bottom without backtracking. Since distinct points always compare
/// strictly, horizontal runs do not produce spurious extrema.
pub fn is_y_monotone(ring: &[Point]) -> bool {
    let n = ring.len();
    let mut tops = 0;
    let mut bottoms = 0;
    for i in 0..n {
        let prev = &ring[(i + n - 1) % n];
        let cur = &ring[i];
        let next = &ring[(i + 1) % n];
        if cur < prev && cur < next {
            tops += 1;
        }
        if cur > prev && cur > next {
            bottoms += 1;
        }
    }
    tops == 1 && bottoms == 1
}
