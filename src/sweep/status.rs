//! The sweep status: which boundary edges currently cross the sweep line.

use malachite::Rational;

use crate::geom::Point;
use crate::mesh::{EdgeId, Mesh};

/// The pair of status edges bracketing a query point.
#[derive(Clone, Copy, Debug)]
pub struct Span {
    /// The rightmost status edge strictly left of the query point.
    pub left: EdgeId,
    /// The status edge at or right of the query point, if any.
    pub right: Option<EdgeId>,
}

/// The left-bounding edges of the intervals the sweep line currently
/// crosses, ordered left to right by x-intercept.
///
/// Only edges with polygon interior to their immediate right are stored,
/// one per open interval. Active edges never cross each other, so their
/// relative order does not depend on the height at which intercepts are
/// evaluated and a sorted vector with binary search suffices.
#[derive(Debug, Default)]
pub struct SweepStatus {
    edges: Vec<EdgeId>,
}

impl SweepStatus {
    /// An empty status, before the sweep has opened any interval.
    pub fn new() -> Self {
        Self::default()
    }

    /// How many intervals are currently open.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Are we empty?
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Where this edge crosses the horizontal line at `y`.
    ///
    /// Verticals cross at their constant x. A horizontal edge is resident
    /// only at its own height and reports its rightmost x there, sorting it
    /// after everything it touches.
    fn x_at(mesh: &Mesh, e: EdgeId, y: &Rational) -> Rational {
        let (a, b) = mesh.edge_points(e);
        if a.x == b.x {
            a.x.clone()
        } else if a.y == b.y {
            if a.x > b.x {
                a.x.clone()
            } else {
                b.x.clone()
            }
        } else {
            &a.x + (y - &a.y) * (&b.x - &a.x) / (&b.y - &a.y)
        }
    }

    /// Insert an edge at the position its intercept dictates. Ties go to
    /// the right; re-inserting a resident edge is a no-op.
    pub fn insert(&mut self, mesh: &Mesh, e: EdgeId, y: &Rational) {
        if self.edges.contains(&e) {
            return;
        }
        let x = Self::x_at(mesh, e, y);
        let pos = self
            .edges
            .partition_point(|&other| Self::x_at(mesh, other, y) <= x);
        self.edges.insert(pos, e);
    }

    /// Remove an edge; either half of its twin pair identifies it. The edge
    /// is located by binary search on its intercept, then by identity among
    /// intercept ties.
    ///
    /// Panics if the edge is not resident, since that means the sweep's
    /// bookkeeping went wrong earlier.
    pub fn remove(&mut self, mesh: &Mesh, e: EdgeId, y: &Rational) {
        let x = Self::x_at(mesh, e, y);
        let mut i = self
            .edges
            .partition_point(|&other| Self::x_at(mesh, other, y) < x);
        while i < self.edges.len() && Self::x_at(mesh, self.edges[i], y) == x {
            if self.edges[i] == e || self.edges[i] == e.twin() {
                self.edges.remove(i);
                return;
            }
            i += 1;
        }
        panic!("status edge {e:?} not found at its own intercept");
    }

    /// The status edges bracketing `p`: `left` is the rightmost edge whose
    /// intercept at `p`'s height is strictly less than `p.x`.
    ///
    /// Panics when nothing lies to the left. The event dispatch only
    /// queries at vertices that are guaranteed a left neighbour.
    pub fn range_query(&self, mesh: &Mesh, p: &Point) -> Span {
        let idx = self
            .edges
            .partition_point(|&e| Self::x_at(mesh, e, &p.y) < p.x);
        if idx == 0 {
            panic!("no status edge left of {p:?}");
        }
        Span {
            left: self.edges[idx - 1],
            right: self.edges.get(idx).copied(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Mesh {
        let ring = [(2, 0), (4, 2), (2, 4), (0, 2)]
            .iter()
            .map(|&c| Point::from(c))
            .collect();
        Mesh::from_rings(ring, vec![]).unwrap()
    }

    fn edge_between(mesh: &Mesh, a: (i64, i64), b: (i64, i64)) -> EdgeId {
        let a = Point::from(a);
        let b = Point::from(b);
        for e in mesh.live_edges() {
            let (p, q) = mesh.edge_points(e);
            if *p == a && *q == b {
                return e;
            }
        }
        panic!("no edge {a:?} -> {b:?}");
    }

    fn rat(n: i64, d: i64) -> Rational {
        Rational::from_signeds(n, d)
    }

    #[test]
    fn intercepts() {
        let mesh = diamond();
        let down_left = edge_between(&mesh, (2, 4), (0, 2));
        assert_eq!(SweepStatus::x_at(&mesh, down_left, &rat(3, 1)), rat(1, 1));
        assert_eq!(SweepStatus::x_at(&mesh, down_left, &rat(5, 2)), rat(1, 2));

        let square = Mesh::from_rings(
            [(0, 0), (4, 0), (4, 4), (0, 4)]
                .iter()
                .map(|&c| Point::from(c))
                .collect(),
            vec![],
        )
        .unwrap();
        let vertical = edge_between(&square, (0, 4), (0, 0));
        assert_eq!(SweepStatus::x_at(&square, vertical, &rat(1, 1)), rat(0, 1));
        // Horizontal edges report their rightmost endpoint.
        let horizontal = edge_between(&square, (0, 0), (4, 0));
        assert_eq!(SweepStatus::x_at(&square, horizontal, &rat(0, 1)), rat(4, 1));
    }

    #[test]
    fn ordered_residency() {
        let mesh = diamond();
        let left = edge_between(&mesh, (2, 4), (0, 2));
        let right = edge_between(&mesh, (4, 2), (2, 4));
        let mut status = SweepStatus::new();
        let y = rat(2, 1);
        status.insert(&mesh, right, &y);
        status.insert(&mesh, left, &y);
        assert_eq!(status.len(), 2);

        // Re-insertion is a no-op.
        status.insert(&mesh, left, &y);
        assert_eq!(status.len(), 2);

        let span = status.range_query(&mesh, &Point::from((2, 2)));
        assert_eq!(span.left, left);
        assert_eq!(span.right, Some(right));

        // A query close to the right edge still sees the same interval.
        let span = status.range_query(&mesh, &Point::new(rat(7, 2), rat(2, 1)));
        assert_eq!(span.left, left);
        assert_eq!(span.right, Some(right));
    }

    #[test]
    fn remove_accepts_either_twin_half() {
        let mesh = diamond();
        let left = edge_between(&mesh, (2, 4), (0, 2));
        let mut status = SweepStatus::new();
        let y = rat(2, 1);
        status.insert(&mesh, left, &y);
        status.remove(&mesh, left.twin(), &y);
        assert!(status.is_empty());
    }

    #[test]
    #[should_panic(expected = "no status edge left of")]
    fn query_left_of_everything_panics() {
        let mesh = diamond();
        let left = edge_between(&mesh, (2, 4), (0, 2));
        let mut status = SweepStatus::new();
        status.insert(&mesh, left, &rat(2, 1));
        status.range_query(&mesh, &Point::from((-1, 2)));
    }

    #[test]
    fn tied_intercepts_resolve_by_identity() {
        let mesh = diamond();
        // Both top edges meet at (2, 4): equal intercepts at the apex.
        let left = edge_between(&mesh, (2, 4), (0, 2));
        let right = edge_between(&mesh, (4, 2), (2, 4));
        let mut status = SweepStatus::new();
        let y = rat(4, 1);
        status.insert(&mesh, left, &y);
        status.insert(&mesh, right, &y);
        status.remove(&mesh, right, &y);
        assert_eq!(status.len(), 1);
        status.remove(&mesh, left, &y);
        assert!(status.is_empty());
    }

    #[test]
    #[should_panic(expected = "not found at its own intercept")]
    fn removing_an_absent_edge_panics() {
        let mesh = diamond();
        let left = edge_between(&mesh, (2, 4), (0, 2));
        let mut status = SweepStatus::new();
        status.remove(&mesh, left, &rat(2, 1));
    }
}
