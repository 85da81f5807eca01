//! Utilities for generating examples, benchmarks, and test cases.

use crate::Point;

fn pt(x: i64, y: i64) -> Point {
    Point::from((x, y))
}

/// Generate a comb with `n` teeth. For `n = 3`, it looks like:
///
/// ```text
/// # # #
/// # # #
/// #####
/// ```
///
/// Teeth and gaps are one unit wide, on a one-unit base. No two teeth can
/// share a convex piece, so any convex decomposition has at least `n`
/// pieces; this is the standard worst case for the merge stage.
pub fn comb(n: usize) -> Vec<Point> {
    let n = n as i64;
    let width = 2 * n - 1;
    let mut ring = vec![pt(0, 0), pt(width, 0), pt(width, 4)];
    for i in (1..n).rev() {
        ring.push(pt(2 * i, 4));
        ring.push(pt(2 * i, 1));
        ring.push(pt(2 * i - 1, 1));
        ring.push(pt(2 * i - 1, 4));
    }
    ring.push(pt(0, 4));
    ring
}

/// Generate a staircase with `n` unit steps.
///
/// The staircase is y-monotone, so it goes straight from the sweep to
/// triangulation without any helper diagonals, and every other inner corner
/// is reflex.
pub fn staircase(n: usize) -> Vec<Point> {
    let n = n as i64;
    let mut ring = vec![pt(0, 0), pt(n, 0)];
    for i in (1..=n).rev() {
        ring.push(pt(i, n - i + 1));
        ring.push(pt(i - 1, n - i + 1));
    }
    ring
}

/// Generate a square with an `n` by `n` grid of square holes.
///
/// Each hole is a unit square with a one-unit margin on every side. The
/// sweep has to thread a diagonal to the top of every hole, so this family
/// leans on the split- and merge-vertex handling.
pub fn grid_of_holes(n: usize) -> (Vec<Point>, Vec<Vec<Point>>) {
    let n = n as i64;
    let width = 3 * n + 1;
    let outer = vec![pt(0, 0), pt(width, 0), pt(width, width), pt(0, width)];
    let mut holes = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (3 * i + 1, 3 * j + 1);
            holes.push(vec![
                pt(x, y),
                pt(x + 1, y),
                pt(x + 1, y + 1),
                pt(x, y + 1),
            ]);
        }
    }
    (outer, holes)
}
