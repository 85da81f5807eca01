//! Utilities for fuzz and/or property testing using `arbitrary`.

use arbitrary::Unstructured;

use crate::geom::Point;
use crate::{MergeStrategy, Options};

fn pt(x: i64, y: i64) -> Point {
    Point::from((x, y))
}

/// Generate a rectilinear polygon shaped like a skyline: a flat base with
/// columns of varying widths and heights on top.
///
/// The result is always simple, has positive area, and repeats no vertex.
/// Columns of equal height fuse into collinear runs, and every step between
/// columns of different heights is a reflex corner, so these polygons keep
/// the monotonization and merge stages busy despite the rigid shape.
pub fn skyline(u: &mut Unstructured<'_>) -> Result<Vec<Point>, arbitrary::Error> {
    Ok(skyline_columns(u)?.0)
}

/// Like [`skyline`], but with a rectangular hole punched into each column
/// that is wide and tall enough to hold one.
pub fn skyline_with_holes(
    u: &mut Unstructured<'_>,
) -> Result<(Vec<Point>, Vec<Vec<Point>>), arbitrary::Error> {
    let (outer, columns) = skyline_columns(u)?;
    let mut holes = Vec::new();
    for (left, right, height) in columns {
        if right - left < 3 || height < 3 {
            continue;
        }
        if u.arbitrary()? {
            // Strictly inside the column, so it touches nothing.
            holes.push(vec![
                pt(left + 1, 1),
                pt(right - 1, 1),
                pt(right - 1, height - 1),
                pt(left + 1, height - 1),
            ]);
        }
    }
    Ok((outer, holes))
}

/// Generate an arbitrary combination of tuning knobs.
pub fn options(u: &mut Unstructured<'_>) -> Result<Options, arbitrary::Error> {
    let merge = match u.int_in_range(0..=3)? {
        0 => MergeStrategy::None,
        1 => MergeStrategy::HertelMehlhorn,
        2 => MergeStrategy::Adjacent,
        _ => MergeStrategy::Full,
    };
    Ok(Options {
        merge,
        skip_convex: u.arbitrary()?,
        shuffle_seed: u.arbitrary()?,
    })
}

/// The skyline ring plus its columns as `(left, right, height)` triples.
fn skyline_columns(
    u: &mut Unstructured<'_>,
) -> Result<(Vec<Point>, Vec<(i64, i64, i64)>), arbitrary::Error> {
    let n: usize = u.int_in_range(1..=12)?;
    let mut xs = vec![0i64];
    let mut heights = Vec::new();
    for _ in 0..n {
        let width: i64 = u.int_in_range(1..=8)?;
        xs.push(xs.last().unwrap() + width);
        heights.push(u.int_in_range(1..=8)?);
    }

    let mut ring = vec![pt(xs[0], 0), pt(xs[n], 0), pt(xs[n], heights[n - 1])];
    for i in (1..n).rev() {
        // A step only where the height actually changes; equal columns
        // share one roof segment.
        if heights[i - 1] != heights[i] {
            ring.push(pt(xs[i], heights[i]));
            ring.push(pt(xs[i], heights[i - 1]));
        }
    }
    ring.push(pt(xs[0], heights[0]));

    let columns = (0..n).map(|i| (xs[i], xs[i + 1], heights[i])).collect();
    Ok((ring, columns))
}
