//! Triangulating y-monotone faces.
//!
//! Each monotone face is cut by the classic two-chain scan: walk the
//! vertices in sweep order, keeping a stack of the vertices seen so far
//! that are still waiting for a diagonal. A vertex on the opposite chain
//! from the stack top can see the whole stack and flushes it; a vertex on
//! the same chain connects to as much of the stack as its turn direction
//! allows. A face with k vertices gains exactly k - 3 diagonals and falls
//! apart into k - 2 triangles.

use crate::geom::{is_convex, is_y_monotone, orientation, Orientation, Point};
use crate::mesh::{FaceId, Mesh, VertexId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Chain {
    Left,
    Right,
}

/// Triangulate every interior face, then recompute the face structure.
///
/// Faces must already be y-monotone. With `skip_convex` set, faces that are
/// already convex are left whole; the decomposition stays valid and the
/// merge stage has less to undo.
pub fn triangulate(mesh: &mut Mesh, skip_convex: bool) {
    let faces: Vec<FaceId> = mesh.interior_faces().collect();
    for f in faces {
        triangulate_face(mesh, f, skip_convex);
    }
    mesh.recompute_faces();
}

fn triangulate_face(mesh: &mut Mesh, f: FaceId, skip_convex: bool) {
    let start = mesh[f].outer;
    let mut ring: Vec<VertexId> = Vec::new();
    let mut e = start;
    loop {
        ring.push(mesh[e].origin);
        e = mesh[e].prev;
        if e == start {
            break;
        }
    }
    let n = ring.len();
    if n <= 3 {
        return;
    }

    let ring_points: Vec<Point> = ring.iter().map(|&v| mesh[v].point.clone()).collect();
    debug_assert!(is_y_monotone(&ring_points), "{f:?} is not y-monotone");
    if skip_convex && is_convex(&ring_points) {
        return;
    }

    let mut top = 0;
    let mut bottom = 0;
    for i in 1..n {
        if mesh[ring[i]].point < mesh[ring[top]].point {
            top = i;
        }
        if mesh[ring[i]].point > mesh[ring[bottom]].point {
            bottom = i;
        }
    }

    // Counter-clockwise from the top, the boundary descends the left chain
    // to the bottom and ascends the right chain back up.
    let mut sides = vec![Chain::Left; n];
    let mut i = (bottom + 1) % n;
    while i != top {
        sides[i] = Chain::Right;
        i = (i + 1) % n;
    }

    let mut order: Vec<(VertexId, Chain)> = ring.iter().copied().zip(sides).collect();
    order.sort_by(|a, b| mesh[a.0].point.cmp(&mesh[b.0].point));
    let points: Vec<Point> = order.iter().map(|&(v, _)| mesh[v].point.clone()).collect();

    let mut stack: Vec<usize> = vec![0, 1];
    for i in 2..n - 1 {
        let side = order[i].1;
        let top_side = order[*stack.last().unwrap()].1;
        if side != top_side {
            // The whole stack is visible from the opposite chain. Connect
            // to everything except the deepest entry, which is joined to
            // this vertex by a boundary edge.
            while let Some(j) = stack.pop() {
                if !stack.is_empty() {
                    mesh.insert_edge(order[i].0, order[j].0);
                }
            }
            stack.push(i - 1);
            stack.push(i);
        } else {
            // Same chain: the top entry is boundary-adjacent. Cut off as
            // many stack corners as stay on the interior side; a colinear
            // triple stops the scan without a diagonal.
            let mut last = stack.pop().unwrap();
            while let Some(&cand) = stack.last() {
                let o = orientation(&points[i], &points[last], &points[cand]);
                let visible = match side {
                    Chain::Left => o == Orientation::Right,
                    Chain::Right => o == Orientation::Left,
                };
                if !visible {
                    break;
                }
                stack.pop();
                mesh.insert_edge(order[i].0, order[cand].0);
                last = cand;
            }
            stack.push(last);
            stack.push(i);
        }
    }

    // The bottom vertex sees every remaining stack entry; the outermost
    // two are already its boundary neighbours.
    stack.pop();
    while stack.len() > 1 {
        let j = stack.pop().unwrap();
        mesh.insert_edge(order[n - 1].0, order[j].0);
    }
}
