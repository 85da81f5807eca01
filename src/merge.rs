//! Convex merging of a triangulated decomposition.
//!
//! Triangulation produces far more pieces than necessary, so the passes here
//! undo as much of it as convexity allows:
//!
//!   * [`merge_adjacent_faces`] deletes shared walls to a fixed point,
//!     rescanning every face after each deletion.
//!   * [`hertel_mehlhorn`] visits each wall once and deletes it if both
//!     sides stay convex. One pass suffices and the result has at most four
//!     times as many pieces as the best possible convex decomposition.
//!   * [`merge_indirect_neighbours`] joins two faces that share no wall but
//!     meet around a common neighbour, by routing bridge edges past it.
//!
//! Interior face cycles wind clockwise, so in every corner test here a left
//! turn means a reflex corner.

use malachite::num::basic::traits::Zero;
use malachite::Rational;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, trace};

use crate::geom::{doubled_signed_area, orientation, Orientation};
use crate::mesh::{EdgeId, FaceId, FaceKind, Mesh, VertexId};

/// How aggressively to merge faces after triangulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep the triangulation as is.
    None,
    /// One Hertel-Mehlhorn pass over the interior walls.
    HertelMehlhorn,
    /// Delete walls to a fixed point, rescanning after every deletion.
    Adjacent,
    /// Adjacent merging, then bridge-merging of faces that only meet
    /// around a common neighbour.
    #[default]
    Full,
}

/// Run the merge passes selected by `strategy`.
///
/// `shuffle_seed` only affects [`MergeStrategy::HertelMehlhorn`], whose
/// output depends on the order the walls are visited in.
pub fn merge_faces(mesh: &mut Mesh, strategy: MergeStrategy, shuffle_seed: Option<u64>) {
    match strategy {
        MergeStrategy::None => {}
        MergeStrategy::HertelMehlhorn => hertel_mehlhorn(mesh, shuffle_seed),
        MergeStrategy::Adjacent => merge_adjacent_faces(mesh),
        MergeStrategy::Full => {
            merge_adjacent_faces(mesh);
            merge_indirect_neighbours(mesh);
        }
    }
}

/// Delete interior walls until no further deletion keeps both sides convex.
///
/// Every deletion restarts the scan: the merged face has new corners, and a
/// wall that was essential before may no longer be.
pub fn merge_adjacent_faces(mesh: &mut Mesh) {
    'scan: loop {
        for f in mesh.interior_faces().collect::<Vec<_>>() {
            for e in mesh.face_edges(f) {
                if convex_after_deleting(mesh, e) {
                    trace!(edge = ?e, "merging the faces on both sides");
                    mesh.delete_edge(e);
                    continue 'scan;
                }
            }
        }
        break;
    }
}

/// Would deleting `e` leave the union of its two faces convex?
///
/// Only the corners at the two endpoints of `e` change, where the cycles of
/// the two faces are stitched together.
pub fn convex_after_deleting(mesh: &Mesh, e: EdgeId) -> bool {
    let t = e.twin();
    let other = match mesh[t].face {
        Some(f) => f,
        None => return false,
    };
    if mesh[other].kind != FaceKind::Interior || mesh[e].face == Some(other) {
        return false;
    }
    // Two faces sharing consecutive walls keep both; deleting one would
    // leave the other dangling inside the union. Convex faces never share
    // more walls than that.
    if mesh[mesh[e].next.twin()].face == Some(other) {
        return false;
    }
    let e_next = mesh[e].next;
    turn(
        mesh,
        mesh[mesh[t].prev].origin,
        mesh[e_next].origin,
        mesh[mesh[e_next].next].origin,
    ) != Orientation::Left
        && turn(
            mesh,
            mesh[mesh[e].prev].origin,
            mesh[e].origin,
            mesh[mesh[mesh[t].next].next].origin,
        ) != Orientation::Left
}

/// One Hertel-Mehlhorn pass: delete every inessential wall, visiting each
/// wall once.
///
/// All faces are convex when this starts and stay convex after every
/// deletion, so a wall found essential never becomes deletable later. The
/// visiting order decides which pieces come out, not whether they are
/// valid; `shuffle_seed` reorders the walls reproducibly, and `None` keeps
/// creation order.
pub fn hertel_mehlhorn(mesh: &mut Mesh, shuffle_seed: Option<u64>) {
    let mut walls: Vec<EdgeId> = mesh
        .live_edges()
        .filter(|&e| {
            if e.twin() < e {
                return false;
            }
            match (mesh[e].face, mesh[e.twin()].face) {
                (Some(f), Some(g)) => {
                    f != g
                        && mesh[f].kind == FaceKind::Interior
                        && mesh[g].kind == FaceKind::Interior
                }
                _ => false,
            }
        })
        .collect();
    if let Some(seed) = shuffle_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        walls.shuffle(&mut rng);
    }
    for e in walls {
        if !mesh[e].dead && convex_after_deleting(mesh, e) {
            trace!(edge = ?e, "deleting an inessential wall");
            mesh.delete_edge(e);
        }
    }
}

/// Merge faces that share no wall but meet around a common neighbour.
///
/// Two faces that both border a pivot face can sometimes be joined into one
/// convex face even though they are not adjacent: when they touch at a
/// vertex the pivot's boundary runs straight through, or when the stretch
/// of pivot boundary between them lies on a single line. The join routes a
/// pair of bridge edges around the pivot; the pivot itself keeps its
/// boundary.
pub fn merge_indirect_neighbours(mesh: &mut Mesh) {
    'scan: loop {
        for f in mesh.interior_faces().collect::<Vec<_>>() {
            let edges = mesh.face_edges(f);
            for (i, &e1) in edges.iter().enumerate() {
                for &e2 in &edges[i + 1..] {
                    if can_merge(mesh, e1, e2) {
                        debug!(?e1, ?e2, pivot = ?f, "bridge-merging around a face");
                        merge_pair(mesh, e1, e2);
                        continue 'scan;
                    }
                }
            }
        }
        break;
    }
}

/// Whether the faces across `e1` and `e2`, two walls of one pivot face, can
/// be bridge-merged into a single convex face.
///
/// The merged cycle follows the first face, crosses over along the chord
/// from `e1`'s head to `e2`'s tail, follows the second face, and returns
/// along the chord from `e2`'s head to `e1`'s tail. The quadrilateral
/// spanned by the two walls and the two chords is exactly the extra region
/// the merged face would swallow out of the pivot, so it must have area
/// zero; and the stitched corners must not turn left.
fn can_merge(mesh: &Mesh, e1: EdgeId, e2: EdgeId) -> bool {
    let t1 = e1.twin();
    let t2 = e2.twin();
    let (f1, f2) = match (mesh[t1].face, mesh[t2].face) {
        (Some(f1), Some(f2)) => (f1, f2),
        _ => return false,
    };
    if f1 == f2 || mesh[f1].kind != FaceKind::Interior || mesh[f2].kind != FaceKind::Interior {
        return false;
    }

    let a1 = mesh[t1].origin;
    let b1 = mesh[e2].origin;
    let a2 = mesh[t2].origin;
    let b2 = mesh[e1].origin;

    let quad = [
        mesh[b2].point.clone(),
        mesh[a1].point.clone(),
        mesh[b1].point.clone(),
        mesh[a2].point.clone(),
    ];
    if doubled_signed_area(&quad) != Rational::ZERO {
        return false;
    }

    let in1 = mesh[mesh[t1].prev].origin;
    let out1 = mesh.target(mesh[t2].next);
    let in2 = mesh[mesh[t2].prev].origin;
    let out2 = mesh.target(mesh[t1].next);
    stitch_is_convex(mesh, in1, a1, b1, out1) && stitch_is_convex(mesh, in2, a2, b2, out2)
}

/// The corner test at one end of a bridge merge: `before -> a` comes from
/// one face, `b -> after` continues into the other. When the chord is
/// degenerate (`a == b`) there is a single corner.
fn stitch_is_convex(mesh: &Mesh, before: VertexId, a: VertexId, b: VertexId, after: VertexId) -> bool {
    if a == b {
        turn(mesh, before, a, after) != Orientation::Left
    } else {
        turn(mesh, before, a, b) != Orientation::Left
            && turn(mesh, a, b, after) != Orientation::Left
    }
}

/// Join the faces across `e1` and `e2`, routing around their common
/// neighbour. The neighbour's cycle is untouched; the two bypassed twins
/// are parked on a Detached face and drop out of all live cycles.
fn merge_pair(mesh: &mut Mesh, e1: EdgeId, e2: EdgeId) {
    let t1 = e1.twin();
    let t2 = e2.twin();
    let keep = mesh[t1].face.expect("bridge-merging an unfaced edge");
    let gone = mesh[t2].face.expect("bridge-merging an unfaced edge");

    let a1 = mesh[t1].origin;
    let b1 = mesh[e2].origin;
    let a2 = mesh[t2].origin;
    let b2 = mesh[e1].origin;

    let t1_prev = mesh[t1].prev;
    let t1_next = mesh[t1].next;
    let t2_prev = mesh[t2].prev;
    let t2_next = mesh[t2].next;

    let detached = detached_face(mesh, t1);
    bridge(mesh, t1_prev, t2_next, a1, b1, detached);
    bridge(mesh, t2_prev, t1_next, a2, b2, detached);
    mesh[t1].face = Some(detached);
    mesh[t2].face = Some(detached);

    let start = t1_prev;
    let mut cur = start;
    loop {
        mesh[cur].face = Some(keep);
        cur = mesh[cur].next;
        if cur == start {
            break;
        }
    }
    mesh[keep].outer = start;
    mesh[gone].dead = true;

    #[cfg(any(test, feature = "slow-asserts"))]
    mesh.check_invariants();
}

/// Splice `before -> after`, either directly when the chord from `from` to
/// `to` is degenerate, or through a fresh edge pair whose back half goes
/// straight onto the detached face.
fn bridge(mesh: &mut Mesh, before: EdgeId, after: EdgeId, from: VertexId, to: VertexId, detached: FaceId) {
    if from == to {
        mesh[before].next = after;
        mesh[after].prev = before;
        return;
    }
    let h = mesh.push_edge(from, None);
    let back = mesh.push_edge(to, Some(detached));
    debug_assert_eq!(h.twin(), back);
    mesh[before].next = h;
    mesh[h].prev = before;
    mesh[h].next = after;
    mesh[after].prev = h;
}

/// The face that collects bypassed half-edges, created on first use.
fn detached_face(mesh: &mut Mesh, representative: EdgeId) -> FaceId {
    for (i, f) in mesh.faces.iter().enumerate() {
        if !f.dead && f.kind == FaceKind::Detached {
            return FaceId(i);
        }
    }
    mesh.push_face(representative, FaceKind::Detached)
}

fn turn(mesh: &Mesh, a: VertexId, b: VertexId, c: VertexId) -> Orientation {
    orientation(&mesh[a].point, &mesh[b].point, &mesh[c].point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{is_convex, signed_area, Point};
    use crate::num::int;
    use crate::sweep::monotonize;
    use crate::triangulate::triangulate;

    fn pts(coords: &[(i64, i64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    fn decomposed(outer: &[(i64, i64)], holes: &[&[(i64, i64)]]) -> Mesh {
        let holes = holes.iter().map(|h| pts(h)).collect();
        let mut mesh = Mesh::from_rings(pts(outer), holes).unwrap();
        monotonize(&mut mesh);
        triangulate(&mut mesh, false);
        mesh
    }

    fn interior_rings(mesh: &Mesh) -> Vec<Vec<Point>> {
        mesh.interior_faces().map(|f| mesh.face_points(f)).collect()
    }

    fn total_area(rings: &[Vec<Point>]) -> Rational {
        rings
            .iter()
            .fold(Rational::ZERO, |acc, r| acc + signed_area(r))
    }

    fn vertex_at(mesh: &Mesh, x: i64, y: i64) -> VertexId {
        let p = Point::from((x, y));
        for (i, v) in mesh.vertices.iter().enumerate() {
            if v.point == p {
                return VertexId(i);
            }
        }
        panic!("no vertex at ({x}, {y})");
    }

    fn edge_from(mesh: &Mesh, a: (i64, i64), b: (i64, i64)) -> EdgeId {
        let a = Point::from(a);
        let b = Point::from(b);
        mesh.live_edges()
            .find(|&e| {
                let (p, q) = mesh.edge_points(e);
                *p == a && *q == b
            })
            .expect("no such edge")
    }

    #[test]
    fn square_merges_back_into_one_piece() {
        let mut mesh = decomposed(&[(0, 0), (4, 0), (4, 4), (0, 4)], &[]);
        assert_eq!(mesh.interior_faces().count(), 2);
        merge_adjacent_faces(&mut mesh);
        let rings = interior_rings(&mesh);
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert_eq!(total_area(&rings), int(16));
    }

    #[test]
    fn l_shape_merges_into_two_pieces() {
        let mut mesh = decomposed(&[(0, 0), (4, 0), (4, 2), (2, 2), (2, 4), (0, 4)], &[]);
        assert_eq!(mesh.interior_faces().count(), 4);
        merge_adjacent_faces(&mut mesh);
        let rings = interior_rings(&mesh);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| is_convex(r)));
        assert_eq!(total_area(&rings), int(12));
    }

    #[test]
    fn hertel_mehlhorn_matches_on_the_l_shape() {
        let mut mesh = decomposed(&[(0, 0), (4, 0), (4, 2), (2, 2), (2, 4), (0, 4)], &[]);
        hertel_mehlhorn(&mut mesh, None);
        let rings = interior_rings(&mesh);
        assert_eq!(rings.len(), 2);
        assert!(rings.iter().all(|r| r.len() == 4 && is_convex(r)));
        assert_eq!(total_area(&rings), int(12));
    }

    #[test]
    fn hertel_mehlhorn_is_reproducible_under_shuffling() {
        let outer = [(0, 0), (6, 0), (6, 6), (0, 6)];
        let hole = [(2, 2), (4, 2), (3, 4)];
        let mut first = decomposed(&outer, &[&hole]);
        let mut second = decomposed(&outer, &[&hole]);
        hertel_mehlhorn(&mut first, Some(42));
        hertel_mehlhorn(&mut second, Some(42));
        let rings = interior_rings(&first);
        assert_eq!(rings, interior_rings(&second));
        assert!(rings.iter().all(|r| is_convex(r)));
        assert_eq!(total_area(&rings), int(34));
    }

    #[test]
    fn hole_pieces_stay_convex() {
        let mut mesh = decomposed(&[(0, 0), (6, 0), (6, 6), (0, 6)], &[&[(2, 2), (4, 2), (3, 4)]]);
        assert_eq!(mesh.interior_faces().count(), 7);
        merge_adjacent_faces(&mut mesh);
        let rings = interior_rings(&mesh);
        assert!(rings.len() >= 2);
        assert!(rings.iter().all(|r| is_convex(r)));
        assert_eq!(total_area(&rings), int(34));
    }

    #[test]
    fn full_strategy_on_a_clean_shape() {
        let mut mesh = decomposed(&[(0, 0), (4, 0), (4, 2), (2, 2), (2, 4), (0, 4)], &[]);
        merge_faces(&mut mesh, MergeStrategy::Full, None);
        let rings = interior_rings(&mesh);
        assert_eq!(rings.len(), 2);
        assert_eq!(total_area(&rings), int(12));
    }

    #[test]
    fn bridge_merge_rejects_swallowing_the_pivot() {
        // Two triangles flank a third one; joining them around it would
        // annex it wholesale, so the quadrilateral test has to say no.
        let mut mesh =
            Mesh::from_rings(pts(&[(0, 0), (4, 0), (8, 0), (8, 2), (0, 2)]), Vec::new()).unwrap();
        let mid = vertex_at(&mesh, 4, 0);
        let left = vertex_at(&mesh, 0, 2);
        let right = vertex_at(&mesh, 8, 2);
        mesh.insert_edge(mid, left).unwrap();
        mesh.insert_edge(mid, right).unwrap();
        mesh.recompute_faces();
        assert_eq!(mesh.interior_faces().count(), 3);

        merge_indirect_neighbours(&mut mesh);
        assert_eq!(mesh.interior_faces().count(), 3);
    }

    #[test]
    fn bridge_merge_around_a_flat_valley() {
        // W-shaped ring. The bottom face's boundary runs straight through
        // the valley vertex (4, 2), and the two pockets above it touch
        // there. Bridging them keeps all areas exact; the full pass still
        // declines the pair because the union pinches at the valley.
        let ring = [(0, 0), (8, 0), (7, 2), (8, 5), (4, 2), (0, 5), (1, 2)];
        let mut mesh = Mesh::from_rings(pts(&ring), Vec::new()).unwrap();
        let v = vertex_at(&mesh, 4, 2);
        mesh.insert_edge(vertex_at(&mesh, 1, 2), v).unwrap();
        mesh.insert_edge(v, vertex_at(&mesh, 7, 2)).unwrap();
        mesh.recompute_faces();
        assert_eq!(mesh.interior_faces().count(), 3);

        let e1 = edge_from(&mesh, (1, 2), (4, 2));
        let e2 = edge_from(&mesh, (4, 2), (7, 2));
        assert!(!can_merge(&mesh, e1, e2));

        merge_pair(&mut mesh, e1, e2);
        let rings = interior_rings(&mesh);
        assert_eq!(rings.len(), 2);
        assert_eq!(total_area(&rings), int(23));
        let mut areas: Vec<Rational> = rings.iter().map(|r| signed_area(r)).collect();
        areas.sort();
        assert_eq!(areas, vec![int(9), int(14)]);

        let detached: Vec<FaceId> = mesh
            .faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.dead && f.kind == FaceKind::Detached)
            .map(|(i, _)| FaceId(i))
            .collect();
        assert_eq!(detached.len(), 1);
        assert_eq!(mesh[e1.twin()].face, Some(detached[0]));
        assert_eq!(mesh[e2.twin()].face, Some(detached[0]));

        // Rebuilding faces keeps the bypassed edges quarantined.
        mesh.recompute_faces();
        let rings = interior_rings(&mesh);
        assert_eq!(rings.len(), 2);
        assert_eq!(total_area(&rings), int(23));
    }
}
