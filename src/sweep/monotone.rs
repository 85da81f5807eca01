//! Splitting the polygon interior into y-monotone faces.

use tracing::{debug, trace};

use crate::mesh::{EdgeId, Mesh, VertexId, VertexKind};
use crate::sweep::status::SweepStatus;

/// Insert diagonals until every interior face is y-monotone, then recompute
/// the face structure.
///
/// One downward pass over the vertices in sweep order. A Split vertex is
/// connected upward immediately, to the helper of the interval it splits. A
/// Merge vertex becomes the helper of the interval it closes into, and a
/// later vertex of that interval, the first one to see it still pending,
/// connects down to it.
pub fn monotonize(mesh: &mut Mesh) {
    let order = mesh.sweep_sorted_vertices();
    let mut status = SweepStatus::new();

    for v in order {
        let kind = mesh[v]
            .kind
            .expect("vertices are classified at construction");
        let y = mesh[v].point.y.clone();
        trace!(?v, ?kind, point = ?mesh[v].point, "sweep event");

        match kind {
            VertexKind::Start => {
                let e = mesh[v].incident;
                set_helper(mesh, e, v);
                status.insert(mesh, e, &y);
            }
            VertexKind::End => {
                let e = mesh[mesh[v].incident].prev;
                connect_if_merge_pending(mesh, e, v);
                status.remove(mesh, e, &y);
            }
            VertexKind::Split => {
                let p = mesh[v].point.clone();
                let left = status.range_query(mesh, &p).left;
                let above = mesh[left]
                    .helper
                    .expect("resident edges carry a helper");
                connect(mesh, v, above);
                set_helper(mesh, left, v);
                let e = mesh[v].incident;
                set_helper(mesh, e, v);
                status.insert(mesh, e, &y);
            }
            VertexKind::Merge => {
                let right = mesh[mesh[v].incident].prev;
                connect_if_merge_pending(mesh, right, v);
                status.remove(mesh, right, &y);
                let p = mesh[v].point.clone();
                let left = status.range_query(mesh, &p).left;
                connect_if_merge_pending(mesh, left, v);
                set_helper(mesh, left, v);
            }
            VertexKind::RegularRight => {
                // Interior to the right: this vertex joins two left-bounding
                // edges of the same interval. Swap the closing one for the
                // opening one.
                let incident = mesh[v].incident;
                let target = mesh.target(incident);
                let (upper, lower) = if mesh[target].point < mesh[v].point {
                    (incident, mesh[incident].prev)
                } else {
                    (mesh[incident].prev, incident)
                };
                connect_if_merge_pending(mesh, upper, v);
                status.remove(mesh, upper, &y);
                status.insert(mesh, lower, &y);
                set_helper(mesh, lower, v);
            }
            VertexKind::RegularLeft => {
                let p = mesh[v].point.clone();
                let left = status.range_query(mesh, &p).left;
                connect_if_merge_pending(mesh, left, v);
                set_helper(mesh, left, v);
            }
        }
    }
    debug_assert!(status.is_empty(), "intervals left open after the sweep");

    mesh.recompute_faces();
}

/// Record `v` as the helper of `e`. Both halves of the pair carry the
/// helper, so later reads agree no matter which half they go through.
fn set_helper(mesh: &mut Mesh, e: EdgeId, v: VertexId) {
    mesh[e].helper = Some(v);
    mesh[e.twin()].helper = Some(v);
}

/// Connect `v` down to the helper of `e` if that helper is a Merge vertex
/// still waiting for its diagonal.
fn connect_if_merge_pending(mesh: &mut Mesh, e: EdgeId, v: VertexId) {
    let Some(h) = mesh[e].helper else {
        return;
    };
    if mesh[h].kind == Some(VertexKind::Merge) {
        connect(mesh, v, h);
    }
}

fn connect(mesh: &mut Mesh, v: VertexId, to: VertexId) {
    debug!(?v, ?to, "inserting diagonal");
    mesh.insert_edge(v, to);
}
