//! The half-edge mesh (doubly connected edge list) that every pipeline stage
//! mutates in place.
//!
//! Each undirected edge is a pair of directed half-edges stored in adjacent
//! arena slots, so a half-edge's twin is its index with the low bit flipped:
//!
//! ```text
//!            e (even slot)
//!     a ------------------> b
//!     a <------------------ b
//!          e ^ 1 (odd slot)
//! ```
//!
//! Ring construction wires the forward half-edges (`a -> b` in input order)
//! into one `next`-cycle and their twins into the reversed cycle. With a
//! counter-clockwise outer ring this puts the interior face on the reversed
//! side, so walking an interior face via `prev` recovers counter-clockwise
//! order; [`Mesh::face_points`] does exactly that.
//!
//! Deleting an edge tombstones it (`dead`) rather than compacting the arena,
//! so indices stay valid for the life of the mesh. Face ids, in contrast,
//! are renumbered wholesale by [`Mesh::recompute_faces`].

use malachite::num::basic::traits::Zero;
use malachite::Rational;

use crate::geom::{
    descends, doubled_signed_area, leftmost_is_first, EdgeAngle, Point,
};
use crate::Error;

macro_rules! mesh_idx {
    ($(#[$attr:meta])* $name:ident, $prefix:expr) => {
        $(#[$attr])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

mesh_idx!(
    /// An index into [`Mesh::vertices`].
    VertexId,
    "v"
);
mesh_idx!(
    /// An index into [`Mesh::edges`]. Twin half-edges differ in the low bit.
    EdgeId,
    "e"
);
mesh_idx!(
    /// An index into [`Mesh::faces`].
    FaceId,
    "f"
);

impl EdgeId {
    /// The other half of the same undirected edge.
    #[inline]
    pub fn twin(self) -> EdgeId {
        EdgeId(self.0 ^ 1)
    }
}

/// How a vertex relates to the downward sweep. Computed by
/// [`Mesh::classify_vertices`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VertexKind {
    /// Local top: both neighbours come later in the sweep and the interior
    /// wedge opens below.
    Start,
    /// Local bottom: both neighbours come earlier and the interior closes
    /// here.
    End,
    /// Local top whose interior lies above (a reflex top, or the top of a
    /// hole); the sweep must connect it upward with a diagonal.
    Split,
    /// Local bottom whose interior continues below (a reflex bottom, or the
    /// bottom of a hole); some later vertex must connect down to it.
    Merge,
    /// The interior lies to the left of the boundary here.
    RegularLeft,
    /// The interior lies to the right of the boundary here.
    RegularRight,
}

/// What a face represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceKind {
    /// The unbounded face outside the outer ring.
    Outer,
    /// Part of the polygon interior.
    Interior,
    /// The inside of a hole ring.
    Hole,
    /// Half-edges bypassed by the indirect merge; never exported.
    Detached,
}

/// A polygon vertex.
#[derive(Clone, Debug)]
pub struct Vertex {
    /// Position.
    pub point: Point,
    /// The forward half-edge leaving this vertex, from ring construction.
    /// Unlike `next`/`prev` chains this never changes, so `incident` hops
    /// always traverse the original input ring.
    pub incident: EdgeId,
    /// Sweep classification, once computed.
    pub kind: Option<VertexKind>,
}

/// One directed half of an edge.
#[derive(Clone, Debug)]
pub struct HalfEdge {
    /// The vertex this half-edge leaves.
    pub origin: VertexId,
    /// The next half-edge along the incident face's boundary cycle.
    pub next: EdgeId,
    /// The previous half-edge along the incident face's boundary cycle.
    pub prev: EdgeId,
    /// The face this half-edge bounds. `None` for freshly inserted edges
    /// until [`Mesh::recompute_faces`] runs.
    pub face: Option<FaceId>,
    /// Sweep scratch: the helper vertex of the interval this edge bounds.
    pub helper: Option<VertexId>,
    /// Traversal scratch for cycle walks; always false between passes.
    pub marked: bool,
    /// Tombstone. Dead half-edges stay in the arena but are skipped.
    pub dead: bool,
}

/// A face of the subdivision.
#[derive(Clone, Debug)]
pub struct Face {
    /// One half-edge on this face's boundary cycle.
    pub outer: EdgeId,
    /// What this face represents.
    pub kind: FaceKind,
    /// Tombstone for faces absorbed by a merge.
    pub dead: bool,
}

/// A half-edge mesh of the polygon and its decomposition.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex arena. Vertices are never deleted.
    pub vertices: Vec<Vertex>,
    /// Half-edge arena; twins occupy adjacent slots.
    pub edges: Vec<HalfEdge>,
    /// Face arena; renumbered by [`Mesh::recompute_faces`].
    pub faces: Vec<Face>,
}

impl std::ops::Index<VertexId> for Mesh {
    type Output = Vertex;
    fn index(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0]
    }
}

impl std::ops::IndexMut<VertexId> for Mesh {
    fn index_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0]
    }
}

impl std::ops::Index<EdgeId> for Mesh {
    type Output = HalfEdge;
    fn index(&self, id: EdgeId) -> &HalfEdge {
        &self.edges[id.0]
    }
}

impl std::ops::IndexMut<EdgeId> for Mesh {
    fn index_mut(&mut self, id: EdgeId) -> &mut HalfEdge {
        &mut self.edges[id.0]
    }
}

impl std::ops::Index<FaceId> for Mesh {
    type Output = Face;
    fn index(&self, id: FaceId) -> &Face {
        &self.faces[id.0]
    }
}

impl std::ops::IndexMut<FaceId> for Mesh {
    fn index_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.0]
    }
}

/// Check a ring's vertex count and degeneracy, and orient it as requested.
fn normalize_ring(mut ring: Vec<Point>, counter_clockwise: bool) -> Result<Vec<Point>, Error> {
    if ring.len() < 3 {
        return Err(Error::TooFewVertices { found: ring.len() });
    }
    for i in 0..ring.len() {
        if ring[i] == ring[(i + 1) % ring.len()] {
            return Err(Error::RepeatedVertex);
        }
    }
    let area = doubled_signed_area(&ring);
    if area == Rational::ZERO {
        return Err(Error::DegenerateRing);
    }
    if (area > Rational::ZERO) != counter_clockwise {
        ring.reverse();
    }
    Ok(ring)
}

impl Mesh {
    /// Build a mesh from an outer ring and zero or more hole rings.
    ///
    /// Rings are open vertex lists (the closing edge is implicit) and may
    /// come in either orientation; they are normalized so the outer ring
    /// runs counter-clockwise and holes run clockwise. Rings with fewer
    /// than three vertices, repeated consecutive vertices, or zero area are
    /// rejected. Self-intersecting or mutually crossing rings are not
    /// detected; the result for such input is unspecified.
    ///
    /// Vertices are classified before this returns.
    pub fn from_rings(outer: Vec<Point>, holes: Vec<Vec<Point>>) -> Result<Mesh, Error> {
        let mut mesh = Mesh {
            vertices: Vec::new(),
            edges: Vec::new(),
            faces: Vec::new(),
        };

        let placeholder = EdgeId(usize::MAX);
        let outer_face = mesh.push_face(placeholder, FaceKind::Outer);
        let interior = mesh.push_face(placeholder, FaceKind::Interior);

        let ring = normalize_ring(outer, true)?;
        let first = mesh.add_ring(ring, outer_face, interior);
        mesh[outer_face].outer = first;
        mesh[interior].outer = first.twin();

        for hole in holes {
            let ring = normalize_ring(hole, false)?;
            let hole_face = mesh.push_face(placeholder, FaceKind::Hole);
            let first = mesh.add_ring(ring, hole_face, interior);
            mesh[hole_face].outer = first;
        }

        mesh.classify_vertices();

        #[cfg(any(test, feature = "slow-asserts"))]
        mesh.check_invariants();

        Ok(mesh)
    }

    pub(crate) fn push_face(&mut self, outer: EdgeId, kind: FaceKind) -> FaceId {
        let id = FaceId(self.faces.len());
        self.faces.push(Face {
            outer,
            kind,
            dead: false,
        });
        id
    }

    pub(crate) fn push_edge(&mut self, origin: VertexId, face: Option<FaceId>) -> EdgeId {
        let id = EdgeId(self.edges.len());
        self.edges.push(HalfEdge {
            origin,
            next: id,
            prev: id,
            face,
            helper: None,
            marked: false,
            dead: false,
        });
        id
    }

    /// Add one ring: forward half-edges (input order) bound `forward_face`,
    /// their twins bound `backward_face`. Returns the first forward edge.
    fn add_ring(&mut self, points: Vec<Point>, forward_face: FaceId, backward_face: FaceId) -> EdgeId {
        let base_v = self.vertices.len();
        let base_e = self.edges.len();
        let n = points.len();

        for point in points {
            self.vertices.push(Vertex {
                point,
                incident: EdgeId(usize::MAX),
                kind: None,
            });
        }
        for i in 0..n {
            let a = VertexId(base_v + i);
            let b = VertexId(base_v + (i + 1) % n);
            let fwd = self.push_edge(a, Some(forward_face));
            let bwd = self.push_edge(b, Some(backward_face));
            debug_assert_eq!(fwd.twin(), bwd);
            self[a].incident = fwd;
        }
        for i in 0..n {
            let fwd = EdgeId(base_e + 2 * i);
            let fwd_next = EdgeId(base_e + 2 * ((i + 1) % n));
            self[fwd].next = fwd_next;
            self[fwd_next].prev = fwd;
            // The twins chain in the opposite direction.
            self[fwd_next.twin()].next = fwd.twin();
            self[fwd.twin()].prev = fwd_next.twin();
        }
        EdgeId(base_e)
    }

    /// The vertex this half-edge points at.
    #[inline]
    pub fn target(&self, e: EdgeId) -> VertexId {
        self[e.twin()].origin
    }

    /// The two endpoints of a half-edge, origin first.
    pub fn edge_points(&self, e: EdgeId) -> (&Point, &Point) {
        (&self[self[e].origin].point, &self[self.target(e)].point)
    }

    /// Live (non-tombstoned) half-edges, in arena order.
    pub fn live_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.dead)
            .map(|(i, _)| EdgeId(i))
    }

    /// Live faces of the polygon interior, in arena order.
    pub fn interior_faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.dead && f.kind == FaceKind::Interior)
            .map(|(i, _)| FaceId(i))
    }

    /// All vertex ids, sorted by sweep order (top to bottom, ties left to
    /// right).
    pub fn sweep_sorted_vertices(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = (0..self.vertices.len()).map(VertexId).collect();
        ids.sort_by(|a, b| self[*a].point.cmp(&self[*b].point));
        ids
    }

    /// The boundary cycle of a face, following `next` from its
    /// representative edge.
    pub fn face_edges(&self, f: FaceId) -> Vec<EdgeId> {
        let start = self[f].outer;
        let mut edges = Vec::new();
        let mut e = start;
        loop {
            edges.push(e);
            e = self[e].next;
            if e == start {
                break;
            }
        }
        edges
    }

    /// The boundary of a face as points, walking `prev` so that interior
    /// faces come out counter-clockwise (the construction orientation).
    pub fn face_points(&self, f: FaceId) -> Vec<Point> {
        let start = self[f].outer;
        let mut points = Vec::new();
        let mut e = start;
        loop {
            points.push(self[self[e].origin].point.clone());
            e = self[e].prev;
            if e == start {
                break;
            }
        }
        points
    }

    /// Render the live interior faces as filled paths, one color per face.
    ///
    /// Coordinates are rounded to `f64` and the y axis is flipped, since
    /// svg grows downward.
    #[cfg(feature = "debug-svg")]
    pub fn dump_svg(&self, color: impl Fn(FaceId) -> String) -> svg::Document {
        use malachite::num::conversion::traits::RoundingFrom;
        use malachite::rounding_modes::RoundingMode;

        let approx = |v: &Vertex| {
            let x = f64::rounding_from(&v.point.x, RoundingMode::Nearest).0;
            let y = f64::rounding_from(&v.point.y, RoundingMode::Nearest).0;
            (x, -y)
        };

        let mut document = svg::Document::new();
        if self.vertices.is_empty() {
            return document;
        }
        let mut min = approx(&self.vertices[0]);
        let mut max = min;
        for v in &self.vertices {
            let (x, y) = approx(v);
            min = (min.0.min(x), min.1.min(y));
            max = (max.0.max(x), max.1.max(y));
        }
        let extent = (max.0 - min.0).max(max.1 - min.1);
        let pad = extent * 0.05 + 1.0;
        let stroke_width = extent / 256.0 + 0.01;
        document = document.set(
            "viewBox",
            (
                min.0 - pad,
                min.1 - pad,
                max.0 - min.0 + 2.0 * pad,
                max.1 - min.1 + 2.0 * pad,
            ),
        );

        for f in self.interior_faces() {
            let mut data = svg::node::element::path::Data::new();
            for (i, e) in self.face_edges(f).into_iter().enumerate() {
                let p = approx(&self[self[e].origin]);
                if i == 0 {
                    data = data.move_to(p);
                } else {
                    data = data.line_to(p);
                }
            }
            let path = svg::node::element::Path::new()
                .set("fill", color(f))
                .set("fill-opacity", "0.6")
                .set("stroke", "black")
                .set("stroke-width", stroke_width)
                .set("d", data.close());
            document = document.add(path);
        }
        document
    }

    /// Is the edge `(from, to)` angularly between `candidate` and the
    /// reversal of `candidate.prev`, counter-clockwise? This is the slot
    /// test for [`Mesh::insert_edge`]: each outgoing half-edge at a vertex
    /// owns the angular interval swept from its predecessor's reversed
    /// direction to its own.
    fn slot_matches(&self, from: VertexId, to: VertexId, candidate: EdgeId) -> bool {
        let p = &self[from].point;
        let own = EdgeAngle::between(p, &self[self.target(candidate)].point);
        let prev = EdgeAngle::between(p, &self[self[self[candidate].prev].origin].point);
        let new = EdgeAngle::between(p, &self[to].point);
        new.strictly_between(&prev, &own)
    }

    /// Outgoing half-edges of `v`, rotating via `twin().next`.
    fn outgoing_edges(&self, v: VertexId) -> Vec<EdgeId> {
        let start = self[v].incident;
        let mut out = Vec::new();
        let mut e = start;
        loop {
            debug_assert_eq!(self[e].origin, v);
            out.push(e);
            e = self[e.twin()].next;
            if e == start {
                break;
            }
        }
        out
    }

    /// Insert the edge `(a, b)` as a new twin pair, splicing both endpoints
    /// into the angular slot found with the in-between test. The new
    /// half-edges have no face; call [`Mesh::recompute_faces`] after a batch
    /// of insertions.
    ///
    /// Inserting an edge that already exists is a no-op (logged, returns
    /// `None`). Returns the `a -> b` half on success.
    pub fn insert_edge(&mut self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        debug_assert_ne!(a, b);
        let a_out = self.outgoing_edges(a);
        if a_out.iter().any(|&e| self.target(e) == b) {
            tracing::debug!(?a, ?b, "skipping duplicate edge insertion");
            return None;
        }

        let a_slot = match a_out.iter().copied().find(|&e| self.slot_matches(a, b, e)) {
            Some(e) => e,
            None => panic!("no angular slot at {a:?} for {a:?} -> {b:?}"),
        };
        let b_out = self.outgoing_edges(b);
        let b_slot = match b_out.iter().copied().find(|&e| self.slot_matches(b, a, e)) {
            Some(e) => e,
            None => panic!("no angular slot at {b:?} for {a:?} -> {b:?}"),
        };

        let h1 = self.push_edge(a, None);
        let h2 = self.push_edge(b, None);
        debug_assert_eq!(h1.twin(), h2);

        let a_slot_prev = self[a_slot].prev;
        let b_slot_prev = self[b_slot].prev;

        self[h1].next = b_slot;
        self[h1].prev = a_slot_prev;
        self[h2].next = a_slot;
        self[h2].prev = b_slot_prev;

        self[a_slot_prev].next = h1;
        self[b_slot_prev].next = h2;
        self[a_slot].prev = h2;
        self[b_slot].prev = h1;

        Some(h1)
    }

    /// Delete a twin pair, merging the face across `e.twin()` into the face
    /// across `e`. The surviving cycle is re-faced and the absorbed face
    /// tombstoned. The two faces must be distinct.
    pub fn delete_edge(&mut self, e: EdgeId) {
        let t = e.twin();
        debug_assert!(!self[e].dead);
        let f = match self[e].face {
            Some(f) => f,
            None => panic!("deleting {e:?} before faces were computed"),
        };
        let g = match self[t].face {
            Some(g) => g,
            None => panic!("deleting {t:?} before faces were computed"),
        };
        debug_assert_ne!(f, g, "deleting {e:?} would disconnect its own face");

        let e_prev = self[e].prev;
        let e_next = self[e].next;
        let t_prev = self[t].prev;
        let t_next = self[t].next;

        self[e_prev].next = t_next;
        self[e_next].prev = t_prev;
        self[t_prev].next = e_next;
        self[t_next].prev = e_prev;

        if self[f].outer == e {
            self[f].outer = e_next;
        }
        let mut cur = e_next;
        loop {
            self[cur].face = Some(f);
            cur = self[cur].next;
            if cur == e_next {
                break;
            }
        }

        self[g].dead = true;
        self[e].dead = true;
        self[t].dead = true;
    }

    /// Throw away the face arena and rebuild it from the half-edge cycles.
    ///
    /// Each cycle inherits the kind of the old face of its first member (in
    /// arena order); cycles made entirely of fresh edges become Interior.
    /// Detached edges are carried over as-is, since their pointers are not
    /// part of any live cycle. Face ids are not stable across this call.
    pub fn recompute_faces(&mut self) {
        let old_faces = std::mem::take(&mut self.faces);
        let mut detached: Option<FaceId> = None;
        for i in 0..self.edges.len() {
            let eid = EdgeId(i);
            if self.edges[i].dead {
                continue;
            }
            let was_detached = matches!(
                self.edges[i].face,
                Some(old) if old_faces[old.0].kind == FaceKind::Detached
            );
            if was_detached {
                let fid = match detached {
                    Some(f) => f,
                    None => {
                        let f = self.push_face(eid, FaceKind::Detached);
                        detached = Some(f);
                        f
                    }
                };
                self.edges[i].face = Some(fid);
                continue;
            }
            if self.edges[i].marked {
                continue;
            }
            let kind = match self.edges[i].face {
                Some(old) => old_faces[old.0].kind,
                None => FaceKind::Interior,
            };
            let fid = self.push_face(eid, kind);
            let mut cur = eid;
            while !self[cur].marked {
                self[cur].marked = true;
                self[cur].face = Some(fid);
                cur = self[cur].next;
            }
        }
        for edge in &mut self.edges {
            edge.marked = false;
        }

        #[cfg(any(test, feature = "slow-asserts"))]
        self.check_invariants();
    }

    /// Rotate every point 90 degrees clockwise and re-classify.
    pub fn rotate_right(&mut self) {
        for v in &mut self.vertices {
            let x = std::mem::replace(&mut v.point.x, Rational::ZERO);
            let y = std::mem::replace(&mut v.point.y, Rational::ZERO);
            v.point.x = y;
            v.point.y = -x;
        }
        self.classify_vertices();
    }

    /// Rotate every point 90 degrees counter-clockwise and re-classify.
    pub fn rotate_left(&mut self) {
        for v in &mut self.vertices {
            let x = std::mem::replace(&mut v.point.x, Rational::ZERO);
            let y = std::mem::replace(&mut v.point.y, Rational::ZERO);
            v.point.x = -y;
            v.point.y = x;
        }
        self.classify_vertices();
    }

    /// Classify every ring vertex relative to the downward sweep.
    ///
    /// Meaningful on a freshly built (or rotated) mesh, before diagonals are
    /// inserted: the walk follows `incident` hops, which always trace the
    /// original input rings.
    pub fn classify_vertices(&mut self) {
        for i in 0..self.faces.len() {
            if self.faces[i].dead {
                continue;
            }
            let seed = self[self.faces[i].outer].origin;
            match self.faces[i].kind {
                FaceKind::Interior => self.classify_ring(seed, false),
                FaceKind::Hole => self.classify_ring(seed, true),
                _ => {}
            }
        }
    }

    fn classify_ring(&mut self, seed: VertexId, hole: bool) {
        let mut ring = vec![seed];
        let mut v = self.target(self[seed].incident);
        while v != seed {
            ring.push(v);
            v = self.target(self[v].incident);
        }
        let n = ring.len();

        // The ring's sweep-first vertex: topmost, ties broken leftmost.
        let mut top = 0;
        for k in 1..n {
            if self[ring[k]].point < self[ring[top]].point {
                top = k;
            }
        }
        // The top of the outer ring opens the interior downward; the top of
        // a hole splits the interior around it.
        self[ring[top]].kind = Some(if hole { VertexKind::Split } else { VertexKind::Start });

        // Both edges at the top descend, and walking in input order the
        // first of them runs down the left side of an outer ring (the right
        // side of a hole).
        let mut up = false;
        let mut left_of_boundary = !hole;

        for k in 1..n {
            let prev = ring[(top + k - 1) % n];
            let current = ring[(top + k) % n];
            let next = ring[(top + k + 1) % n];

            let kind = {
                let pp = &self[prev].point;
                let pc = &self[current].point;
                let pn = &self[next].point;
                if descends(pc, pn) {
                    if !up {
                        // Still going down: a regular vertex.
                        if left_of_boundary != hole {
                            VertexKind::RegularRight
                        } else {
                            VertexKind::RegularLeft
                        }
                    } else {
                        // Reversal from up to down: a local top.
                        up = false;
                        let fwd = EdgeAngle::between(pc, pn);
                        let back = EdgeAngle::between(pc, pp);
                        let fwd_leftmost = leftmost_is_first(&fwd, &back, up);
                        let kind = if (left_of_boundary == fwd_leftmost) != hole {
                            VertexKind::Split
                        } else {
                            VertexKind::Start
                        };
                        left_of_boundary = !left_of_boundary;
                        kind
                    }
                } else if up {
                    // Still going up: a regular vertex.
                    if left_of_boundary != hole {
                        VertexKind::RegularRight
                    } else {
                        VertexKind::RegularLeft
                    }
                } else {
                    // Reversal from down to up: a local bottom.
                    up = true;
                    let fwd = EdgeAngle::between(pc, pn);
                    let back = EdgeAngle::between(pc, pp);
                    let fwd_leftmost = leftmost_is_first(&fwd, &back, up);
                    let kind = if (left_of_boundary == fwd_leftmost) != hole {
                        VertexKind::Merge
                    } else {
                        VertexKind::End
                    };
                    left_of_boundary = !left_of_boundary;
                    kind
                }
            };
            self[current].kind = Some(kind);
        }
    }

    /// Structural self-checks: twin pairing, cycle reciprocity, origin
    /// consistency, and face liveness. Panics on violation.
    pub fn check_invariants(&self) {
        for e in self.live_edges() {
            let rec = &self[e];
            assert!(!self[e.twin()].dead, "{e:?} is live but its twin is dead");
            if let Some(f) = rec.face {
                assert!(!self[f].dead, "{e:?} points at dead face {f:?}");
                // A bypassed edge keeps whatever pointers it had when a merge
                // routed around it, so its cycle is not checked.
                if self[f].kind == FaceKind::Detached {
                    continue;
                }
            }
            assert_eq!(self[rec.next].prev, e, "next/prev mismatch at {e:?}");
            assert_eq!(self[rec.prev].next, e, "prev/next mismatch at {e:?}");
            assert_eq!(
                self[rec.next].origin,
                self.target(e),
                "cycle at {e:?} skips a vertex"
            );
        }
        for (i, f) in self.faces.iter().enumerate() {
            if f.dead {
                continue;
            }
            let fid = FaceId(i);
            assert!(!self[f.outer].dead, "{fid:?} represented by dead edge");
            if let Some(owner) = self[f.outer].face {
                assert_eq!(owner, fid, "{fid:?} representative owned by {owner:?}");
            }
        }
        for (i, v) in self.vertices.iter().enumerate() {
            assert!(!self[v.incident].dead, "v{i} has a dead incident edge");
            assert_eq!(self[v.incident].origin, VertexId(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::signed_area;

    fn pts(coords: &[(i64, i64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    fn square() -> Vec<Point> {
        pts(&[(0, 0), (4, 0), (4, 4), (0, 4)])
    }

    fn l_hexagon() -> Vec<Point> {
        pts(&[(0, 0), (4, 0), (4, 2), (2, 2), (2, 4), (0, 4)])
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

    fn kind_at(mesh: &Mesh, x: i64, y: i64) -> VertexKind {
        mesh[vertex_at(mesh, x, y)].kind.expect("classified")
    }

    #[test]
    fn square_construction() {
        let mesh = Mesh::from_rings(square(), vec![]).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.edges.len(), 8);
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh[FaceId(0)].kind, FaceKind::Outer);
        assert_eq!(mesh[FaceId(1)].kind, FaceKind::Interior);

        let ring = mesh.face_points(FaceId(1));
        assert_eq!(ring.len(), 4);
        assert_eq!(signed_area(&ring), Rational::from(16));
    }

    #[test]
    fn clockwise_input_is_normalized() {
        let mut reversed = square();
        reversed.reverse();
        let mesh = Mesh::from_rings(reversed, vec![]).unwrap();
        let ring = mesh.face_points(FaceId(1));
        assert!(signed_area(&ring) > Rational::ZERO);
    }

    #[test]
    fn construction_errors() {
        use assert_matches::assert_matches;

        assert_matches!(
            Mesh::from_rings(pts(&[(0, 0), (1, 0)]), vec![]),
            Err(Error::TooFewVertices { found: 2 })
        );
        assert_matches!(
            Mesh::from_rings(pts(&[(0, 0), (1, 0), (1, 0), (0, 1)]), vec![]),
            Err(Error::RepeatedVertex)
        );
        assert_matches!(
            Mesh::from_rings(pts(&[(0, 0), (1, 1), (2, 2)]), vec![]),
            Err(Error::DegenerateRing)
        );
        assert_matches!(
            Mesh::from_rings(square(), vec![pts(&[(1, 1), (2, 1)])]),
            Err(Error::TooFewVertices { found: 2 })
        );
    }

    #[test]
    fn l_hexagon_classification() {
        let mesh = Mesh::from_rings(l_hexagon(), vec![]).unwrap();
        assert_eq!(kind_at(&mesh, 0, 4), VertexKind::Start);
        assert_eq!(kind_at(&mesh, 0, 0), VertexKind::RegularRight);
        assert_eq!(kind_at(&mesh, 4, 0), VertexKind::End);
        assert_eq!(kind_at(&mesh, 4, 2), VertexKind::RegularLeft);
        assert_eq!(kind_at(&mesh, 2, 2), VertexKind::RegularLeft);
        assert_eq!(kind_at(&mesh, 2, 4), VertexKind::RegularLeft);
    }

    #[test]
    fn hole_classification() {
        let outer = pts(&[(0, 0), (6, 0), (6, 6), (0, 6)]);
        let hole = pts(&[(2, 2), (4, 2), (3, 4)]);
        let mesh = Mesh::from_rings(outer, vec![hole]).unwrap();

        assert_eq!(kind_at(&mesh, 0, 6), VertexKind::Start);
        assert_eq!(kind_at(&mesh, 6, 6), VertexKind::RegularLeft);
        assert_eq!(kind_at(&mesh, 0, 0), VertexKind::RegularRight);
        assert_eq!(kind_at(&mesh, 6, 0), VertexKind::End);

        // The hole's top splits the interior; its bottom-right corner is
        // where the interior merges back together below it.
        assert_eq!(kind_at(&mesh, 3, 4), VertexKind::Split);
        assert_eq!(kind_at(&mesh, 4, 2), VertexKind::Merge);
        assert_eq!(kind_at(&mesh, 2, 2), VertexKind::RegularLeft);
    }

    #[test]
    fn insert_and_delete_diagonal() {
        let mut mesh = Mesh::from_rings(square(), vec![]).unwrap();
        let a = vertex_at(&mesh, 0, 0);
        let b = vertex_at(&mesh, 4, 4);
        let diag = mesh.insert_edge(a, b).expect("fresh edge");
        mesh.recompute_faces();

        let interiors: Vec<FaceId> = mesh.interior_faces().collect();
        assert_eq!(interiors.len(), 2);
        for &f in &interiors {
            let ring = mesh.face_points(f);
            assert_eq!(ring.len(), 3);
            assert_eq!(signed_area(&ring), Rational::from(8));
        }

        mesh.delete_edge(diag);
        mesh.check_invariants();
        let interiors: Vec<FaceId> = mesh.interior_faces().collect();
        assert_eq!(interiors.len(), 1);
        assert_eq!(mesh.face_points(interiors[0]).len(), 4);
    }

    #[test]
    fn duplicate_insertion_is_a_noop() {
        let mut mesh = Mesh::from_rings(square(), vec![]).unwrap();
        let a = vertex_at(&mesh, 0, 0);
        let b = vertex_at(&mesh, 4, 4);
        assert!(mesh.insert_edge(a, b).is_some());
        let edges_before = mesh.edges.len();
        assert!(mesh.insert_edge(a, b).is_none());
        assert!(mesh.insert_edge(b, a).is_none());
        assert_eq!(mesh.edges.len(), edges_before);
    }

    #[test]
    fn rotation_roundtrip() {
        let mut mesh = Mesh::from_rings(l_hexagon(), vec![]).unwrap();
        let before: Vec<Point> = mesh.vertices.iter().map(|v| v.point.clone()).collect();
        mesh.rotate_right();
        mesh.check_invariants();
        mesh.rotate_left();
        let after: Vec<Point> = mesh.vertices.iter().map(|v| v.point.clone()).collect();
        assert_eq!(before, after);
        // A quarter turn right tucks the notch under the sweep: the reflex
        // corner lands at (2, -2) and now needs an upward diagonal.
        mesh.rotate_right();
        assert_eq!(kind_at(&mesh, 0, 0), VertexKind::Start);
        assert_eq!(kind_at(&mesh, 2, -2), VertexKind::Split);
        assert_eq!(kind_at(&mesh, 2, -4), VertexKind::End);
        assert_eq!(kind_at(&mesh, 4, -2), VertexKind::End);
    }

    #[test]
    fn ids_are_compact_in_debug_output() {
        assert_eq!(format!("{:?}", VertexId(3)), "v3");
        assert_eq!(format!("{:?}", EdgeId(7).twin()), "e6");
        assert_eq!(format!("{:?}", FaceId(1)), "f1");
    }

    #[test]
    fn outgoing_edge_rotation_covers_all_slots() {
        let mut mesh = Mesh::from_rings(square(), vec![]).unwrap();
        let a = vertex_at(&mesh, 0, 0);
        let b = vertex_at(&mesh, 4, 4);
        mesh.insert_edge(a, b);
        assert_eq!(mesh.outgoing_edges(a).len(), 3);
        assert_eq!(mesh.outgoing_edges(vertex_at(&mesh, 4, 0)).len(), 2);
    }
}
