#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

mod geom;
pub mod merge;
pub mod mesh;
mod num;
pub mod sweep;
mod triangulate;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;

#[cfg(feature = "generators")]
pub mod generators;

use tracing::debug;

pub use geom::Point;
pub use merge::MergeStrategy;
pub use num::{int, rational, Rational};
pub use triangulate::triangulate;

#[derive(Clone, Copy, Debug, PartialEq)]
/// The input rings were faulty.
pub enum Error {
    /// A rational number was given a zero denominator.
    DivisionByZero,
    /// One of the rings had fewer than three vertices.
    TooFewVertices {
        /// How many vertices the offending ring had.
        found: usize,
    },
    /// A ring listed the same point twice in a row.
    RepeatedVertex,
    /// One of the rings enclosed no area.
    DegenerateRing,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::DivisionByZero => write!(f, "a rational number had a zero denominator"),
            Error::TooFewVertices { found } => {
                write!(f, "a ring had {} vertices; three is the minimum", found)
            }
            Error::RepeatedVertex => write!(f, "a ring listed the same point twice in a row"),
            Error::DegenerateRing => write!(f, "a ring enclosed no area"),
        }
    }
}

impl std::error::Error for Error {}

/// Tuning knobs for [`decompose`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    /// How aggressively to merge faces after triangulation.
    pub merge: MergeStrategy,
    /// Leave monotone faces that are already convex untriangulated.
    ///
    /// The triangles such a face would be cut into are merged straight back
    /// together, so skipping them changes nothing but the running time.
    pub skip_convex: bool,
    /// Shuffle the candidate walls before a Hertel-Mehlhorn pass.
    ///
    /// With `None` the walls are visited in mesh order. Either way the
    /// output is a deterministic function of the input and this field.
    pub shuffle_seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            merge: MergeStrategy::default(),
            skip_convex: true,
            shuffle_seed: None,
        }
    }
}

/// A convex piece of the decomposed polygon.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Polygon {
    /// The boundary, as a counter-clockwise ring. The ring closes itself;
    /// the first point is not repeated at the end.
    pub points: Vec<Point>,
}

impl Polygon {
    /// The signed area of the boundary ring. Positive, for pieces produced
    /// by [`decompose`], since those wind counter-clockwise.
    pub fn signed_area(&self) -> Rational {
        geom::signed_area(&self.points)
    }

    /// Does the boundary turn the same way at every corner? Colinear
    /// corners are allowed.
    pub fn is_convex(&self) -> bool {
        geom::is_convex(&self.points)
    }

    /// Can both boundary chains be walked top to bottom without
    /// backtracking?
    pub fn is_y_monotone(&self) -> bool {
        geom::is_y_monotone(&self.points)
    }
}

/// Cuts a polygon, possibly with holes, into convex pieces.
///
/// `outer` is the outer boundary and `holes` the hole boundaries, in any
/// winding order. Holes must lie strictly inside the outer ring and must not
/// touch it or each other. The pieces cover the interior exactly, overlap
/// only along edges, and use no vertices beyond the input's own: every
/// diagonal connects two input vertices.
///
/// The decomposition runs in three stages, each of which can also be driven
/// by hand through [`mesh::Mesh`]: a downward sweep cuts the interior into
/// y-monotone faces, the monotone faces are triangulated, and then walls are
/// deleted again as long as every face stays convex.
pub fn decompose(
    outer: Vec<Point>,
    holes: Vec<Vec<Point>>,
    options: &Options,
) -> Result<Vec<Polygon>, Error> {
    let mut mesh = mesh::Mesh::from_rings(outer, holes)?;
    sweep::monotonize(&mut mesh);
    triangulate::triangulate(&mut mesh, options.skip_convex);
    merge::merge_faces(&mut mesh, options.merge, options.shuffle_seed);

    #[cfg(feature = "debug-svg")]
    {
        let palette = ["#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f"];
        svg::save(
            "out.svg",
            &mesh.dump_svg(|f| palette[f.0 % palette.len()].to_owned()),
        )
        .unwrap();
    }

    let pieces: Vec<Polygon> = mesh
        .interior_faces()
        .map(|f| Polygon {
            points: mesh.face_points(f),
        })
        .collect();
    debug!(pieces = pieces.len(), "decomposition finished");
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use malachite::num::basic::traits::Zero;

    use super::*;

    fn ring(pts: &[(i64, i64)]) -> Vec<Point> {
        pts.iter().copied().map(Point::from).collect()
    }

    fn total_area(pieces: &[Polygon]) -> Rational {
        pieces
            .iter()
            .fold(Rational::ZERO, |acc, p| acc + p.signed_area())
    }

    #[test]
    fn convex_input_comes_back_whole() {
        let pieces = decompose(
            ring(&[(0, 0), (4, 0), (4, 4), (0, 4)]),
            Vec::new(),
            &Options::default(),
        )
        .unwrap();

        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].signed_area(), int(16));
    }

    #[test]
    fn l_shape_falls_into_two_convex_pieces() {
        let pieces = decompose(
            ring(&[(0, 0), (4, 0), (4, 2), (2, 2), (2, 4), (0, 4)]),
            Vec::new(),
            &Options::default(),
        )
        .unwrap();

        assert_eq!(pieces.len(), 2);
        assert!(pieces.iter().all(Polygon::is_convex));
        assert_eq!(total_area(&pieces), int(12));
    }

    #[test]
    fn strategies_agree_on_area() {
        let strategies = [
            (MergeStrategy::None, 4),
            (MergeStrategy::HertelMehlhorn, 2),
            (MergeStrategy::Adjacent, 2),
            (MergeStrategy::Full, 2),
        ];
        for (merge, expected) in strategies {
            let options = Options {
                merge,
                ..Options::default()
            };
            let pieces = decompose(
                ring(&[(0, 0), (4, 0), (4, 2), (2, 2), (2, 4), (0, 4)]),
                Vec::new(),
                &options,
            )
            .unwrap();

            assert_eq!(pieces.len(), expected, "{:?}", merge);
            assert!(pieces.iter().all(Polygon::is_convex));
            assert_eq!(total_area(&pieces), int(12), "{:?}", merge);
        }
    }

    #[test]
    fn faulty_rings_are_rejected() {
        assert_matches!(
            decompose(ring(&[(0, 0), (1, 0)]), Vec::new(), &Options::default()),
            Err(Error::TooFewVertices { found: 2 })
        );
        assert_matches!(
            decompose(
                ring(&[(0, 0), (4, 0), (4, 0), (4, 4)]),
                Vec::new(),
                &Options::default(),
            ),
            Err(Error::RepeatedVertex)
        );
        assert_matches!(
            decompose(
                ring(&[(0, 0), (4, 0), (4, 4), (0, 4)]),
                vec![ring(&[(1, 1), (2, 2), (3, 3)])],
                &Options::default(),
            ),
            Err(Error::DegenerateRing)
        );
    }
}
