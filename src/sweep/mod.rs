//! The downward plane sweep that cuts the polygon interior into y-monotone
//! faces.
//!
//! The main entry point is [`monotonize`], which walks the vertices in sweep
//! order and inserts the diagonals that eliminate Split and Merge vertices.
//! [`SweepStatus`] is its bookkeeping structure: the left boundaries of the
//! intervals the sweep line currently crosses.

mod monotone;
mod status;

pub use monotone::monotonize;
pub use status::{Span, SweepStatus};
