//! Exact rational coordinates.
//!
//! Every coordinate and every geometric predicate in this crate is evaluated
//! in arbitrary-precision rational arithmetic. There is no floating point
//! anywhere, and therefore no epsilon tuning: two quantities are either
//! exactly equal or exactly ordered.

pub use malachite::Rational;

use crate::Error;

/// Build a rational from a numerator and a denominator.
///
/// The result is always in canonical reduced form. A zero denominator is
/// reported as [`Error::DivisionByZero`] rather than panicking, since
/// denominators often come straight from input files.
pub fn rational(num: i64, den: i64) -> Result<Rational, Error> {
    if den == 0 {
        return Err(Error::DivisionByZero);
    }
    Ok(Rational::from_signeds(num, den))
}

/// Shorthand for converting an integer coordinate.
pub fn int(x: i64) -> Rational {
    Rational::from(x)
}
