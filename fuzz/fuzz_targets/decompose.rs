#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use malachite::num::basic::traits::Zero;
use malachite::Rational;
use polypart::arbitrary::{options, skyline_with_holes};
use polypart::{decompose, Polygon};

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok((outer, holes)) = skyline_with_holes(&mut u) else {
        return;
    };
    let Ok(options) = options(&mut u) else {
        return;
    };

    let ring_area = |points: &[polypart::Point]| {
        Polygon {
            points: points.to_vec(),
        }
        .signed_area()
    };
    let expected = holes
        .iter()
        .fold(ring_area(&outer), |acc, hole| acc - ring_area(hole));

    let pieces = decompose(outer, holes, &options).unwrap();

    assert!(!pieces.is_empty());
    let mut total = Rational::ZERO;
    for piece in &pieces {
        assert!(piece.points.len() >= 3);
        assert!(piece.is_convex());
        let area = piece.signed_area();
        assert!(area > Rational::ZERO);
        total += area;
    }
    assert_eq!(total, expected);
});
