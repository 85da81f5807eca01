#![no_main]

use arbitrary::Unstructured;
use libfuzzer_sys::fuzz_target;
use polypart::arbitrary::skyline;
use polypart::merge::{merge_faces, MergeStrategy};
use polypart::mesh::Mesh;
use polypart::sweep::monotonize;
use polypart::{triangulate, Polygon};

fn piece(mesh: &Mesh, f: polypart::mesh::FaceId) -> Polygon {
    Polygon {
        points: mesh.face_points(f),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(outer) = skyline(&mut u) else {
        return;
    };

    let mut mesh = Mesh::from_rings(outer, Vec::new()).unwrap();

    monotonize(&mut mesh);
    for f in mesh.interior_faces() {
        assert!(piece(&mesh, f).is_y_monotone());
    }

    triangulate(&mut mesh, false);
    for f in mesh.interior_faces() {
        assert_eq!(piece(&mesh, f).points.len(), 3);
    }

    merge_faces(&mut mesh, MergeStrategy::Full, None);
    for f in mesh.interior_faces() {
        assert!(piece(&mesh, f).is_convex());
    }
});
