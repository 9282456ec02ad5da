//! Benchmarks comparing the deterministic skipmap with the standard library's
//! ordered map.

use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    crate::btreemap::insert,
    crate::btreemap::rand_access,
    crate::btreemap::iter,
    crate::skipmap::insert,
    crate::skipmap::rand_access,
    crate::skipmap::iter,
    crate::skipmap::find_visited,
);
criterion_main!(benches);
