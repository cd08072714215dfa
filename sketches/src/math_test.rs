#![allow(clippy::float_cmp)]

use rand::SeedableRng;
use rand::rngs::SmallRng;

use super::*;

#[test]
fn map_range_endpoints() {
    assert_eq!(map_range(0.0, 0.0, 25.0, 160.0, 640.0), 160.0);
    assert_eq!(map_range(25.0, 0.0, 25.0, 160.0, 640.0), 640.0);
}

#[test]
fn map_range_reversed_target() {
    // Source range reversed: distance 0 maps to the top of the target.
    assert_eq!(map_range(0.0, 800.0, 0.0, 1.0, 35.0), 35.0);
    assert_eq!(map_range(800.0, 800.0, 0.0, 1.0, 35.0), 1.0);
}

#[test]
fn map_range_extrapolates() {
    assert_eq!(map_range(-5.0, 5.0, 25.0, 0.0, 100.0), -50.0);
}

#[test]
fn map_range_degenerate_source() {
    assert_eq!(map_range(3.0, 7.0, 7.0, 1.0, 2.0), 1.0);
}

#[test]
fn uniform_stays_in_range() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..1000 {
        let v = uniform(&mut rng, 127.0, 255.0);
        assert!((127.0..255.0).contains(&v), "{v}");
    }
}

#[test]
fn uniform_empty_range_is_constant() {
    let mut rng = SmallRng::seed_from_u64(7);
    assert_eq!(uniform(&mut rng, 1.5, 1.5), 1.5);
}

#[test]
fn seed_from_unit_spreads() {
    assert_eq!(seed_from_unit(0.0), 0);
    assert!(seed_from_unit(0.5) > seed_from_unit(0.25));
    assert_eq!(seed_from_unit(-1.0), 0);
}
