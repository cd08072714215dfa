#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn empty_object_yields_defaults() {
    let config = SketchConfig::from_json("{}").unwrap();
    assert_eq!(config, SketchConfig::default());
}

#[test]
fn stock_values_match_the_site() {
    let config = SketchConfig::default();
    assert_eq!(config.hero.num, 25);
    assert_eq!(config.hero.r_vel, 0.9);
    assert_eq!(config.hero.r_obst, 0.997);
    assert_eq!(config.static_squares.num, 17);
    assert_eq!(config.static_squares.time_step, 0.007);
    assert_eq!(config.growing.num, 17);
    assert!(config.growing.single_pen);
    assert_eq!(config.seed, None);
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = SketchConfig::from_json(r#"{"seed": 9, "growing": {"single_pen": false}}"#).unwrap();
    assert_eq!(config.seed, Some(9));
    assert!(!config.growing.single_pen);
    assert_eq!(config.growing.r_size, 10.0);
    assert_eq!(config.hero, HeroParams::default());
}

#[test]
fn malformed_json_is_an_error() {
    let err = SketchConfig::from_json("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("invalid sketch config"));
}

#[test]
fn wrong_type_is_an_error() {
    assert!(SketchConfig::from_json(r#"{"hero": {"num": "many"}}"#).is_err());
}

#[test]
fn serializes_back_to_json() {
    let json = serde_json::to_value(SketchConfig::default()).unwrap();
    assert_eq!(json["hero"]["initial_layout"], 1);
    assert_eq!(json["static_squares"]["idle_rings"], 15.0);
}
