use bevy_math::Vec2;

use super::{fade_near_target, line_circle_intersect, range_steps};
use crate::units::{Distance, Position};

#[test]
fn line_circle_intersect_hits_segment() {
    let result = line_circle_intersect(
        Position::new(Vec2::new(0., 0.)),
        Distance::from_nm(1.).squared(),
        Position::new(Vec2::new(-2., 0.)),
        Position::new(Vec2::new(2., 0.)),
    );
    assert!(result.is_some());
    let [low, high] = result.unwrap();
    assert!(low < 0.5 && high > 0.5);
}

#[test]
fn line_circle_intersect_misses() {
    let result = line_circle_intersect(
        Position::new(Vec2::new(0., 5.)),
        Distance::from_nm(1.).squared(),
        Position::new(Vec2::new(-2., 0.)),
        Position::new(Vec2::new(2., 0.)),
    );
    assert!(result.is_none());
}

#[test]
fn range_steps_includes_end() {
    let steps: Vec<i32> = range_steps(0, 10, 3).collect();
    assert_eq!(steps, vec![0, 3, 6, 9, 10]);
}

#[test]
fn fade_tapers_close_to_target() {
    let band = Distance::from_feet(500.);
    assert_eq!(fade_near_target(Distance::from_feet(1000.), band), 1.);
    assert!(fade_near_target(Distance::from_feet(100.), band) < 1.);
}
