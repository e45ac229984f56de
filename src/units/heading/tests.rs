use super::{Heading, TurnDirection};

#[test]
fn degrees_roundtrip() {
    for deg in [0., 1., 90., 179., 180., 181., 270., 359.] {
        let h = Heading::from_degrees(deg);
        assert!((h.degrees() - deg).abs() < 1e-3, "deg={deg} got={}", h.degrees());
    }
}

#[test]
fn closer_direction_is_shorter() {
    let a = Heading::from_degrees(10.);
    let b = Heading::from_degrees(20.);
    assert_eq!(a.closer_direction_to(b), TurnDirection::Clockwise);
    assert_eq!(b.closer_direction_to(a), TurnDirection::CounterClockwise);
}

#[test]
fn distance_wraps_across_north() {
    let a = Heading::from_degrees(350.);
    let b = Heading::from_degrees(10.);
    let dist = a.closest_distance(b);
    assert!((dist.into_degrees() - 20.).abs() < 1e-3);
}

#[test]
fn is_between_non_reflex() {
    let a = Heading::from_degrees(0.);
    let b = Heading::from_degrees(90.);
    assert!(Heading::from_degrees(45.).is_between(a, b));
    assert!(!Heading::from_degrees(180.).is_between(a, b));
}
