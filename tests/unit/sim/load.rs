use super::*;
use crate::foundation::math::Rng64;

#[test]
fn load_domain_is_enforced() {
    assert!(Load::new(0).is_err());
    assert!(Load::new(11).is_err());
    assert_eq!(Load::new(1).unwrap().get(), 1);
    assert_eq!(Load::new(10).unwrap().get(), 10);
}

#[test]
fn carry_steps_match_ceil_of_distance_over_increment() {
    for n in 1..=9u8 {
        let load = Load::new(n).unwrap();
        let expected = (150.0 / (10.0 / f64::from(n))).ceil() as u32;
        assert_eq!(load.carry_steps(), expected, "load {n}");
    }
    assert_eq!(Load::new(5).unwrap().carry_steps(), 75);
}

#[test]
fn smaller_loads_take_fewer_steps() {
    let steps: Vec<u32> = (1..=10u8)
        .map(|n| Load::new(n).unwrap().carry_steps())
        .collect();
    assert!(steps.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn carry_offset_is_clamped() {
    let load = Load::new(3).unwrap();
    assert_eq!(load.carry_offset(0), 0.0);
    assert!(load.carry_offset(load.carry_steps() - 1) < 150.0);
    assert_eq!(load.carry_offset(load.carry_steps() + 5), 150.0);
}

#[test]
fn serde_rejects_out_of_domain() {
    let ok: Load = serde_json::from_str("4").unwrap();
    assert_eq!(ok.get(), 4);
    assert!(serde_json::from_str::<Load>("0").is_err());
    assert_eq!(serde_json::to_string(&ok).unwrap(), "4");
}

#[test]
fn range_validation_and_sampling() {
    assert!(LoadRange::new(5, 4).is_err());
    assert!(LoadRange::new(0, 4).is_err());
    let range = LoadRange::default();
    let mut rng = Rng64::new(3);
    for _ in 0..200 {
        let l = range.sample(&mut rng).unwrap();
        assert!((1..=9).contains(&l.get()));
    }
}
