use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in [Ease::Linear, Ease::InOutCubic] {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn inputs_are_clamped() {
    assert_eq!(Ease::InOutCubic.apply(-3.0), 0.0);
    assert_eq!(Ease::InOutCubic.apply(7.0), 1.0);
}

#[test]
fn cubic_in_out_spot_values() {
    assert!((Ease::InOutCubic.apply(0.25) - 0.0625).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.5) - 0.5).abs() < 1e-12);
    assert!((Ease::InOutCubic.apply(0.75) - 0.9375).abs() < 1e-12);
}

#[test]
fn monotonic_spot_check() {
    for ease in [Ease::Linear, Ease::InOutCubic] {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}
