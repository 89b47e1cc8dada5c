use super::*;

#[test]
fn interpolate_hits_endpoints_exactly() {
    let step = CameraAnimationStep::new(CameraParam::Pan, 0.0, -2.0, 1500);
    assert_eq!(interpolate(&step, 0.0, Ease::InOutCubic), 0.0);
    assert_eq!(interpolate(&step, 1.0, Ease::InOutCubic), -2.0);
    assert_eq!(interpolate(&step, 4.0, Ease::Linear), -2.0);
}

#[test]
fn eased_quarter_differs_from_linear() {
    let step = CameraAnimationStep::new(CameraParam::Zoom, 1.0, 5.0, 1000);
    let eased = interpolate(&step, 0.25, Ease::InOutCubic);
    let linear = interpolate(&step, 0.25, Ease::Linear);
    assert!((eased - 1.25).abs() < 1e-12);
    assert!((linear - 2.0).abs() < 1e-12);
}

#[test]
fn validate_rejects_non_finite_endpoints() {
    assert!(
        CameraAnimationStep::new(CameraParam::Pan, 0.0, 1.0, 10)
            .validate()
            .is_ok()
    );
    let err = CameraAnimationStep::new(CameraParam::Pan, f64::NAN, 1.0, 10)
        .validate()
        .unwrap_err();
    assert!(matches!(err, TilewallError::InvalidStep(_)));
    assert!(
        CameraAnimationStep::new(CameraParam::Tilt, 0.0, f64::INFINITY, 10)
            .validate()
            .is_err()
    );
}

#[test]
fn export_increment_splits_range_over_sixty_frames() {
    let step = CameraAnimationStep::new(CameraParam::Pan, 0.0, 6.0, 0);
    assert!((step.export_increment() - 0.1).abs() < 1e-12);
}

#[test]
fn default_sequence_matches_walkthrough() {
    let seq = default_sequence();
    assert_eq!(seq.len(), 4);
    assert_eq!(seq[0], CameraAnimationStep::new(CameraParam::Pan, 0.0, -2.0, 1500));
    assert_eq!(seq[3].param, CameraParam::Zoom);
    assert_eq!(seq[3].to, 2.0);
}

#[test]
fn steps_deserialize_from_json() {
    let step: CameraAnimationStep = serde_json::from_str(
        r#"{ "param": "tilt", "from": 0.0, "to": 15.0, "duration_ms": 900 }"#,
    )
    .unwrap();
    assert_eq!(step.param, CameraParam::Tilt);
    assert_eq!(step.duration_ms, 900);
}

#[derive(Default)]
struct Recorder {
    sets: Vec<(CameraParam, f64)>,
}

impl CameraTarget for Recorder {
    fn set_param(&mut self, param: CameraParam, value: f64) {
        self.sets.push((param, value));
    }

    fn request_render(&mut self) {}
}

#[test]
fn baseline_reset_only_touches_driven_params() {
    let mut rec = Recorder::default();
    reset_to_baseline(&default_sequence(), &mut rec);
    assert_eq!(rec.sets, vec![(CameraParam::Pan, 0.0), (CameraParam::Zoom, 1.0)]);

    let mut rec = Recorder::default();
    reset_to_baseline(
        &[CameraAnimationStep::new(CameraParam::Tilt, 5.0, 10.0, 100)],
        &mut rec,
    );
    assert_eq!(rec.sets, vec![(CameraParam::Tilt, 0.0)]);
}
