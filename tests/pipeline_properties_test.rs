//! Property tests for the motion pipeline invariants

use headmouse::{
    config::{axis_speed_factor, gamepad_abs_speed_factor, shake_threshold, Config},
    constants::{AXIS_SPEED_MAX, AXIS_SPEED_MIN, GAMEPAD_REL_SENSITIVITY_MAX, GAMEPAD_REL_SENSITIVITY_MIN},
    countdown::{FaceDetectionCountdown, FACE_DETECTION_DISABLED},
    dwell_click::DwellClickController,
    engine::{EngineState, EngineStateMachine, MotionSample, OperationMode},
    gamepad::{AbsoluteGamepadProjector, GamepadSector},
    motion_scaler::scale,
    orientation::{correct, DeviceRotation, FlipDirection},
    shake_detector::ShakeDetector,
};
use proptest::prelude::*;

fn flips() -> impl Strategy<Value = FlipDirection> {
    prop_oneof![
        Just(FlipDirection::None),
        Just(FlipDirection::Horizontal),
        Just(FlipDirection::Vertical)
    ]
}

fn rotations() -> impl Strategy<Value = DeviceRotation> {
    prop_oneof![
        Just(DeviceRotation::Deg0),
        Just(DeviceRotation::Deg90),
        Just(DeviceRotation::Deg180),
        Just(DeviceRotation::Deg270)
    ]
}

proptest! {
    #[test]
    fn prop_orientation_is_invertible(
        dx in -1000.0f32..1000.0,
        dy in -1000.0f32..1000.0,
        flip in flips(),
        rotation in rotations(),
    ) {
        let (cx, cy) = correct(dx, dy, flip, rotation);
        // Undo the rotation, then the flip
        let (ux, uy) = correct(cx, cy, FlipDirection::None, rotation.inverse());
        let (rx, ry) = correct(ux, uy, flip, DeviceRotation::Deg0);
        prop_assert!((rx - dx).abs() < 1e-3);
        prop_assert!((ry - dy).abs() < 1e-3);
    }

    #[test]
    fn prop_orientation_round_trip_without_flip(
        dx in -1000.0f32..1000.0,
        dy in -1000.0f32..1000.0,
        rotation in rotations(),
    ) {
        let (cx, cy) = correct(dx, dy, FlipDirection::None, rotation);
        let (rx, ry) = correct(cx, cy, FlipDirection::None, rotation.inverse());
        prop_assert!((rx - dx).abs() < 1e-3);
        prop_assert!((ry - dy).abs() < 1e-3);
    }

    #[test]
    fn prop_disk_containment(
        steps in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 1..200),
        speed in 1i32..=100,
    ) {
        let mut projector = AbsoluteGamepadProjector::new(gamepad_abs_speed_factor(speed));
        for (dx, dy) in steps {
            projector.update_motion(dx, dy);
            let (x, y) = projector.position();
            prop_assert!(x * x + y * y <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn prop_dead_zone(angle in 0.0f32..std::f32::consts::TAU, radius in 0.0f32..0.399, steps in 1usize..20) {
        let mut projector = AbsoluteGamepadProjector::new(1.0);
        #[allow(clippy::cast_precision_loss)]
        let step = radius / steps as f32;
        for _ in 0..steps {
            let sector = projector.update_motion(step * angle.cos(), step * angle.sin());
            prop_assert_eq!(sector, GamepadSector::None);
        }
    }

    #[test]
    fn prop_speed_monotonic(
        s1 in AXIS_SPEED_MIN..AXIS_SPEED_MAX,
        delta in 1i32..=AXIS_SPEED_MAX,
        dx in prop_oneof![-100.0f32..-0.01, 0.01f32..100.0],
        dy in -100.0f32..100.0,
    ) {
        let s2 = (s1 + delta).min(AXIS_SPEED_MAX);
        prop_assume!(s2 > s1);
        let m1 = axis_speed_factor(s1);
        let m2 = axis_speed_factor(s2);
        prop_assert!(m1 < m2);
        let v = axis_speed_factor(10);
        let (ax, ay) = scale(dx, dy, m1, v);
        let (bx, by) = scale(dx, dy, m2, v);
        prop_assert!(ax.abs() < bx.abs());
        prop_assert!(f64::from(ax).hypot(f64::from(ay)) < f64::from(bx).hypot(f64::from(by)));
    }

    #[test]
    fn prop_shake_threshold_monotonic(s in GAMEPAD_REL_SENSITIVITY_MIN..GAMEPAD_REL_SENSITIVITY_MAX) {
        prop_assert!(shake_threshold(s) < shake_threshold(s + 1));
    }

    #[test]
    fn prop_pointer_clamped(
        deltas in prop::collection::vec((-1e7f32..1e7, -1e7f32..1e7), 1..100),
        width in 1u32..4000,
        height in 1u32..4000,
    ) {
        let mut config = Config::default();
        config.screen.width = width;
        config.screen.height = height;
        let mut controller = DwellClickController::new(&config);
        #[allow(clippy::cast_precision_loss)]
        for (dx, dy) in deltas {
            let p = controller.update_position(dx, dy);
            prop_assert!(p.x >= 0.0 && p.x < width as f32);
            prop_assert!(p.y >= 0.0 && p.y < height as f32);
        }
    }

    #[test]
    fn prop_disabled_countdown_never_finishes(start in 0i64..1_000_000, later in 0i64..i64::MAX / 4) {
        let mut countdown = FaceDetectionCountdown::new(FACE_DETECTION_DISABLED);
        countdown.reset(start);
        prop_assert!(!countdown.has_finished(start + later));
        prop_assert_eq!(countdown.elapsed_percent(start + later), 100);
    }

    #[test]
    fn prop_face_loss_round_trip(timeout_secs in 1u32..5, frame_ms in 10i64..100) {
        let mut config = Config::default();
        config.power.sleep_slices = 0;
        config.face_detection.timeout_secs = timeout_secs;
        let engine = EngineStateMachine::new(config, OperationMode::Mouse).unwrap();
        engine.start();
        engine.start();
        engine.dependency_ready();

        engine.on_frame(&MotionSample::new(0.0, 0.0, true, 0));
        let timeout_ms = i64::from(timeout_secs) * 1000;
        let mut t = 0;
        while t <= timeout_ms + frame_ms {
            t += frame_ms;
            engine.on_frame(&MotionSample::new(0.0, 0.0, false, t));
        }
        prop_assert_eq!(engine.state(), EngineState::NoFacePaused);

        t += frame_ms;
        engine.on_frame(&MotionSample::new(0.0, 0.0, true, t));
        prop_assert_eq!(engine.state(), EngineState::Running);
        prop_assert!(!engine.face_detection_countdown().has_finished(t));
    }
}

#[test]
fn test_shake_single_fire_sequence() {
    let threshold = shake_threshold(5);
    let mut detector = ShakeDetector::new(threshold);
    let sequence = [0.0, 0.1, 0.5, threshold + 0.01, threshold - 0.1, 0.05, -0.1, -0.5];
    let fired = sequence.iter().filter(|&&v| detector.update(v) != 0).count();
    assert_eq!(fired, 1);
}
