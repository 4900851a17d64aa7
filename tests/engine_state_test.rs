//! Engine lifecycle, face-loss pause and event delivery

use headmouse::{
    config::Config,
    dispatch::{GamepadEventListener, MouseEventSink, StateObserver},
    dwell_click::{MouseEvent, PointerPosition, Rect},
    engine::{EngineState, EngineStateMachine, FrameOutcome, MotionSample, OperationMode},
    gamepad::GamepadSector,
    Error, Result,
};
use std::{
    sync::{Arc, Mutex},
    thread,
    time::Duration,
};

fn quiet_config() -> Config {
    let mut config = Config::default();
    config.power.sleep_slices = 0;
    config.face_detection.timeout_secs = 2;
    config.pointer.filter = "none".to_string();
    config.pointer.acceleration = 0;
    config.pointer.horizontal_speed = 0;
    config.pointer.vertical_speed = 0;
    config.screen.width = 800;
    config.screen.height = 600;
    config
}

fn running(config: Config, mode: OperationMode) -> EngineStateMachine {
    let engine = EngineStateMachine::new(config, mode).unwrap();
    engine.start();
    engine.start();
    engine.dependency_ready();
    engine
}

#[derive(Default)]
struct Buttons {
    log: Mutex<Vec<(bool, GamepadSector)>>,
    fail: bool,
}

impl GamepadEventListener for Buttons {
    fn button_pressed(&self, sector: GamepadSector) -> Result<()> {
        self.log.lock().unwrap().push((true, sector));
        if self.fail {
            return Err(Error::ListenerError("remote end went away".to_string()));
        }
        Ok(())
    }

    fn button_released(&self, sector: GamepadSector) -> Result<()> {
        self.log.lock().unwrap().push((false, sector));
        if self.fail {
            return Err(Error::ListenerError("remote end went away".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct Pointer {
    events: Mutex<Vec<MouseEvent>>,
}

impl MouseEventSink for Pointer {
    fn on_mouse_event(&self, event: &MouseEvent) -> Result<()> {
        self.events.lock().unwrap().push(*event);
        Ok(())
    }
}

#[derive(Default)]
struct States {
    seen: Mutex<Vec<(EngineState, EngineState)>>,
}

impl StateObserver for States {
    fn on_state_change(&self, from: EngineState, to: EngineState) {
        self.seen.lock().unwrap().push((from, to));
    }
}

#[test]
fn test_face_loss_pause_and_resume() {
    let engine = running(quiet_config(), OperationMode::Mouse);
    let states = Arc::new(States::default());
    engine.add_observer(states.clone());

    engine.on_frame(&MotionSample::new(0.0, 0.0, true, 1_000));
    let mut t = 1_000;
    while engine.state() == EngineState::Running {
        t += 33;
        engine.on_frame(&MotionSample::new(3.0, 3.0, false, t));
        assert!(t < 10_000, "engine never paused");
    }
    assert_eq!(engine.state(), EngineState::NoFacePaused);
    assert!(t - 1_000 > 2_000);

    // Motion while paused does not move the pointer
    let before = engine.pointer_position().unwrap();
    engine.on_frame(&MotionSample::new(50.0, 50.0, false, t + 33));
    assert_eq!(engine.pointer_position().unwrap(), before);

    engine.on_frame(&MotionSample::new(0.0, 0.0, true, t + 66));
    assert_eq!(engine.state(), EngineState::Running);
    assert!(!engine.face_detection_countdown().has_finished(t + 66));
    assert_eq!(
        *states.seen.lock().unwrap(),
        vec![
            (EngineState::Running, EngineState::NoFacePaused),
            (EngineState::NoFacePaused, EngineState::Running)
        ]
    );
}

#[test]
fn test_pause_from_no_face_and_resume() {
    let mut config = quiet_config();
    config.face_detection.timeout_secs = 1;
    let engine = running(config, OperationMode::Mouse);
    engine.on_frame(&MotionSample::new(0.0, 0.0, true, 0));
    engine.on_frame(&MotionSample::new(0.0, 0.0, false, 1_500));
    assert_eq!(engine.state(), EngineState::NoFacePaused);

    engine.pause();
    assert_eq!(engine.state(), EngineState::Paused);
    assert_eq!(engine.on_frame(&MotionSample::new(0.0, 0.0, true, 1_600)), FrameOutcome::Dropped);
    engine.resume();
    assert_eq!(engine.state(), EngineState::Running);
}

#[test]
fn test_pointer_moves_and_clamps() {
    let engine = running(quiet_config(), OperationMode::Mouse);
    let sink = Arc::new(Pointer::default());
    engine.set_mouse_sink(sink.clone()).unwrap();

    engine.on_frame(&MotionSample::new(10.0, -20.0, true, 0));
    assert_eq!(engine.pointer_position(), Some(PointerPosition::new(410.0, 280.0)));

    engine.on_frame(&MotionSample::new(1e6, 1e6, true, 33));
    assert_eq!(engine.pointer_position(), Some(PointerPosition::new(799.0, 599.0)));
    assert_eq!(sink.events.lock().unwrap().len(), 2);
}

#[test]
fn test_dwell_click_through_engine() {
    let engine = running(quiet_config(), OperationMode::Mouse);
    let sink = Arc::new(Pointer::default());
    engine.set_mouse_sink(sink.clone()).unwrap();

    for t in (0..=2_000).step_by(40) {
        engine.on_frame(&MotionSample::new(0.0, 0.0, true, t));
    }
    let clicks = sink.events.lock().unwrap().iter().filter(|e| e.click).count();
    assert_eq!(clicks, 1);
}

#[test]
fn test_rest_mode_through_engine() {
    let engine = running(quiet_config(), OperationMode::Mouse);
    engine.set_always_active(vec![Rect::new(0.0, 0.0, 50.0, 50.0)]);
    engine.set_rest_mode(true);

    let before = engine.pointer_position().unwrap();
    engine.on_frame(&MotionSample::new(30.0, 30.0, true, 0));
    assert_eq!(engine.pointer_position().unwrap(), before);
    assert!(!engine.is_actionable(before));
    assert!(engine.is_actionable(PointerPosition::new(10.0, 10.0)));

    // The click dispatcher can flip the flag from its own thread
    let flag = engine.rest_mode_flag();
    thread::spawn(move || flag.set(false)).join().unwrap();
    assert!(!engine.rest_mode());
    engine.on_frame(&MotionSample::new(30.0, 30.0, true, 33));
    assert_ne!(engine.pointer_position().unwrap(), before);
}

#[test]
fn test_gamepad_edges_reach_listener() {
    let mut config = quiet_config();
    config.gamepad.abs_speed = 100;
    let engine = running(config, OperationMode::GamepadAbsolute);
    let buttons = Arc::new(Buttons::default());
    engine.register_listener(buttons.clone()).unwrap();

    engine.on_frame(&MotionSample::new(0.0, 1.0, true, 0));
    engine.on_frame(&MotionSample::new(0.0, -2.0, true, 33));
    engine.stop();

    assert_eq!(
        *buttons.log.lock().unwrap(),
        vec![
            (true, GamepadSector::Down),
            (false, GamepadSector::Down),
            (true, GamepadSector::Up),
            (false, GamepadSector::Up),
        ]
    );
}

#[test]
fn test_second_listener_rejected() {
    let engine = running(quiet_config(), OperationMode::GamepadRelative);
    engine.register_listener(Arc::new(Buttons::default())).unwrap();
    assert!(matches!(
        engine.register_listener(Arc::new(Buttons::default())),
        Err(Error::ListenerError(_))
    ));
    engine.unregister_listener();
    assert!(engine.register_listener(Arc::new(Buttons::default())).is_ok());
}

#[test]
fn test_failing_listener_does_not_disturb_engine() {
    let mut config = quiet_config();
    config.gamepad.abs_speed = 100;
    let engine = running(config, OperationMode::GamepadAbsolute);
    let buttons = Arc::new(Buttons {
        fail: true,
        ..Buttons::default()
    });
    engine.register_listener(buttons.clone()).unwrap();

    let outcome = engine.on_frame(&MotionSample::new(1.0, 0.0, true, 0));
    assert!(matches!(
        outcome,
        FrameOutcome::Gamepad {
            sector: GamepadSector::Right,
            ..
        }
    ));
    // Edge detection is not rolled back by the failure
    let outcome = engine.on_frame(&MotionSample::new(0.0, 0.0, true, 33));
    assert!(matches!(outcome, FrameOutcome::Gamepad { ref events, .. } if events.is_empty()));
    assert_eq!(engine.state(), EngineState::Running);
    assert_eq!(buttons.log.lock().unwrap().len(), 1);
}

#[test]
fn test_still_head_at_lowest_sensitivity_presses_nothing() {
    let mut config = quiet_config();
    config.gamepad.rel_sensitivity = 0;
    let engine = running(config, OperationMode::GamepadRelative);
    let buttons = Arc::new(Buttons::default());
    engine.register_listener(buttons.clone()).unwrap();

    for i in 0..5 {
        let outcome = engine.on_frame(&MotionSample::new(0.0, 0.0, true, i * 33));
        assert_eq!(
            outcome,
            FrameOutcome::Gamepad {
                sector: GamepadSector::None,
                events: Vec::new()
            }
        );
    }
    assert!(buttons.log.lock().unwrap().is_empty());
}

#[test]
fn test_relative_shake_press_and_release() {
    let mut config = quiet_config();
    config.gamepad.rel_sensitivity = 5;
    let engine = running(config, OperationMode::GamepadRelative);
    let buttons = Arc::new(Buttons::default());
    engine.register_listener(buttons.clone()).unwrap();

    // A left shake: rise, overshoot, swing back through zero twice
    let trace = [-2.0, -3.0, -1.0, 0.5, -0.2, 0.0, 0.0];
    for (i, dx) in trace.iter().enumerate() {
        engine.on_frame(&MotionSample::new(*dx, 0.0, true, i as i64 * 33));
    }
    assert_eq!(
        *buttons.log.lock().unwrap(),
        vec![(true, GamepadSector::Left), (false, GamepadSector::Left)]
    );
    assert_eq!(engine.highlighted_sector(33), GamepadSector::Left);
    assert_eq!(engine.highlighted_sector(200), GamepadSector::None);
}

#[test]
fn test_mode_switch_releases_held_button() {
    let mut config = quiet_config();
    config.gamepad.abs_speed = 100;
    let engine = running(config, OperationMode::GamepadAbsolute);
    let buttons = Arc::new(Buttons::default());
    engine.register_listener(buttons.clone()).unwrap();

    engine.on_frame(&MotionSample::new(-1.0, 0.0, true, 0));
    engine.set_operation_mode(OperationMode::Mouse);
    assert_eq!(
        *buttons.log.lock().unwrap(),
        vec![(true, GamepadSector::Left), (false, GamepadSector::Left)]
    );
    assert!(matches!(
        engine.on_frame(&MotionSample::new(0.0, 0.0, true, 33)),
        FrameOutcome::Pointer(_)
    ));
}

#[test]
fn test_hot_reload_keeps_position() {
    let engine = running(quiet_config(), OperationMode::Mouse);
    engine.on_frame(&MotionSample::new(5.0, 0.0, true, 0));
    let before = engine.pointer_position().unwrap();

    let mut config = quiet_config();
    config.pointer.horizontal_speed = 6;
    engine.apply_config(&config).unwrap();
    assert_eq!(engine.pointer_position().unwrap(), before);
    assert_eq!(engine.state(), EngineState::Running);

    engine.on_frame(&MotionSample::new(1.0, 0.0, true, 33));
    let after = engine.pointer_position().unwrap();
    assert!((after.x - before.x - 6.0).abs() < 1e-3);
}

#[test]
fn test_stop_cancels_sleep_from_control_thread() {
    let mut config = quiet_config();
    config.power.sleep_slice_ms = 500;
    config.power.sleep_slices = 10;
    let engine = Arc::new(EngineStateMachine::new(config, OperationMode::Mouse).unwrap());
    engine.start();
    engine.start();

    let capture = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let mut frames = 0;
            let mut t = 0;
            while !engine.is_stopped() {
                engine.on_frame(&MotionSample::new(0.0, 0.0, true, t));
                frames += 1;
                t += 33;
            }
            frames
        })
    };

    thread::sleep(Duration::from_millis(100));
    let started = std::time::Instant::now();
    engine.stop();
    let frames = capture.join().unwrap();
    assert!(frames >= 1);
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(engine.state(), EngineState::Stopped);
}

#[test]
fn test_capture_and_control_threads() {
    let engine = Arc::new(running(quiet_config(), OperationMode::Mouse));
    let capture = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for t in 0..2_000 {
                engine.on_frame(&MotionSample::new(1.0, -1.0, true, t));
            }
        })
    };
    for i in 0..200 {
        match i % 4 {
            0 => engine.pause(),
            1 => engine.resume(),
            2 => engine.set_operation_mode(OperationMode::GamepadAbsolute),
            _ => engine.set_operation_mode(OperationMode::Mouse),
        }
    }
    capture.join().unwrap();
    assert!(matches!(engine.state(), EngineState::Running | EngineState::Paused));
}
