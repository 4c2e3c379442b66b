use super::hsm::GestureEngine;
use super::types::{GestureEvent, GestureKind, GesturePhase};

/// Per-gesture callbacks a host supplies to `GestureEngine::update_with`.
///
/// Every method defaults to a no-op, so a host implements only the gestures
/// it cares about. Each callback receives the engine so it can consult the
/// query surface; the engine already reflects the transition the event
/// announces (a release handler sees the gesture inactive again).
pub trait GestureHandlers {
    fn on_up_press(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_up_double_press(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_up_release(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_down_press(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_down_double_press(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_down_release(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_stop_press(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_stop_double_press(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }

    fn on_stop_release(&mut self, engine: &GestureEngine) {
        let _ = engine;
    }
}

pub(crate) fn dispatch(
    engine: &GestureEngine,
    event: GestureEvent,
    handlers: &mut impl GestureHandlers,
) {
    match (event.gesture, event.phase) {
        (GestureKind::Up, GesturePhase::Press) => handlers.on_up_press(engine),
        (GestureKind::Up, GesturePhase::DoublePress) => handlers.on_up_double_press(engine),
        (GestureKind::Up, GesturePhase::Release) => handlers.on_up_release(engine),
        (GestureKind::Down, GesturePhase::Press) => handlers.on_down_press(engine),
        (GestureKind::Down, GesturePhase::DoublePress) => handlers.on_down_double_press(engine),
        (GestureKind::Down, GesturePhase::Release) => handlers.on_down_release(engine),
        (GestureKind::Stop, GesturePhase::Press) => handlers.on_stop_press(engine),
        (GestureKind::Stop, GesturePhase::DoublePress) => handlers.on_stop_double_press(engine),
        (GestureKind::Stop, GesturePhase::Release) => handlers.on_stop_release(engine),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Instant;
    use crate::gesture::config::EngineConfig;

    #[derive(Default)]
    struct Recorder {
        log: Vec<&'static str>,
        up_active_during_press: bool,
        up_active_during_release: bool,
        doubled_during_double: bool,
    }

    impl GestureHandlers for Recorder {
        fn on_up_press(&mut self, engine: &GestureEngine) {
            self.up_active_during_press = engine.is_up_active(false);
            self.log.push("up_press");
        }

        fn on_up_double_press(&mut self, engine: &GestureEngine) {
            self.doubled_during_double = engine.is_any_doubled();
            self.log.push("up_double_press");
        }

        fn on_up_release(&mut self, engine: &GestureEngine) {
            self.up_active_during_release = engine.is_up_active(false);
            self.log.push("up_release");
        }
    }

    fn drive(engine: &mut GestureEngine, recorder: &mut Recorder, from: u32, to: u32, up: bool) {
        let mut t = from;
        while t <= to {
            let _ = engine.update_with(up, false, Instant::from_millis(t), recorder);
            t += 10;
        }
    }

    #[test]
    fn dispatch_routes_events_and_exposes_settled_state() {
        let mut engine = GestureEngine::new(EngineConfig::default());
        let mut recorder = Recorder::default();

        drive(&mut engine, &mut recorder, 0, 100, true);
        drive(&mut engine, &mut recorder, 110, 160, false);
        drive(&mut engine, &mut recorder, 170, 280, true);
        drive(&mut engine, &mut recorder, 290, 340, false);

        assert_eq!(
            recorder.log,
            vec![
                "up_press",
                "up_release",
                "up_press",
                "up_double_press",
                "up_release",
            ]
        );
        assert!(recorder.up_active_during_press);
        assert!(!recorder.up_active_during_release);
        assert!(recorder.doubled_during_double);
    }
}
