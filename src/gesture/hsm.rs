use core::cmp::min;

use statig::{blocking::IntoStateMachineExt as _, prelude::*};

use crate::clock::Instant;

use super::{
    config::EngineConfig,
    debounce::DebouncedLevel,
    handlers::{dispatch, GestureHandlers},
    trace::EngineTraceSample,
    types::{ActiveGesture, EngineStateId, EventBuffer, GestureEvent, GestureKind, GesturePhase},
};


#[derive(Clone, Copy, Debug)]
enum GestureHsmEvent {
    Poll { now: Instant, up: bool, down: bool },
}

#[derive(Default)]
struct DispatchContext {
    events: EventBuffer,
}

/// One poll's outcome: the events recognized this tick plus a trace sample.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineOutput {
    pub events: EventBuffer,
    pub trace: EngineTraceSample,
}

/// Debounced two-channel gesture recognizer.
///
/// Feed it both raw channel reads and the current instant once per poll; it
/// answers with at most one recognized transition. The engine performs no
/// synchronization of its own and must be polled from a single logical task,
/// at a period finer than the configured debounce and hold intervals.
pub struct GestureEngine {
    up_filter: DebouncedLevel,
    down_filter: DebouncedLevel,
    machine: statig::blocking::StateMachine<GestureHsm>,
}

impl Default for GestureEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl GestureEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            up_filter: DebouncedLevel::new(config.debounce),
            down_filter: DebouncedLevel::new(config.debounce),
            machine: GestureHsm::new(config).state_machine(),
        }
    }

    /// Feed one poll of raw channel reads.
    ///
    /// A committed double arrives as a `Press` event immediately followed by
    /// its `DoublePress` in the same output; every other poll yields at most
    /// one event.
    pub fn update(&mut self, up_raw: bool, down_raw: bool, now: Instant) -> EngineOutput {
        let up = self.up_filter.sample(up_raw, now);
        let down = self.down_filter.sample(down_raw, now);

        let mut context = DispatchContext::default();
        self.machine
            .handle_with_context(&GestureHsmEvent::Poll { now, up, down }, &mut context);

        EngineOutput {
            events: context.events,
            trace: self.machine.inner().last_trace,
        }
    }

    /// `update`, then deliver every emitted event to `handlers`.
    ///
    /// Dispatch happens after the transition has settled, so a handler
    /// querying the engine sees the state the event announces.
    pub fn update_with(
        &mut self,
        up_raw: bool,
        down_raw: bool,
        now: Instant,
        handlers: &mut impl GestureHandlers,
    ) -> EngineOutput {
        let output = self.update(up_raw, down_raw, now);
        for event in output.events.iter() {
            dispatch(self, *event, handlers);
        }
        output
    }

    pub fn config(&self) -> &EngineConfig {
        &self.machine.inner().config
    }

    /// Currently recognized gesture, if any.
    pub fn active(&self) -> Option<ActiveGesture> {
        self.machine.inner().active
    }

    pub fn is_up_active(&self, require_doubled: bool) -> bool {
        self.gesture_active(GestureKind::Up, require_doubled)
    }

    pub fn is_down_active(&self, require_doubled: bool) -> bool {
        self.gesture_active(GestureKind::Down, require_doubled)
    }

    pub fn is_stop_active(&self, require_doubled: bool) -> bool {
        self.gesture_active(GestureKind::Stop, require_doubled)
    }

    pub fn is_any_doubled(&self) -> bool {
        self.active().is_some_and(|active| active.doubled)
    }

    fn gesture_active(&self, kind: GestureKind, require_doubled: bool) -> bool {
        self.active()
            .is_some_and(|active| active.kind == kind && (active.doubled || !require_doubled))
    }
}

struct GestureHsm {
    config: EngineConfig,
    up_held_since: Option<Instant>,
    down_held_since: Option<Instant>,
    double_kind: Option<GestureKind>,
    double_committed_at: Instant,
    double_completed: bool,
    active: Option<ActiveGesture>,
    last_trace: EngineTraceSample,
}

impl GestureHsm {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            up_held_since: None,
            down_held_since: None,
            double_kind: None,
            double_committed_at: Instant::from_millis(0),
            double_completed: false,
            active: None,
            last_trace: EngineTraceSample::default(),
        }
    }

    /// Forget a remembered gesture once the double window has elapsed since
    /// its commit. Runs every poll before any commit is considered.
    fn expire_double_memory(&mut self, now: Instant) {
        if self.double_kind.is_some()
            && now.duration_since(self.double_committed_at) >= self.config.double_window
        {
            self.double_kind = None;
            self.double_completed = false;
        }
    }

    /// Hold timers follow the stable levels: set on the poll a channel
    /// becomes active, cleared on the poll it goes quiet.
    fn track_hold(&mut self, now: Instant, up: bool, down: bool) {
        if up && self.up_held_since.is_none() {
            self.up_held_since = Some(now);
        }
        if !up && self.up_held_since.is_some() {
            self.up_held_since = None;
        }
        if down && self.down_held_since.is_none() {
            self.down_held_since = Some(now);
        }
        if !down && self.down_held_since.is_some() {
            self.down_held_since = None;
        }
    }

    fn aged(&self, held_since: Option<Instant>, now: Instant) -> bool {
        held_since.is_some_and(|since| now.duration_since(since) >= self.config.hold)
    }

    /// A single-channel commit needs the other channel fully inactive, not
    /// merely below threshold; that is what routes concurrent holds into the
    /// combo instead of two racing single commits.
    fn up_commit_ready(&self, now: Instant) -> bool {
        self.aged(self.up_held_since, now) && self.down_held_since.is_none()
    }

    fn down_commit_ready(&self, now: Instant) -> bool {
        self.aged(self.down_held_since, now) && self.up_held_since.is_none()
    }

    fn stop_commit_ready(&self, now: Instant) -> bool {
        self.up_held_since.is_some()
            && self.down_held_since.is_some()
            && (self.aged(self.up_held_since, now) || self.aged(self.down_held_since, now))
    }

    fn double_matches(&self, kind: GestureKind, now: Instant) -> bool {
        self.double_kind == Some(kind)
            && self.double_completed
            && now.duration_since(self.double_committed_at) < self.config.double_window
    }

    fn commit(&mut self, context: &mut DispatchContext, kind: GestureKind, now: Instant) {
        let doubled = self.double_matches(kind, now);
        if doubled {
            self.double_kind = None;
            self.double_completed = false;
        } else {
            self.double_kind = Some(kind);
            self.double_committed_at = now;
            self.double_completed = false;
        }

        self.active = Some(ActiveGesture { kind, doubled });
        context.events.push(GestureEvent {
            gesture: kind,
            phase: GesturePhase::Press,
            at: now,
        });
        if doubled {
            context.events.push(GestureEvent {
                gesture: kind,
                phase: GesturePhase::DoublePress,
                at: now,
            });
        }
    }

    /// Releases pre-empt every commit. The released kind becomes eligible for
    /// double matching; its commit timestamp is left untouched, so the window
    /// keeps counting from the moment the press committed, not the release.
    fn finish_release(&mut self, context: &mut DispatchContext, kind: GestureKind, now: Instant) {
        match kind {
            GestureKind::Up => self.up_held_since = None,
            GestureKind::Down => self.down_held_since = None,
            GestureKind::Stop => {
                self.up_held_since = None;
                self.down_held_since = None;
            }
        }

        if self.double_kind == Some(kind) {
            self.double_completed = true;
        }

        self.active = None;
        context.events.push(GestureEvent {
            gesture: kind,
            phase: GesturePhase::Release,
            at: now,
        });
    }

    fn held_ms(held_since: Option<Instant>, now: Instant) -> u16 {
        let age = held_since.map_or(0, |since| now.duration_since(since).as_millis());
        min(age, u16::MAX as u32) as u16
    }

    fn refresh_trace(&mut self, state_id: EngineStateId, now: Instant, up: bool, down: bool) {
        let double_age_ms = if self.double_kind.is_some() {
            min(
                now.duration_since(self.double_committed_at).as_millis(),
                u16::MAX as u32,
            ) as u16
        } else {
            0
        };

        self.last_trace = EngineTraceSample {
            now,
            state_id,
            up_stable: up,
            down_stable: down,
            up_held_ms: Self::held_ms(self.up_held_since, now),
            down_held_ms: Self::held_ms(self.down_held_since, now),
            double_pending: self.double_kind,
            double_age_ms,
            doubled_active: self.active.is_some_and(|active| active.doubled),
        };
    }
}

#[state_machine(initial = "State::idle()")]
impl GestureHsm {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &GestureHsmEvent) -> Outcome<State> {
        match event {
            GestureHsmEvent::Poll { now, up, down } => {
                self.expire_double_memory(*now);
                self.track_hold(*now, *up, *down);
                self.refresh_trace(EngineStateId::Idle, *now, *up, *down);

                if self.up_commit_ready(*now) {
                    self.commit(context, GestureKind::Up, *now);
                    return Transition(State::up_active());
                }
                if self.down_commit_ready(*now) {
                    self.commit(context, GestureKind::Down, *now);
                    return Transition(State::down_active());
                }
                if self.stop_commit_ready(*now) {
                    self.commit(context, GestureKind::Stop, *now);
                    return Transition(State::stop_active());
                }
                Handled
            }
        }
    }

    #[state]
    fn up_active(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Poll { now, up, down } => {
                if !*up {
                    self.finish_release(context, GestureKind::Up, *now);
                    self.refresh_trace(EngineStateId::UpActive, *now, *up, *down);
                    return Transition(State::idle());
                }

                self.expire_double_memory(*now);
                self.track_hold(*now, *up, *down);
                self.refresh_trace(EngineStateId::UpActive, *now, *up, *down);

                // The up hold is already past threshold, so the combo fires
                // on the poll the down level stabilizes.
                if self.stop_commit_ready(*now) {
                    self.commit(context, GestureKind::Stop, *now);
                    return Transition(State::stop_active());
                }
                Handled
            }
        }
    }

    #[state]
    fn down_active(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Poll { now, up, down } => {
                if !*down {
                    self.finish_release(context, GestureKind::Down, *now);
                    self.refresh_trace(EngineStateId::DownActive, *now, *up, *down);
                    return Transition(State::idle());
                }

                self.expire_double_memory(*now);
                self.track_hold(*now, *up, *down);
                self.refresh_trace(EngineStateId::DownActive, *now, *up, *down);

                if self.stop_commit_ready(*now) {
                    self.commit(context, GestureKind::Stop, *now);
                    return Transition(State::stop_active());
                }
                Handled
            }
        }
    }

    #[state]
    fn stop_active(
        &mut self,
        context: &mut DispatchContext,
        event: &GestureHsmEvent,
    ) -> Outcome<State> {
        match event {
            GestureHsmEvent::Poll { now, up, down } => {
                // The combo only ends once both channels have gone quiet;
                // letting go of a single paddle keeps the stop latched.
                if !*up && !*down {
                    self.finish_release(context, GestureKind::Stop, *now);
                    self.refresh_trace(EngineStateId::StopActive, *now, *up, *down);
                    return Transition(State::idle());
                }

                self.expire_double_memory(*now);
                self.track_hold(*now, *up, *down);
                self.refresh_trace(EngineStateId::StopActive, *now, *up, *down);
                Handled
            }
        }
    }
}
