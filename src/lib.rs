//! Debounced gesture recognition for a pair of momentary switches.
//!
//! Two raw channel reads (an "up" and a "down" paddle) plus a monotonic
//! millisecond instant go in once per poll; out come debounced, mutually
//! exclusive gesture events: up, down, the both-held "stop" combo, and a
//! double-activation variant of each. The crate does no I/O and owns no
//! clock; the host polls `GestureEngine::update` and acts on the events,
//! typically by driving a shutter motor controller.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod gesture;

pub use clock::{Duration, Instant};
pub use gesture::{
    ActiveGesture, ChannelId, DebouncedLevel, EngineConfig, EngineOutput, EngineStateId,
    EngineTraceSample, EventBuffer, GestureEngine, GestureEvent, GestureHandlers, GestureKind,
    GesturePhase,
};
