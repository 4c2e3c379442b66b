pub mod config;
pub mod debounce;
pub mod handlers;
pub mod hsm;
pub mod trace;
pub mod types;

pub use config::EngineConfig;
pub use debounce::DebouncedLevel;
pub use handlers::GestureHandlers;
pub use hsm::{EngineOutput, GestureEngine};
pub use trace::EngineTraceSample;
pub use types::{
    ActiveGesture, ChannelId, EngineStateId, EventBuffer, GestureEvent, GestureKind, GesturePhase,
};
