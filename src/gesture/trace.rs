use crate::clock::Instant;

use super::types::{EngineStateId, GestureKind};

/// Flat per-poll snapshot of the engine, refreshed on every `update`.
///
/// Hosts that stream diagnostics forward these over whatever channel they
/// already have; the engine itself never logs.
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineTraceSample {
    pub now: Instant,
    pub state_id: EngineStateId,
    pub up_stable: bool,
    pub down_stable: bool,
    /// Age of the up channel's current hold, clamped to u16::MAX; 0 when idle.
    pub up_held_ms: u16,
    pub down_held_ms: u16,
    /// Gesture armed for double matching, if any.
    pub double_pending: Option<GestureKind>,
    /// Time since that gesture's commit, clamped; 0 when nothing is pending.
    pub double_age_ms: u16,
    pub doubled_active: bool,
}
