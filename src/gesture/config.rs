use crate::clock::Duration;

use super::types::ChannelId;

/// Stabilization interval both channel filters apply to raw reads.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(30);
/// Continuous-hold time a stable channel needs before its gesture commits.
pub const DEFAULT_HOLD: Duration = Duration::from_millis(50);
/// Maximum gap between two same-kind commits for the second one to count as
/// a double activation.
pub const DEFAULT_DOUBLE_WINDOW: Duration = Duration::from_millis(1000);

/// Immutable per-engine parameters.
///
/// Values are taken as supplied; zero or otherwise degenerate durations are
/// the caller's responsibility to avoid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub up_channel: ChannelId,
    pub down_channel: ChannelId,
    pub debounce: Duration,
    pub hold: Duration,
    pub double_window: Duration,
}

impl EngineConfig {
    pub const fn new(up_channel: ChannelId, down_channel: ChannelId) -> Self {
        Self {
            up_channel,
            down_channel,
            debounce: DEFAULT_DEBOUNCE,
            hold: DEFAULT_HOLD,
            double_window: DEFAULT_DOUBLE_WINDOW,
        }
    }

    /// Same channels with different timing. Panels on longer, noisier wiring
    /// typically run 60 ms debounce / 100 ms hold instead of the defaults.
    pub const fn with_timing(
        mut self,
        debounce: Duration,
        hold: Duration,
        double_window: Duration,
    ) -> Self {
        self.debounce = debounce;
        self.hold = hold;
        self.double_window = double_window;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(ChannelId(0), ChannelId(1))
    }
}
