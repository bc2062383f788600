//! One-shot echo suppression between the two synchronized sides.
//!
//! Every side effect the router issues on one side comes back as a
//! notification from that side. The gate remembers which echoes are
//! expected so each one is swallowed exactly once.

use serde::{Deserialize, Serialize};

/// Which echoes the router is currently waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncPhase {
    Idle,
    /// A push or replace was issued; the next history notification is ours.
    AwaitingHistoryAck,
    /// A route change was sent; the next transition may be ours.
    AwaitingStateAck,
    AwaitingBoth,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Debounce {
    history_echo: bool,
    state_echo: Option<String>,
}

impl Debounce {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Arm before pushing or replacing.
    pub(crate) fn expect_history_echo(&mut self) {
        self.history_echo = true;
    }

    /// Consume the history flag. True when the notification must be ignored.
    pub(crate) fn absorb_history_echo(&mut self) -> bool {
        std::mem::take(&mut self.history_echo)
    }

    /// Arm before sending a history-originated route change for `route`.
    pub(crate) fn expect_state_echo(&mut self, route: &str) {
        self.state_echo = Some(route.to_string());
    }

    /// Consume the state flag. True only when it was armed for `path`; a
    /// transition to another path clears it without being suppressed.
    pub(crate) fn absorb_state_echo(&mut self, path: Option<&str>) -> bool {
        match self.state_echo.take() {
            Some(expected) => path == Some(expected.as_str()),
            None => false,
        }
    }

    pub(crate) fn phase(&self) -> SyncPhase {
        match (self.history_echo, self.state_echo.is_some()) {
            (false, false) => SyncPhase::Idle,
            (true, false) => SyncPhase::AwaitingHistoryAck,
            (false, true) => SyncPhase::AwaitingStateAck,
            (true, true) => SyncPhase::AwaitingBoth,
        }
    }
}
