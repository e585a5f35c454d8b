use serde::{Deserialize, Serialize};
use tracing::trace;

const LOG_TARGET: &str = "supervisor::phase";

/// Lifecycle of a rendering process as seen from the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupervisorPhase {
    /// Nothing allocated yet
    Starting,
    /// HTTP and channel ports chosen
    PortBound,
    /// Rendering process launched, not yet reachable
    ChildSpawned,
    /// State channel connected
    ChannelConnected,
    /// Page served successfully
    HttpReady,
    /// Accepting renders
    Running,
    /// Close signal sent, waiting for the process to exit
    Closing,
    /// Process reaped
    Closed,
}

impl SupervisorPhase {
    pub fn can_transition_to(&self, target: SupervisorPhase) -> bool {
        use SupervisorPhase::*;
        matches!(
            (self, target),
            (Starting, PortBound)
                | (PortBound, ChildSpawned)
                | (ChildSpawned, ChannelConnected)
                | (ChannelConnected, HttpReady)
                | (HttpReady, Running)
                | (ChildSpawned | ChannelConnected | HttpReady | Running, Closing)
                | (Closing, Closed)
        )
    }

    pub fn advance(&mut self, target: SupervisorPhase) {
        debug_assert!(
            self.can_transition_to(target),
            "invalid supervisor transition {self:?} -> {target:?}"
        );
        trace!(target = LOG_TARGET, from = ?self, to = ?target, "phase transition");
        *self = target;
    }

    pub fn is_running(&self) -> bool {
        matches!(self, SupervisorPhase::Running)
    }
}
