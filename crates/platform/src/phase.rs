//! Render loop lifecycle.

/// `Uninitialized → Running → ShuttingDown → Terminated`. A failed startup
/// goes straight from `Uninitialized` to `ShuttingDown`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoopPhase {
    #[default]
    Uninitialized,
    Running,
    ShuttingDown,
    Terminated,
}

impl LoopPhase {
    pub fn can_transition(self, next: LoopPhase) -> bool {
        use LoopPhase::*;
        matches!(
            (self, next),
            (Uninitialized, Running)
                | (Uninitialized, ShuttingDown)
                | (Running, ShuttingDown)
                | (ShuttingDown, Terminated)
        )
    }

    /// Move to `next` if allowed. Returns whether the phase changed.
    pub fn transition(&mut self, next: LoopPhase) -> bool {
        if self.can_transition(next) {
            log::debug!("Loop phase {:?} -> {:?}", self, next);
            *self = next;
            true
        } else {
            log::trace!("Ignoring loop phase change {:?} -> {:?}", self, next);
            false
        }
    }

    #[inline]
    pub fn is_running(self) -> bool {
        self == LoopPhase::Running
    }
}
