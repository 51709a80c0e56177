use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

const OPEN: u8 = 0;
const SENT: u8 = 1;
const ABORTED: u8 = 2;

/// Lifecycle of a request's response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nothing has been written yet
    Open,
    /// A response was written or has started streaming
    Sent,
    /// The request was cancelled before a response was written
    Aborted,
}

impl SlotState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            OPEN => Self::Open,
            SENT => Self::Sent,
            _ => Self::Aborted,
        }
    }
}

/// Per-request marker guaranteeing at most one response is written
///
/// Clones share state. Transitions only ever leave `Open`.
#[derive(Debug, Clone, Default)]
pub struct ResponseSlot(Arc<AtomicU8>);

impl ResponseSlot {
    /// Fresh open slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> SlotState {
        SlotState::from_raw(self.0.load(Ordering::Acquire))
    }

    /// Claim the slot for writing
    ///
    /// # Errors
    ///
    /// Returns the state that prevented the claim (`Sent` or `Aborted`)
    pub fn try_claim(&self) -> Result<(), SlotState> {
        self.0
            .compare_exchange(OPEN, SENT, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(SlotState::from_raw)
    }

    /// Record that a response began without going through the pipeline
    ///
    /// Returns `false` when the slot was no longer open.
    pub fn mark_sent(&self) -> bool {
        self.try_claim().is_ok()
    }

    /// Record that the request was cancelled
    ///
    /// Returns `false` when the slot was no longer open.
    pub fn abort(&self) -> bool {
        self.0
            .compare_exchange(OPEN, ABORTED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_once() {
        let slot = ResponseSlot::new();
        assert_eq!(slot.state(), SlotState::Open);
        assert_eq!(slot.try_claim(), Ok(()));
        assert_eq!(slot.try_claim(), Err(SlotState::Sent));
        assert_eq!(slot.state(), SlotState::Sent);
    }

    #[test]
    fn clones_share_state() {
        let slot = ResponseSlot::new();
        let other = slot.clone();
        assert!(other.mark_sent());
        assert_eq!(slot.try_claim(), Err(SlotState::Sent));
    }

    #[test]
    fn abort_only_from_open() {
        let slot = ResponseSlot::new();
        assert!(slot.abort());
        assert!(!slot.abort());
        assert_eq!(slot.try_claim(), Err(SlotState::Aborted));

        let sent = ResponseSlot::new();
        assert!(sent.mark_sent());
        assert!(!sent.abort());
        assert_eq!(sent.state(), SlotState::Sent);
    }
}
