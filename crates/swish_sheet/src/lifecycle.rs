//! Sheet lifecycle state machine
//!
//! `Closed -> Opening -> Open -> Closing -> Closed`, driven by typed
//! events. Invalid events produce no transition, which is what makes the
//! close request idempotent: a second request while already `Closing` (or
//! `Closed`) simply does not match.

/// Events driving the lifecycle machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Host called show
    Show,
    /// Open motion reached full openness
    Opened,
    /// Close control, action selection, or a committed drag
    CloseRequested,
    /// Close motion reached zero
    Closed,
}

/// Coarse sheet state exposed to the host
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SheetState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl SheetState {
    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: LifecycleEvent) -> Option<Self> {
        match (self, event) {
            (SheetState::Closed, LifecycleEvent::Show) => Some(SheetState::Opening),
            (SheetState::Opening, LifecycleEvent::Opened) => Some(SheetState::Open),
            (SheetState::Opening, LifecycleEvent::CloseRequested) => Some(SheetState::Closing),
            (SheetState::Open, LifecycleEvent::CloseRequested) => Some(SheetState::Closing),
            // Showing again mid-close overrides the in-flight motion
            (SheetState::Closing, LifecycleEvent::Show) => Some(SheetState::Opening),
            (SheetState::Closing, LifecycleEvent::Closed) => Some(SheetState::Closed),
            // Show while Opening/Open replaces content in place, no transition
            _ => None,
        }
    }

    /// Whether presentation is mounted
    pub fn is_mounted(&self) -> bool {
        !matches!(self, SheetState::Closed)
    }

    /// Whether a close may be requested from this state
    pub fn can_close(&self) -> bool {
        matches!(self, SheetState::Open | SheetState::Opening)
    }
}
