//! Provider and handle
//!
//! [`SheetProvider`] owns the shared controller and the animation
//! scheduler; it lives wherever the host mounts UI. [`SheetHandle`] is the
//! capability host code uses to present the sheet: a clonable, explicitly
//! passed object rather than a late-bound mutable slot read through a
//! context. Handles hold a weak reference, so a dropped provider turns
//! into a recoverable error instead of a dangling cell.

use std::sync::{Arc, Mutex, Weak};

use swish_animation::AnimationScheduler;
use swish_gesture::{GestureConfig, InsetPolicy};

use crate::content::{ProviderConfig, ShowProperties};
use crate::controller::{SheetController, SheetFrame};
use crate::error::SheetError;
use crate::lifecycle::SheetState;

/// Shared controller handle type
pub type SharedSheetController = Arc<Mutex<SheetController>>;

/// Owns the sheet controller and its animation scheduler.
///
/// The scheduler may be ticked from a dedicated animation thread for
/// jitter-free pacing; the controller pump ([`tick`](Self::tick)) runs on
/// the interaction thread. Both are safe to drive from a single thread in
/// headless hosts and tests via [`advance`](Self::advance).
pub struct SheetProvider {
    controller: SharedSheetController,
    scheduler: Arc<Mutex<AnimationScheduler>>,
}

impl SheetProvider {
    /// Create a provider. `screen_height` is read once and treated as
    /// static for the process lifetime.
    pub fn new(config: ProviderConfig, screen_height: f32) -> Self {
        let scheduler = Arc::new(Mutex::new(AnimationScheduler::new()));
        let mut controller = SheetController::new(config, screen_height);
        controller.set_scheduler(&scheduler);
        Self {
            controller: Arc::new(Mutex::new(controller)),
            scheduler,
        }
    }

    /// Select the gesture variant / thresholds
    pub fn with_gesture_config(self, config: GestureConfig) -> Self {
        self.controller.lock().unwrap().set_gesture_config(config);
        self
    }

    /// Select the overscroll inset correction for this platform
    pub fn with_inset_policy(self, policy: InsetPolicy) -> Self {
        self.controller.lock().unwrap().set_inset_policy(policy);
        self
    }

    /// A clonable handle for host call sites
    pub fn handle(&self) -> SheetHandle {
        SheetHandle {
            controller: Arc::downgrade(&self.controller),
        }
    }

    /// The shared controller, for the presentation layer's event routing
    pub fn controller(&self) -> SharedSheetController {
        Arc::clone(&self.controller)
    }

    /// The shared scheduler, for an animation-thread driver
    pub fn scheduler(&self) -> Arc<Mutex<AnimationScheduler>> {
        Arc::clone(&self.scheduler)
    }

    /// Advance motions by an explicit `dt` (seconds) and pump the
    /// controller. Deterministic; used by headless hosts and tests.
    /// Returns true while anything is still animating.
    pub fn advance(&self, dt: f32) -> bool {
        self.scheduler.lock().unwrap().advance(dt);
        self.controller.lock().unwrap().tick()
    }

    /// Wall-clock variant of [`advance`](Self::advance)
    pub fn tick(&self) -> bool {
        self.scheduler.lock().unwrap().tick();
        self.controller.lock().unwrap().tick()
    }

    /// Sample the current frame for rendering
    pub fn frame(&self) -> SheetFrame {
        self.controller.lock().unwrap().frame()
    }
}

/// Capability to present and dismiss the sheet from host code.
///
/// Cheap to clone and pass by value to call sites.
#[derive(Clone)]
pub struct SheetHandle {
    controller: Weak<Mutex<SheetController>>,
}

impl SheetHandle {
    fn controller(&self) -> Result<SharedSheetController, SheetError> {
        self.controller.upgrade().ok_or(SheetError::ProviderDropped)
    }

    /// Present the sheet (or update its content in place if already open)
    pub fn show(&self, props: ShowProperties) -> Result<(), SheetError> {
        self.controller()?.lock().unwrap().show(props);
        Ok(())
    }

    /// Request the closing transition; no-op if not open
    pub fn request_close(&self) -> Result<(), SheetError> {
        self.controller()?.lock().unwrap().request_close();
        Ok(())
    }

    /// Current lifecycle state
    pub fn state(&self) -> Result<SheetState, SheetError> {
        Ok(self.controller()?.lock().unwrap().state())
    }

    /// Select an action by index: requests the close, then invokes the
    /// action's callback. The controller lock is released before the
    /// callback runs, so the callback may call back into this handle
    /// (e.g. to present another sheet). Returns false for an
    /// out-of-range index.
    pub fn select_action(&self, index: usize) -> Result<bool, SheetError> {
        let controller = self.controller()?;
        let action = {
            let mut controller = controller.lock().unwrap();
            let Some(action) = controller.actions().get(index).cloned() else {
                return Ok(false);
            };
            controller.request_close();
            action
        };
        action.invoke();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_show_and_state() {
        let provider = SheetProvider::new(ProviderConfig::default(), 800.0);
        let handle = provider.handle();

        assert_eq!(handle.state().unwrap(), SheetState::Closed);
        handle.show(ShowProperties::new().header("Hello")).unwrap();
        assert_eq!(handle.state().unwrap(), SheetState::Opening);
    }

    #[test]
    fn test_handle_outlives_provider_as_error() {
        let provider = SheetProvider::new(ProviderConfig::default(), 800.0);
        let handle = provider.handle();
        drop(provider);

        assert_eq!(
            handle.show(ShowProperties::new()),
            Err(SheetError::ProviderDropped)
        );
        assert_eq!(handle.state(), Err(SheetError::ProviderDropped));
    }

    #[test]
    fn test_handles_are_clonable() {
        let provider = SheetProvider::new(ProviderConfig::default(), 800.0);
        let handle = provider.handle();
        let second = handle.clone();

        handle.show(ShowProperties::new()).unwrap();
        assert_eq!(second.state().unwrap(), SheetState::Opening);
    }
}
