//! Sheet controller
//!
//! Owns the lifecycle state and the openness value, routes scroll/touch/
//! gesture events to the coupler and arbiter, and pumps motion completion
//! from its own `tick`. The openness value (`progress`, 0 = hidden,
//! 255 = fully open) has exactly one writer: this controller. The arbiter
//! and the presentation layer only ever read it.
//!
//! Motions run in the shared scheduler; the controller keeps the slotmap
//! key of its current motion and polls it. Superseding a motion removes
//! the old key, so a stale motion can never flip state for a newer cycle.

use std::sync::{Arc, Mutex, Weak};

use smallvec::SmallVec;
use swish_animation::{
    AnimationScheduler, Easing, Spring, SpringConfig, SpringId, Tween, TweenId,
};
use swish_gesture::{
    DragEnd, DragUpdate, GestureArbiter, GestureConfig, GestureSample, InsetPolicy, SafeAreaInsets,
    ScrollCoupler, SheetGeometry,
};

use crate::content::{Action, CloseConfig, ProviderConfig, ShowProperties};
use crate::lifecycle::{LifecycleEvent, SheetState};

/// Fully-open progress value
pub const PROGRESS_OPEN: f32 = 255.0;
/// Duration of the timed close motion
pub const CLOSE_DURATION_MS: u32 = 350;

/// The motion currently driving progress
#[derive(Clone, Copy)]
enum ProgressMotion {
    Open(SpringId),
    Close(TweenId),
}

/// Per-frame sample for the presentation layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetFrame {
    /// Whether the sheet presentation should be in the tree at all
    pub mounted: bool,
    /// Openness in [0, 255]
    pub progress: f32,
    /// Live drag displacement in pixels (positive = downward)
    pub drag_offset: f32,
    /// Vertical translation to render, in pixels. Zero when fully open at
    /// rest; negative during elastic overscroll.
    pub translate_y: f32,
    /// Backdrop dim in [0, 1], tracking progress only
    pub backdrop_opacity: f32,
    /// Height cap for the nested content region
    pub content_max_height: f32,
}

/// The singleton sheet's state owner.
///
/// All mutation goes through methods on this type; hosts hold it behind
/// `Arc<Mutex<..>>` (see [`SheetProvider`](crate::provider::SheetProvider))
/// and feed it events from the interaction thread.
pub struct SheetController {
    state: SheetState,
    /// Openness, written only by this controller
    progress: f32,
    motion: Option<ProgressMotion>,
    scheduler: Weak<Mutex<AnimationScheduler>>,

    defaults: ProviderConfig,
    header: Option<String>,
    actions: SmallVec<[Action; 4]>,
    close: CloseConfig,

    screen_height: f32,
    insets: SafeAreaInsets,
    inset_policy: InsetPolicy,
    /// Captured once per open cycle after the first layout pass
    geometry: Option<SheetGeometry>,

    coupler: ScrollCoupler,
    arbiter: GestureArbiter,
}

impl SheetController {
    /// Create a controller with no scheduler; motions snap instead of
    /// animating until [`set_scheduler`](Self::set_scheduler) is called.
    pub fn new(defaults: ProviderConfig, screen_height: f32) -> Self {
        let close = defaults.close.clone().unwrap_or_default();
        Self {
            state: SheetState::Closed,
            progress: 0.0,
            motion: None,
            scheduler: Weak::new(),
            defaults,
            header: None,
            actions: SmallVec::new(),
            close,
            screen_height,
            insets: SafeAreaInsets::default(),
            inset_policy: InsetPolicy::default(),
            geometry: None,
            coupler: ScrollCoupler::new(),
            arbiter: GestureArbiter::new(GestureConfig::default()),
        }
    }

    /// Wire the shared scheduler into the controller and its arbiter
    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) {
        self.scheduler = Arc::downgrade(scheduler);
        self.arbiter.set_scheduler(scheduler);
    }

    /// Replace the gesture policy (variant selection, thresholds)
    pub fn set_gesture_config(&mut self, config: GestureConfig) {
        self.arbiter = GestureArbiter::new(config);
        if let Some(scheduler) = self.scheduler.upgrade() {
            self.arbiter.set_scheduler(&scheduler);
        }
    }

    /// Select the overscroll inset correction for this platform
    pub fn set_inset_policy(&mut self, policy: InsetPolicy) {
        self.inset_policy = policy;
    }

    /// Feed the platform safe-area insets; read at geometry capture time
    pub fn set_insets(&mut self, insets: SafeAreaInsets) {
        self.insets = insets;
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Present the sheet, or replace its content in place if it is already
    /// presented. Showing while the close motion is in flight cancels the
    /// close and re-opens from the current position.
    pub fn show(&mut self, props: ShowProperties) {
        self.header = props.header;
        self.actions = props.actions.into_iter().collect();
        if let Some(close) = props.close {
            let base = self.defaults.close.clone().unwrap_or_default();
            self.close = close.merged_over(&base);
        }

        match self.state.on_event(LifecycleEvent::Show) {
            Some(next @ SheetState::Opening) => {
                let reopening = self.state == SheetState::Closing;
                self.state = next;
                if !reopening {
                    // Fresh open cycle: new geometry capture, clean gesture state
                    self.geometry = None;
                    self.coupler.reset();
                    self.arbiter.reset();
                }
                tracing::debug!(reopening, "sheet opening");
                self.start_open_motion();
            }
            _ => {
                // Already presented: content swapped in place, no motion
                tracing::debug!("sheet content replaced in place");
            }
        }
    }

    /// Request the closing transition. No-op unless the sheet is `Open` or
    /// `Opening`, which makes overlapping close triggers (control press +
    /// committed drag) collapse into a single closing motion.
    pub fn request_close(&mut self) {
        let Some(next) = self.state.on_event(LifecycleEvent::CloseRequested) else {
            tracing::debug!(state = ?self.state, "close request ignored");
            return;
        };
        self.state = next;
        tracing::debug!("sheet closing");
        self.start_close_motion();
    }

    /// Select an action by index: the close motion is requested first, the
    /// action's callback runs second. Returns false for an out-of-range
    /// index (stale presentation taps are not an error).
    pub fn select_action(&mut self, index: usize) -> bool {
        let Some(action) = self.actions.get(index).cloned() else {
            tracing::debug!(index, "action selection out of range");
            return false;
        };
        self.request_close();
        action.invoke();
        true
    }

    // =========================================================================
    // Measurement and event routing
    // =========================================================================

    /// Feed the one-shot layout measurement of the sheet content. Only the
    /// first measurement of an open cycle is captured; later ones are
    /// ignored until the sheet closes.
    pub fn on_layout(&mut self, sheet_height: f32) {
        if !self.state.is_mounted() || self.geometry.is_some() {
            return;
        }
        self.geometry = Some(SheetGeometry::new(
            self.screen_height,
            sheet_height,
            self.insets,
            self.inset_policy,
        ));
        tracing::debug!(sheet_height, "geometry captured");
    }

    /// Feed a scroll event from the nested content region
    pub fn on_scroll(&mut self, content_offset_y: f32) {
        self.coupler.on_scroll(content_offset_y);
    }

    /// Feed a touch-start inside the nested content region
    pub fn on_touch_start(&mut self, location_y: f32) {
        self.coupler.on_touch_start(location_y);
    }

    /// Feed a pan-gesture update tick
    pub fn on_gesture_update(&mut self, sample: GestureSample) -> DragUpdate {
        if !self.state.is_mounted() {
            return DragUpdate::PassThrough;
        }
        // Before the first layout pass the sheet height reads as zero,
        // which disables overscroll resistance rather than erroring.
        let geometry = self.geometry.unwrap_or_else(|| {
            SheetGeometry::new(self.screen_height, 0.0, self.insets, self.inset_policy)
        });
        self.arbiter.update(sample, &geometry, &self.coupler)
    }

    /// Feed the pan-gesture end. A committed drag requests the close.
    pub fn on_gesture_end(&mut self, sample: GestureSample) -> DragEnd {
        let end = self.arbiter.release(sample, &self.coupler);
        if end == DragEnd::Commit {
            self.request_close();
        }
        end
    }

    // =========================================================================
    // Frame pump
    // =========================================================================

    /// Pump motion completion into state transitions. Call once per frame
    /// from the interaction thread, after the scheduler has advanced.
    /// Returns true while anything is still animating.
    pub fn tick(&mut self) -> bool {
        let drag_active = self.arbiter.tick();

        let Some(motion) = self.motion else {
            return drag_active;
        };

        let Some(scheduler_arc) = self.scheduler.upgrade() else {
            // Scheduler gone: resolve the motion by snapping to its target
            self.motion = None;
            match motion {
                ProgressMotion::Open(_) => self.finish_open(),
                ProgressMotion::Close(_) => self.finish_close(),
            }
            return drag_active;
        };

        let mut scheduler = scheduler_arc.lock().unwrap();
        match motion {
            ProgressMotion::Open(id) => {
                let Some(spring) = scheduler.get_spring(id) else {
                    self.motion = None;
                    return drag_active;
                };
                self.progress = spring.value().clamp(0.0, PROGRESS_OPEN);
                if spring.is_settled() {
                    scheduler.remove_spring(id);
                    drop(scheduler);
                    self.motion = None;
                    self.finish_open();
                    return drag_active;
                }
            }
            ProgressMotion::Close(id) => {
                let Some(tween) = scheduler.get_tween(id) else {
                    self.motion = None;
                    return drag_active;
                };
                self.progress = tween.value().clamp(0.0, PROGRESS_OPEN);
                if tween.is_finished() {
                    scheduler.remove_tween(id);
                    drop(scheduler);
                    self.motion = None;
                    self.finish_close();
                    return drag_active;
                }
            }
        }

        true
    }

    /// Sample the values the presentation layer renders this frame
    pub fn frame(&self) -> SheetFrame {
        let effective = self.progress - self.arbiter.offset_y();
        // Linear map [0, 255] -> [screen_height, 0], extrapolating so
        // elastic overscroll can lift the sheet slightly past its rest.
        let translate_y = self.screen_height * (1.0 - effective / PROGRESS_OPEN);
        SheetFrame {
            mounted: self.state.is_mounted(),
            progress: self.progress,
            drag_offset: self.arbiter.offset_y(),
            translate_y,
            backdrop_opacity: (self.progress / PROGRESS_OPEN).clamp(0.0, 1.0),
            content_max_height: self.screen_height / 1.5,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn state(&self) -> SheetState {
        self.state
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn drag_offset(&self) -> f32 {
        self.arbiter.offset_y()
    }

    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn close_config(&self) -> &CloseConfig {
        &self.close
    }

    pub fn provider_config(&self) -> &ProviderConfig {
        &self.defaults
    }

    pub fn geometry(&self) -> Option<SheetGeometry> {
        self.geometry
    }

    // =========================================================================
    // Motion management
    // =========================================================================

    fn start_open_motion(&mut self) {
        self.cancel_motion();
        let Some(scheduler) = self.scheduler.upgrade() else {
            self.finish_open();
            return;
        };
        let mut spring = Spring::new(SpringConfig::sheet(), self.progress);
        spring.set_target(PROGRESS_OPEN);
        let id = scheduler.lock().unwrap().add_spring(spring);
        self.motion = Some(ProgressMotion::Open(id));
    }

    fn start_close_motion(&mut self) {
        self.cancel_motion();
        let Some(scheduler) = self.scheduler.upgrade() else {
            self.finish_close();
            return;
        };
        let tween = Tween::new(
            self.progress,
            0.0,
            CLOSE_DURATION_MS,
            Easing::EaseInOutQuad,
        );
        let id = scheduler.lock().unwrap().add_tween(tween);
        self.motion = Some(ProgressMotion::Close(id));
    }

    /// Remove the in-flight motion, if any. Removal is cancellation: only
    /// the latest target matters, and a removed motion can never complete.
    fn cancel_motion(&mut self) {
        let Some(motion) = self.motion.take() else {
            return;
        };
        let Some(scheduler) = self.scheduler.upgrade() else {
            return;
        };
        let mut scheduler = scheduler.lock().unwrap();
        match motion {
            ProgressMotion::Open(id) => {
                scheduler.remove_spring(id);
            }
            ProgressMotion::Close(id) => {
                scheduler.remove_tween(id);
            }
        }
    }

    fn finish_open(&mut self) {
        self.progress = PROGRESS_OPEN;
        if let Some(next) = self.state.on_event(LifecycleEvent::Opened) {
            self.state = next;
            tracing::debug!("sheet open");
        }
    }

    fn finish_close(&mut self) {
        self.progress = 0.0;
        if let Some(next) = self.state.on_event(LifecycleEvent::Closed) {
            self.state = next;
        }
        // Defensive: the drag offset resets even if a settle was mid-flight
        self.arbiter.reset();
        self.coupler.reset();
        self.geometry = None;
        tracing::debug!("sheet closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn shared_scheduler() -> Arc<Mutex<AnimationScheduler>> {
        Arc::new(Mutex::new(AnimationScheduler::new()))
    }

    fn controller_with(scheduler: &Arc<Mutex<AnimationScheduler>>) -> SheetController {
        let mut controller = SheetController::new(ProviderConfig::default(), 800.0);
        controller.set_scheduler(scheduler);
        controller
    }

    /// Drive scheduler + controller until nothing animates
    fn run_to_rest(scheduler: &Arc<Mutex<AnimationScheduler>>, controller: &mut SheetController) {
        for _ in 0..2400 {
            scheduler.lock().unwrap().advance(1.0 / 120.0);
            if !controller.tick() {
                break;
            }
        }
    }

    #[test]
    fn test_show_opens_and_settles_at_255() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);

        controller.show(ShowProperties::new().header("Share"));
        assert_eq!(controller.state(), SheetState::Opening);
        assert!(controller.frame().mounted);

        run_to_rest(&scheduler, &mut controller);

        assert_eq!(controller.state(), SheetState::Open);
        assert_eq!(controller.progress(), PROGRESS_OPEN);
        assert_eq!(controller.frame().translate_y, 0.0);
        assert_eq!(controller.frame().backdrop_opacity, 1.0);
    }

    #[test]
    fn test_progress_stays_in_range_during_open() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.show(ShowProperties::new());

        for _ in 0..2400 {
            scheduler.lock().unwrap().advance(1.0 / 120.0);
            let animating = controller.tick();
            let progress = controller.progress();
            assert!((0.0..=PROGRESS_OPEN).contains(&progress), "progress {progress}");
            if !animating {
                break;
            }
        }
        assert_eq!(controller.state(), SheetState::Open);
    }

    #[test]
    fn test_close_request_from_closed_is_noop() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);

        controller.request_close();
        assert_eq!(controller.state(), SheetState::Closed);
        assert_eq!(controller.progress(), 0.0);
    }

    #[test]
    fn test_double_close_request_single_transition() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.show(ShowProperties::new());
        run_to_rest(&scheduler, &mut controller);

        controller.request_close();
        let tweens_after_first = scheduler.lock().unwrap().tween_count();
        controller.request_close();
        let tweens_after_second = scheduler.lock().unwrap().tween_count();

        assert_eq!(controller.state(), SheetState::Closing);
        assert_eq!(tweens_after_first, 1);
        assert_eq!(tweens_after_second, 1);

        run_to_rest(&scheduler, &mut controller);
        assert_eq!(controller.state(), SheetState::Closed);
    }

    #[test]
    fn test_show_while_open_replaces_content_without_motion() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.show(ShowProperties::new().header("First"));
        run_to_rest(&scheduler, &mut controller);

        controller.show(
            ShowProperties::new()
                .header("Second")
                .action(Action::new("Copy", || {})),
        );

        assert_eq!(controller.state(), SheetState::Open);
        assert_eq!(controller.header(), Some("Second"));
        assert_eq!(controller.actions().len(), 1);
        assert_eq!(controller.progress(), PROGRESS_OPEN);
        assert!(!scheduler.lock().unwrap().has_active_animations());
    }

    #[test]
    fn test_show_during_closing_cancels_close() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.show(ShowProperties::new());
        run_to_rest(&scheduler, &mut controller);

        controller.request_close();
        // Let the close run partway
        for _ in 0..12 {
            scheduler.lock().unwrap().advance(1.0 / 120.0);
            controller.tick();
        }
        assert_eq!(controller.state(), SheetState::Closing);
        let mid_progress = controller.progress();
        assert!(mid_progress < PROGRESS_OPEN && mid_progress > 0.0);

        // Reopen mid-close: the stale close motion must never finish
        controller.show(ShowProperties::new().header("Again"));
        assert_eq!(controller.state(), SheetState::Opening);
        assert_eq!(scheduler.lock().unwrap().tween_count(), 0);

        run_to_rest(&scheduler, &mut controller);
        assert_eq!(controller.state(), SheetState::Open);
        assert_eq!(controller.progress(), PROGRESS_OPEN);
    }

    #[test]
    fn test_select_action_closes_then_invokes() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);

        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        controller.show(ShowProperties::new().action(Action::new("Delete", move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })));
        run_to_rest(&scheduler, &mut controller);

        assert!(controller.select_action(0));
        // Closing began before the callback observed anything
        assert_eq!(controller.state(), SheetState::Closing);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        run_to_rest(&scheduler, &mut controller);
        assert_eq!(controller.state(), SheetState::Closed);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_select_action_out_of_range() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.show(ShowProperties::new());
        run_to_rest(&scheduler, &mut controller);

        assert!(!controller.select_action(3));
        assert_eq!(controller.state(), SheetState::Open);
    }

    #[test]
    fn test_geometry_captured_once_per_cycle() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.set_insets(SafeAreaInsets::new(40.0, 20.0));
        controller.show(ShowProperties::new());

        controller.on_layout(300.0);
        controller.on_layout(999.0); // ignored: already captured this cycle
        assert_eq!(controller.geometry().unwrap().sheet_height, 300.0);

        run_to_rest(&scheduler, &mut controller);
        controller.request_close();
        run_to_rest(&scheduler, &mut controller);
        assert!(controller.geometry().is_none());

        // Next cycle captures fresh
        controller.show(ShowProperties::new());
        controller.on_layout(280.0);
        assert_eq!(controller.geometry().unwrap().sheet_height, 280.0);
    }

    #[test]
    fn test_layout_ignored_while_closed() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.on_layout(300.0);
        assert!(controller.geometry().is_none());
    }

    #[test]
    fn test_close_config_merging() {
        let defaults = ProviderConfig {
            close: Some(CloseConfig::new("Dismiss").color("#999999")),
            ..Default::default()
        };
        let scheduler = shared_scheduler();
        let mut controller = SheetController::new(defaults, 800.0);
        controller.set_scheduler(&scheduler);

        // No per-call override: provider default is used as-is
        assert_eq!(controller.close_config().text, "Dismiss");

        controller.show(ShowProperties::new().close(CloseConfig::new("Cancel")));
        assert_eq!(controller.close_config().text, "Cancel");
        // Absent override key fell back to the provider default
        assert_eq!(controller.close_config().color.as_deref(), Some("#999999"));
    }

    #[test]
    fn test_committed_drag_requests_close() {
        let scheduler = shared_scheduler();
        let mut controller = controller_with(&scheduler);
        controller.show(ShowProperties::new());
        run_to_rest(&scheduler, &mut controller);
        controller.on_layout(300.0);

        for translation in [0.0, 20.0, 60.0, 130.0] {
            controller.on_gesture_update(GestureSample::new(translation));
        }
        let end = controller.on_gesture_end(GestureSample::new(130.0));

        assert_eq!(end, DragEnd::Commit);
        assert_eq!(controller.state(), SheetState::Closing);

        run_to_rest(&scheduler, &mut controller);
        assert_eq!(controller.state(), SheetState::Closed);
        // Defensive reset left no residual offset
        assert_eq!(controller.drag_offset(), 0.0);
    }
}
