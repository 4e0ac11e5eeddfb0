//! Drag gesture arbitration
//!
//! One [`GestureArbiter`] spans a pan gesture from first movement to
//! release. Each update tick is classified into exactly one outcome
//! (elastic overscroll, scroll pass-through, or proportional drag), and
//! the release decides between committing a close and settling back.
//!
//! The drag offset is the arbiter's value: positive pixels of downward
//! displacement layered on top of the sheet's open progress. It is written
//! only while a gesture is active or while the arbiter's own spring is
//! running, and it rests at exactly zero.

use std::sync::{Arc, Mutex, Weak};

use swish_animation::{AnimationScheduler, Spring, SpringConfig, SpringId};

use crate::coupler::ScrollCoupler;
use crate::geometry::SheetGeometry;

/// Per-update snapshot from the platform gesture recognizer.
///
/// `translation_y` is the cumulative signed displacement since the gesture
/// began: positive = finger moved down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureSample {
    pub translation_y: f32,
}

impl GestureSample {
    pub const fn new(translation_y: f32) -> Self {
        Self { translation_y }
    }
}

/// Events driving the per-gesture phase machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent {
    /// First movement of a new gesture
    Began,
    /// Release past the commit threshold
    Commit,
    /// Release below the commit threshold
    Cancel,
    /// Settle spring reached zero
    Settled,
}

/// Phases of one gesture: `Idle -> Dragging -> {Committed | Settling} -> Idle`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Committed,
    Settling,
}

impl DragPhase {
    /// Handle an event and return the new phase, or None if no transition
    pub fn on_event(&self, event: DragEvent) -> Option<Self> {
        match (self, event) {
            (DragPhase::Idle, DragEvent::Began) => Some(DragPhase::Dragging),
            (DragPhase::Dragging, DragEvent::Commit) => Some(DragPhase::Committed),
            (DragPhase::Dragging, DragEvent::Cancel) => Some(DragPhase::Settling),
            (DragPhase::Settling, DragEvent::Settled) => Some(DragPhase::Idle),
            // A new touch can grab the sheet while it is settling back
            (DragPhase::Settling, DragEvent::Began) => Some(DragPhase::Dragging),
            _ => None,
        }
    }
}

/// What a single update tick did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragUpdate {
    /// Elastic resistance above the sheet's natural height
    Overscroll,
    /// The sheet followed the finger (with friction)
    Drag,
    /// The nested content owns this touch; offset untouched
    PassThrough,
}

/// Outcome of a gesture release
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEnd {
    /// Net drag exceeded the commit threshold; caller should close
    Commit,
    /// Below threshold; the offset springs back to zero
    Settle,
}

/// Tunable policy for the arbiter.
///
/// Both historical variants live here as data: `scroll_coupled()` gates on
/// the nested region's scroll position and commits at 100 units net;
/// `direct()` ignores scroll state and commits at 150 units raw. The
/// thresholds and divisors are deliberately plain fields - they are feel
/// parameters, not constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Gate the drag on the content region being scrolled to its top
    pub scroll_gating: bool,
    /// Net downward units past which a release commits to closing
    pub commit_threshold: f32,
    /// First-stage divisor for the gated proportional mapping
    pub drag_divisor: f32,
    /// Second-stage damping for the gated proportional mapping
    pub drag_damping: f32,
    /// Single divisor for the ungated mapping
    pub direct_divisor: f32,
    /// Divisor applied to translation in the elastic overscroll branch
    pub overscroll_attenuation: f32,
    /// Spring used for overscroll resistance and the settle-back
    pub settle_spring: SpringConfig,
}

impl GestureConfig {
    /// Variant that cooperates with a nested scrollable region
    pub fn scroll_coupled() -> Self {
        Self {
            scroll_gating: true,
            commit_threshold: 100.0,
            drag_divisor: 2.0,
            drag_damping: 1.2,
            direct_divisor: 3.2,
            overscroll_attenuation: 5000.0,
            settle_spring: SpringConfig::sheet(),
        }
    }

    /// Variant for sheets without scrollable content
    pub fn direct() -> Self {
        Self {
            scroll_gating: false,
            commit_threshold: 150.0,
            ..Self::scroll_coupled()
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self::scroll_coupled()
    }
}

/// The pan-gesture arbiter for one sheet instance.
///
/// Stateless across gestures apart from the drag offset's resting value.
/// Springs run in the shared [`AnimationScheduler`]; the arbiter polls
/// them from [`tick`](Self::tick) and snaps the offset to the exact target
/// on settle.
pub struct GestureArbiter {
    config: GestureConfig,
    phase: DragPhase,
    /// The drag offset: downward pixels layered on top of open progress
    offset_y: f32,
    /// Spring currently driving the offset (overscroll or settle-back)
    spring: Option<SpringId>,
    scheduler: Weak<Mutex<AnimationScheduler>>,
}

impl GestureArbiter {
    /// Create an arbiter without a scheduler; spring-driven phases snap
    /// instead of animating.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            phase: DragPhase::Idle,
            offset_y: 0.0,
            spring: None,
            scheduler: Weak::new(),
        }
    }

    /// Create an arbiter with a scheduler for animated settling
    pub fn with_scheduler(config: GestureConfig, scheduler: &Arc<Mutex<AnimationScheduler>>) -> Self {
        Self {
            scheduler: Arc::downgrade(scheduler),
            ..Self::new(config)
        }
    }

    pub fn set_scheduler(&mut self, scheduler: &Arc<Mutex<AnimationScheduler>>) {
        self.scheduler = Arc::downgrade(scheduler);
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Current drag offset in pixels
    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Classify one gesture update.
    ///
    /// Branches are checked in priority order and the first match wins, so
    /// every tick deterministically belongs to exactly one interpretation.
    pub fn update(
        &mut self,
        sample: GestureSample,
        geometry: &SheetGeometry,
        coupler: &ScrollCoupler,
    ) -> DragUpdate {
        if self.phase != DragPhase::Dragging {
            // First movement of a new gesture; a settle in flight is grabbed
            if let Some(next) = self.phase.on_event(DragEvent::Began) {
                self.phase = next;
                self.cancel_spring();
            } else {
                return DragUpdate::PassThrough;
            }
        }

        let translation_y = sample.translation_y;

        // 1. Elastic overscroll: dragging the sheet up past its resting
        //    height. Movement is attenuated by re-springing toward a target
        //    barely above the current value.
        let bound = geometry.overscroll_bound();
        if translation_y < -bound {
            let delta = translation_y / self.config.overscroll_attenuation;
            self.spring_toward(self.offset_y + delta);
            tracing::trace!(translation_y, delta, "overscroll resistance");
            return DragUpdate::Overscroll;
        }

        // 2. Scroll pass-through: the nested region owns downward drags
        //    until it is scrolled to its top.
        if self.config.scroll_gating && (translation_y <= 0.0 || !coupler.is_at_top()) {
            return DragUpdate::PassThrough;
        }

        // 3. Proportional drag-to-close: the sheet lags the finger so the
        //    pull reads as weighted rather than 1:1.
        self.cancel_spring();
        self.offset_y = if self.config.scroll_gating {
            let raw = (translation_y - coupler.touch_start_offset_y()) / self.config.drag_divisor;
            raw.max(0.0) / self.config.drag_damping
        } else {
            translation_y / self.config.direct_divisor
        };
        tracing::trace!(translation_y, offset_y = self.offset_y, "drag");
        DragUpdate::Drag
    }

    /// Resolve the gesture at finger-up: commit past the threshold,
    /// otherwise spring the offset back to zero.
    pub fn release(&mut self, sample: GestureSample, coupler: &ScrollCoupler) -> DragEnd {
        let net = if self.config.scroll_gating {
            sample.translation_y - coupler.touch_start_offset_y()
        } else {
            sample.translation_y
        };

        if net > self.config.commit_threshold {
            if let Some(next) = self.phase.on_event(DragEvent::Commit) {
                self.phase = next;
            }
            self.cancel_spring();
            tracing::debug!(net, threshold = self.config.commit_threshold, "drag committed");
            return DragEnd::Commit;
        }

        if let Some(next) = self.phase.on_event(DragEvent::Cancel) {
            self.phase = next;
        }
        self.spring_toward(0.0);
        if self.scheduler.upgrade().is_none() {
            // No scheduler to animate the settle; rest immediately
            self.offset_y = 0.0;
            self.finish_settle();
        }
        tracing::debug!(net, "drag released below threshold, settling");
        DragEnd::Settle
    }

    /// Poll the offset spring. Call once per frame after the scheduler has
    /// advanced. Returns true while the offset is still animating.
    pub fn tick(&mut self) -> bool {
        let Some(spring_id) = self.spring else {
            return false;
        };

        let Some(scheduler_arc) = self.scheduler.upgrade() else {
            // Scheduler gone mid-flight: snap to rest
            self.spring = None;
            self.offset_y = 0.0;
            self.finish_settle();
            return false;
        };

        let scheduler = scheduler_arc.lock().unwrap();
        let Some(spring) = scheduler.get_spring(spring_id) else {
            self.spring = None;
            return false;
        };

        self.offset_y = spring.value();
        if spring.is_settled() {
            self.offset_y = spring.target();
            drop(scheduler);
            self.cancel_spring();
            self.finish_settle();
            return false;
        }

        true
    }

    /// Force the arbiter back to rest. The lifecycle calls this
    /// unconditionally when the sheet finishes closing, even if a settle
    /// spring is mid-flight.
    pub fn reset(&mut self) {
        self.cancel_spring();
        self.offset_y = 0.0;
        self.phase = DragPhase::Idle;
    }

    /// Retarget the offset spring (creating it if needed) toward `target`
    fn spring_toward(&mut self, target: f32) {
        if let Some(scheduler_arc) = self.scheduler.upgrade() {
            let mut scheduler = scheduler_arc.lock().unwrap();
            match self.spring {
                Some(id) if scheduler.get_spring(id).is_some() => {
                    scheduler.with_spring_mut(id, |s| s.set_target(target));
                }
                _ => {
                    let mut spring = Spring::new(self.config.settle_spring, self.offset_y);
                    spring.set_target(target);
                    self.spring = Some(scheduler.add_spring(spring));
                }
            }
        } else {
            // No scheduler: apply the movement directly
            self.offset_y = target;
        }
    }

    /// Drop the offset spring from the scheduler, keeping the current value
    fn cancel_spring(&mut self) {
        if let Some(id) = self.spring.take() {
            if let Some(scheduler) = self.scheduler.upgrade() {
                scheduler.lock().unwrap().remove_spring(id);
            }
        }
    }

    fn finish_settle(&mut self) {
        if let Some(next) = self.phase.on_event(DragEvent::Settled) {
            self.phase = next;
        }
    }
}
