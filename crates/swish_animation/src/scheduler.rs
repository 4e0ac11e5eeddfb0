//! Animation scheduler
//!
//! Owns every live motion and advances them each frame. Components keep
//! the returned slotmap keys and poll values back on their own tick;
//! removing a key is how a superseded motion is cancelled.

use crate::spring::Spring;
use crate::tween::Tween;
use slotmap::{new_key_type, SlotMap};
use std::time::Instant;

new_key_type! {
    pub struct SpringId;
    pub struct TweenId;
}

/// The animation scheduler that ticks all active motions
pub struct AnimationScheduler {
    springs: SlotMap<SpringId, Spring>,
    tweens: SlotMap<TweenId, Tween>,
    last_frame: Instant,
    target_fps: u32,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            springs: SlotMap::with_key(),
            tweens: SlotMap::with_key(),
            last_frame: Instant::now(),
            target_fps: 120,
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    pub fn add_spring(&mut self, spring: Spring) -> SpringId {
        tracing::trace!(
            value = spring.value(),
            target = spring.target(),
            "spring registered"
        );
        self.springs.insert(spring)
    }

    pub fn get_spring(&self, id: SpringId) -> Option<&Spring> {
        self.springs.get(id)
    }

    pub fn get_spring_mut(&mut self, id: SpringId) -> Option<&mut Spring> {
        self.springs.get_mut(id)
    }

    /// Mutate a spring in place if it is still registered
    pub fn with_spring_mut<F: FnOnce(&mut Spring)>(&mut self, id: SpringId, f: F) {
        if let Some(spring) = self.springs.get_mut(id) {
            f(spring);
        }
    }

    pub fn remove_spring(&mut self, id: SpringId) -> Option<Spring> {
        self.springs.remove(id)
    }

    /// Register a tween and start it immediately
    pub fn add_tween(&mut self, mut tween: Tween) -> TweenId {
        tween.start();
        tracing::trace!(value = tween.value(), target = tween.to(), "tween registered");
        self.tweens.insert(tween)
    }

    pub fn get_tween(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(id)
    }

    pub fn remove_tween(&mut self, id: TweenId) -> Option<Tween> {
        self.tweens.remove(id)
    }

    /// Tick all motions using the wall clock
    pub fn tick(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(dt);
    }

    /// Advance all motions by an explicit `dt` in seconds.
    ///
    /// Headless runners and tests drive this directly for deterministic
    /// frame pacing.
    pub fn advance(&mut self, dt: f32) {
        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }
        for (_, tween) in self.tweens.iter_mut() {
            tween.tick(dt * 1000.0);
        }
    }

    /// Check if any motions are still in flight
    pub fn has_active_animations(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
            || self.tweens.iter().any(|(_, t)| t.is_playing())
    }

    /// Number of registered springs
    pub fn spring_count(&self) -> usize {
        self.springs.len()
    }

    /// Number of registered tweens
    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::spring::SpringConfig;

    #[test]
    fn test_scheduler_advances_springs_and_tweens() {
        let mut scheduler = AnimationScheduler::new();

        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(50.0);
        let spring_id = scheduler.add_spring(spring);

        let tween_id = scheduler.add_tween(Tween::new(255.0, 0.0, 350, Easing::EaseInOutQuad));

        assert!(scheduler.has_active_animations());

        for _ in 0..240 {
            scheduler.advance(1.0 / 120.0);
        }

        let spring = scheduler.get_spring(spring_id).unwrap();
        assert!(spring.is_settled());
        assert!((spring.value() - 50.0).abs() < 0.5);

        let tween = scheduler.get_tween(tween_id).unwrap();
        assert!(tween.is_finished());
        assert_eq!(tween.value(), 0.0);

        assert!(!scheduler.has_active_animations());
    }

    #[test]
    fn test_removed_motion_stops_reporting() {
        let mut scheduler = AnimationScheduler::new();

        let mut spring = Spring::new(SpringConfig::gentle(), 0.0);
        spring.set_target(10.0);
        let id = scheduler.add_spring(spring);

        assert!(scheduler.has_active_animations());
        assert!(scheduler.remove_spring(id).is_some());
        assert!(!scheduler.has_active_animations());
        assert!(scheduler.get_spring(id).is_none());
    }

    #[test]
    fn test_with_spring_mut_retargets() {
        let mut scheduler = AnimationScheduler::new();
        let id = scheduler.add_spring(Spring::new(SpringConfig::snappy(), 0.0));

        scheduler.with_spring_mut(id, |s| s.set_target(100.0));
        assert_eq!(scheduler.get_spring(id).unwrap().target(), 100.0);
    }
}
