//! Swish Motion Primitives
//!
//! Spring physics, timed tweens, and the scheduler that advances them.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Tweens**: timed single-value motions with easing curves
//! - **Interruptible**: retargeting an in-flight spring keeps its velocity
//! - **Poll-based completion**: owners hold slotmap keys and observe
//!   settledness from their own tick, never from an animation-thread callback

pub mod easing;
pub mod scheduler;
pub mod spring;
pub mod tween;

pub use easing::Easing;
pub use scheduler::{AnimationScheduler, SpringId, TweenId};
pub use spring::{Spring, SpringConfig};
pub use tween::Tween;
