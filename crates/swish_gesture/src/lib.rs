//! Swish Gesture Arbitration
//!
//! Interprets a continuous pan gesture against a bottom sheet with a
//! scrollable content region nested inside it. Every update tick is
//! resolved to exactly one of three outcomes, checked in priority order:
//!
//! 1. **Elastic overscroll** - the drag pushes the sheet above its natural
//!    resting height; movement is heavily attenuated
//! 2. **Scroll pass-through** - the content region owns the touch; the
//!    sheet does not move
//! 3. **Proportional drag** - the sheet follows the finger with friction,
//!    and a release past the commit threshold closes it
//!
//! The two historical behavior variants (scroll-coupled and direct) are a
//! single [`GestureArbiter`] configured through
//! [`GestureConfig::scroll_coupled`] / [`GestureConfig::direct`].

pub mod arbiter;
pub mod coupler;
pub mod geometry;

pub use arbiter::{
    DragEnd, DragEvent, DragPhase, DragUpdate, GestureArbiter, GestureConfig, GestureSample,
};
pub use coupler::ScrollCoupler;
pub use geometry::{InsetPolicy, SafeAreaInsets, SheetGeometry};
