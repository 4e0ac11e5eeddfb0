//! Swish Action Sheet
//!
//! A gesture-driven bottom action sheet engine: the numeric/state contract
//! between a host application, a pan-gesture recognizer, and whatever
//! layer actually draws the panel.
//!
//! The sheet's openness is a single animated value in `[0, 255]` owned by
//! the [`SheetController`]; a live drag offset owned by the gesture
//! arbiter layers on top of it. The presentation layer samples
//! [`SheetFrame`] every frame and renders `translate_y` /
//! `backdrop_opacity`; it never mutates either value.
//!
//! # Example
//!
//! ```
//! use swish_sheet::prelude::*;
//!
//! let provider = SheetProvider::new(ProviderConfig::default(), 800.0);
//! let handle = provider.handle();
//!
//! handle
//!     .show(
//!         ShowProperties::new()
//!             .header("Share")
//!             .action(Action::new("Copy link", || {}))
//!             .action(Action::new("Delete", || {}).color("#ff3b30")),
//!     )
//!     .unwrap();
//!
//! // Drive frames (a real host ticks from its frame clock)
//! while provider.advance(1.0 / 120.0) {}
//! assert_eq!(handle.state().unwrap(), SheetState::Open);
//! ```

pub mod content;
pub mod controller;
pub mod error;
pub mod lifecycle;
pub mod provider;

pub use content::{Action, ActionCallback, CloseConfig, FontConfig, ProviderConfig, ShowProperties};
pub use controller::{SheetController, SheetFrame, CLOSE_DURATION_MS, PROGRESS_OPEN};
pub use error::SheetError;
pub use lifecycle::{LifecycleEvent, SheetState};
pub use provider::{SharedSheetController, SheetHandle, SheetProvider};

/// Common imports for hosts embedding the sheet
pub mod prelude {
    pub use crate::content::{Action, CloseConfig, FontConfig, ProviderConfig, ShowProperties};
    pub use crate::controller::{SheetFrame, PROGRESS_OPEN};
    pub use crate::error::SheetError;
    pub use crate::lifecycle::SheetState;
    pub use crate::provider::{SheetHandle, SheetProvider};
    pub use swish_gesture::{
        DragEnd, DragUpdate, GestureConfig, GestureSample, InsetPolicy, SafeAreaInsets,
    };
}
