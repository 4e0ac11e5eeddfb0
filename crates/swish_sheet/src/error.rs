//! Error types for the host-facing API

use thiserror::Error;

/// Errors surfaced by [`SheetHandle`](crate::provider::SheetHandle)
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SheetError {
    /// The provider that backs this handle has been dropped
    #[error("sheet provider has been dropped")]
    ProviderDropped,
}
