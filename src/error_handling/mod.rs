//! Error handling for the refresh pipeline and the lookup service.
//!
//! All errors are typed values propagated to the caller; nothing in the
//! library logs-and-exits. The binary decides what a fatal error means.

mod types;

pub use types::{InitializationError, LookupError, RefreshError};
