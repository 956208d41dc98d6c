//! Error types for herald-core

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
///
/// Lookups of unknown mediators, proxies or observers are not errors; they
/// return `None` or do nothing.
#[derive(Debug, Error)]
pub enum Error {
    /// A registry instance was constructed for a key that is already live
    #[error("{kind} instance for multiton key {key:?} already constructed")]
    DuplicateKey {
        /// Which registry family refused the key ("View", "Model", ...)
        kind: &'static str,
        /// The offending multiton key
        key: String,
    },

    /// A notifier was used before being bound to a multiton key
    #[error("notifier used before initialize_notifier was called")]
    NotifierNotInitialized,

    /// A notification was built with an empty name
    #[error("notification name must not be empty")]
    EmptyNotificationName,

    /// An observer callback reported a failure
    #[error("handler failed: {0}")]
    Handler(String),
}

impl Error {
    /// Create a DuplicateKey error
    pub fn duplicate_key(kind: &'static str, key: impl Into<String>) -> Self {
        Error::DuplicateKey {
            kind,
            key: key.into(),
        }
    }

    /// Create a Handler error from any displayable message
    pub fn handler(message: impl std::fmt::Display) -> Self {
        Error::Handler(message.to_string())
    }
}

// Compile-time check that Error is Send + Sync so it can cross threads.
fn _assert_error_send_sync<T: Send + Sync>() {}
fn _error_is_send_sync() {
    _assert_error_send_sync::<Error>();
}
