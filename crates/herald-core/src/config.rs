//! View configuration
//!
//! The only tunable today is what a broadcast does when an observer
//! callback returns an error. The policy is fixed per view and applies to
//! every broadcast on it.

use serde::{Deserialize, Serialize};

/// What a broadcast does when one observer fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandlerErrorPolicy {
    /// Log the failure and keep delivering to the remaining observers
    #[default]
    Continue,
    /// Stop the broadcast and return the failure to the caller
    Abort,
}

/// Configuration for a [`View`](crate::View)
///
/// # Example
///
/// ```
/// use herald_core::{HandlerErrorPolicy, ViewConfig};
///
/// let config = ViewConfig::default();
/// assert_eq!(config.on_handler_error(), HandlerErrorPolicy::Continue);
///
/// let strict = ViewConfig::with_policy(HandlerErrorPolicy::Abort);
/// assert!(strict.aborts_on_error());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    on_handler_error: HandlerErrorPolicy,
}

impl ViewConfig {
    /// Create a configuration with the given failure policy
    pub fn with_policy(policy: HandlerErrorPolicy) -> Self {
        Self {
            on_handler_error: policy,
        }
    }

    pub fn on_handler_error(&self) -> HandlerErrorPolicy {
        self.on_handler_error
    }

    pub fn set_on_handler_error(&mut self, policy: HandlerErrorPolicy) {
        self.on_handler_error = policy;
    }

    /// Whether a failing observer ends the broadcast
    pub fn aborts_on_error(&self) -> bool {
        self.on_handler_error == HandlerErrorPolicy::Abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_continues() {
        let config = ViewConfig::default();
        assert_eq!(config.on_handler_error(), HandlerErrorPolicy::Continue);
        assert!(!config.aborts_on_error());
    }

    #[test]
    fn test_set_policy() {
        let mut config = ViewConfig::default();
        config.set_on_handler_error(HandlerErrorPolicy::Abort);
        assert!(config.aborts_on_error());
    }

    #[test]
    fn test_load_from_ron() {
        let config: ViewConfig = ron::from_str("(on_handler_error: Abort)").unwrap();
        assert_eq!(config, ViewConfig::with_policy(HandlerErrorPolicy::Abort));

        // Missing fields fall back to defaults
        let config: ViewConfig = ron::from_str("()").unwrap();
        assert_eq!(config, ViewConfig::default());
    }
}
