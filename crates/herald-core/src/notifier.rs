//! Binding between a component and the core it was registered into

use crate::{Error, Notification, Result, View};
use parking_lot::Mutex;
use std::sync::Arc;

/// Remembers the multiton key of the core a component belongs to
///
/// Mediators and proxies embed a `Notifier` and forward their
/// `initialize_notifier` hook to it. Until then the component has no core
/// and any attempt to send fails with [`Error::NotifierNotInitialized`].
#[derive(Debug, Default)]
pub struct Notifier {
    key: Mutex<Option<String>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to the core identified by `key`
    pub fn initialize_notifier(&self, key: &str) {
        *self.key.lock() = Some(key.to_string());
    }

    pub fn is_initialized(&self) -> bool {
        self.key.lock().is_some()
    }

    /// The bound multiton key
    pub fn multiton_key(&self) -> Result<String> {
        self.key.lock().clone().ok_or(Error::NotifierNotInitialized)
    }

    /// The view of the bound core
    pub fn view(&self) -> Result<Arc<View>> {
        let key = self.multiton_key()?;
        Ok(View::get_instance(&key))
    }

    /// Broadcast `notification` to the bound core's observers
    pub fn send_notification(&self, notification: Notification) -> Result<()> {
        self.view()?.notify_observers(&notification)
    }
}
