//! Proxies: named data holders registered with a model

use herald_core::{AsAny, Notifier, Value};
use parking_lot::Mutex;

/// A named data-access object managed by a [`Model`](crate::Model)
pub trait Proxy: AsAny + Send + Sync + 'static {
    /// Unique name within one model
    fn proxy_name(&self) -> &str;

    /// Current data, if the proxy exposes any
    fn data(&self) -> Option<Value> {
        None
    }

    /// Called after registration, outside the model's lock
    fn on_register(&self) {}

    /// Called after removal, outside the model's lock
    fn on_remove(&self) {}

    /// Bind to the core this proxy is being registered into
    fn initialize_notifier(&self, key: &str) {
        let _ = key;
    }
}

impl dyn Proxy {
    /// Recover the concrete proxy type
    pub fn downcast_ref<T: Proxy>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Proxy>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

/// A proxy holding a single replaceable value
#[derive(Debug)]
pub struct BasicProxy {
    name: String,
    data: Mutex<Option<Value>>,
    notifier: Notifier,
}

impl BasicProxy {
    /// Name used when none is given
    pub const NAME: &'static str = "Proxy";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Mutex::new(None),
            notifier: Notifier::new(),
        }
    }

    pub fn with_data(self, data: impl Into<Value>) -> Self {
        *self.data.lock() = Some(data.into());
        self
    }

    /// Replace the held value
    pub fn set_data(&self, data: Option<Value>) {
        *self.data.lock() = data;
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Default for BasicProxy {
    fn default() -> Self {
        Self::new(Self::NAME)
    }
}

impl Proxy for BasicProxy {
    fn proxy_name(&self) -> &str {
        &self.name
    }

    fn data(&self) -> Option<Value> {
        self.data.lock().clone()
    }

    fn initialize_notifier(&self, key: &str) {
        self.notifier.initialize_notifier(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_basic_proxy_data() {
        let proxy = BasicProxy::new("colors").with_data(vec!["red", "green"]);
        assert_eq!(proxy.proxy_name(), "colors");
        assert_eq!(proxy.data().and_then(|d| d.as_list().map(<[Value]>::len)), Some(2));

        proxy.set_data(None);
        assert!(proxy.data().is_none());
    }

    #[test]
    fn test_default_name() {
        assert_eq!(BasicProxy::default().proxy_name(), BasicProxy::NAME);
    }

    #[test]
    fn test_downcast() {
        let erased: Arc<dyn Proxy> = Arc::new(BasicProxy::new("p"));
        assert!(erased.is::<BasicProxy>());
        assert!(erased.downcast_ref::<BasicProxy>().is_some());
    }
}
