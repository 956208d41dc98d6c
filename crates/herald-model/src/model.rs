//! Model - the per-core proxy registry

use crate::Proxy;
use herald_core::{Multiton, Result};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::sync::Arc;

static MODELS: Multiton<Model> = Multiton::new("Model");

/// Proxy registry for one multiton key
///
/// Registering a proxy under a name that is already taken replaces the
/// previous proxy without calling its `on_remove`.
pub struct Model {
    key: String,
    proxies: Mutex<IndexMap<String, Arc<dyn Proxy>>>,
}

impl Model {
    fn construct(key: &str) -> Self {
        Self {
            key: key.to_string(),
            proxies: Mutex::new(IndexMap::new()),
        }
    }

    /// Return the model for `key`, creating it if absent
    pub fn get_instance(key: &str) -> Arc<Model> {
        MODELS.get_or_create(key, Model::construct)
    }

    /// Construct the model for `key` directly, failing if one is live
    pub fn new(key: &str) -> Result<Arc<Model>> {
        MODELS.try_create(key, Model::construct)
    }

    /// Discard the model for `key`; proxies are not sent `on_remove`
    pub fn remove_model(key: &str) {
        MODELS.remove(key);
    }

    pub fn has_model(key: &str) -> bool {
        MODELS.contains(key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Bind, store and announce a proxy
    pub fn register_proxy(&self, proxy: Arc<dyn Proxy>) {
        proxy.initialize_notifier(&self.key);
        let name = proxy.proxy_name().to_string();
        let replaced = self
            .proxies
            .lock()
            .insert(name.clone(), Arc::clone(&proxy))
            .is_some();
        tracing::debug!(key = %self.key, proxy = %name, replaced, "proxy registered");
        proxy.on_register();
    }

    pub fn retrieve_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        self.proxies.lock().get(name).cloned()
    }

    pub fn has_proxy(&self, name: &str) -> bool {
        self.proxies.lock().contains_key(name)
    }

    /// Remove a proxy, calling its `on_remove`; `None` if unknown
    pub fn remove_proxy(&self, name: &str) -> Option<Arc<dyn Proxy>> {
        let proxy = self.proxies.lock().shift_remove(name)?;
        tracing::debug!(key = %self.key, proxy = name, "proxy removed");
        proxy.on_remove();
        Some(proxy)
    }

    /// Names of registered proxies, in registration order
    pub fn proxy_names(&self) -> Vec<String> {
        self.proxies.lock().keys().cloned().collect()
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("key", &self.key)
            .field("proxies", &self.proxies.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BasicProxy;
    use herald_core::{Error, Notification, Notifier, Observer, Value, View};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Announces itself through the view when registered
    struct AnnouncingProxy {
        notifier: Notifier,
        removed: AtomicBool,
    }

    impl Proxy for AnnouncingProxy {
        fn proxy_name(&self) -> &str {
            "AnnouncingProxy"
        }

        fn initialize_notifier(&self, key: &str) {
            self.notifier.initialize_notifier(key);
        }

        fn on_register(&self) {
            let note = Notification::new("proxy_ready").with_body(self.proxy_name().to_string());
            self.notifier.send_notification(note).unwrap();
        }

        fn on_remove(&self) {
            self.removed.store(true, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_get_instance() {
        let model = Model::get_instance("ModelTestKey1");
        assert_eq!(model.key(), "ModelTestKey1");
        assert!(Arc::ptr_eq(&model, &Model::get_instance("ModelTestKey1")));
    }

    #[test]
    fn test_register_and_retrieve_proxy() {
        let model = Model::get_instance("ModelTestKey2");
        model.register_proxy(Arc::new(
            BasicProxy::new("colors").with_data(vec!["red", "green", "blue"]),
        ));

        let proxy = model.retrieve_proxy("colors").unwrap();
        let data = proxy.data().unwrap();
        assert_eq!(
            data,
            Value::List(vec!["red".into(), "green".into(), "blue".into()])
        );
        assert!(model.retrieve_proxy("sizes").is_none());
    }

    #[test]
    fn test_register_and_remove_proxy() {
        let model = Model::get_instance("ModelTestKey3");
        model.register_proxy(Arc::new(BasicProxy::new("sizes").with_data(vec![7i64, 13, 21])));

        let removed = model.remove_proxy("sizes").unwrap();
        assert_eq!(removed.proxy_name(), "sizes");
        assert!(model.retrieve_proxy("sizes").is_none());
        assert!(model.remove_proxy("sizes").is_none());
    }

    #[test]
    fn test_has_proxy() {
        let model = Model::get_instance("ModelTestKey4");
        model.register_proxy(Arc::new(BasicProxy::new("aces").with_data("clubs")));
        assert!(model.has_proxy("aces"));

        model.remove_proxy("aces");
        assert!(!model.has_proxy("aces"));
    }

    #[test]
    fn test_register_binds_notifier() {
        let model = Model::get_instance("ModelTestKey5");
        let proxy = Arc::new(BasicProxy::new("bound"));
        model.register_proxy(proxy.clone());
        assert_eq!(proxy.notifier().multiton_key().unwrap(), "ModelTestKey5");
    }

    #[test]
    fn test_registration_replaces_same_name() {
        let model = Model::get_instance("ModelTestKey6");
        model.register_proxy(Arc::new(BasicProxy::new("p").with_data(1i64)));
        model.register_proxy(Arc::new(BasicProxy::new("p").with_data(2i64)));

        assert_eq!(model.proxy_names(), vec!["p"]);
        assert_eq!(model.retrieve_proxy("p").unwrap().data(), Some(Value::Int(2)));
    }

    #[test]
    fn test_on_register_can_notify_view_and_on_remove_runs() {
        let key = "ModelTestKey7";
        let heard = Arc::new(AtomicUsize::new(0));
        View::get_instance(key).register_observer(
            "proxy_ready",
            Observer::new(heard.clone(), |heard, note| {
                assert_eq!(note.body_as::<String>().map(String::as_str), Some("AnnouncingProxy"));
                heard.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }),
        );

        let model = Model::get_instance(key);
        let proxy = Arc::new(AnnouncingProxy {
            notifier: Notifier::new(),
            removed: AtomicBool::new(false),
        });
        model.register_proxy(proxy.clone());
        assert_eq!(heard.load(Ordering::SeqCst), 1);

        model.remove_proxy("AnnouncingProxy");
        assert!(proxy.removed.load(Ordering::SeqCst));

        View::remove_view(key);
        Model::remove_model(key);
    }

    #[test]
    fn test_direct_construction_rejects_live_key() {
        Model::get_instance("ModelTestDuplicate");
        let err = Model::new("ModelTestDuplicate").unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { kind: "Model", .. }));

        Model::remove_model("ModelTestDuplicate");
        assert!(!Model::has_model("ModelTestDuplicate"));
        assert!(Model::new("ModelTestDuplicate").is_ok());
    }
}
