//! View - the per-core notification registry
//!
//! A view owns two maps for one multiton key:
//! - notification name → ordered observers (registration order is dispatch order)
//! - mediator name → mediator and the interests it declared
//!
//! ## Dispatch
//!
//! [`View::notify_observers`] copies the observer list for the notification
//! name while holding the lock, releases the lock, then calls every observer
//! in the copy. Handlers may therefore register or remove observers and
//! mediators (including themselves) during a broadcast; those changes affect
//! the next broadcast, never the one in flight.
//!
//! Lifecycle hooks (`on_register`, `on_remove`) and observer callbacks always
//! run with the lock released.

use crate::multiton::Multiton;
use crate::{ContextId, Mediator, Notification, Observer, Result, ViewConfig};
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

static VIEWS: Multiton<View> = Multiton::new("View");

/// A registered mediator together with the interests it declared
struct MediatorEntry {
    mediator: Arc<dyn Mediator>,
    interests: Vec<String>,
}

#[derive(Default)]
struct Registry {
    observers: HashMap<String, Vec<Observer>>,
    mediators: IndexMap<String, MediatorEntry>,
}

impl Registry {
    /// Remove the first observer for `name` bound to `context`
    ///
    /// Drops the name entirely once its last observer is gone.
    fn remove_observer(&mut self, name: &str, context: ContextId) -> bool {
        let Some(observers) = self.observers.get_mut(name) else {
            return false;
        };
        let Some(index) = observers
            .iter()
            .position(|observer| observer.compare_notify_context(context))
        else {
            return false;
        };
        observers.remove(index);
        if observers.is_empty() {
            self.observers.remove(name);
        }
        true
    }
}

/// Notification registry for one multiton key
///
/// ```
/// use herald_core::{Notification, Observer, View};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let view = View::get_instance("doc-view");
/// let hits = Arc::new(AtomicUsize::new(0));
/// view.register_observer("saved", Observer::new(hits.clone(), |hits, _| {
///     hits.fetch_add(1, Ordering::SeqCst);
///     Ok(())
/// }));
///
/// view.notify_observers(&Notification::new("saved")).unwrap();
/// view.notify_observers(&Notification::new("ignored")).unwrap();
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
///
/// View::remove_view("doc-view");
/// ```
pub struct View {
    key: String,
    config: ViewConfig,
    registry: Mutex<Registry>,
}

impl View {
    fn construct(key: &str, config: ViewConfig) -> Self {
        Self {
            key: key.to_string(),
            config,
            registry: Mutex::new(Registry::default()),
        }
    }

    /// Return the view for `key`, creating it with the default config
    pub fn get_instance(key: &str) -> Arc<View> {
        VIEWS.get_or_create(key, |key| View::construct(key, ViewConfig::default()))
    }

    /// Construct the view for `key` directly
    ///
    /// Fails with [`Error::DuplicateKey`](crate::Error::DuplicateKey) if a
    /// view for `key` is already live.
    pub fn new(key: &str) -> Result<Arc<View>> {
        Self::with_config(key, ViewConfig::default())
    }

    /// Construct the view for `key` with a specific configuration
    pub fn with_config(key: &str, config: ViewConfig) -> Result<Arc<View>> {
        VIEWS.try_create(key, |key| View::construct(key, config))
    }

    /// Discard the view for `key`
    ///
    /// Registered mediators are not sent `on_remove`; tear them down first
    /// if that matters. Unknown keys are ignored.
    pub fn remove_view(key: &str) {
        VIEWS.remove(key);
    }

    /// Whether a view for `key` is live
    pub fn has_view(key: &str) -> bool {
        VIEWS.contains(key)
    }

    /// The multiton key of this view
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Append `observer` to the list for `name`
    pub fn register_observer(&self, name: impl Into<String>, observer: Observer) {
        self.registry
            .lock()
            .observers
            .entry(name.into())
            .or_default()
            .push(observer);
    }

    /// Broadcast `notification` to every observer of its name
    ///
    /// Observers run in registration order over a copy of the list taken at
    /// the start of the call. A failing observer is logged and skipped under
    /// [`HandlerErrorPolicy::Continue`](crate::HandlerErrorPolicy::Continue);
    /// under `Abort` the first failure ends the broadcast and is returned.
    pub fn notify_observers(&self, notification: &Notification) -> Result<()> {
        let name = notification.name();
        let snapshot = {
            let registry = self.registry.lock();
            match registry.observers.get(name) {
                Some(observers) => observers.clone(),
                None => return Ok(()),
            }
        };

        tracing::trace!(key = %self.key, notification = name, observers = snapshot.len(), "broadcast");

        for observer in &snapshot {
            if let Err(error) = observer.notify_observer(notification) {
                if self.config.aborts_on_error() {
                    return Err(error);
                }
                tracing::warn!(
                    key = %self.key,
                    notification = name,
                    context = %observer.context(),
                    %error,
                    "observer failed, continuing broadcast"
                );
            }
        }
        Ok(())
    }

    /// Remove the first observer of `name` bound to `context`
    ///
    /// Does nothing if there is no such observer.
    pub fn remove_observer(&self, name: &str, context: ContextId) {
        self.registry.lock().remove_observer(name, context);
    }

    /// Whether any observer is registered for `name`
    pub fn has_observers(&self, name: &str) -> bool {
        self.registry.lock().observers.contains_key(name)
    }

    /// Number of observers registered for `name`
    pub fn observer_count(&self, name: &str) -> usize {
        self.registry
            .lock()
            .observers
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Register a mediator and wire one observer per declared interest
    ///
    /// If a mediator with the same name is already registered this is a
    /// no-op: no second observer is created and `on_register` is not called.
    ///
    /// `initialize_notifier` and `list_notification_interests` run with the
    /// lock released, so both may call back into this view. The name is
    /// checked again before anything is inserted.
    pub fn register_mediator(&self, mediator: Arc<dyn Mediator>) {
        let name = mediator.mediator_name().to_string();
        if self.has_mediator(&name) {
            tracing::debug!(key = %self.key, mediator = %name, "mediator already registered");
            return;
        }

        mediator.initialize_notifier(&self.key);
        let interests = mediator.list_notification_interests();

        {
            let mut registry = self.registry.lock();
            if registry.mediators.contains_key(&name) {
                tracing::debug!(key = %self.key, mediator = %name, "mediator registered concurrently");
                return;
            }

            for interest in &interests {
                let observer = Observer::new(Arc::clone(&mediator), |mediator, note| {
                    mediator.handle_notification(note)
                });
                registry
                    .observers
                    .entry(interest.clone())
                    .or_default()
                    .push(observer);
            }

            tracing::debug!(key = %self.key, mediator = %name, ?interests, "mediator registered");
            registry.mediators.insert(
                name,
                MediatorEntry {
                    mediator: Arc::clone(&mediator),
                    interests,
                },
            );
        }
        mediator.on_register();
    }

    /// Look up a mediator by name
    pub fn retrieve_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        self.registry
            .lock()
            .mediators
            .get(name)
            .map(|entry| Arc::clone(&entry.mediator))
    }

    pub fn has_mediator(&self, name: &str) -> bool {
        self.registry.lock().mediators.contains_key(name)
    }

    /// Remove a mediator and exactly the observers it was registered with
    ///
    /// Returns the removed mediator after calling its `on_remove`, or `None`
    /// without side effects if no mediator has that name.
    pub fn remove_mediator(&self, name: &str) -> Option<Arc<dyn Mediator>> {
        let entry = {
            let mut registry = self.registry.lock();
            let entry = registry.mediators.shift_remove(name)?;
            let context = ContextId::of(&entry.mediator);
            for interest in &entry.interests {
                registry.remove_observer(interest, context);
            }
            entry
        };

        tracing::debug!(key = %self.key, mediator = name, "mediator removed");
        entry.mediator.on_remove();
        Some(entry.mediator)
    }

    /// Names of registered mediators, in registration order
    pub fn mediator_names(&self) -> Vec<String> {
        self.registry.lock().mediators.keys().cloned().collect()
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("View")
            .field("key", &self.key)
            .field("config", &self.config)
            .field("notifications", &registry.observers.len())
            .field("mediators", &registry.mediators.len())
            .finish()
    }
}
