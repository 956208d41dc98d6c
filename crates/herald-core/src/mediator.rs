//! Mediators: named subscribers with declared interests
//!
//! A mediator tells the view which notification names it cares about when it
//! is registered. The view wires one observer per interest to
//! [`Mediator::handle_notification`] and never asks again.

use crate::notification::Body;
use crate::{Notification, Notifier, Result};
use std::any::Any;
use std::sync::Arc;

/// Upcast helper so trait objects can be downcast to their concrete type
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named subscriber managed by a [`View`](crate::View)
///
/// All hooks take `&self`; mediators that keep state use interior
/// mutability, since the view shares them behind an `Arc`.
pub trait Mediator: AsAny + Send + Sync + 'static {
    /// Unique name within one view
    fn mediator_name(&self) -> &str;

    /// Notification names this mediator wants, queried once at registration
    ///
    /// Called after [`Mediator::initialize_notifier`] and outside the view's
    /// lock, so it may consult the view it is joining.
    fn list_notification_interests(&self) -> Vec<String> {
        Vec::new()
    }

    /// Handle a notification matching one of the declared interests
    fn handle_notification(&self, notification: &Notification) -> Result<()> {
        let _ = notification;
        Ok(())
    }

    /// Called after registration, outside the view's lock
    fn on_register(&self) {}

    /// Called after removal, outside the view's lock
    fn on_remove(&self) {}

    /// Bind to the core this mediator is being registered into
    fn initialize_notifier(&self, key: &str) {
        let _ = key;
    }
}

impl dyn Mediator {
    /// Recover the concrete mediator type
    pub fn downcast_ref<T: Mediator>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn is<T: Mediator>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

impl std::fmt::Debug for dyn Mediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mediator")
            .field("name", &self.mediator_name())
            .finish_non_exhaustive()
    }
}

/// A mediator with a name, an optional view component and no interests
#[derive(Debug)]
pub struct BasicMediator {
    name: String,
    view_component: Option<Body>,
    notifier: Notifier,
}

impl BasicMediator {
    /// Name used when none is given
    pub const NAME: &'static str = "Mediator";

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            view_component: None,
            notifier: Notifier::new(),
        }
    }

    /// Attach a view component shared with the rest of the application
    pub fn with_view_component<C: Any + Send + Sync>(mut self, component: Arc<C>) -> Self {
        self.view_component = Some(component);
        self
    }

    pub fn view_component(&self) -> Option<&Body> {
        self.view_component.as_ref()
    }

    /// The view component as `C`, if it is one
    pub fn view_component_as<C: Any>(&self) -> Option<&C> {
        self.view_component
            .as_deref()
            .and_then(|component| component.downcast_ref::<C>())
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

impl Default for BasicMediator {
    fn default() -> Self {
        Self::new(Self::NAME)
    }
}

impl Mediator for BasicMediator {
    fn mediator_name(&self) -> &str {
        &self.name
    }

    fn initialize_notifier(&self, key: &str) {
        self.notifier.initialize_notifier(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct Other;

    /// Stand-in for a UI widget owned elsewhere
    #[derive(Default)]
    struct Sidebar {
        visible: Mutex<bool>,
    }

    impl Mediator for Other {
        fn mediator_name(&self) -> &str {
            "other"
        }
    }

    #[test]
    fn test_basic_mediator_defaults() {
        let mediator = BasicMediator::default();
        assert_eq!(mediator.mediator_name(), BasicMediator::NAME);
        assert!(mediator.list_notification_interests().is_empty());
        assert!(mediator.view_component().is_none());
        assert!(mediator.handle_notification(&Notification::new("any")).is_ok());
    }

    #[test]
    fn test_initialize_notifier_binds_key() {
        let mediator = BasicMediator::new("panel");
        assert!(!mediator.notifier().is_initialized());

        mediator.initialize_notifier("MediatorTestKey");
        assert_eq!(mediator.notifier().multiton_key().unwrap(), "MediatorTestKey");
    }

    #[test]
    fn test_view_component_is_shared_object() {
        let sidebar = Arc::new(Sidebar::default());
        let mediator = BasicMediator::new("panel").with_view_component(sidebar.clone());

        *mediator.view_component_as::<Sidebar>().unwrap().visible.lock() = true;
        assert!(*sidebar.visible.lock());
        assert!(mediator.view_component_as::<String>().is_none());
    }

    #[test]
    fn test_downcast_through_trait_object() {
        let erased: Arc<dyn Mediator> = Arc::new(BasicMediator::new("panel"));
        assert!(erased.is::<BasicMediator>());
        assert!(!erased.is::<Other>());
        assert_eq!(
            erased.downcast_ref::<BasicMediator>().map(|m| m.mediator_name()),
            Some("panel")
        );
        assert!(erased.downcast_ref::<Other>().is_none());
    }
}
