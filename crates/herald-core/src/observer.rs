//! Observers: a callback bound to the context it runs against

use crate::{Notification, Result};
use std::fmt;
use std::sync::Arc;

/// Identity of an observer's context
///
/// Two contexts are the same iff they are the same shared allocation.
/// Structural equality of the context values is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(usize);

impl ContextId {
    /// Identity token for a shared context
    pub fn of<C: ?Sized>(context: &Arc<C>) -> Self {
        Self(Arc::as_ptr(context) as *const () as usize)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "context:{:#x}", self.0)
    }
}

type NotifyFn = dyn Fn(&Notification) -> Result<()> + Send + Sync;

/// One subscription: a callback plus the context it executes against
///
/// The observer owns a strong reference to its context, so the context
/// (and therefore its [`ContextId`]) stays valid while the observer is
/// registered. Cloning an observer is cheap and yields an equal subscriber.
#[derive(Clone)]
pub struct Observer {
    notify: Arc<NotifyFn>,
    context: ContextId,
}

impl Observer {
    /// Bind `callback` to `context`
    ///
    /// ```
    /// use herald_core::{Notification, Observer};
    /// use std::sync::atomic::{AtomicI64, Ordering};
    /// use std::sync::Arc;
    ///
    /// let total = Arc::new(AtomicI64::new(0));
    /// let observer = Observer::new(total.clone(), |total, note| {
    ///     let n = note.body_as::<i64>().copied().unwrap_or(0);
    ///     total.fetch_add(n, Ordering::SeqCst);
    ///     Ok(())
    /// });
    ///
    /// observer.notify_observer(&Notification::new("add").with_body(5i64)).unwrap();
    /// assert_eq!(total.load(Ordering::SeqCst), 5);
    /// ```
    pub fn new<C, F>(context: Arc<C>, callback: F) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn(&C, &Notification) -> Result<()> + Send + Sync + 'static,
    {
        let id = ContextId::of(&context);
        Self {
            notify: Arc::new(move |note: &Notification| callback(&*context, note)),
            context: id,
        }
    }

    /// Invoke the callback against its context
    pub fn notify_observer(&self, notification: &Notification) -> Result<()> {
        (self.notify)(notification)
    }

    /// Whether this observer is bound to `context`
    pub fn compare_notify_context(&self, context: ContextId) -> bool {
        self.context == context
    }

    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
