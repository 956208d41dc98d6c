//! Notification envelope broadcast through a view

use crate::{Error, Result, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque payload carried by a notification or a view component
///
/// Any `Send + Sync` value fits: a [`Value`], a string, or a shared domain
/// object. Receivers recover the concrete type with a downcast.
pub type Body = Arc<dyn Any + Send + Sync>;

/// A named message with an optional body and type tag
///
/// Many notifications may share a name; the name is what observers
/// subscribe to. The name is fixed at construction, body and type may be
/// adjusted before the notification is sent.
#[derive(Debug, Clone)]
pub struct Notification {
    name: String,
    body: Option<Body>,
    kind: Option<String>,
}

impl Notification {
    /// Create a notification with no body and no type
    ///
    /// The name must not be empty. This is the caller's responsibility and
    /// is only asserted in debug builds; use [`Notification::try_new`] for
    /// names that come from outside the program.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "notification name must not be empty");
        Self {
            name,
            body: None,
            kind: None,
        }
    }

    /// Create a notification, rejecting an empty name
    pub fn try_new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyNotificationName);
        }
        Ok(Self::new(name))
    }

    /// Set the body to an owned value
    ///
    /// The value is moved into a fresh `Arc`; to send an object you already
    /// share, use [`Notification::with_shared_body`] so receivers can
    /// downcast to `T` rather than `Arc<T>`.
    pub fn with_body<T: Any + Send + Sync>(mut self, body: T) -> Self {
        self.body = Some(Arc::new(body));
        self
    }

    /// Set the body to an already shared object
    pub fn with_shared_body<T: Any + Send + Sync>(mut self, body: Arc<T>) -> Self {
        self.body = Some(body);
        self
    }

    /// Set the type tag
    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The erased body
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// The body as `T`, if there is one of that type
    pub fn body_as<T: Any>(&self) -> Option<&T> {
        self.body.as_deref().and_then(|body| body.downcast_ref::<T>())
    }

    /// The type tag (`type` in the original vocabulary)
    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn set_body(&mut self, body: Option<Body>) {
        self.body = body;
    }

    pub fn set_type(&mut self, kind: Option<String>) {
        self.kind = kind;
    }
}

/// Render a body for display; types without a known rendering are opaque
fn describe_body(body: &(dyn Any + Send + Sync)) -> String {
    if let Some(value) = body.downcast_ref::<Value>() {
        value.to_string()
    } else if let Some(text) = body.downcast_ref::<String>() {
        text.clone()
    } else if let Some(text) = body.downcast_ref::<&'static str>() {
        text.to_string()
    } else if let Some(n) = body.downcast_ref::<i64>() {
        n.to_string()
    } else if let Some(b) = body.downcast_ref::<bool>() {
        b.to_string()
    } else {
        "<opaque>".to_string()
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Notification Name: {}", self.name)?;
        match self.body.as_deref() {
            Some(body) => write!(f, "\nBody:{}", describe_body(body))?,
            None => write!(f, "\nBody:null")?,
        }
        write!(f, "\nType:{}", self.kind.as_deref().unwrap_or("null"))
    }
}
