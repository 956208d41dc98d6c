//! Herald Core - Multiton notification registry
//!
//! This crate provides the in-process publish/subscribe core of a herald
//! application:
//! - Notification envelopes with an opaque body (any `Send + Sync` value)
//! - Observers binding a callback to the context it runs against
//! - Mediators: named subscribers with declared interests and lifecycle hooks
//! - `View`: the per-key registry that wires mediators to observers and
//!   broadcasts notifications synchronously
//! - `Multiton`: the process-wide key → instance map behind `View::get_instance`
//!
//! ## Dispatch guarantees
//!
//! - Observers of one notification name run in registration order
//! - A broadcast iterates a snapshot, so handlers may add or remove observers
//!   and mediators (including themselves) without skipping or repeating anyone
//! - Registering a mediator whose name is already taken is a no-op
//! - A failing observer is logged and skipped unless the view is configured
//!   with [`HandlerErrorPolicy::Abort`]
//!
//! ## Logging
//!
//! Registry events are emitted through `tracing`; install a subscriber in the
//! application to see them.

mod config;
mod error;
mod mediator;
pub mod multiton;
mod notification;
mod notifier;
mod observer;
mod value;
mod view;

pub use config::{HandlerErrorPolicy, ViewConfig};
pub use error::{Error, Result};
pub use mediator::{AsAny, BasicMediator, Mediator};
pub use multiton::Multiton;
pub use notification::{Body, Notification};
pub use notifier::Notifier;
pub use observer::{ContextId, Observer};
pub use value::{Value, ValueMap};
pub use view::View;
