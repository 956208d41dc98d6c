//! Herald Model - named proxy registry
//!
//! Each herald core may keep a [`Model`] next to its
//! [`View`](herald_core::View): a map of named [`Proxy`] objects that own
//! application data. Proxies get the same `initialize_notifier` /
//! `on_register` / `on_remove` lifecycle as mediators and can broadcast
//! through their core's view once registered.
//!
//! Unlike the view, the model never dispatches, so there is no snapshot or
//! re-entrancy concern here.

mod model;
mod proxy;

pub use model::Model;
pub use proxy::{BasicProxy, Proxy};
