#![forbid(unsafe_code)]

//! Subscription lifecycle for one binding point.
//!
//! A [`SubscriptionManager`] owns the `(field name, watcher)` pairs a binding
//! point registered with its model, the way a scope owns the subscriptions of
//! a widget.
//!
//! # Invariants
//!
//! 1. While active there is exactly one registration per resolved name; one
//!    shared [`Watcher`] is registered under every name.
//! 2. `deactivate` removes every registration and is idempotent.
//! 3. `activate` and `sync` fully deactivate before registering anything, so
//!    old and new registrations never coexist.
//! 4. Each activation gets a fresh gate. Closing it precedes unregistering,
//!    so a notification delivered after deactivation is a no-op even if the
//!    model still holds the callback.
//! 5. Without a model the manager stays inert.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::model::{ModelHandle, Watcher, same_model};
use crate::resolver::FieldSet;

/// Callback run (through the gate) when any watched field changes.
pub type ChangeFn = Rc<dyn Fn()>;

/// Registers and tears down model watchers for one binding point.
#[derive(Default)]
pub struct SubscriptionManager {
    model: Option<ModelHandle>,
    names: Option<FieldSet>,
    watcher: Option<Watcher>,
    registered: Vec<String>,
    gate: Option<Rc<Cell<bool>>>,
}

impl SubscriptionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `on_change` for every name in `names`.
    ///
    /// Any previous activation is fully torn down first. Each registration
    /// uses the model's immediate flag, so `on_change` runs once per name
    /// before this returns. With no model this only deactivates.
    pub fn activate(
        &mut self,
        model: Option<&ModelHandle>,
        names: &FieldSet,
        on_change: ChangeFn,
    ) {
        self.deactivate();
        let Some(model) = model else {
            trace!(fields = %names, "no model; subscription manager inert");
            return;
        };

        let gate = Rc::new(Cell::new(true));
        let open = Rc::clone(&gate);
        let watcher = Watcher::new(move || {
            if open.get() {
                on_change();
            }
        });

        self.model = Some(Rc::clone(model));
        self.names = Some(names.clone());
        self.watcher = Some(watcher.clone());
        self.gate = Some(gate);
        debug!(fields = %names, count = names.len(), "activating field subscriptions");
        for name in names.names() {
            self.registered.push(name.clone());
            model.watch(name, &watcher, true);
        }
    }

    /// Unregister everything registered by the current activation.
    pub fn deactivate(&mut self) {
        if let Some(gate) = self.gate.take() {
            gate.set(false);
        }
        let watcher = self.watcher.take();
        let model = self.model.take();
        self.names = None;
        let registered = std::mem::take(&mut self.registered);
        let (Some(model), Some(watcher)) = (model, watcher) else {
            return;
        };
        debug!(count = registered.len(), "deactivating field subscriptions");
        for name in &registered {
            model.unwatch(name, &watcher);
        }
    }

    /// Reactivate only if the model identity or the name set changed.
    ///
    /// Returns `true` if a reactivation happened.
    pub fn sync(
        &mut self,
        model: Option<&ModelHandle>,
        names: &FieldSet,
        on_change: ChangeFn,
    ) -> bool {
        let unchanged_model = match (self.model.as_ref(), model) {
            (Some(a), Some(b)) => same_model(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged_model && (model.is_none() || self.names.as_ref() == Some(names)) {
            return false;
        }
        debug!(fields = %names, "binding identity changed; resubscribing");
        self.activate(model, names, on_change);
        true
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.gate.is_some()
    }

    /// Number of registrations currently held.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.registered.len()
    }

    /// The set registered by the current activation.
    #[must_use]
    pub fn names(&self) -> Option<&FieldSet> {
        self.names.as_ref()
    }
}

impl Drop for SubscriptionManager {
    fn drop(&mut self) {
        self.deactivate();
    }
}

impl std::fmt::Debug for SubscriptionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionManager")
            .field("active", &self.is_active())
            .field("live_count", &self.registered.len())
            .field("names", &self.names)
            .finish()
    }
}
