#![forbid(unsafe_code)]

//! Binding points: one UI location wired to one or more model fields.
//!
//! A [`BindingPoint`] composes the pieces of the core:
//!
//! ```text
//! BindingConfig ─▶ FieldSet ─▶ SubscriptionManager ──(change)──▶ RenderScheduler
//!                                                                   │
//!          model ◀── OnChange ◀── FieldView ◀── materialize ◀── render()
//!                                    │
//!                                    ▼
//!                              RenderDelegate ─▶ R
//! ```
//!
//! # Usage
//!
//! ```
//! use std::rc::Rc;
//! use formbind_runtime::binding::{BindingConfig, BindingPoint};
//! use formbind_runtime::model::{FieldRecord, MemoryModel, ModelHandle};
//! use formbind_runtime::mutation::ChangeEvent;
//!
//! let model: ModelHandle = Rc::new(
//!     MemoryModel::new().with_field("std_name", FieldRecord::new("").required(true)),
//! );
//! let mut point = BindingPoint::new(
//!     BindingConfig::new("std_name")
//!         .model(Rc::clone(&model))
//!         .render(|view| view.value().to_string()),
//! );
//! point.mount();
//! assert_eq!(point.render().as_deref(), Some(""));
//!
//! point.on_change().unwrap().call(ChangeEvent::change("Alice")).unwrap();
//! assert!(point.needs_render());
//! assert_eq!(point.render().as_deref(), Some("Alice"));
//! ```
//!
//! # Invariants
//!
//! 1. A mounted binding point with a model holds exactly one subscription
//!    per resolved name; an unmounted one holds none.
//! 2. Any number of field changes between two render passes schedule one
//!    pass.
//! 3. Changing the model or the field set while mounted deactivates the old
//!    subscriptions before activating the new ones.
//! 4. The binding point only ever writes to its primary field.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | No model | No subscriptions; `render()` returns `None` |
//! | Primary field absent | `render()` returns `None` |
//! | Primary hidden, no keep-alive | `render()` returns `None` |
//! | Write rejected | Error returned from [`OnChange::call`] |

use std::rc::Rc;

use tracing::trace;

use crate::context::FormContext;
use crate::delegate::{ComponentProps, ComponentSpec, RenderDelegate};
use crate::materialize::{FieldView, MaterializeOptions, Materialized, materialize};
use crate::model::{Attributes, FieldValue, ModelHandle};
use crate::mutation::{OnChange, make_on_change};
use crate::resolver::FieldSet;
use crate::scheduler::RenderScheduler;
use crate::subscription::{ChangeFn, SubscriptionManager};

/// Configuration surface of a binding point.
pub struct BindingConfig<R> {
    name: String,
    auxiliary: Vec<String>,
    model: Option<ModelHandle>,
    keep_alive: bool,
    params: Attributes,
    delegate: RenderDelegate<R>,
}

impl<R> std::fmt::Debug for BindingConfig<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingConfig")
            .field("name", &self.name)
            .field("auxiliary", &self.auxiliary)
            .field("has_model", &self.model.is_some())
            .field("keep_alive", &self.keep_alive)
            .field("params", &self.params)
            .field("delegate", &self.delegate)
            .finish()
    }
}

impl<R: Clone> BindingConfig<R> {
    /// Bind to the primary field `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            auxiliary: Vec::new(),
            model: None,
            keep_alive: false,
            params: Attributes::new(),
            delegate: RenderDelegate::new(),
        }
    }

    /// Also re-render when any of `names` changes.
    #[must_use]
    pub fn watch<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auxiliary.extend(names.into_iter().map(Into::into));
        self
    }

    /// Bind to `model` instead of the enclosing context's model.
    #[must_use]
    pub fn model(mut self, model: ModelHandle) -> Self {
        self.model = Some(model);
        self
    }

    /// Keep rendering while the primary field is hidden.
    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Caller attribute that overrides the view's attribute of the same name.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn render(mut self, f: impl Fn(&FieldView) -> R + 'static) -> Self {
        self.delegate = self.delegate.render(f);
        self
    }

    #[must_use]
    pub fn component(
        mut self,
        spec: ComponentSpec,
        mount: impl Fn(ComponentProps) -> R + 'static,
    ) -> Self {
        self.delegate = self.delegate.component(spec, mount);
        self
    }

    #[must_use]
    pub fn children(mut self, children: R) -> Self {
        self.delegate = self.delegate.children(children);
        self
    }

    #[must_use]
    pub fn decorate(mut self, f: impl Fn(R, &FieldView) -> R + 'static) -> Self {
        self.delegate = self.delegate.decorate(f);
        self
    }

    /// Replace the whole render delegate.
    #[must_use]
    pub fn delegate(mut self, delegate: RenderDelegate<R>) -> Self {
        self.delegate = delegate;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolve the configured names into a canonical set.
    #[must_use]
    pub fn field_set(&self) -> FieldSet {
        FieldSet::resolve(self.name.clone(), self.auxiliary.iter().cloned())
    }

    fn options(&self) -> MaterializeOptions {
        MaterializeOptions {
            keep_alive: self.keep_alive,
            params: self.params.clone(),
        }
    }
}

/// One mounted UI location bound to model fields.
pub struct BindingPoint<R> {
    config: BindingConfig<R>,
    model: Option<ModelHandle>,
    names: FieldSet,
    subscriptions: SubscriptionManager,
    scheduler: RenderScheduler,
    mounted: bool,
    renders: u64,
}

impl<R> std::fmt::Debug for BindingPoint<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingPoint")
            .field("names", &self.names)
            .field("has_model", &self.model.is_some())
            .field("mounted", &self.mounted)
            .field("subscriptions", &self.subscriptions)
            .field("scheduler", &self.scheduler)
            .field("renders", &self.renders)
            .finish()
    }
}

impl<R: Clone> BindingPoint<R> {
    /// Create an unmounted binding point using the config's own model.
    pub fn new(config: BindingConfig<R>) -> Self {
        let model = config.model.clone();
        Self::with_model(config, model)
    }

    /// Create an unmounted binding point inside `ctx`. An explicit model on
    /// the config wins over the context's.
    pub fn within(ctx: &FormContext, config: BindingConfig<R>) -> Self {
        let model = ctx.resolve(config.model.as_ref());
        Self::with_model(config, model)
    }

    fn with_model(config: BindingConfig<R>, model: Option<ModelHandle>) -> Self {
        let names = config.field_set();
        Self {
            config,
            model,
            names,
            subscriptions: SubscriptionManager::new(),
            scheduler: RenderScheduler::new(),
            mounted: false,
            renders: 0,
        }
    }

    fn change_fn(&self) -> ChangeFn {
        let scheduler = self.scheduler.clone();
        Rc::new(move || {
            scheduler.request();
        })
    }

    /// Activate subscriptions. Idempotent.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        let on_change = self.change_fn();
        self.subscriptions
            .activate(self.model.as_ref(), &self.names, on_change);
    }

    /// Remove every subscription and drop any pending pass. Idempotent.
    pub fn unmount(&mut self) {
        self.subscriptions.deactivate();
        self.scheduler.take();
        self.mounted = false;
    }

    /// Swap the model. Resubscribes if mounted and the identity changed.
    pub fn set_model(&mut self, model: Option<ModelHandle>) {
        self.model = model;
        self.resync();
    }

    /// Change the watched names. Resubscribes if mounted and the resolved
    /// set changed.
    pub fn set_fields<I, S>(&mut self, name: impl Into<String>, auxiliary: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.name = name.into();
        self.config.auxiliary = auxiliary.into_iter().map(Into::into).collect();
        let names = self.config.field_set();
        if names != self.names {
            self.names = names;
            self.resync();
        }
    }

    fn resync(&mut self) {
        if !self.mounted {
            return;
        }
        let on_change = self.change_fn();
        self.subscriptions
            .sync(self.model.as_ref(), &self.names, on_change);
    }

    /// Read the current view without consuming a pending pass.
    #[must_use]
    pub fn materialize(&self) -> Materialized {
        match &self.model {
            Some(model) => materialize(model, &self.names, &self.config.options()),
            None => Materialized::Absent,
        }
    }

    /// Run a render pass: consume the pending flag, materialize once and
    /// hand the view to the render delegate.
    pub fn render(&mut self) -> Option<R> {
        self.scheduler.take();
        self.renders += 1;
        let materialized = self.materialize();
        trace!(
            fields = %self.names,
            pass = self.renders,
            absent = materialized.is_absent(),
            "binding render pass"
        );
        self.config.delegate.deliver(&materialized)
    }

    /// Render only if a pass is pending. The outer `None` means no pass was
    /// due; `Some(None)` means the pass rendered nothing.
    pub fn render_if_needed(&mut self) -> Option<Option<R>> {
        if self.needs_render() {
            Some(self.render())
        } else {
            None
        }
    }

    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Scheduler shared with this point's change callback.
    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    /// Normalized change handler for the primary field, if a model is set.
    #[must_use]
    pub fn on_change(&self) -> Option<OnChange> {
        self.model
            .as_ref()
            .map(|model| make_on_change(model, self.names.primary()))
    }

    #[must_use]
    pub fn field_set(&self) -> &FieldSet {
        &self.names
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Render passes run so far.
    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Registrations currently held with the model.
    #[must_use]
    pub fn live_subscriptions(&self) -> usize {
        self.subscriptions.live_count()
    }
}

impl<R> Drop for BindingPoint<R> {
    fn drop(&mut self) {
        self.subscriptions.deactivate();
    }
}
