#![forbid(unsafe_code)]

//! Field builders: bound [`Node`] producers.
//!
//! [`Field`] renders through a caller function or static children.
//! [`FormField`] mounts a concrete control (`input`, `textarea`, or any
//! other tag) from the field's attributes, wired to the field's change
//! handler.
//!
//! # Example
//!
//! ```
//! use std::rc::Rc;
//! use formbind_runtime::context::FormContext;
//! use formbind_runtime::model::{FieldRecord, MemoryModel, ModelHandle};
//! use formbind_widgets::field::FormField;
//!
//! let model: ModelHandle = Rc::new(
//!     MemoryModel::new().with_field("std_name", FieldRecord::new("Ann").required(true)),
//! );
//! let ctx = FormContext::new(model);
//! let mut point = FormField::input("std_name").bind(&ctx);
//! let node = point.render().unwrap();
//! assert_eq!(node.to_markup(), r#"<input required value="Ann" @change/>"#);
//! ```

use formbind_runtime::binding::{BindingConfig, BindingPoint};
use formbind_runtime::context::FormContext;
use formbind_runtime::delegate::{ComponentProps, ComponentShape, ComponentSpec};
use formbind_runtime::materialize::FieldView;
use formbind_runtime::model::{FieldValue, ModelHandle};

use crate::node::{Element, Node};

/// Build the element for a mapped control.
#[must_use]
pub fn mount_control(props: ComponentProps) -> Node {
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!(
        "widget_render",
        widget = "FormField",
        tag = %props.shape,
        field = props.on_change.field()
    )
    .entered();

    Element::new(props.shape.tag())
        .attrs(props.attrs)
        .handler(props.on_change)
        .into()
}

/// A binding point that renders via a function or static children.
pub struct Field {
    config: BindingConfig<Node>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field").field("config", &self.config).finish()
    }
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            config: BindingConfig::new(name),
        }
    }

    #[must_use]
    pub fn watch<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config = self.config.watch(names);
        self
    }

    #[must_use]
    pub fn model(mut self, model: ModelHandle) -> Self {
        self.config = self.config.model(model);
        self
    }

    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.config = self.config.keep_alive(keep_alive);
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.config = self.config.param(key, value);
        self
    }

    #[must_use]
    pub fn render(mut self, f: impl Fn(&FieldView) -> Node + 'static) -> Self {
        self.config = self.config.render(f);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl Into<Node>) -> Self {
        self.config = self.config.children(children.into());
        self
    }

    #[must_use]
    pub fn component(mut self, spec: ComponentSpec) -> Self {
        self.config = self.config.component(spec, mount_control);
        self
    }

    #[must_use]
    pub fn decorate(mut self, f: impl Fn(Node, &FieldView) -> Node + 'static) -> Self {
        self.config = self.config.decorate(f);
        self
    }

    #[must_use]
    pub fn into_config(self) -> BindingConfig<Node> {
        self.config
    }

    /// Mounted binding point inside `ctx`.
    #[must_use]
    pub fn bind(self, ctx: &FormContext) -> BindingPoint<Node> {
        let mut point = BindingPoint::within(ctx, self.config);
        point.mount();
        point
    }

    /// Mounted binding point on the field's own model, outside any form.
    #[must_use]
    pub fn bind_standalone(self) -> BindingPoint<Node> {
        let mut point = BindingPoint::new(self.config);
        point.mount();
        point
    }
}

/// A field rendered as a concrete control.
#[derive(Debug)]
pub struct FormField {
    field: Field,
    spec: ComponentSpec,
}

impl FormField {
    pub fn new(name: impl Into<String>, spec: ComponentSpec) -> Self {
        Self {
            field: Field::new(name),
            spec,
        }
    }

    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name, ComponentSpec::new(ComponentShape::Input))
    }

    pub fn textarea(name: impl Into<String>) -> Self {
        Self::new(name, ComponentSpec::new(ComponentShape::Textarea))
    }

    /// Control chosen by the field's `component` hint.
    pub fn from_hint(name: impl Into<String>) -> Self {
        Self::new(name, ComponentSpec::from_hint())
    }

    /// Attribute written over the mapped props.
    #[must_use]
    pub fn base(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.spec = self.spec.with_base(key, value);
        self
    }

    #[must_use]
    pub fn watch<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field = self.field.watch(names);
        self
    }

    #[must_use]
    pub fn model(mut self, model: ModelHandle) -> Self {
        self.field = self.field.model(model);
        self
    }

    #[must_use]
    pub fn keep_alive(mut self, keep_alive: bool) -> Self {
        self.field = self.field.keep_alive(keep_alive);
        self
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.field = self.field.param(key, value);
        self
    }

    /// Static fallback when no control shape resolves.
    #[must_use]
    pub fn children(mut self, children: impl Into<Node>) -> Self {
        self.field = self.field.children(children);
        self
    }

    #[must_use]
    pub fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    #[must_use]
    pub fn into_field(self) -> Field {
        self.field.component(self.spec)
    }

    #[must_use]
    pub fn bind(self, ctx: &FormContext) -> BindingPoint<Node> {
        self.into_field().bind(ctx)
    }
}
