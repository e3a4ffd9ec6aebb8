#![forbid(unsafe_code)]

//! Labelled form item: caption, control and validation message.
//!
//! ```text
//! <div class=..>
//!   <label>
//!     <span>Name<sup>*</sup></span>   caption, `*` when required
//!     <input .. @change/>             the mapped control
//!     <span><i>too short</i></span>   first error, once the field changed
//!   </label>
//! </div>
//! ```
//!
//! The three parts come from a single binding point, so the item holds one
//! subscription per watched name and re-renders as a unit.

use formbind_runtime::binding::BindingPoint;
use formbind_runtime::context::FormContext;
use formbind_runtime::materialize::FieldView;

use crate::field::{Field, FormField};
use crate::node::{Element, Node};

/// A [`FormField`] with a caption and an error slot.
#[derive(Debug)]
pub struct FormItem {
    field: FormField,
    label: Option<String>,
    class: Option<String>,
}

impl FormItem {
    pub fn new(field: FormField) -> Self {
        Self {
            field,
            label: None,
            class: None,
        }
    }

    /// Caption text; defaults to the field's own label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn into_field(self) -> Field {
        let Self { field, label, class } = self;
        field.into_field().decorate(move |control, view| {
            decorate_item(control, view, label.as_deref(), class.as_deref())
        })
    }

    #[must_use]
    pub fn bind(self, ctx: &FormContext) -> BindingPoint<Node> {
        self.into_field().bind(ctx)
    }
}

/// Wrap `control` with the caption and error slot for `view`.
#[must_use]
pub fn decorate_item(
    control: Node,
    view: &FieldView,
    label: Option<&str>,
    class: Option<&str>,
) -> Node {
    #[cfg(feature = "tracing")]
    let _span =
        tracing::debug_span!("widget_render", widget = "FormItem", field = view.name()).entered();

    let record = view.record();
    let caption = label.unwrap_or(record.label.as_str());
    let mut title = Element::new("span").child(caption);
    if record.required {
        title = title.child(Element::new("sup").child("*"));
    }

    let mut body = Element::new("label").child(title).child(control);
    if let Some(message) = visible_error(view) {
        body = body.child(Element::new("span").child(Element::new("i").child(message)));
    }

    let mut item = Element::new("div");
    if let Some(class) = class {
        item = item.attr("class", class);
    }
    item.child(body).into()
}

/// First error message, shown only after the user changed the field.
#[must_use]
pub fn visible_error(view: &FieldView) -> Option<&str> {
    let record = view.record();
    if record.changed {
        record.first_error()
    } else {
        None
    }
}
