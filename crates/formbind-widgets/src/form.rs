#![forbid(unsafe_code)]

//! Form container.
//!
//! A [`Form`] owns no state of its own: it hands an explicit
//! [`FormContext`] to the closure that builds its body and wraps the result
//! in a container element. Without a model it renders nothing.

use formbind_runtime::context::FormContext;
use formbind_runtime::model::{Attributes, FieldValue, ModelHandle};

use crate::node::{Element, Node};

/// Container element used when none is configured.
pub const DEFAULT_FORM_TAG: &str = "form";

/// Root of a bound form.
pub struct Form {
    model: Option<ModelHandle>,
    tag: Option<String>,
    attrs: Attributes,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("has_model", &self.model.is_some())
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .finish()
    }
}

impl Form {
    pub fn new(model: Option<ModelHandle>) -> Self {
        Self {
            model,
            tag: Some(DEFAULT_FORM_TAG.to_owned()),
            attrs: Attributes::new(),
        }
    }

    /// Container tag; `None` renders the body without a wrapper.
    #[must_use]
    pub fn component(mut self, tag: Option<&str>) -> Self {
        self.tag = tag.map(str::to_owned);
        self
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn model(&self) -> Option<&ModelHandle> {
        self.model.as_ref()
    }

    /// Context for this form's body, if it has a model.
    #[must_use]
    pub fn context(&self) -> Option<FormContext> {
        self.model.clone().map(FormContext::new)
    }

    /// Build the body in a fresh context rooted at this form's model.
    pub fn render<F>(&self, body: F) -> Option<Node>
    where
        F: FnOnce(&FormContext) -> Vec<Node>,
    {
        let ctx = self.context()?;
        Some(self.wrap(body(&ctx)))
    }

    /// Build the body inside `parent`, with this form's model pushed as a
    /// nested scope for the duration of `body`.
    pub fn render_nested<F>(&self, parent: &FormContext, body: F) -> Option<Node>
    where
        F: FnOnce(&FormContext) -> Vec<Node>,
    {
        let model = self.model.clone()?;
        let nodes = {
            let _scope = parent.enter(model);
            body(parent)
        };
        Some(self.wrap(nodes))
    }

    fn wrap(&self, nodes: Vec<Node>) -> Node {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "widget_render",
            widget = "Form",
            tag = self.tag.as_deref().unwrap_or(""),
            children = nodes.len()
        )
        .entered();

        match &self.tag {
            Some(tag) => Element::new(tag.as_str())
                .attrs(self.attrs.clone())
                .children(nodes)
                .into(),
            None => Node::Fragment(nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FormField};
    use formbind_runtime::model::{FieldRecord, MemoryModel, same_model};
    use std::rc::Rc;

    fn model(name: &str, value: &str) -> ModelHandle {
        Rc::new(MemoryModel::new().with_field(name, FieldRecord::new(value)))
    }

    #[test]
    fn no_model_renders_nothing() {
        let form = Form::new(None);
        let mut called = false;
        let out = form.render(|_| {
            called = true;
            Vec::new()
        });
        assert!(out.is_none());
        assert!(!called);
    }

    #[test]
    fn body_binds_through_context() {
        let form = Form::new(Some(model("std_name", "Ann"))).attr("id", "student");
        let node = form
            .render(|ctx| {
                let mut point = FormField::input("std_name").bind(ctx);
                point.render().into_iter().collect()
            })
            .unwrap();
        assert_eq!(
            node.to_markup(),
            r#"<form id="student"><input value="Ann" @change/></form>"#
        );
    }

    #[test]
    fn custom_and_cleared_container() {
        let section = Form::new(Some(model("a", "1"))).component(Some("section"));
        let node = section.render(|_| vec![Node::text("x")]).unwrap();
        assert_eq!(node.to_markup(), "<section>x</section>");

        let bare = Form::new(Some(model("a", "1"))).component(None);
        let node = bare.render(|_| vec![Node::text("x")]).unwrap();
        assert_eq!(node.to_markup(), "x");
    }

    #[test]
    fn nested_form_scopes_its_model() {
        let outer = model("name", "outer");
        let inner = Form::new(Some(model("name", "inner")));
        let ctx = FormContext::new(Rc::clone(&outer));

        let node = inner
            .render_nested(&ctx, |ctx| {
                let mut point = Field::new("name")
                    .render(|view| Node::text(view.value().to_string()))
                    .bind(ctx);
                point.render().into_iter().collect()
            })
            .unwrap();
        assert_eq!(node.text_content(), "inner");
        assert_eq!(ctx.depth(), 0);
        assert!(same_model(&ctx.current().unwrap(), &outer));
    }
}
