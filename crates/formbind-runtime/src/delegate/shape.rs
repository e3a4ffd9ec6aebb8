#![forbid(unsafe_code)]

//! Component shapes: which attributes a target control expects.
//!
//! A shape is resolved once per binding-point configuration. `Input` and
//! `Textarea` pick a fixed attribute list out of the view (renaming
//! `readonly` to `readOnly`); `Generic` passes every primary attribute
//! through. Auxiliary fields never contribute props. Attributes absent from
//! the view are left out of the props rather than set to `Null`.

use core::fmt;

use crate::materialize::FieldView;
use crate::model::{Attributes, FieldValue};
use crate::mutation::OnChange;

/// `(prop name, view attribute)` pairs for `<input>`-shaped controls.
pub const INPUT_PROPS: &[(&str, &str)] = &[
    ("value", "value"),
    ("placeholder", "placeholder"),
    ("readOnly", "readonly"),
    ("disabled", "disabled"),
    ("hidden", "hidden"),
    ("required", "required"),
    ("type", "type"),
    ("min", "min"),
    ("max", "max"),
    ("maxLength", "maxLength"),
    ("minLength", "minLength"),
    ("size", "size"),
    ("name", "name"),
    ("id", "id"),
    ("multiple", "multiple"),
    ("title", "title"),
    ("pattern", "pattern"),
    ("step", "step"),
];

/// `(prop name, view attribute)` pairs for `<textarea>`-shaped controls.
pub const TEXTAREA_PROPS: &[(&str, &str)] = &[
    ("value", "value"),
    ("placeholder", "placeholder"),
    ("readOnly", "readonly"),
    ("disabled", "disabled"),
    ("hidden", "hidden"),
    ("required", "required"),
    ("cols", "cols"),
    ("maxLength", "maxLength"),
    ("rows", "rows"),
    ("wrap", "wrap"),
];

/// Closed set of control shapes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentShape {
    Input,
    Textarea,
    /// Any other control, identified by its tag.
    Generic(String),
}

impl ComponentShape {
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        match tag {
            "input" => Self::Input,
            "textarea" => Self::Textarea,
            other => Self::Generic(other.to_owned()),
        }
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::Textarea => "textarea",
            Self::Generic(tag) => tag,
        }
    }

    /// Fixed prop list, or `None` for pass-through shapes.
    #[must_use]
    pub fn prop_list(&self) -> Option<&'static [(&'static str, &'static str)]> {
        match self {
            Self::Input => Some(INPUT_PROPS),
            Self::Textarea => Some(TEXTAREA_PROPS),
            Self::Generic(_) => None,
        }
    }

    /// Map a view to this shape's props; `base` overrides mapped values.
    #[must_use]
    pub fn props(&self, view: &FieldView, base: &Attributes) -> ComponentProps {
        let mut attrs = Attributes::new();
        match self.prop_list() {
            Some(list) => {
                for (prop, source) in list {
                    if let Some(value) = view.attr(source) {
                        attrs.insert((*prop).to_owned(), value.clone());
                    }
                }
            }
            None => {
                attrs.extend(view.own_attrs().iter().map(|(k, v)| (k.clone(), v.clone())));
                attrs.extend(view.params().iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        attrs.extend(base.iter().map(|(k, v)| (k.clone(), v.clone())));
        ComponentProps {
            shape: self.clone(),
            attrs,
            on_change: view.on_change().clone(),
        }
    }
}

impl fmt::Display for ComponentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Flat attribute set handed to a concrete control.
#[derive(Debug, Clone)]
pub struct ComponentProps {
    pub shape: ComponentShape,
    pub attrs: Attributes,
    pub on_change: OnChange,
}

impl ComponentProps {
    #[must_use]
    pub fn get(&self, prop: &str) -> Option<&FieldValue> {
        self.attrs.get(prop)
    }

    #[must_use]
    pub fn flag(&self, prop: &str) -> bool {
        self.get(prop).is_some_and(FieldValue::is_truthy)
    }
}

/// Declarative component choice for a binding point.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSpec {
    /// Explicit shape; `None` defers to the field's `component` hint.
    pub shape: Option<ComponentShape>,
    /// Attributes written over the mapped props.
    pub base: Attributes,
}

impl ComponentSpec {
    #[must_use]
    pub fn new(shape: ComponentShape) -> Self {
        Self {
            shape: Some(shape),
            base: Attributes::new(),
        }
    }

    #[must_use]
    pub fn tag(tag: &str) -> Self {
        Self::new(ComponentShape::parse(tag))
    }

    /// A spec that takes its shape from the field's `component` hint.
    #[must_use]
    pub fn from_hint() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_base(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.base.insert(key.into(), value.into());
        self
    }

    /// The shape to use for `view`, if any.
    #[must_use]
    pub fn resolve(&self, view: &FieldView) -> Option<ComponentShape> {
        if let Some(shape) = &self.shape {
            return Some(shape.clone());
        }
        view.attr("component")
            .and_then(FieldValue::as_str)
            .filter(|tag| !tag.is_empty())
            .map(ComponentShape::parse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::{MaterializeOptions, materialize};
    use crate::model::{FieldRecord, MemoryModel, ModelHandle};
    use crate::resolver::FieldSet;
    use std::rc::Rc;

    fn view_of(record: FieldRecord) -> FieldView {
        let model: ModelHandle = Rc::new(MemoryModel::new().with_field("f", record));
        materialize(&model, &FieldSet::single("f"), &MaterializeOptions::default())
            .into_view()
            .unwrap()
    }

    #[test]
    fn parse_tags() {
        assert_eq!(ComponentShape::parse("input"), ComponentShape::Input);
        assert_eq!(ComponentShape::parse("textarea"), ComponentShape::Textarea);
        assert_eq!(
            ComponentShape::parse("select"),
            ComponentShape::Generic("select".into())
        );
        assert_eq!(ComponentShape::parse("select").to_string(), "select");
    }

    #[test]
    fn input_props_pick_listed_attributes() {
        let view = view_of(
            FieldRecord::new("x")
                .required(true)
                .readonly(true)
                .hint("type", "email")
                .hint("rows", 4),
        );
        let props = ComponentShape::Input.props(&view, &Attributes::new());
        assert_eq!(props.get("value"), Some(&FieldValue::from("x")));
        assert_eq!(props.get("type"), Some(&FieldValue::from("email")));
        assert!(props.flag("required"));
        assert!(props.flag("readOnly"));
        assert!(props.get("readonly").is_none());
        assert!(props.get("rows").is_none(), "rows is not an input prop");
        assert!(props.get("min").is_none(), "unset attributes are omitted");
        assert!(props.get("label").is_none());
    }

    #[test]
    fn textarea_props() {
        let view = view_of(FieldRecord::new("long").hint("rows", 4).hint("type", "email"));
        let props = ComponentShape::Textarea.props(&view, &Attributes::new());
        assert_eq!(props.get("rows"), Some(&FieldValue::Int(4)));
        assert!(props.get("type").is_none());
        assert!(
            props
                .attrs
                .keys()
                .all(|k| TEXTAREA_PROPS.iter().any(|(prop, _)| *prop == k.as_str()))
        );
    }

    #[test]
    fn generic_passes_everything_and_base_wins() {
        let view = view_of(FieldRecord::new(1).label("L").hint("options", "a|b"));
        let mut base = Attributes::new();
        base.insert("label".into(), FieldValue::from("override"));
        let props = ComponentShape::parse("select").props(&view, &base);
        assert_eq!(props.get("options"), Some(&FieldValue::from("a|b")));
        assert_eq!(props.get("label"), Some(&FieldValue::from("override")));
        assert_eq!(props.get("errors"), Some(&FieldValue::List(Vec::new())));
    }

    #[test]
    fn sibling_hints_stay_off_the_control() {
        let model: ModelHandle = Rc::new(
            MemoryModel::new()
                .with_field("std_name", FieldRecord::new("Ann"))
                .with_field(
                    "std_age",
                    FieldRecord::new(0)
                        .hint("type", "number")
                        .hint("min", 0)
                        .hint("component", "textarea"),
                ),
        );
        let set = FieldSet::resolve("std_name", ["std_age"]);
        let view = materialize(&model, &set, &MaterializeOptions::default())
            .into_view()
            .unwrap();

        let props = ComponentShape::Input.props(&view, &Attributes::new());
        assert_eq!(props.get("value"), Some(&FieldValue::from("Ann")));
        assert!(props.get("type").is_none());
        assert!(props.get("min").is_none());

        let generic = ComponentShape::parse("select").props(&view, &Attributes::new());
        assert!(generic.get("min").is_none());
        assert_eq!(ComponentSpec::from_hint().resolve(&view), None);
    }

    #[test]
    fn spec_resolves_from_hint() {
        let hinted = view_of(FieldRecord::new("").hint("component", "textarea"));
        let plain = view_of(FieldRecord::new(""));
        assert_eq!(
            ComponentSpec::from_hint().resolve(&hinted),
            Some(ComponentShape::Textarea)
        );
        assert_eq!(ComponentSpec::from_hint().resolve(&plain), None);
        assert_eq!(
            ComponentSpec::tag("input").resolve(&hinted),
            Some(ComponentShape::Input)
        );
    }

    #[test]
    fn props_carry_on_change() {
        let view = view_of(FieldRecord::new(""));
        let spec = ComponentSpec::tag("input").with_base("id", "f-1");
        let props = spec.resolve(&view).unwrap().props(&view, &spec.base);
        assert_eq!(props.on_change.field(), "f");
        assert_eq!(props.get("id"), Some(&FieldValue::from("f-1")));
    }
}
