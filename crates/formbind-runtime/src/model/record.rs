#![forbid(unsafe_code)]

//! Per-field metadata snapshots.

use super::value::{Attributes, FieldValue};

/// Snapshot of one field: value, validation state, visibility and hints.
///
/// A record is always read as a whole, so its attributes are mutually
/// consistent at the instant it was taken.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldRecord {
    pub value: FieldValue,
    pub label: String,
    pub required: bool,
    pub hidden: bool,
    pub disabled: bool,
    pub readonly: bool,
    /// Validation messages, in the order the model produced them.
    pub errors: Vec<String>,
    /// Whether the user touched the field since the last commit.
    pub changed: bool,
    /// Free-form component hints (`type`, `min`, `max`, `pattern`, ...).
    pub hints: Attributes,
}

/// Attribute names produced by [`FieldRecord::attributes`] regardless of hints.
pub const RECORD_ATTRIBUTES: &[&str] = &[
    "value", "label", "required", "hidden", "disabled", "readonly", "errors", "changed",
];

impl FieldRecord {
    #[must_use]
    pub fn new(value: impl Into<FieldValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    #[must_use]
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    #[must_use]
    pub fn errors<I, S>(mut self, errors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.errors = errors.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a component hint such as `type`, `min` or `placeholder`.
    #[must_use]
    pub fn hint(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.hints.insert(key.into(), value.into());
        self
    }

    /// Flatten the record into a single attribute map.
    ///
    /// Hints come first and the record's named attributes are written over
    /// them, so a hint can never shadow `value`, `hidden` and friends.
    #[must_use]
    pub fn attributes(&self) -> Attributes {
        let mut attrs = self.hints.clone();
        attrs.insert("value".into(), self.value.clone());
        attrs.insert("label".into(), FieldValue::Text(self.label.clone()));
        attrs.insert("required".into(), FieldValue::Bool(self.required));
        attrs.insert("hidden".into(), FieldValue::Bool(self.hidden));
        attrs.insert("disabled".into(), FieldValue::Bool(self.disabled));
        attrs.insert("readonly".into(), FieldValue::Bool(self.readonly));
        attrs.insert(
            "errors".into(),
            FieldValue::List(self.errors.iter().cloned().map(FieldValue::Text).collect()),
        );
        attrs.insert("changed".into(), FieldValue::Bool(self.changed));
        attrs
    }

    /// First validation message, if any.
    #[must_use]
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}
