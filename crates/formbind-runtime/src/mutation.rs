#![forbid(unsafe_code)]

//! Mutation adapter: UI interactions to model writes.
//!
//! Controls deliver changes in one of two shapes, and both are part of the
//! contract:
//!
//! - a change event carrying `target.value` (native-style controls),
//! - a bare value (custom widgets).
//!
//! [`ChangeInput`] names the two cases explicitly; [`OnChange`] extracts the
//! value from either and writes it to the binding point's primary field. The
//! adapter does no validation and no retry; a rejected write is returned to
//! the caller as the model's [`ModelError`].

use std::rc::{Rc, Weak};

use tracing::debug;

use crate::model::{FieldModel, FieldValue, ModelError, ModelHandle};

/// The element an event originated from.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventTarget {
    pub value: FieldValue,
}

/// A native-style change event.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Event type, e.g. `"change"` or `"input"`.
    pub kind: String,
    pub target: EventTarget,
}

impl ChangeEvent {
    pub fn new(kind: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            kind: kind.into(),
            target: EventTarget {
                value: value.into(),
            },
        }
    }

    /// A `"change"` event whose target holds `value`.
    pub fn change(value: impl Into<FieldValue>) -> Self {
        Self::new("change", value)
    }
}

/// What a control hands to its change handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeInput {
    /// An event; the written value is `target.value`.
    Event(ChangeEvent),
    /// A bare value, written as is.
    Value(FieldValue),
}

impl ChangeInput {
    /// The value to write.
    #[must_use]
    pub fn into_value(self) -> FieldValue {
        match self {
            Self::Event(event) => event.target.value,
            Self::Value(value) => value,
        }
    }
}

impl From<ChangeEvent> for ChangeInput {
    fn from(event: ChangeEvent) -> Self {
        Self::Event(event)
    }
}

impl From<FieldValue> for ChangeInput {
    fn from(value: FieldValue) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for ChangeInput {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for ChangeInput {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for ChangeInput {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for ChangeInput {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<f64> for ChangeInput {
    fn from(value: f64) -> Self {
        Self::Value(value.into())
    }
}

impl From<bool> for ChangeInput {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

/// Change handler bound to one field of one model.
///
/// Holds the model weakly: a handler that outlives its model reports
/// [`ModelError::Detached`] instead of keeping the model alive.
#[derive(Clone)]
pub struct OnChange {
    model: Weak<dyn FieldModel>,
    field: Rc<str>,
}

impl std::fmt::Debug for OnChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnChange")
            .field("field", &self.field)
            .field("attached", &(self.model.strong_count() > 0))
            .finish()
    }
}

impl OnChange {
    /// The field this handler writes to.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Normalize `input` and write it into the bound field.
    ///
    /// # Errors
    ///
    /// Propagates the model's rejection unchanged, or
    /// [`ModelError::Detached`] if the model is gone.
    pub fn call(&self, input: impl Into<ChangeInput>) -> Result<(), ModelError> {
        let value = input.into().into_value();
        let model = self
            .model
            .upgrade()
            .ok_or_else(|| ModelError::Detached(self.field.to_string()))?;
        model.set_value(&self.field, value).inspect_err(|err| {
            debug!(field = %self.field, error = %err, "model rejected write");
        })
    }
}

/// Build the change handler for `field` on `model`.
#[must_use]
pub fn make_on_change(model: &ModelHandle, field: &str) -> OnChange {
    OnChange {
        model: Rc::downgrade(model),
        field: Rc::from(field),
    }
}
