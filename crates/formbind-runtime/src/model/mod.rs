#![forbid(unsafe_code)]

//! The observable model contract consumed by binding points.
//!
//! A model is supplied by the host and is never created or destroyed by the
//! binding layer. The layer only needs to:
//!
//! - register and remove change callbacks per field name ([`FieldModel::watch`],
//!   [`FieldModel::unwatch`]),
//! - read a consistent [`FieldRecord`] snapshot per field name,
//! - write a new value into a field ([`FieldModel::set_value`]).
//!
//! [`MemoryModel`] is the in-process reference implementation.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown field | Write to a name the model does not have | `ModelError::UnknownField` |
//! | Type mismatch | Value kind incompatible with the field | `ModelError::TypeMismatch` |
//! | Read-only field | Write to a `readonly` field | `ModelError::ReadOnly` |
//! | Detached handler | Change handler outlived its model | `ModelError::Detached` |

pub mod memory;
pub mod record;
pub mod value;

pub use memory::MemoryModel;
pub use record::{FieldRecord, RECORD_ATTRIBUTES};
pub use value::{Attributes, FieldValue, ValueKind};

use core::fmt;
use std::rc::Rc;

/// Shared handle to a host-supplied model.
pub type ModelHandle = Rc<dyn FieldModel>;

/// Whether two handles point at the same model instance.
#[must_use]
pub fn same_model(a: &ModelHandle, b: &ModelHandle) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Identity-compared change callback registered with a model.
///
/// Cloning a `Watcher` yields the same identity; two watchers built from
/// separate closures are never equal, even if the closures are identical.
#[derive(Clone)]
pub struct Watcher {
    callback: Rc<dyn Fn()>,
}

impl Watcher {
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self {
            callback: Rc::new(callback),
        }
    }

    /// Invoke the callback.
    pub fn notify(&self) {
        (self.callback)();
    }

    #[must_use]
    pub fn same(&self, other: &Watcher) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.callback), Rc::as_ptr(&other.callback))
    }
}

impl PartialEq for Watcher {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Watcher {}

impl fmt::Debug for Watcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Watcher")
            .field("id", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

/// Observable data source of named fields.
///
/// All methods take `&self`: models are shared between many binding points
/// and use interior mutability. Implementations must tolerate callbacks that
/// read the model, or watch and unwatch, while being notified.
pub trait FieldModel {
    /// Register `watcher` for changes to `name`.
    ///
    /// With `immediate`, the watcher is also invoked once synchronously
    /// before `watch` returns. Watching a name the model does not (yet)
    /// have is allowed.
    fn watch(&self, name: &str, watcher: &Watcher, immediate: bool);

    /// Remove a watcher previously registered for `name`. Unknown pairs are
    /// ignored.
    fn unwatch(&self, name: &str, watcher: &Watcher);

    /// Snapshot of the field named `name`, or `None` if the model has no
    /// such field right now.
    fn field(&self, name: &str) -> Option<FieldRecord>;

    /// Names of every field currently present, in a stable order.
    fn field_names(&self) -> Vec<String>;

    /// Write a new value into `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`ModelError`] when the model refuses the write.
    fn set_value(&self, name: &str, value: FieldValue) -> Result<(), ModelError>;

    fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Errors raised by a model when it refuses a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The model has no field with this name.
    UnknownField(String),
    /// The value's kind is not accepted by the field.
    TypeMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },
    /// The field is read-only.
    ReadOnly(String),
    /// The model was dropped while a change handler was still held.
    Detached(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownField(name) => write!(f, "unknown field '{name}'"),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "field '{field}' expects {expected}, got {found}"),
            Self::ReadOnly(name) => write!(f, "field '{name}' is read-only"),
            Self::Detached(name) => write!(f, "model for field '{name}' is gone"),
        }
    }
}

impl std::error::Error for ModelError {}
