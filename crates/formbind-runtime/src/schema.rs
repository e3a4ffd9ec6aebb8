#![forbid(unsafe_code)]

//! Declarative form schemas (feature `schema-config`).
//!
//! A [`FormSchema`] describes the fields of a [`MemoryModel`]: default value,
//! label, flags and component hints. Schemas load from TOML or JSON:
//!
//! ```toml
//! [fields.std_name]
//! default = ""
//! label = "Name"
//! required = true
//!
//! [fields.std_age]
//! default = 0
//! label = "Age"
//! hints = { type = "number", min = 0 }
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Parse error | Malformed TOML/JSON, wrong field types | `SchemaError` |
//! | Unknown keys | Typos in a field table | `SchemaError` (denied) |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Attributes, FieldRecord, FieldValue, MemoryModel};

/// Errors from loading a schema.
#[derive(Debug, Clone)]
pub enum SchemaError {
    /// TOML input could not be parsed.
    Toml(String),
    /// JSON input could not be parsed.
    Json(String),
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Toml(msg) => write!(f, "invalid TOML schema: {msg}"),
            Self::Json(msg) => write!(f, "invalid JSON schema: {msg}"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Declared metadata for one field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldSchema {
    pub default: FieldValue,
    pub label: String,
    pub required: bool,
    pub hidden: bool,
    pub disabled: bool,
    pub readonly: bool,
    pub hints: Attributes,
}

impl FieldSchema {
    /// The initial record for this field.
    #[must_use]
    pub fn record(&self) -> FieldRecord {
        FieldRecord {
            value: self.default.clone(),
            label: self.label.clone(),
            required: self.required,
            hidden: self.hidden,
            disabled: self.disabled,
            readonly: self.readonly,
            errors: Vec::new(),
            changed: false,
            hints: self.hints.clone(),
        }
    }
}

/// Field declarations keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSchema {
    pub fields: BTreeMap<String, FieldSchema>,
}

impl FormSchema {
    /// Parse a schema from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Toml`] if the input is not a valid schema.
    pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
        toml::from_str(input).map_err(|e| SchemaError::Toml(e.to_string()))
    }

    /// Parse a schema from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Json`] if the input is not a valid schema.
    pub fn from_json_str(input: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(input).map_err(|e| SchemaError::Json(e.to_string()))
    }

    /// Build a fresh model with every declared field at its default.
    #[must_use]
    pub fn build(&self) -> MemoryModel {
        self.fields
            .iter()
            .fold(MemoryModel::new(), |model, (name, field)| {
                model.with_field(name.clone(), field.record())
            })
    }
}
