#![forbid(unsafe_code)]

//! `proptest` strategies over the student form.

use formbind_runtime::model::{FieldModel, FieldValue, MemoryModel, ModelError};
use proptest::prelude::*;

use crate::fixtures::STUDENT_FIELDS;

/// One host-side mutation of the student model.
#[derive(Debug, Clone)]
pub enum Edit {
    Name(String),
    Age(i64),
    No(String),
    Errors(&'static str, Vec<String>),
    Hidden(&'static str, bool),
}

impl Edit {
    /// The field this edit touches.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::Name(_) => "std_name",
            Self::Age(_) => "std_age",
            Self::No(_) => "std_no",
            Self::Errors(name, _) | Self::Hidden(name, _) => *name,
        }
    }

    /// Apply to `model`.
    ///
    /// # Errors
    ///
    /// Propagates the model's rejection.
    pub fn apply(&self, model: &MemoryModel) -> Result<(), ModelError> {
        match self {
            Self::Name(v) => model.set_value("std_name", FieldValue::from(v.as_str())),
            Self::Age(v) => model.set_value("std_age", FieldValue::Int(*v)),
            Self::No(v) => model.set_value("std_no", FieldValue::from(v.as_str())),
            Self::Errors(name, errors) => model.set_errors(name, errors.iter().cloned()),
            Self::Hidden(name, hidden) => model.set_hidden(name, *hidden),
        }
    }
}

/// Any student field name.
pub fn field_name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(STUDENT_FIELDS.to_vec())
}

/// Watch lists: arbitrary names, possibly repeated, possibly unknown.
pub fn watch_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            3 => field_name().prop_map(str::to_owned),
            1 => "[a-z]{1,6}",
        ],
        0..6,
    )
}

pub fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        "[a-zA-Z ]{0,12}".prop_map(Edit::Name),
        (0i64..120).prop_map(Edit::Age),
        "[0-9]{0,8}".prop_map(Edit::No),
        (field_name(), prop::collection::vec("[a-z ]{1,10}", 0..3))
            .prop_map(|(name, errors)| Edit::Errors(name, errors)),
        (field_name(), any::<bool>()).prop_map(|(name, hidden)| Edit::Hidden(name, hidden)),
    ]
}

/// Bursts of edits applied between two render passes.
pub fn edits(max: usize) -> impl Strategy<Value = Vec<Edit>> {
    prop::collection::vec(edit(), 1..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::student_model;

    proptest! {
        #[test]
        fn every_edit_applies_to_the_student_model(edit in edit()) {
            let model = student_model();
            prop_assert!(edit.apply(&model).is_ok());
            prop_assert!(model.field(edit.field()).is_some());
        }
    }
}
