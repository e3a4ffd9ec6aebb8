#![forbid(unsafe_code)]

//! Reference fixtures: the student form used across the test suites.

use std::rc::Rc;

use formbind_runtime::model::{FieldRecord, MemoryModel, ModelHandle};
use formbind_runtime::schema::{FormSchema, SchemaError};
use serde_json::json;

/// Field names of the student form, sorted.
pub const STUDENT_FIELDS: [&str; 3] = ["std_age", "std_name", "std_no"];

/// `std_name` (`""`, required), `std_age` (`0`) and `std_no` (`""`).
#[must_use]
pub fn student_model() -> MemoryModel {
    MemoryModel::new()
        .with_field("std_name", FieldRecord::new("").label("Name").required(true))
        .with_field("std_age", FieldRecord::new(0).label("Age").hint("type", "number"))
        .with_field("std_no", FieldRecord::new("").label("Student No."))
}

/// [`student_model`] behind a shared handle, plus the concrete `Rc` for
/// mutations outside the [`FieldModel`](formbind_runtime::model::FieldModel)
/// trait.
#[must_use]
pub fn student_handle() -> (Rc<MemoryModel>, ModelHandle) {
    let model = Rc::new(student_model());
    let handle: ModelHandle = model.clone();
    (model, handle)
}

/// The student form as a JSON schema document.
#[must_use]
pub fn student_schema_json() -> String {
    json!({
        "fields": {
            "std_name": { "default": "", "label": "Name", "required": true },
            "std_age": { "default": 0, "label": "Age", "hints": { "type": "number" } },
            "std_no": { "default": "", "label": "Student No." }
        }
    })
    .to_string()
}

/// Parse [`student_schema_json`].
///
/// # Errors
///
/// Returns [`SchemaError`] if the document does not parse.
pub fn student_schema() -> Result<FormSchema, SchemaError> {
    FormSchema::from_json_str(&student_schema_json())
}
