#![forbid(unsafe_code)]

//! formbind public facade.
//!
//! Binds UI locations to fields of an observable model: subscribe on mount,
//! coalesce change notifications into one render pass, materialize a merged
//! view, and route UI events back into the model.
//!
//! # Quick start
//!
//! ```
//! # #[cfg(feature = "widgets")]
//! # {
//! use std::rc::Rc;
//! use formbind::prelude::*;
//!
//! let record = FieldRecord::new("").label("Name").required(true);
//! let model = Rc::new(MemoryModel::new().with_field("std_name", record));
//! let handle: ModelHandle = model.clone();
//! let ctx = Form::new(Some(handle)).context().unwrap();
//!
//! let mut item = FormItem::new(FormField::input("std_name")).bind(&ctx);
//! let node = item.render().unwrap();
//! node.find("input").unwrap().on_change.as_ref().unwrap()
//!     .call(ChangeEvent::change("Alice"))
//!     .unwrap();
//!
//! let node = item.render_if_needed().unwrap().unwrap();
//! assert_eq!(node.find("input").unwrap().get("value"), Some(&FieldValue::from("Alice")));
//! # }
//! ```

pub use formbind_runtime as runtime;
#[cfg(feature = "widgets")]
pub use formbind_widgets as widgets;

pub use formbind_runtime::{
    BindingConfig, BindingPoint, ChangeEvent, FieldModel, FieldRecord, FieldValue, FieldView,
    FormContext, MemoryModel, ModelError, ModelHandle, OnChange,
};
#[cfg(feature = "schema-config")]
pub use formbind_runtime::{FormSchema, SchemaError};

pub mod prelude {
    pub use formbind_runtime::{
        BindingConfig, BindingPoint, ChangeEvent, ComponentShape, ComponentSpec, FieldModel,
        FieldRecord, FieldSet, FieldValue, FieldView, FormContext, Materialized, MemoryModel,
        ModelError, ModelHandle, OnChange,
    };

    #[cfg(feature = "widgets")]
    pub use formbind_widgets::{Element, Field, Form, FormField, FormItem, Node};

    #[cfg(feature = "schema-config")]
    pub use formbind_runtime::FormSchema;
}
