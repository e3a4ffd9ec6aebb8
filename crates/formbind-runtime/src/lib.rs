#![forbid(unsafe_code)]

//! Field-binding core for formbind.
//!
//! Connects an observable model of named fields to binding points in a UI
//! tree:
//!
//! - [`resolver`]: which fields a binding point watches.
//! - [`subscription`]: registering and tearing down model watchers.
//! - [`scheduler`]: folding bursts of change notifications into one pass.
//! - [`materialize`]: building a merged [`FieldView`] from model state.
//! - [`mutation`]: turning UI events or bare values into model writes.
//! - [`delegate`]: handing the view to a render function, a component
//!   mapping, or static children.
//! - [`binding`]: the [`BindingPoint`] that ties them together.
//!
//! The model itself is external; [`model::MemoryModel`] is an in-process
//! reference implementation of the [`FieldModel`] contract.
//!
//! # Threading
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and runs on the UI
//! thread. Change callbacks never render synchronously; they request a pass.

pub mod binding;
pub mod context;
pub mod delegate;
pub mod materialize;
pub mod model;
pub mod mutation;
pub mod reactive;
pub mod resolver;
#[cfg(feature = "schema-config")]
pub mod schema;
pub mod scheduler;
pub mod subscription;

pub use binding::{BindingConfig, BindingPoint};
pub use context::{FormContext, FormScope};
pub use delegate::{
    ComponentProps, ComponentShape, ComponentSpec, RenderDelegate, RenderPath,
};
pub use materialize::{FieldView, MaterializeOptions, Materialized, materialize};
pub use model::{
    Attributes, FieldModel, FieldRecord, FieldValue, MemoryModel, ModelError, ModelHandle,
    ValueKind, Watcher, same_model,
};
pub use mutation::{ChangeEvent, ChangeInput, EventTarget, OnChange, make_on_change};
pub use resolver::FieldSet;
#[cfg(feature = "schema-config")]
pub use schema::{FieldSchema, FormSchema, SchemaError};
pub use scheduler::RenderScheduler;
pub use subscription::SubscriptionManager;
