#![forbid(unsafe_code)]

//! Presentation adapters for formbind.
//!
//! Every widget here produces [`Node`] trees through a
//! [`BindingPoint`](formbind_runtime::binding::BindingPoint): [`Form`] sets up
//! the context, [`Field`] and [`FormField`] bind single locations, and
//! [`FormItem`] adds a caption and validation message around a control.

pub mod field;
pub mod form;
pub mod item;
pub mod node;

pub use field::{Field, FormField, mount_control};
pub use form::{DEFAULT_FORM_TAG, Form};
pub use item::{FormItem, decorate_item, visible_error};
pub use node::{Element, Node};
