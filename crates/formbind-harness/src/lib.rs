#![forbid(unsafe_code)]

//! Test harness and reference fixtures for formbind.
//!
//! - [`fixtures`]: the student form model and schema.
//! - [`recording`]: a model wrapper that logs watch/unwatch traffic.
//! - [`logs`]: capture `tracing` output from a closure.
//! - [`strategies`]: `proptest` strategies over the student form.
//!
//! The integration suites live in `tests/`.

pub mod fixtures;
pub mod logs;
pub mod recording;
pub mod strategies;

pub use fixtures::{STUDENT_FIELDS, student_handle, student_model, student_schema};
pub use logs::capture_logs;
pub use recording::{RecordingModel, WatchOp};

/// Assert that a rendered [`Node`](formbind_widgets::Node) (or
/// `Option<Node>`) has the given markup.
///
/// `None` renders as `∅`.
#[macro_export]
macro_rules! assert_markup {
    ($node:expr, $expected:expr $(,)?) => {{
        let actual = $crate::markup_of(&$node);
        let expected: &str = $expected;
        assert!(
            actual == expected,
            "markup mismatch\n  expected: {expected}\n    actual: {actual}"
        );
    }};
}

#[doc(hidden)]
pub trait Markup {
    fn markup(&self) -> String;
}

impl Markup for formbind_widgets::Node {
    fn markup(&self) -> String {
        self.to_markup()
    }
}

impl Markup for Option<formbind_widgets::Node> {
    fn markup(&self) -> String {
        self.as_ref()
            .map_or_else(|| "∅".to_owned(), formbind_widgets::Node::to_markup)
    }
}

#[doc(hidden)]
pub fn markup_of(node: &impl Markup) -> String {
    node.markup()
}
