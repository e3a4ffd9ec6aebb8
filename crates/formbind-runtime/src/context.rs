#![forbid(unsafe_code)]

//! Explicit form context.
//!
//! A [`FormContext`] carries the model a subtree of binding points binds to.
//! It is passed down by value; there is no global or thread-local lookup.
//! Nested forms push a scoped model with [`FormContext::enter`]; dropping the
//! returned guard restores the enclosing model.

use std::cell::RefCell;
use std::rc::Rc;

use crate::model::{ModelHandle, same_model};

/// Model scope threaded through a tree of binding points.
#[derive(Clone, Default)]
pub struct FormContext {
    base: Option<ModelHandle>,
    scopes: Rc<RefCell<Vec<ModelHandle>>>,
}

impl std::fmt::Debug for FormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContext")
            .field("has_model", &self.current().is_some())
            .field("depth", &self.depth())
            .finish()
    }
}

impl FormContext {
    /// Context rooted at `model`.
    #[must_use]
    pub fn new(model: ModelHandle) -> Self {
        Self {
            base: Some(model),
            scopes: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Context with no model; binding points inside it render nothing
    /// unless they name a model explicitly.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The innermost model, honoring scoped overrides.
    #[must_use]
    pub fn current(&self) -> Option<ModelHandle> {
        self.scopes
            .borrow()
            .last()
            .cloned()
            .or_else(|| self.base.clone())
    }

    /// Resolve the model for a binding point: an explicit model wins over
    /// the context's current one.
    #[must_use]
    pub fn resolve(&self, explicit: Option<&ModelHandle>) -> Option<ModelHandle> {
        explicit.cloned().or_else(|| self.current())
    }

    /// Push a nested model scope. Dropping the guard pops it.
    #[must_use = "dropping this guard leaves the nested scope immediately"]
    pub fn enter(&self, model: ModelHandle) -> FormScope {
        self.scopes.borrow_mut().push(Rc::clone(&model));
        FormScope {
            stack: Rc::clone(&self.scopes),
            model,
        }
    }

    /// Number of nested scopes currently pushed.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.borrow().len()
    }
}

/// RAII guard for a nested model scope.
#[must_use = "dropping this guard leaves the nested scope immediately"]
pub struct FormScope {
    stack: Rc<RefCell<Vec<ModelHandle>>>,
    model: ModelHandle,
}

impl FormScope {
    #[must_use]
    pub fn model(&self) -> &ModelHandle {
        &self.model
    }
}

impl Drop for FormScope {
    fn drop(&mut self) {
        let popped = self.stack.borrow_mut().pop();
        if let Some(popped) = popped {
            debug_assert!(same_model(&popped, &self.model), "form scopes must nest LIFO");
        }
    }
}
