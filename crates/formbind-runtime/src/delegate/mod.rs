#![forbid(unsafe_code)]

//! Render delegate: the seam between a materialized view and presentation.
//!
//! Exactly one path is taken per render, in this precedence order:
//!
//! 1. a caller-supplied render function,
//! 2. a component mapping (when it resolves to a shape),
//! 3. static children,
//!
//! and nothing at all when none applies. A decoration step, if configured,
//! wraps whatever the chosen path produced.
//!
//! # Failure Modes
//!
//! | Input | Output |
//! |-------|--------|
//! | [`Materialized::Absent`] | `None` |
//! | Suppressed view | `None` |
//! | Component spec with no resolvable shape | falls through to children |

pub mod shape;

pub use shape::{ComponentProps, ComponentShape, ComponentSpec, INPUT_PROPS, TEXTAREA_PROPS};

use std::rc::Rc;

use crate::materialize::{FieldView, Materialized};

/// Render function: view to presentation.
pub type RenderFn<R> = Rc<dyn Fn(&FieldView) -> R>;
/// Builds a presentation from component props.
pub type MountFn<R> = Rc<dyn Fn(ComponentProps) -> R>;
/// Wraps a produced presentation (e.g. with a label and error text).
pub type DecorateFn<R> = Rc<dyn Fn(R, &FieldView) -> R>;

/// Which path a render took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPath {
    Render,
    Component,
    Children,
    Nothing,
}

/// Component spec plus the function that mounts its props.
pub struct ComponentMapping<R> {
    pub spec: ComponentSpec,
    mount: MountFn<R>,
}

impl<R> Clone for ComponentMapping<R> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            mount: Rc::clone(&self.mount),
        }
    }
}

/// Presentation configuration for one binding point.
pub struct RenderDelegate<R> {
    render: Option<RenderFn<R>>,
    component: Option<ComponentMapping<R>>,
    children: Option<R>,
    decorate: Option<DecorateFn<R>>,
}

impl<R> Default for RenderDelegate<R> {
    fn default() -> Self {
        Self {
            render: None,
            component: None,
            children: None,
            decorate: None,
        }
    }
}

impl<R: Clone> Clone for RenderDelegate<R> {
    fn clone(&self) -> Self {
        Self {
            render: self.render.clone(),
            component: self.component.clone(),
            children: self.children.clone(),
            decorate: self.decorate.clone(),
        }
    }
}

impl<R> std::fmt::Debug for RenderDelegate<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDelegate")
            .field("render", &self.render.is_some())
            .field("component", &self.component.as_ref().map(|c| &c.spec))
            .field("children", &self.children.is_some())
            .field("decorate", &self.decorate.is_some())
            .finish()
    }
}

impl<R: Clone> RenderDelegate<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn render(mut self, f: impl Fn(&FieldView) -> R + 'static) -> Self {
        self.render = Some(Rc::new(f));
        self
    }

    #[must_use]
    pub fn component(
        mut self,
        spec: ComponentSpec,
        mount: impl Fn(ComponentProps) -> R + 'static,
    ) -> Self {
        self.component = Some(ComponentMapping {
            spec,
            mount: Rc::new(mount),
        });
        self
    }

    #[must_use]
    pub fn children(mut self, children: R) -> Self {
        self.children = Some(children);
        self
    }

    #[must_use]
    pub fn decorate(mut self, f: impl Fn(R, &FieldView) -> R + 'static) -> Self {
        self.decorate = Some(Rc::new(f));
        self
    }

    /// The path a render of `view` would take.
    #[must_use]
    pub fn path_for(&self, view: &FieldView) -> RenderPath {
        if view.is_suppressed() {
            return RenderPath::Nothing;
        }
        if self.render.is_some() {
            return RenderPath::Render;
        }
        if let Some(mapping) = &self.component {
            if mapping.spec.resolve(view).is_some() {
                return RenderPath::Component;
            }
        }
        if self.children.is_some() {
            return RenderPath::Children;
        }
        RenderPath::Nothing
    }

    /// Produce the presentation for a materialization, or `None`.
    #[must_use]
    pub fn deliver(&self, materialized: &Materialized) -> Option<R> {
        let view = materialized.view()?;
        let produced = match self.path_for(view) {
            RenderPath::Nothing => return None,
            RenderPath::Render => self.render.as_ref().map(|f| f(view)),
            RenderPath::Component => self.component.as_ref().and_then(|mapping| {
                let shape = mapping.spec.resolve(view)?;
                Some((mapping.mount)(shape.props(view, &mapping.spec.base)))
            }),
            RenderPath::Children => self.children.clone(),
        }?;
        Some(match &self.decorate {
            Some(decorate) => decorate(produced, view),
            None => produced,
        })
    }
}
