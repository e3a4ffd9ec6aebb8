#![forbid(unsafe_code)]

//! Render request coalescing.
//!
//! Change callbacks never render synchronously; they call
//! [`RenderScheduler::request`]. Every request arriving before the next
//! render pass ([`RenderScheduler::take`]) folds into the same pending
//! pass, so N field changes in one update cycle cost one materialization.
//!
//! # Invariants
//!
//! 1. Between two `take()` calls at most one pass is scheduled.
//! 2. The wake hook runs exactly once per scheduled pass.
//! 3. `take()` returns `true` at most once per scheduled pass.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::trace;

type WakeHook = Rc<dyn Fn()>;

#[derive(Default)]
struct State {
    pending: Cell<bool>,
    requests: Cell<u64>,
    scheduled: Cell<u64>,
    wake: RefCell<Option<WakeHook>>,
}

/// Shared render-pass flag. Clones share state.
#[derive(Clone, Default)]
pub struct RenderScheduler {
    state: Rc<State>,
}

impl std::fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("pending", &self.state.pending.get())
            .field("requests", &self.state.requests.get())
            .field("scheduled", &self.state.scheduled.get())
            .finish()
    }
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a hook invoked once per scheduled pass, e.g. to wake the
    /// host's frame loop.
    pub fn on_schedule(&self, hook: impl Fn() + 'static) {
        *self.state.wake.borrow_mut() = Some(Rc::new(hook));
    }

    /// Request a render pass. Returns `true` if this request scheduled a
    /// new pass, `false` if it folded into one already pending.
    pub fn request(&self) -> bool {
        let state = &self.state;
        state.requests.set(state.requests.get() + 1);
        if state.pending.replace(true) {
            trace!(requests = state.requests.get(), "render request coalesced");
            return false;
        }
        state.scheduled.set(state.scheduled.get() + 1);
        let hook = state.wake.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
        true
    }

    /// Consume the pending flag. Returns whether a pass was pending.
    pub fn take(&self) -> bool {
        self.state.pending.replace(false)
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.pending.get()
    }

    /// Raw notifications received.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.state.requests.get()
    }

    /// Passes scheduled (after coalescing).
    #[must_use]
    pub fn scheduled(&self) -> u64 {
        self.state.scheduled.get()
    }
}
