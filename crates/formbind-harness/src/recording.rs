#![forbid(unsafe_code)]

//! A [`FieldModel`] wrapper that records watch/unwatch traffic.
//!
//! Used to check subscription discipline from the outside: how many
//! registrations a name holds right now, the most it ever held at once,
//! and the exact order of watch and unwatch calls.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use formbind_runtime::model::{
    FieldModel, FieldRecord, FieldValue, MemoryModel, ModelError, Watcher,
};

/// One call made against the model's watch surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchOp {
    Watch { name: String, immediate: bool },
    Unwatch { name: String },
}

impl WatchOp {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Watch { name, .. } | Self::Unwatch { name } => name,
        }
    }

    #[must_use]
    pub fn is_watch(&self) -> bool {
        matches!(self, Self::Watch { .. })
    }
}

/// [`MemoryModel`] plus a log of the watch surface.
#[derive(Debug, Default)]
pub struct RecordingModel {
    inner: MemoryModel,
    ops: RefCell<Vec<WatchOp>>,
    live: RefCell<BTreeMap<String, usize>>,
    peak: RefCell<BTreeMap<String, usize>>,
    writes: Cell<u64>,
}

impl RecordingModel {
    #[must_use]
    pub fn new(inner: MemoryModel) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// The wrapped model, for mutations the trait does not cover.
    #[must_use]
    pub fn inner(&self) -> &MemoryModel {
        &self.inner
    }

    #[must_use]
    pub fn ops(&self) -> Vec<WatchOp> {
        self.ops.borrow().clone()
    }

    pub fn clear_ops(&self) {
        self.ops.borrow_mut().clear();
        let live = self.live.borrow().clone();
        *self.peak.borrow_mut() = live;
    }

    /// Registrations currently held for `name`.
    #[must_use]
    pub fn live(&self, name: &str) -> usize {
        self.live.borrow().get(name).copied().unwrap_or(0)
    }

    /// Registrations currently held across every name.
    #[must_use]
    pub fn total_live(&self) -> usize {
        self.live.borrow().values().sum()
    }

    /// Most registrations `name` ever held at once since the last
    /// [`clear_ops`](Self::clear_ops).
    #[must_use]
    pub fn peak(&self, name: &str) -> usize {
        self.peak.borrow().get(name).copied().unwrap_or(0)
    }

    /// Successful `set_value` calls.
    #[must_use]
    pub fn writes(&self) -> u64 {
        self.writes.get()
    }
}

impl FieldModel for RecordingModel {
    fn watch(&self, name: &str, watcher: &Watcher, immediate: bool) {
        self.ops.borrow_mut().push(WatchOp::Watch {
            name: name.to_owned(),
            immediate,
        });
        let now = {
            let mut live = self.live.borrow_mut();
            let count = live.entry(name.to_owned()).or_insert(0);
            *count += 1;
            *count
        };
        let mut peak = self.peak.borrow_mut();
        let max = peak.entry(name.to_owned()).or_insert(0);
        *max = (*max).max(now);
        drop(peak);
        self.inner.watch(name, watcher, immediate);
    }

    fn unwatch(&self, name: &str, watcher: &Watcher) {
        self.ops.borrow_mut().push(WatchOp::Unwatch {
            name: name.to_owned(),
        });
        if let Some(count) = self.live.borrow_mut().get_mut(name) {
            *count = count.saturating_sub(1);
        }
        self.inner.unwatch(name, watcher);
    }

    fn field(&self, name: &str) -> Option<FieldRecord> {
        self.inner.field(name)
    }

    fn field_names(&self) -> Vec<String> {
        self.inner.field_names()
    }

    fn set_value(&self, name: &str, value: FieldValue) -> Result<(), ModelError> {
        self.inner.set_value(name, value)?;
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
