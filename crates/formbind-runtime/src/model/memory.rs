#![forbid(unsafe_code)]

//! In-process reference implementation of [`FieldModel`].
//!
//! Every field is an [`Observable<FieldRecord>`]. Watchers are kept per field
//! *name*, separately from the observables, so a watcher registered for a
//! name survives the field being removed and inserted again: removal and
//! insertion both notify the name's watchers, and a re-inserted field is
//! re-linked to them.
//!
//! # Invariants
//!
//! 1. A watcher is registered at most once per name.
//! 2. An unwatched watcher never fires again, including later in the same
//!    notification pass.
//! 3. No internal borrow is held while a watcher runs.
//!
//! # Write Coercion
//!
//! | Field kind | Accepts |
//! |------------|---------|
//! | `Null` | anything |
//! | `Int` | `Int`, integral `Float`, `Text` that parses as an integer |
//! | `Float` | `Float`, `Int`, `Text` that parses as a number |
//! | `Bool` | `Bool`, `Text` `"true"` / `"false"` |
//! | other | the same kind, or `Null` |

use std::cell::RefCell;
use std::collections::BTreeMap;

use tracing::trace;

use super::{FieldModel, FieldRecord, FieldValue, ModelError, ValueKind, Watcher};
use crate::reactive::{Observable, Subscription};

struct WatchEntry {
    watcher: Watcher,
    /// Link to the field's observable while the field exists.
    link: Option<Subscription>,
}

/// Observable field store backed by [`Observable`] cells.
#[derive(Default)]
pub struct MemoryModel {
    fields: RefCell<BTreeMap<String, Observable<FieldRecord>>>,
    watchers: RefCell<BTreeMap<String, Vec<WatchEntry>>>,
}

impl std::fmt::Debug for MemoryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryModel")
            .field("fields", &self.field_names())
            .field("watchers", &self.total_watchers())
            .finish()
    }
}

fn link(observable: &Observable<FieldRecord>, watcher: &Watcher) -> Subscription {
    let watcher = watcher.clone();
    observable.subscribe(move |_| watcher.notify())
}

impl MemoryModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert_field`](Self::insert_field).
    #[must_use]
    pub fn with_field(self, name: impl Into<String>, record: FieldRecord) -> Self {
        self.insert_field(name, record);
        self
    }

    /// Insert or replace a field, notifying its watchers.
    pub fn insert_field(&self, name: impl Into<String>, record: FieldRecord) {
        let name = name.into();
        let existing = self.observable(&name);
        if let Some(observable) = existing {
            observable.set(record);
            return;
        }

        let observable = Observable::new(record);
        self.fields
            .borrow_mut()
            .insert(name.clone(), observable.clone());
        if let Some(entries) = self.watchers.borrow_mut().get_mut(&name) {
            for entry in entries.iter_mut() {
                entry.link = Some(link(&observable, &entry.watcher));
            }
        }
        trace!(field = %name, "field inserted");
        self.notify_name(&name);
    }

    /// Remove a field, notifying its watchers. Watchers stay registered.
    pub fn remove_field(&self, name: &str) -> Option<FieldRecord> {
        let removed = self.fields.borrow_mut().remove(name)?;
        if let Some(entries) = self.watchers.borrow_mut().get_mut(name) {
            for entry in entries.iter_mut() {
                entry.link = None;
            }
        }
        trace!(field = %name, "field removed");
        self.notify_name(name);
        Some(removed.get())
    }

    /// Apply `f` to a field's record, notifying watchers if it changed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownField`] if the field does not exist.
    pub fn update_field(
        &self,
        name: &str,
        f: impl FnOnce(&mut FieldRecord),
    ) -> Result<(), ModelError> {
        let observable = self
            .observable(name)
            .ok_or_else(|| ModelError::UnknownField(name.to_owned()))?;
        observable.update(f);
        Ok(())
    }

    /// Replace a field's validation messages.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownField`] if the field does not exist.
    pub fn set_errors<I, S>(&self, name: &str, errors: I) -> Result<(), ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let errors: Vec<String> = errors.into_iter().map(Into::into).collect();
        self.update_field(name, |record| record.errors = errors)
    }

    /// # Errors
    ///
    /// Returns [`ModelError::UnknownField`] if the field does not exist.
    pub fn set_hidden(&self, name: &str, hidden: bool) -> Result<(), ModelError> {
        self.update_field(name, |record| record.hidden = hidden)
    }

    /// # Errors
    ///
    /// Returns [`ModelError::UnknownField`] if the field does not exist.
    pub fn set_disabled(&self, name: &str, disabled: bool) -> Result<(), ModelError> {
        self.update_field(name, |record| record.disabled = disabled)
    }

    /// Clear every field's `changed` flag.
    pub fn commit(&self) {
        let observables: Vec<_> = self.fields.borrow().values().cloned().collect();
        for observable in observables {
            observable.update(|record| record.changed = false);
        }
    }

    /// Number of watchers registered for `name`.
    #[must_use]
    pub fn watcher_count(&self, name: &str) -> usize {
        self.watchers.borrow().get(name).map_or(0, Vec::len)
    }

    /// Number of watchers registered across all names.
    #[must_use]
    pub fn total_watchers(&self) -> usize {
        self.watchers.borrow().values().map(Vec::len).sum()
    }

    fn observable(&self, name: &str) -> Option<Observable<FieldRecord>> {
        self.fields.borrow().get(name).cloned()
    }

    fn is_watching(&self, name: &str, watcher: &Watcher) -> bool {
        self.watchers
            .borrow()
            .get(name)
            .is_some_and(|entries| entries.iter().any(|e| e.watcher.same(watcher)))
    }

    /// Notify a name's watchers directly (used when the field itself appears
    /// or disappears, where no observable change fires).
    fn notify_name(&self, name: &str) {
        let watchers: Vec<Watcher> = self
            .watchers
            .borrow()
            .get(name)
            .map(|entries| entries.iter().map(|e| e.watcher.clone()).collect())
            .unwrap_or_default();
        for watcher in watchers {
            if self.is_watching(name, &watcher) {
                watcher.notify();
            }
        }
    }
}

fn coerce(name: &str, record: &FieldRecord, value: FieldValue) -> Result<FieldValue, ModelError> {
    if record.readonly {
        return Err(ModelError::ReadOnly(name.to_owned()));
    }
    let expected = record.value.kind();
    let found = value.kind();
    if expected == ValueKind::Null || found == ValueKind::Null || expected == found {
        return Ok(value);
    }
    let mismatch = || ModelError::TypeMismatch {
        field: name.to_owned(),
        expected,
        found,
    };
    match (expected, value) {
        (ValueKind::Int, FieldValue::Float(x)) if is_integral_i64(x) => {
            Ok(FieldValue::Int(x as i64))
        }
        (ValueKind::Int, FieldValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|_| mismatch()),
        (ValueKind::Float, FieldValue::Int(n)) => Ok(FieldValue::Float(n as f64)),
        (ValueKind::Float, FieldValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|_| mismatch()),
        (ValueKind::Bool, FieldValue::Text(s)) => match s.trim() {
            "true" => Ok(FieldValue::Bool(true)),
            "false" => Ok(FieldValue::Bool(false)),
            _ => Err(mismatch()),
        },
        _ => Err(mismatch()),
    }
}

/// `x` is a whole number that `as i64` converts without saturating.
fn is_integral_i64(x: f64) -> bool {
    // -2^63 is exact in f64; 2^63 is one past `i64::MAX`.
    x.fract() == 0.0 && x >= i64::MIN as f64 && x < i64::MAX as f64
}

impl FieldModel for MemoryModel {
    fn watch(&self, name: &str, watcher: &Watcher, immediate: bool) {
        if !self.is_watching(name, watcher) {
            let observable = self.observable(name);
            let entry = WatchEntry {
                watcher: watcher.clone(),
                link: observable.as_ref().map(|obs| link(obs, watcher)),
            };
            self.watchers
                .borrow_mut()
                .entry(name.to_owned())
                .or_default()
                .push(entry);
        }
        if immediate {
            watcher.notify();
        }
    }

    fn unwatch(&self, name: &str, watcher: &Watcher) {
        // Drop the removed entries (and their links) after releasing the borrow.
        let removed: Vec<WatchEntry> = {
            let mut watchers = self.watchers.borrow_mut();
            let Some(entries) = watchers.get_mut(name) else {
                return;
            };
            let (gone, kept) = std::mem::take(entries)
                .into_iter()
                .partition(|e| e.watcher.same(watcher));
            *entries = kept;
            if entries.is_empty() {
                watchers.remove(name);
            }
            gone
        };
        drop(removed);
    }

    fn field(&self, name: &str) -> Option<FieldRecord> {
        self.observable(name).map(|obs| obs.get())
    }

    fn field_names(&self) -> Vec<String> {
        self.fields.borrow().keys().cloned().collect()
    }

    fn set_value(&self, name: &str, value: FieldValue) -> Result<(), ModelError> {
        let observable = self
            .observable(name)
            .ok_or_else(|| ModelError::UnknownField(name.to_owned()))?;
        let next = observable.with(|record| coerce(name, record, value))?;
        observable.update(|record| {
            record.value = next;
            record.changed = true;
        });
        Ok(())
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name)
    }
}
