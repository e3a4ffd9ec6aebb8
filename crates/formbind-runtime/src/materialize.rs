#![forbid(unsafe_code)]

//! View materialization: model state to a render-ready [`FieldView`].
//!
//! Materialization is pull-based and runs once per render pass. It reads a
//! snapshot of every watched field and merges them into one view.
//!
//! # Merge Order
//!
//! Auxiliary fields are folded in resolver order and the first field to
//! provide an attribute keeps it. The primary field's own attributes are
//! written last and always win, so `view.attrs()["value"]` is the primary
//! field's value even when an auxiliary field also has one.
//!
//! The merged map is for render functions that look across fields. Control
//! mapping goes through [`FieldView::attr`] and [`FieldView::own_attrs`],
//! which see only caller params and the primary field's attributes, so a
//! sibling's `type` or `min` hint never lands on the primary's control.
//!
//! # Failure Modes
//!
//! | Condition | Result |
//! |-----------|--------|
//! | Primary field absent | [`Materialized::Absent`] |
//! | Primary field hidden, no keep-alive | view built, marked suppressed |
//! | Auxiliary field absent | skipped |

use std::collections::BTreeMap;

use crate::model::{Attributes, FieldRecord, FieldValue, ModelHandle};
use crate::mutation::{OnChange, make_on_change};
use crate::resolver::FieldSet;

/// Options that shape a materialized view.
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    /// Render the view even when the primary field is hidden.
    pub keep_alive: bool,
    /// Caller attributes that take precedence when read via [`FieldView::attr`].
    pub params: Attributes,
}

/// Merged, render-ready snapshot of a binding point's watched fields.
#[derive(Debug, Clone)]
pub struct FieldView {
    name: String,
    record: FieldRecord,
    fields: BTreeMap<String, FieldRecord>,
    attrs: Attributes,
    own: Attributes,
    params: Attributes,
    on_change: OnChange,
    suppressed: bool,
}

impl FieldView {
    /// Primary field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The primary field's own record.
    #[must_use]
    pub fn record(&self) -> &FieldRecord {
        &self.record
    }

    #[must_use]
    pub fn value(&self) -> &FieldValue {
        &self.record.value
    }

    /// Record of any watched field present at materialization time.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldRecord> {
        self.fields.get(name)
    }

    /// Every watched field present at materialization time.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, FieldRecord> {
        &self.fields
    }

    /// Merged attributes of every watched field (primary wins).
    #[must_use]
    pub fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    /// The primary field's attributes alone.
    #[must_use]
    pub fn own_attrs(&self) -> &Attributes {
        &self.own
    }

    /// Caller-supplied params.
    #[must_use]
    pub fn params(&self) -> &Attributes {
        &self.params
    }

    /// Look up a primary attribute, preferring caller params.
    ///
    /// Auxiliary fields are not consulted; read them through
    /// [`FieldView::field`] or [`FieldView::attrs`].
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&FieldValue> {
        self.params.get(key).or_else(|| self.own.get(key))
    }

    /// Normalized change handler bound to the primary field.
    #[must_use]
    pub fn on_change(&self) -> &OnChange {
        &self.on_change
    }

    /// Whether the binding point should render nothing for this view.
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }
}

/// Result of one materialization.
#[derive(Debug, Clone)]
pub enum Materialized {
    /// The primary field (or the model) is absent; render nothing.
    Absent,
    View(FieldView),
}

impl Materialized {
    #[must_use]
    pub fn view(&self) -> Option<&FieldView> {
        match self {
            Self::Absent => None,
            Self::View(view) => Some(view),
        }
    }

    #[must_use]
    pub fn into_view(self) -> Option<FieldView> {
        match self {
            Self::Absent => None,
            Self::View(view) => Some(view),
        }
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Read every name in `names` from `model` and merge them into a view.
#[must_use]
pub fn materialize(
    model: &ModelHandle,
    names: &FieldSet,
    options: &MaterializeOptions,
) -> Materialized {
    let Some(record) = model.field(names.primary()) else {
        return Materialized::Absent;
    };

    let mut fields = BTreeMap::new();
    let mut attrs = Attributes::new();
    for name in names.auxiliary() {
        let Some(aux) = model.field(name) else {
            continue;
        };
        for (key, value) in aux.attributes() {
            attrs.entry(key).or_insert(value);
        }
        fields.insert(name.to_owned(), aux);
    }
    let own = record.attributes();
    attrs.extend(own.iter().map(|(k, v)| (k.clone(), v.clone())));
    fields.insert(names.primary().to_owned(), record.clone());

    let suppressed = record.hidden && !options.keep_alive;
    Materialized::View(FieldView {
        name: names.primary().to_owned(),
        on_change: make_on_change(model, names.primary()),
        record,
        fields,
        attrs,
        own,
        params: options.params.clone(),
        suppressed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldModel, MemoryModel};
    use proptest::prelude::*;
    use std::rc::Rc;

    fn student() -> (Rc<MemoryModel>, ModelHandle) {
        let model = Rc::new(
            MemoryModel::new()
                .with_field("std_name", FieldRecord::new("").label("Name").required(true))
                .with_field("std_age", FieldRecord::new(0).label("Age").hint("min", 0)),
        );
        let handle: ModelHandle = model.clone();
        (model, handle)
    }

    #[test]
    fn absent_primary_yields_sentinel() {
        let (_, handle) = student();
        let set = FieldSet::single("nope");
        let out = materialize(&handle, &set, &MaterializeOptions::default());
        assert!(out.is_absent());
        assert!(out.view().is_none());
    }

    #[test]
    fn primary_attributes_win() {
        let (_, handle) = student();
        let set = FieldSet::resolve("std_name", ["std_age"]);
        let view = materialize(&handle, &set, &MaterializeOptions::default())
            .into_view()
            .unwrap();
        assert_eq!(view.attrs()["value"], FieldValue::from(""));
        assert_eq!(view.attrs()["label"], FieldValue::from("Name"));
        assert_eq!(view.attrs()["required"], FieldValue::Bool(true));
        // Auxiliary-only attributes reach the merged map, not the primary lookup.
        assert_eq!(view.attrs()["min"], FieldValue::Int(0));
        assert!(view.attr("min").is_none());
        assert!(!view.own_attrs().contains_key("min"));
        assert_eq!(view.field("std_age").unwrap().value, FieldValue::Int(0));
        assert_eq!(view.fields().len(), 2);
    }

    #[test]
    fn earlier_auxiliary_wins_over_later() {
        let model: ModelHandle = Rc::new(
            MemoryModel::new()
                .with_field("p", FieldRecord::new(1))
                .with_field("a", FieldRecord::new(2).hint("tone", "first"))
                .with_field("b", FieldRecord::new(3).hint("tone", "second")),
        );
        let set = FieldSet::resolve("p", ["b", "a"]);
        let view = materialize(&model, &set, &MaterializeOptions::default())
            .into_view()
            .unwrap();
        assert_eq!(view.attrs()["tone"], FieldValue::from("first"));
        assert_eq!(view.attrs()["value"], FieldValue::Int(1));
    }

    #[test]
    fn hidden_primary_is_suppressed_unless_kept_alive() {
        let (model, handle) = student();
        model.set_hidden("std_name", true).unwrap();
        let set = FieldSet::single("std_name");

        let view = materialize(&handle, &set, &MaterializeOptions::default())
            .into_view()
            .unwrap();
        assert!(view.is_suppressed());

        let options = MaterializeOptions {
            keep_alive: true,
            ..MaterializeOptions::default()
        };
        let view = materialize(&handle, &set, &options).into_view().unwrap();
        assert!(!view.is_suppressed());
        assert!(view.record().hidden);
    }

    #[test]
    fn params_take_precedence_in_attr_lookup() {
        let (_, handle) = student();
        let mut params = Attributes::new();
        params.insert("type".into(), FieldValue::from("number"));
        params.insert("label".into(), FieldValue::from("Years"));
        let options = MaterializeOptions {
            params,
            ..MaterializeOptions::default()
        };
        let view = materialize(&handle, &FieldSet::single("std_age"), &options)
            .into_view()
            .unwrap();
        assert_eq!(view.attr("type"), Some(&FieldValue::from("number")));
        assert_eq!(view.attr("label"), Some(&FieldValue::from("Years")));
        assert_eq!(view.attrs()["label"], FieldValue::from("Age"));
    }

    #[test]
    fn view_on_change_writes_primary() {
        let (model, handle) = student();
        let set = FieldSet::resolve("std_name", ["std_age"]);
        let view = materialize(&handle, &set, &MaterializeOptions::default())
            .into_view()
            .unwrap();
        view.on_change().call("Bob").unwrap();
        assert_eq!(model.field("std_name").unwrap().value, FieldValue::from("Bob"));
        assert_eq!(model.field("std_age").unwrap().value, FieldValue::Int(0));
    }

    proptest! {
        #[test]
        fn primary_record_always_wins(
            primary_value in any::<i64>(),
            aux_values in proptest::collection::vec(any::<i64>(), 0..5),
            primary_hidden in any::<bool>(),
        ) {
            let model = MemoryModel::new().with_field(
                "m",
                FieldRecord::new(primary_value).hidden(primary_hidden).label("primary"),
            );
            let mut aux_names = Vec::new();
            for (i, v) in aux_values.iter().enumerate() {
                // Names sort both before and after the primary.
                let name = if i % 2 == 0 { format!("a{i}") } else { format!("z{i}") };
                model.insert_field(
                    name.clone(),
                    FieldRecord::new(*v).hidden(!primary_hidden).label("aux").hint("value", 0),
                );
                aux_names.push(name);
            }
            let handle: ModelHandle = Rc::new(model);
            let set = FieldSet::resolve("m", aux_names);
            let view = materialize(&handle, &set, &MaterializeOptions::default())
                .into_view()
                .unwrap();
            prop_assert_eq!(&view.attrs()["value"], &FieldValue::Int(primary_value));
            prop_assert_eq!(&view.attrs()["hidden"], &FieldValue::Bool(primary_hidden));
            prop_assert_eq!(&view.attrs()["label"], &FieldValue::from("primary"));
            prop_assert_eq!(view.is_suppressed(), primary_hidden);
        }
    }
}
