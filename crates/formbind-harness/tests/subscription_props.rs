#![forbid(unsafe_code)]

//! Property tests: subscription counts, reactivation ordering and render
//! coalescing.

use std::cell::Cell;
use std::rc::Rc;

use formbind_harness::strategies::{edits, watch_list};
use formbind_harness::{RecordingModel, WatchOp, student_model};
use formbind_runtime::binding::{BindingConfig, BindingPoint};
use formbind_runtime::model::{FieldModel, FieldValue, ModelHandle};
use formbind_runtime::resolver::FieldSet;
use proptest::prelude::*;

fn recording() -> (Rc<RecordingModel>, ModelHandle) {
    let model = Rc::new(RecordingModel::new(student_model()));
    let handle: ModelHandle = model.clone();
    (model, handle)
}

fn point(handle: ModelHandle, auxiliary: &[String]) -> BindingPoint<String> {
    BindingPoint::new(
        BindingConfig::new("std_name")
            .watch(auxiliary.iter().cloned())
            .model(handle)
            .render(|view| view.value().to_string()),
    )
}

// ============================================================================
// Subscription counts
// ============================================================================

proptest! {
    #[test]
    fn live_subscriptions_match_resolved_set(auxiliary in watch_list()) {
        let (model, handle) = recording();
        let resolved = FieldSet::resolve("std_name", auxiliary.iter().cloned());
        let mut point = point(handle, &auxiliary);

        point.mount();
        prop_assert_eq!(point.live_subscriptions(), resolved.len());
        prop_assert_eq!(model.total_live(), resolved.len());
        for name in resolved.names() {
            prop_assert_eq!(model.live(name), 1);
        }

        point.unmount();
        prop_assert_eq!(point.live_subscriptions(), 0);
        prop_assert_eq!(model.total_live(), 0);
        prop_assert_eq!(model.inner().total_watchers(), 0);
    }

    #[test]
    fn reactivation_never_overlaps(before in watch_list(), after in watch_list()) {
        let (model, handle) = recording();
        let old = FieldSet::resolve("std_name", before.iter().cloned());
        let new = FieldSet::resolve("std_name", after.iter().cloned());
        let mut point = point(handle, &before);
        point.mount();
        model.clear_ops();

        point.set_fields("std_name", after.iter().cloned());
        let ops = model.ops();

        if old == new {
            prop_assert!(ops.is_empty(), "unchanged set must not resubscribe: {:?}", ops);
        } else {
            let unwatches = ops.iter().take_while(|op| !op.is_watch()).count();
            prop_assert_eq!(unwatches, old.len());
            prop_assert!(ops[unwatches..].iter().all(WatchOp::is_watch));
            prop_assert_eq!(ops.len() - unwatches, new.len());
            for name in old.names().iter().chain(new.names()) {
                prop_assert!(model.peak(name) <= 1, "{} overlapped", name);
            }
        }
        prop_assert_eq!(model.total_live(), new.len());
    }
}

// ============================================================================
// Coalescing
// ============================================================================

proptest! {
    #[test]
    fn bursts_schedule_at_most_one_pass(burst in edits(12)) {
        let (model, handle) = recording();
        let all = vec!["std_age".to_owned(), "std_no".to_owned()];
        let mut point = point(handle, &all);
        point.mount();
        point.render();
        let scheduled = point.scheduler().scheduled();
        let requests = point.scheduler().requests();

        for edit in &burst {
            edit.apply(model.inner()).unwrap();
        }

        let passes = point.scheduler().scheduled() - scheduled;
        let notifications = point.scheduler().requests() - requests;
        prop_assert!(passes <= 1);
        prop_assert_eq!(passes, u64::from(notifications > 0));
        prop_assert_eq!(point.needs_render(), notifications > 0);

        let renders = point.render_count();
        point.render_if_needed();
        point.render_if_needed();
        prop_assert_eq!(point.render_count() - renders, passes);
    }
}

#[test]
fn distinct_changes_coalesce_into_one_pass() {
    let (model, handle) = recording();
    let mut point = point(handle, &["std_age".to_owned(), "std_no".to_owned()]);
    point.mount();
    point.render();
    let scheduled = point.scheduler().scheduled();
    let requests = point.scheduler().requests();

    let inner = model.inner();
    inner.set_value("std_name", FieldValue::from("a")).unwrap();
    inner.set_value("std_name", FieldValue::from("ab")).unwrap();
    inner.set_value("std_age", FieldValue::Int(7)).unwrap();
    inner.set_value("std_no", FieldValue::from("S-9")).unwrap();
    inner.set_errors("std_name", ["short"]).unwrap();

    assert_eq!(point.scheduler().requests() - requests, 5);
    assert_eq!(point.scheduler().scheduled() - scheduled, 1);
    assert_eq!(point.render().as_deref(), Some("ab"));
    assert!(!point.needs_render());
}

#[test]
fn wake_hook_fires_once_per_batch() {
    let (model, handle) = recording();
    let mut point = point(handle, &[]);
    let wakes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&wakes);
    point.scheduler().on_schedule(move || counter.set(counter.get() + 1));

    point.mount();
    assert_eq!(wakes.get(), 1, "immediate first fire schedules the baseline pass");
    point.render();

    model.inner().set_errors("std_name", ["a"]).unwrap();
    model.inner().set_errors("std_name", ["b"]).unwrap();
    assert_eq!(wakes.get(), 2);
    point.render();

    model.inner().set_errors("std_name", ["c"]).unwrap();
    assert_eq!(wakes.get(), 3);
}
