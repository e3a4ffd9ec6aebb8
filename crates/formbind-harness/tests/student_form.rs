#![forbid(unsafe_code)]

//! Integration tests: the student form rendered through the widgets.

use std::rc::Rc;

use formbind_harness::{assert_markup, student_handle, student_schema};
use formbind_runtime::binding::BindingPoint;
use formbind_runtime::model::{FieldModel, FieldValue, ModelHandle};
use formbind_runtime::mutation::ChangeEvent;
use formbind_widgets::{Field, Form, FormField, FormItem, Node};

fn student_items(ctx: &formbind_runtime::context::FormContext) -> Vec<BindingPoint<Node>> {
    vec![
        FormItem::new(FormField::input("std_name")).bind(ctx),
        FormItem::new(FormField::input("std_age").param("type", "number"))
            .label("Age (years)")
            .bind(ctx),
        FormItem::new(FormField::input("std_no")).class("muted").bind(ctx),
    ]
}

fn render_all(points: &mut [BindingPoint<Node>]) -> Vec<Node> {
    points.iter_mut().filter_map(BindingPoint::render).collect()
}

// ============================================================================
// Initial render
// ============================================================================

#[test]
fn initial_student_form() {
    let (_model, handle) = student_handle();
    let node = Form::new(Some(handle)).render(|ctx| render_all(&mut student_items(ctx)));
    assert_markup!(
        node,
        concat!(
            "<form>",
            r#"<div><label><span>Name<sup>*</sup></span>"#,
            r#"<input required value="" @change/></label></div>"#,
            r#"<div><label><span>Age (years)</span>"#,
            r#"<input type="number" value="0" @change/></label></div>"#,
            r#"<div class="muted"><label><span>Student No.</span>"#,
            r#"<input value="" @change/></label></div>"#,
            "</form>"
        )
    );
}

#[test]
fn form_without_model_is_empty() {
    let node = Form::new(None).render(|ctx| render_all(&mut student_items(ctx)));
    assert_markup!(node, "∅");
}

#[test]
fn schema_built_model_renders_the_same() {
    let (_model, handle) = student_handle();
    let from_schema: ModelHandle = Rc::new(student_schema().unwrap().build());

    let direct = Form::new(Some(handle)).render(|ctx| render_all(&mut student_items(ctx)));
    let schema = Form::new(Some(from_schema)).render(|ctx| render_all(&mut student_items(ctx)));
    assert_eq!(
        direct.map(|n| n.to_markup()),
        schema.map(|n| n.to_markup())
    );
}

// ============================================================================
// Interaction
// ============================================================================

#[test]
fn typing_updates_only_the_touched_item() {
    let (model, handle) = student_handle();
    let form = Form::new(Some(handle));
    let ctx = form.context().unwrap();
    let mut items = student_items(&ctx);
    render_all(&mut items);

    let age = items[1].render().unwrap();
    let input = age.find("input").unwrap();
    input
        .on_change
        .as_ref()
        .unwrap()
        .call(ChangeEvent::change("21"))
        .unwrap();

    assert_eq!(model.field("std_age").unwrap().value, FieldValue::Int(21));
    let due: Vec<bool> = items.iter().map(BindingPoint::needs_render).collect();
    assert_eq!(due, [false, true, false]);

    let age = items[1].render_if_needed().unwrap().unwrap();
    assert_eq!(age.find("input").unwrap().get("value"), Some(&FieldValue::Int(21)));
}

#[test]
fn validation_message_appears_after_change() {
    let (model, handle) = student_handle();
    let ctx = Form::new(Some(handle)).context().unwrap();
    let mut name = FormItem::new(FormField::input("std_name")).bind(&ctx);

    model.set_errors("std_name", ["name is required"]).unwrap();
    let node = name.render().unwrap();
    assert!(node.find("i").is_none(), "untouched field shows no error");

    model.set_value("std_name", FieldValue::from("")).unwrap();
    let node = name.render_if_needed().unwrap().unwrap();
    assert_eq!(node.find("i").unwrap().children[0].text_content(), "name is required");

    model.commit();
    let node = name.render_if_needed().unwrap().unwrap();
    assert!(node.find("i").is_none(), "commit clears the changed flag");
}

#[test]
fn hidden_item_disappears_and_returns() {
    let (model, handle) = student_handle();
    let ctx = Form::new(Some(handle)).context().unwrap();
    let mut no = FormItem::new(FormField::input("std_no")).bind(&ctx);
    let mut kept = Field::new("std_no")
        .keep_alive(true)
        .render(|view| Node::text(format!("hidden={}", view.record().hidden)))
        .bind(&ctx);

    model.set_hidden("std_no", true).unwrap();
    assert!(no.render().is_none());
    assert_eq!(kept.render().unwrap().to_markup(), "hidden=true");

    model.set_hidden("std_no", false).unwrap();
    assert!(no.render_if_needed().unwrap().is_some());
}

#[test]
fn summary_field_tracks_every_student_field() {
    let (model, handle) = student_handle();
    let ctx = Form::new(Some(handle)).context().unwrap();
    let mut summary = Field::new("std_name")
        .watch(["std_age", "std_no"])
        .render(|view| {
            let part = |name: &str| {
                view.field(name)
                    .map(|r| r.value.to_string())
                    .unwrap_or_default()
            };
            Node::text(format!(
                "{} / {} / {}",
                part("std_name"),
                part("std_age"),
                part("std_no")
            ))
        })
        .bind(&ctx);
    assert_eq!(summary.live_subscriptions(), 3);
    assert_eq!(summary.render().unwrap().to_markup(), " / 0 / ");

    model.set_value("std_name", FieldValue::from("Alice")).unwrap();
    model.set_value("std_age", FieldValue::Int(20)).unwrap();
    model.set_value("std_no", FieldValue::from("S-1")).unwrap();
    assert_eq!(
        summary.render_if_needed().unwrap().unwrap().to_markup(),
        "Alice / 20 / S-1"
    );
    assert!(summary.render_if_needed().is_none());
}

#[test]
fn nested_form_binds_inner_model() {
    let (_outer, outer_handle) = student_handle();
    let (inner, inner_handle) = student_handle();
    inner.set_value("std_name", FieldValue::from("Inner")).unwrap();

    let ctx = Form::new(Some(outer_handle)).context().unwrap();
    let nested = Form::new(Some(inner_handle)).component(Some("fieldset"));
    let node = nested.render_nested(&ctx, |ctx| {
        let mut point = FormField::input("std_name").base("required", false).bind(ctx);
        point.render().into_iter().collect()
    });
    assert_markup!(node, r#"<fieldset><input value="Inner" @change/></fieldset>"#);
    assert_eq!(ctx.depth(), 0);
}
