mod common;

use std::rc::Rc;

use common::*;
use indoc::indoc;
use pretty_assertions::assert_eq;
use quiz_display::repeater::{Repeater, RepeaterError};
use serde_json::{Value, json};


const TWO_TEAMS: &str = indoc! {r#"
    [
        {"Index": 0, "Error": "", "Name": "Owls"},
        {"Index": 1, "Error": "Name already used", "Name": "Owls"}
    ]
"#};

fn load(json: &str) -> (Repeater<FakeForm>, Vec<FakeForm>) {
    let mut repeater = Repeater::new();
    let mut created = vec![];
    repeater
        .load(json, || {
            let form = FakeForm::default();
            created.push(form.clone());
            Ok(form)
        })
        .unwrap();
    (repeater, created)
}

fn submitted(repeater: &Repeater<FakeForm>) -> Value {
    serde_json::from_str(&repeater.submit().unwrap()).unwrap()
}

#[test]
fn load_stamps_forms() {
    let (repeater, forms) = load(TWO_TEAMS);
    assert_eq!(repeater.len(), 2);
    assert_eq!(forms[0].stamped_index(), Some(0));
    assert_eq!(forms[1].stamped_index(), Some(1));
    assert_eq!(forms[1].state.borrow().error, "Name already used");
    assert_eq!(forms[1].state.borrow().fields["Name"], "Owls");
}

#[test]
fn indices_are_never_reused() {
    let (mut repeater, _) = load(TWO_TEAMS);
    assert_eq!(repeater.add(FakeForm::with_name("Bats")).unwrap(), 2);
    assert!(repeater.delete(2).is_some());
    assert_eq!(repeater.add(FakeForm::with_name("Cats")).unwrap(), 3);
    assert_eq!(repeater.indices().collect::<Vec<_>>(), vec![0, 1, 3]);
}

#[test]
fn next_index_is_past_loaded_indices() {
    let (mut repeater, _) = load(r#"[{"Index": 0}, {"Index": 7}]"#);
    assert_eq!(repeater.next_index(), 8);
    assert_eq!(repeater.add(FakeForm::default()).unwrap(), 8);
}

#[test]
fn submit_reflects_current_forms() {
    let (mut repeater, forms) = load(TWO_TEAMS);
    forms[1].set_field("Name", "Larks");
    repeater.add(FakeForm::with_name("Bats")).unwrap();
    repeater.delete(0).unwrap();
    assert_eq!(
        submitted(&repeater),
        json!([
            {"Index": 1, "Name": "Larks"},
            {"Index": 2, "Name": "Bats"},
        ])
    );
}

#[test]
fn negative_indices_are_not_submitted() {
    let (repeater, _) = load(r#"[{"Index": -1, "Name": "template"}, {"Index": 0, "Name": "A"}]"#);
    assert_eq!(submitted(&repeater), json!([{"Index": 0, "Name": "A"}]));
}

#[test]
fn empty_collection() {
    let (mut repeater, _) = load("[]");
    assert!(repeater.is_empty());
    assert_eq!(repeater.submit().unwrap(), "[]");
    assert_eq!(repeater.add(FakeForm::default()).unwrap(), 0);
}

#[test]
fn delete_of_unknown_index() {
    let (mut repeater, _) = load(TWO_TEAMS);
    assert!(repeater.delete(42).is_none());
    assert_eq!(repeater.len(), 2);
}

#[test]
fn page_fields_are_submitted_with_widget_indices() {
    let mut repeater = Repeater::new();
    let mut created = vec![];
    repeater
        .load(TWO_TEAMS, || {
            let form = PageForm::default();
            created.push(form.clone());
            Ok(form)
        })
        .unwrap();
    *created[0].fields_json.borrow_mut() = r#"{"Name": "Larks"}"#.to_owned();
    repeater.add(PageForm::with_fields(r#"{"Name": "Bats"}"#)).unwrap();
    let submitted: Value = serde_json::from_str(&repeater.submit().unwrap()).unwrap();
    assert_eq!(
        submitted,
        json!([
            {"Index": 0, "Name": "Larks"},
            {"Index": 1, "Name": "Owls"},
            {"Index": 2, "Name": "Bats"},
        ])
    );
}

#[test]
fn duplicate_indices_delete_the_clicked_form() {
    let (mut repeater, forms) =
        load(r#"[{"Index": 3, "Name": "Owls"}, {"Index": 3, "Name": "Bats"}]"#);
    let (index, _) = repeater
        .delete_where(|form| Rc::ptr_eq(&form.state, &forms[1].state))
        .unwrap();
    assert_eq!(index, 3);
    assert_eq!(submitted(&repeater), json!([{"Index": 3, "Name": "Owls"}]));
}

#[test]
fn bad_json() {
    let mut repeater: Repeater<FakeForm> = Repeater::new();
    let err = repeater.load("{", || Ok(FakeForm::default())).unwrap_err();
    assert!(matches!(err, RepeaterError::Json(_)));
    assert!(repeater.is_empty());
}

#[test]
fn add_delete_sequences() {
    // Scripted sequence of operations; `true` adds, `false` deletes the oldest visible form.
    let script = [true, true, false, true, false, false, true, true, false, true];
    let (mut repeater, _) = load(TWO_TEAMS);
    let mut expected: Vec<i64> = vec![0, 1];
    let mut next = 2;
    for add in script {
        if add {
            assert_eq!(repeater.add(FakeForm::with_name("x")).unwrap(), next);
            expected.push(next);
            next += 1;
        } else {
            let oldest = expected.remove(0);
            assert!(repeater.delete(oldest).is_some());
        }
    }
    let indices: Vec<i64> = submitted(&repeater)
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["Index"].as_i64().unwrap())
        .collect();
    assert_eq!(indices, expected);
}
