#![cfg(target_arch = "wasm32")]

use quiz_display_wasm::WebRepeater;
use quiz_display_wasm::rust_error;
use quiz_display_wasm::web_error_handling::describe_js_error;
use quiz_display_wasm::web_logger::init_logging;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;


wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn string_errors_are_shown_as_is() {
    assert_eq!(describe_js_error(&JsValue::from_str("HTTP 500")), "HTTP 500");
}

#[wasm_bindgen_test]
fn object_errors_are_shown_as_json() {
    let error = js_sys::JSON::parse(r#"{"code": 3}"#).unwrap();
    assert_eq!(describe_js_error(&error), r#"{"code":3}"#);
}

#[wasm_bindgen_test]
fn rust_errors_keep_their_message() {
    let error = rust_error!("Cannot apply server update: {}", "bad tick");
    assert_eq!(describe_js_error(&error), "Cannot apply server update: bad tick");
    let json = String::from(js_sys::JSON::stringify(&error).unwrap());
    assert_eq!(json, r#"{"message":"Cannot apply server update: bad tick"}"#);
}

#[wasm_bindgen_test]
fn browser_errors_are_shown_by_message() {
    let error = js_sys::Error::new("Failed to fetch");
    assert_eq!(describe_js_error(&error.into()), "Failed to fetch");
}

#[wasm_bindgen_test]
fn logging_level_can_be_changed() {
    init_logging("debug");
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
    init_logging("nonsense");
    assert_eq!(log::max_level(), log::LevelFilter::Info);
}

const TEAMS_PAGE: &str = r#"
    <ul id="teams"><li><input class="name"><span class="error"></span></li></ul>
    <input type="hidden" id="teamItems">
    <button id="teamSubmit">Save</button>
"#;

#[wasm_bindgen_test]
fn repeater_page_round_trip() {
    let document = web_sys::window().unwrap().document().unwrap();
    let page = document.create_element("div").unwrap();
    page.set_inner_html(TEAMS_PAGE);
    document.body().unwrap().append_child(&page).unwrap();
    let items = document.get_element_by_id("teamItems").unwrap();
    let items: web_sys::HtmlInputElement = items.dyn_into().unwrap();
    // The server sent the same index twice.
    items.set_value(r#"[{"Index": 3, "Name": "Owls"}, {"Index": 3, "Name": "Bats"}]"#);
    let set_fields =
        js_sys::Function::new_with_args("li, item", "li.querySelector('.name').value = item.Name;");
    let get_fields =
        js_sys::Function::new_with_args("li", "return {Name: li.querySelector('.name').value};");
    let repeater =
        WebRepeater::new("teams", "teamItems", "teamSubmit", set_fields, get_fields).unwrap();
    assert_eq!(repeater.len(), 2);

    let delete_links = page.get_elements_by_class_name("btnDeleteChild");
    assert_eq!(delete_links.length(), 2);
    let delete_bats: web_sys::HtmlElement = delete_links.item(1).unwrap().dyn_into().unwrap();
    delete_bats.click();
    assert_eq!(repeater.len(), 1);

    assert_eq!(repeater.add().unwrap(), 4);
    let names = page.query_selector_all(".name").unwrap();
    // Prototype, "Owls", then the new sub-form.
    let new_name: web_sys::HtmlInputElement = names.item(2).unwrap().dyn_into().unwrap();
    new_name.set_value("Cats");
    repeater.save().unwrap();
    let saved: serde_json::Value = serde_json::from_str(&items.value()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!([
            {"Index": 3, "Name": "Owls"},
            {"Index": 4, "Name": "Cats"},
        ])
    );
    page.remove();
}
