// Setup pages with a repeatable sub-form.
//
// Page layout:
//   <ul id="formChildren"><li>prototype sub-form</li></ul>
//   <input type="hidden" id="items" value="[...]">
//   <button id="submit">
// The prototype stays hidden and untouched; visible sub-forms are clones of it. Page-specific
// fields are handled by two functions the page provides:
//   setItemFields(li, item) and getItemFields(li) -> item.

use std::cell::RefCell;
use std::rc::Rc;

use quiz_display::repeater::{ItemForm, RepeatedItem, Repeater, RepeaterError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::rust_error;
use crate::web_document::web_document;
use crate::web_element_ext::WebElementExt;
use crate::web_error_handling::JsResult;


const INDEX_ATTRIBUTE: &str = "data-index";

pub struct JsItemForm {
    element: web_sys::Element,
    set_fields: js_sys::Function,
    get_fields: js_sys::Function,
}

impl ItemForm for JsItemForm {
    type Error = JsValue;

    fn stamp(&self, index: i64, error: &str) -> JsResult<()> {
        self.element.set_attribute(INDEX_ATTRIBUTE, &index.to_string())?;
        if let Some(error_element) = self.element.query_selector(".error")? {
            error_element.set_text_content(Some(error));
        }
        Ok(())
    }

    fn populate(&self, item: &RepeatedItem) -> JsResult<()> {
        let json = serde_json::to_string(item).map_err(|err| rust_error!("{err}"))?;
        let item = js_sys::JSON::parse(&json)?;
        self.set_fields.call2(&JsValue::NULL, &self.element, &item)?;
        Ok(())
    }

    fn extract(&self) -> JsResult<RepeatedItem> {
        let item = self.get_fields.call1(&JsValue::NULL, &self.element)?;
        let json = String::from(js_sys::JSON::stringify(&item)?);
        serde_json::from_str(&json).map_err(|err| rust_error!("Bad item from page: {err}"))
    }
}

struct RepeaterPage {
    repeater: RefCell<Repeater<JsItemForm>>,
    holder: web_sys::Element,
    prototype: web_sys::Element,
    add_item: web_sys::Element,
    items_field: web_sys::HtmlInputElement,
    set_fields: js_sys::Function,
    get_fields: js_sys::Function,
}

#[wasm_bindgen]
pub struct WebRepeater {
    page: Rc<RepeaterPage>,
}

#[wasm_bindgen]
impl WebRepeater {
    // Builds sub-forms for the items in the hidden field and wires up the buttons.
    #[wasm_bindgen(constructor)]
    pub fn new(
        holder_id: &str, items_field_id: &str, submit_id: &str, set_fields: js_sys::Function,
        get_fields: js_sys::Function,
    ) -> JsResult<WebRepeater> {
        let document = web_document()?;
        let holder = document.get_existing_element_by_id(holder_id)?;
        let prototype = holder
            .query_selector("li")?
            .ok_or_else(|| rust_error!("\"{}\" has no prototype item", holder_id))?;
        let add_item = holder.append_new_element("li")?;
        let add_link = add_item
            .append_new_element("a")?
            .with_attribute("href", "#")?
            .with_classes(["btnAddChild", "button"])?
            .with_text_content("Add");
        let page = Rc::new(RepeaterPage {
            repeater: RefCell::new(Repeater::new()),
            holder,
            prototype,
            add_item,
            items_field: document.get_existing_input_by_id(items_field_id)?,
            set_fields,
            get_fields,
        });

        let items_json = page.items_field.value();
        let items_json = if items_json.trim().is_empty() { "[]".to_owned() } else { items_json };
        let loaded = page.repeater.borrow_mut().load(&items_json, || page.new_form());
        match loaded {
            Ok(()) => log::info!("Loaded {} items", page.repeater.borrow().len()),
            // Nothing was created yet, the page starts with an empty collection.
            Err(RepeaterError::Json(err)) => log::error!("Ignoring bad items JSON: {err}"),
            Err(RepeaterError::Form(err)) => return Err(err),
        }

        add_link.add_event_listener_and_forget("click", {
            let page = Rc::clone(&page);
            move |event: web_sys::MouseEvent| {
                event.prevent_default();
                page.add_form()?;
                Ok(())
            }
        })?;
        document.get_existing_element_by_id(submit_id)?.add_event_listener_and_forget(
            "click",
            {
                let page = Rc::clone(&page);
                move |_: web_sys::MouseEvent| page.save()
            },
        )?;
        Ok(WebRepeater { page })
    }

    pub fn add(&self) -> JsResult<i64> { self.page.add_form() }

    // Writes the items to the hidden field. Also happens on submit click.
    pub fn save(&self) -> JsResult<()> { self.page.save() }

    pub fn len(&self) -> usize { self.page.repeater.borrow().len() }
    pub fn is_empty(&self) -> bool { self.page.repeater.borrow().is_empty() }
}

impl RepeaterPage {
    // Clones the prototype into a new visible sub-form with a delete button.
    fn new_form(self: &Rc<Self>) -> JsResult<JsItemForm> {
        let element: web_sys::Element = self.prototype.clone_node_with_deep(true)?.dyn_into()?;
        element.remove_attribute("id")?;
        if let Some(html) = element.dyn_ref::<web_sys::HtmlElement>() {
            html.style().set_property("display", "block")?;
        }
        self.holder.insert_before(&element, Some(&self.add_item))?;
        let delete_link = web_document()?
            .create_element("a")?
            .with_attribute("href", "#")?
            .with_classes(["btnDeleteChild", "button"])?
            .with_text_content("X");
        match element.query_selector("input")? {
            Some(input) => input.after_with_node_1(&delete_link)?,
            None => element.append_child(&delete_link).map(drop)?,
        }
        delete_link.add_event_listener_and_forget("click", {
            let page = Rc::clone(self);
            let element = element.clone();
            move |event: web_sys::MouseEvent| {
                event.prevent_default();
                page.delete_form(&element)
            }
        })?;
        Ok(JsItemForm {
            element,
            set_fields: self.set_fields.clone(),
            get_fields: self.get_fields.clone(),
        })
    }

    fn add_form(self: &Rc<Self>) -> JsResult<i64> {
        let form = self.new_form()?;
        let index = self.repeater.borrow_mut().add(form)?;
        log::debug!("Added item {index}");
        Ok(index)
    }

    fn delete_form(&self, element: &web_sys::Element) -> JsResult<()> {
        let deleted = self.repeater.borrow_mut().delete_where(|form| form.element == *element);
        element.remove();
        let (index, _) = deleted.ok_or_else(|| rust_error!("Deleted sub-form was not tracked"))?;
        log::debug!("Deleted item {index}");
        Ok(())
    }

    fn save(&self) -> JsResult<()> {
        let json = self.repeater.borrow().submit().map_err(describe_repeater_error)?;
        self.items_field.set_value(&json);
        Ok(())
    }
}

fn describe_repeater_error(err: RepeaterError<JsValue>) -> JsValue {
    match err {
        RepeaterError::Json(err) => rust_error!("Bad items JSON: {err}"),
        RepeaterError::Form(err) => err,
    }
}
