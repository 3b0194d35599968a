use wasm_bindgen::JsCast;

use crate::rust_error;
use crate::web_error_handling::JsResult;
use crate::web_iterators::{HtmlCollectionIterator, NodeListIterator};


pub struct WebDocument(web_sys::Document);

impl WebDocument {
    pub fn get_existing_element_by_id(&self, element_id: &str) -> JsResult<web_sys::Element> {
        let element = self
            .0
            .get_element_by_id(element_id)
            .ok_or_else(|| rust_error!("Cannot find element \"{}\"", element_id))?;
        if !element.is_object() {
            return Err(rust_error!("Element \"{}\" is not an object", element_id));
        }
        Ok(element)
    }

    pub fn get_existing_input_by_id(
        &self, element_id: &str,
    ) -> JsResult<web_sys::HtmlInputElement> {
        self.get_existing_element_by_id(element_id)?
            .dyn_into()
            .map_err(|_| rust_error!("Element \"{}\" is not an input", element_id))
    }

    pub fn get_elements_by_class_name(&self, class_name: &str) -> HtmlCollectionIterator {
        self.0.get_elements_by_class_name(class_name).into()
    }

    pub fn create_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        self.0.create_element(local_name)
    }

    pub fn event_target(&self) -> &web_sys::EventTarget { &self.0 }
}

pub fn web_document() -> JsResult<WebDocument> {
    let window = web_window()?;
    let document = window.document().ok_or_else(|| rust_error!("Cannot find document"))?;
    Ok(WebDocument(document))
}

pub fn web_window() -> JsResult<web_sys::Window> {
    web_sys::window().ok_or_else(|| rust_error!("Cannot find window"))
}

// Leaves the page. An empty target reloads the current one.
pub fn navigate(href: &str) -> JsResult<()> {
    let location = web_window()?.location();
    if href.is_empty() { location.reload() } else { location.set_href(href) }
}

// Elements of a subtree matching a selector, e.g. the media of one slide.
pub fn query_selector_all(
    root: &web_sys::Element, selectors: &str,
) -> JsResult<NodeListIterator> {
    root.query_selector_all(selectors).map(|list| list.into())
}
