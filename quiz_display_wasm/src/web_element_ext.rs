use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;

use crate::web_document::web_document;
use crate::web_error_handling::{JsResult, describe_js_error};


pub trait WebElementExt {
    fn with_text_content(self, text: &str) -> web_sys::Element;
    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element>;
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    // Replaces the whole class list.
    fn set_class_name_if_changed(&self, class_name: &str);

    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()>;

    fn remove_all_children(&self);
    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element>;
}

impl WebElementExt for web_sys::Element {
    fn with_text_content(self, text: &str) -> web_sys::Element {
        self.set_text_content(Some(text));
        self
    }

    fn with_attribute(self, name: &str, value: &str) -> JsResult<web_sys::Element> {
        self.set_attribute(name, value)?;
        Ok(self)
    }

    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    fn set_class_name_if_changed(&self, class_name: &str) {
        if self.class_name() != class_name {
            self.set_class_name(class_name);
        }
    }

    // Listeners live as long as the page, so the closure is leaked. Errors returned by the
    // listener have nowhere to go but the log.
    fn add_event_listener_and_forget<E: FromWasmAbi + 'static>(
        &self, event_type: &str, mut listener: impl FnMut(E) -> JsResult<()> + 'static,
    ) -> JsResult<()> {
        let event_name = event_type.to_owned();
        let closure = Closure::new(move |event: E| {
            if let Err(err) = listener(event) {
                log::error!("Error in \"{}\" handler: {}", event_name, describe_js_error(&err));
            }
        });
        self.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        let node = web_document()?.create_element(local_name)?;
        self.append_child(&node)?;
        Ok(node)
    }
}
