use std::cell::RefCell;

use wasm_bindgen::prelude::*;


pub type JsResult<T> = Result<T, JsValue>;

// The client is single-threaded, so wrapping all mutable singletons in `thread_local!` seems ok.
thread_local! {
    static LAST_PANIC: RefCell<String> = RefCell::new(String::new());
}

// Copied from console_error_panic_hook
#[wasm_bindgen]
extern "C" {
    type Error;
    #[wasm_bindgen(constructor)]
    fn new() -> Error;
    #[wasm_bindgen(structural, method, getter)]
    fn stack(error: &Error) -> String;
}

#[wasm_bindgen]
pub fn set_panic_hook() {
    use std::panic;
    use std::sync::Once;
    static SET_HOOK: Once = Once::new();
    SET_HOOK.call_once(|| {
        panic::set_hook(Box::new(|panic_info| {
            console_error_panic_hook::hook(panic_info);
            // Kept so that the page can show it in place of a frozen slide.
            let backtrace = Error::new().stack();
            LAST_PANIC.with(|cell| *cell.borrow_mut() = format!("{panic_info}\n{backtrace}"));
        }));
    });
}

#[wasm_bindgen]
pub fn last_panic() -> String { LAST_PANIC.with(|cell| cell.borrow().clone()) }

// `inspectable` gives the class `toJSON`/`toString`, so page code can print it too.
#[wasm_bindgen(getter_with_clone, inspectable)]
pub struct RustError {
    pub message: String,
}

#[macro_export]
macro_rules! rust_error {
    ($($arg:tt)*) => {
        wasm_bindgen::JsValue::from(
            $crate::web_error_handling::RustError{ message: format!($($arg)*) }
        )
    };
}

// Best-effort description of an exception thrown by the browser or raised by `rust_error!`.
pub fn describe_js_error(error: &JsValue) -> String {
    if let Some(message) = error.as_string() {
        return message;
    }
    // Both `Error` and `RustError` keep the text in `message`; for the latter it is a getter on
    // the prototype, which `JSON.stringify` does not see.
    if error.is_object() {
        let message = js_sys::Reflect::get(error, &JsValue::from_str("message"));
        if let Some(message) = message.ok().and_then(|message| message.as_string()) {
            return message;
        }
    }
    match js_sys::JSON::stringify(error) {
        Ok(json) => String::from(json),
        Err(_) => format!("{error:?}"),
    }
}
