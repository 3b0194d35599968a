use async_trait::async_trait;
use quiz_display::error::PollError;
use quiz_display::transport::Transport;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::web_document::web_window;
use crate::web_error_handling::describe_js_error;


const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

// Same-origin `fetch`, so that the session cookie goes along with the CSRF token.
pub struct WebTransport;

fn js_error(err: JsValue) -> PollError { PollError::Transport(describe_js_error(&err)) }

#[async_trait(?Send)]
impl Transport for WebTransport {
    async fn post_form(&self, path: &str, body: String) -> Result<String, PollError> {
        let headers = web_sys::Headers::new().map_err(js_error)?;
        headers.set("Content-Type", FORM_CONTENT_TYPE).map_err(js_error)?;
        headers.set("X-Requested-With", "XMLHttpRequest").map_err(js_error)?;
        let init = web_sys::RequestInit::new();
        init.set_method("POST");
        init.set_headers(&headers);
        init.set_body(&JsValue::from_str(&body));
        init.set_credentials(web_sys::RequestCredentials::SameOrigin);
        let request = web_sys::Request::new_with_str_and_init(path, &init).map_err(js_error)?;

        let window = web_window().map_err(js_error)?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        if !response.ok() {
            return Err(PollError::Transport(format!(
                "{} {} {}",
                path,
                response.status(),
                response.status_text()
            )));
        }
        let text = JsFuture::from(response.text().map_err(js_error)?).await.map_err(js_error)?;
        text.as_string()
            .ok_or_else(|| PollError::Transport(format!("{path}: response body is not text")))
    }
}
