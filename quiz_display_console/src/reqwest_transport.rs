use async_trait::async_trait;
use quiz_display::error::PollError;
use quiz_display::transport::Transport;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use url::Url;


const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    cookie: Option<String>,
}

impl ReqwestTransport {
    pub fn new(server_url: &str, cookie: Option<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(server_url)?;
        Ok(ReqwestTransport { client: reqwest::Client::new(), base_url, cookie })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, PollError> {
        self.base_url.join(path).map_err(|err| PollError::Transport(err.to_string()))
    }
}

fn transport_error(err: reqwest::Error) -> PollError { PollError::Transport(err.to_string()) }

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn post_form(&self, path: &str, body: String) -> Result<String, PollError> {
        let mut request = self
            .client
            .post(self.endpoint(path)?)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body);
        if let Some(cookie) = &self.cookie {
            request = request.header(COOKIE, cookie);
        }
        let response = request.send().await.map_err(transport_error)?;
        let response = response.error_for_status().map_err(transport_error)?;
        response.text().await.map_err(transport_error)
    }
}
