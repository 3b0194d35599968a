use std::time::Duration;

use async_trait::async_trait;

use crate::error::PollError;
use crate::protocol::FormRequest;


// Delivers a url-encoded form to the quiz server and returns the reply body.
//
// Implementations: `fetch` in the browser, `reqwest` in the console client and a scripted fake in
// tests. Everything runs on a single-threaded executor, hence `?Send`.
#[async_trait(?Send)]
pub trait Transport {
    async fn post_form(&self, path: &str, body: String) -> Result<String, PollError>;
}

async fn post_with_timeout<T, R>(
    transport: &T, request: &R, timeout: Duration,
) -> Result<String, PollError>
where
    T: Transport + ?Sized,
    R: FormRequest,
{
    async_std::future::timeout(timeout, transport.post_form(R::PATH, request.encode()))
        .await
        .map_err(|_| PollError::Timeout(timeout))?
}

// Sends the request and decodes the reply.
pub async fn send<T, R>(
    transport: &T, request: &R, timeout: Duration,
) -> Result<R::Response, PollError>
where
    T: Transport + ?Sized,
    R: FormRequest,
{
    let body = post_with_timeout(transport, request, timeout).await?;
    serde_json::from_str(&body).map_err(PollError::Decode)
}

// Sends the request and ignores the reply body.
pub async fn fire<T, R>(transport: &T, request: &R, timeout: Duration) -> Result<(), PollError>
where
    T: Transport + ?Sized,
    R: FormRequest,
{
    post_with_timeout(transport, request, timeout).await?;
    Ok(())
}
