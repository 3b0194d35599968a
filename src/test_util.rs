// Scripted transport for tests of the async drivers.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::PollError;
use crate::transport::Transport;


pub enum FakeReply {
    Body(String),
    Error(String),
    // Never answers; exercises request timeouts.
    Hang,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SentRequest {
    pub path: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakeTransport {
    replies: RefCell<VecDeque<FakeReply>>,
    sent: RefCell<Vec<SentRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self { Self::default() }

    pub fn reply_json(&self, body: &str) { self.push(FakeReply::Body(body.to_owned())); }
    pub fn reply_error(&self, message: &str) { self.push(FakeReply::Error(message.to_owned())); }
    pub fn hang(&self) { self.push(FakeReply::Hang); }

    pub fn push(&self, reply: FakeReply) { self.replies.borrow_mut().push_back(reply); }

    pub fn sent(&self) -> Vec<SentRequest> { self.sent.borrow().clone() }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn post_form(&self, path: &str, body: String) -> Result<String, PollError> {
        self.sent.borrow_mut().push(SentRequest { path: path.to_owned(), body });
        let reply = self.replies.borrow_mut().pop_front();
        match reply {
            Some(FakeReply::Body(body)) => Ok(body),
            Some(FakeReply::Error(message)) => Err(PollError::Transport(message)),
            Some(FakeReply::Hang) => async_std::future::pending().await,
            None => Err(PollError::Transport("no scripted reply".to_owned())),
        }
    }
}
