use std::cell::RefCell;
use std::collections::VecDeque;

use crate::request::SignedRequest;
use crate::transport::{HttpResponse, Transport};

/// Replays queued responses and records every request it is handed.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    replies: RefCell<VecDeque<HttpResponse>>,
    calls: RefCell<Vec<SignedRequest>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    pub(crate) fn reply(self, status: u16, body: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(HttpResponse::new(status, body));
        self
    }

    pub(crate) fn calls(&self) -> Vec<SignedRequest> {
        self.calls.borrow().clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &SignedRequest) -> reqwest::Result<HttpResponse> {
        self.calls.borrow_mut().push(request.clone());
        let reply = self.replies.borrow_mut().pop_front();
        Ok(reply.unwrap_or_else(|| panic!("unexpected request to {}", request.url)))
    }
}
