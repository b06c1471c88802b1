//! Scripted transport for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{FetchError, HttpRequest, HttpResponse, Transport};

enum Scripted {
    Ready(Result<HttpResponse, FetchError>),
    Gated(oneshot::Receiver<Result<HttpResponse, FetchError>>),
}

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Scripted::Ready(Ok(HttpResponse::new(status, body))));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.push(Scripted::Ready(Err(FetchError::Transport(message.to_string()))));
        self
    }

    /// Queue a response that is only delivered once the returned sender fires.
    pub fn gated(&self) -> oneshot::Sender<Result<HttpResponse, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn push(&self, item: Scripted) {
        self.script.lock().unwrap().push_back(item);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Ready(result)) => result,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(FetchError::Transport("gate dropped".to_string()))),
            None => Err(FetchError::Transport("no scripted response".to_string())),
        }
    }
}
