//! Hardened client tests over scripted transports.
//!
//! Test organization:
//! - end_to_end.rs: rate limit, cache, retry and metrics working together
//! - failures.rs: how each failure family surfaces to the caller
//! - health_report.rs: the serialized health report

mod health_report;

use bytes::Bytes;
use hardened_client::{HttpRequest, HttpResponse, TransportError};
use http::StatusCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::Service;

/// One scripted transport reply.
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Status(u16, &'static str),
    Fail(TransportError),
}

/// A transport that replays a script, then answers `200 {"price": 1.0}`.
#[derive(Clone)]
pub(crate) struct Script {
    replies: Arc<Mutex<Vec<Reply>>>,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Script {
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        let mut replies = replies;
        replies.reverse();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn statuses(statuses: &[u16]) -> Self {
        Self::new(
            statuses
                .iter()
                .map(|&s| Reply::Status(s, r#"{"price": 1.0}"#))
                .collect(),
        )
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn service(
        &self,
    ) -> impl Service<HttpRequest, Response = HttpResponse, Error = TransportError> + Clone + use<>
    {
        let script = self.clone();
        tower::service_fn(move |req: HttpRequest| {
            script.calls.fetch_add(1, Ordering::SeqCst);
            script.requests.lock().unwrap().push(req);
            let reply = script
                .replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Reply::Status(200, r#"{"price": 1.0}"#));
            async move {
                match reply {
                    Reply::Status(status, body) => Ok(HttpResponse::new(
                        StatusCode::from_u16(status).unwrap(),
                        Bytes::from_static(body.as_bytes()),
                    )),
                    Reply::Fail(err) => Err(err),
                }
            }
        })
    }
}
