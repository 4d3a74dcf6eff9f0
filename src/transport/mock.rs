//! Scripted transport for tests.

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bytes::Bytes;

use super::Transport;
use crate::error::{Error, Result};
use crate::message::{Binding, Message, PduKind, SNMP_V1};
use crate::oid::Oid;

enum Scripted {
    Response { data: Bytes, patch_id: bool },
    Timeout,
    IoError(String),
}

/// A datagram the client sent, decoded when possible.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub data: Bytes,
    pub message: Option<Message>,
}

#[derive(Default)]
struct Script {
    replies: VecDeque<Scripted>,
    requests: Vec<RecordedRequest>,
    last_request_id: Option<i32>,
}

/// Replays queued replies, one per `recv`, and records every `send`.
///
/// Once the queue is empty every `recv` times out.
#[derive(Clone)]
pub struct MockTransport {
    peer: SocketAddr,
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    /// A mock for an agent at `peer` with nothing queued.
    pub fn new(peer: SocketAddr) -> Self {
        Self {
            peer,
            script: Arc::default(),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a reply whose request id is rewritten to match the request it
    /// answers. Bytes that do not decode are delivered unchanged.
    pub fn queue_response(&self, data: impl Into<Bytes>) {
        self.script().replies.push_back(Scripted::Response {
            data: data.into(),
            patch_id: true,
        });
    }

    /// Queue a reply delivered exactly as given.
    pub fn queue_raw_response(&self, data: impl Into<Bytes>) {
        self.script().replies.push_back(Scripted::Response {
            data: data.into(),
            patch_id: false,
        });
    }

    /// Make the next `recv` time out.
    pub fn queue_timeout(&self) {
        self.script().replies.push_back(Scripted::Timeout);
    }

    /// Make the next `recv` fail with an I/O error carrying `message`.
    pub fn queue_io_error(&self, message: impl Into<String>) {
        self.script()
            .replies
            .push_back(Scripted::IoError(message.into()));
    }

    /// Everything sent so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.script().requests.clone()
    }

    /// Replies not yet consumed.
    pub fn queued_response_count(&self) -> usize {
        self.script().replies.len()
    }
}

impl Transport for MockTransport {
    async fn send(&self, datagram: &[u8]) -> Result<()> {
        let data = Bytes::copy_from_slice(datagram);
        let message = Message::parse(data.clone()).ok();
        let mut script = self.script();
        script.last_request_id = message.as_ref().map(|m| m.request_id);
        script.requests.push(RecordedRequest { data, message });
        Ok(())
    }

    async fn recv(&self, timeout: Duration) -> Result<Bytes> {
        let mut script = self.script();
        match script.replies.pop_front() {
            Some(Scripted::Response { data, patch_id }) => {
                let id = script.last_request_id.filter(|_| patch_id);
                Ok(match (id, Message::parse(data.clone())) {
                    (Some(id), Ok(mut reply)) => {
                        reply.request_id = id;
                        reply.encode()
                    }
                    _ => data,
                })
            }
            Some(Scripted::IoError(message)) => Err(Error::Io {
                target: self.peer,
                source: io::Error::other(message),
            }
            .boxed()),
            Some(Scripted::Timeout) | None => Err(Error::Timeout {
                target: self.peer,
                elapsed: timeout,
            }
            .boxed()),
        }
    }

    fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

/// Builds SNMPv1 Response datagrams.
///
/// ```
/// use cyberpower_pdu::{oid, transport::ResponseBuilder};
///
/// let reply = ResponseBuilder::new(7)
///     .binding(oid!(1, 3, 6, 1, 4, 1, 3808, 1, 1, 3, 3, 3, 1, 1, 4, 1), 1)
///     .build(b"private");
/// assert_eq!(reply[0], 0x30);
/// ```
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    request_id: i32,
    error_status: i32,
    error_index: i32,
    bindings: Vec<Binding>,
}

impl ResponseBuilder {
    /// A successful reply with no bindings.
    pub fn new(request_id: i32) -> Self {
        Self {
            request_id,
            error_status: 0,
            error_index: 0,
            bindings: Vec::new(),
        }
    }

    /// Append an INTEGER binding.
    pub fn binding(mut self, oid: Oid, value: i32) -> Self {
        self.bindings.push(Binding::integer(oid, value));
        self
    }

    /// Set the error-status code.
    pub fn error_status(mut self, status: i32) -> Self {
        self.error_status = status;
        self
    }

    /// Set the 1-based error index.
    pub fn error_index(mut self, index: i32) -> Self {
        self.error_index = index;
        self
    }

    /// Encode with `community`.
    pub fn build(self, community: &[u8]) -> Bytes {
        Message {
            version: SNMP_V1,
            community: Bytes::copy_from_slice(community),
            kind: PduKind::Response,
            request_id: self.request_id,
            error_status: self.error_status,
            error_index: self.error_index,
            bindings: self.bindings,
        }
        .encode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn peer() -> SocketAddr {
        "192.0.2.1:161".parse().unwrap()
    }

    #[tokio::test]
    async fn replies_take_the_request_id() {
        let mock = MockTransport::new(peer());
        mock.queue_response(ResponseBuilder::new(0).binding(oid!(1, 3), 1).build(b"private"));

        let request = Message::set_request(&b"private"[..], 4242, oid!(1, 3), 1);
        mock.send(&request.encode()).await.unwrap();
        let reply = Message::parse(mock.recv(Duration::from_secs(1)).await.unwrap()).unwrap();

        assert_eq!(reply.request_id, 4242);
        assert_eq!(mock.requests()[0].message.as_ref(), Some(&request));
    }

    #[tokio::test]
    async fn raw_replies_are_untouched() {
        let mock = MockTransport::new(peer());
        let reply = ResponseBuilder::new(1).build(b"private");
        mock.queue_raw_response(reply.clone());

        let request = Message::set_request(&b"private"[..], 99, oid!(1, 3), 1);
        mock.send(&request.encode()).await.unwrap();
        assert_eq!(mock.recv(Duration::from_secs(1)).await.unwrap(), reply);
    }

    #[tokio::test]
    async fn empty_queue_times_out() {
        let mock = MockTransport::new(peer());
        mock.queue_io_error("refused");
        assert_eq!(mock.queued_response_count(), 1);

        let err = mock.recv(Duration::from_millis(5)).await.unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
        let err = mock.recv(Duration::from_millis(5)).await.unwrap_err();
        assert!(matches!(*err, Error::Timeout { elapsed, .. } if elapsed == Duration::from_millis(5)));
    }
}
