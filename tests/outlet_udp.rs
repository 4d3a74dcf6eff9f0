//! Outlet control against a loopback UDP agent.
//!
//! A minimal agent answers one datagram per test, so these tests cover host
//! resolution, the UDP transport and the blocking entry point end to end.
//!
//! Run with: `cargo test --test outlet_udp`

use bytes::Bytes;
use cyberpower_pdu::{
    BindingValue, ErrorStatus, Message, OutletId, PduClient, PduKind, SnmpError,
    outlet_command_oid,
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

// ============================================================================
// Loopback agent
// ============================================================================

/// How the agent answers the request it receives.
#[derive(Clone, Copy)]
enum Reply {
    Accept,
    Reject(ErrorStatus, i32),
    Silent,
}

/// Echo the request as a Response, the way CyberPower firmware does.
fn respond(request: &Message, reply: Reply) -> Option<Bytes> {
    let (status, index) = match reply {
        Reply::Accept => (ErrorStatus::NoError, 0),
        Reply::Reject(status, index) => (status, index),
        Reply::Silent => return None,
    };
    let response = Message {
        kind: PduKind::Response,
        error_status: status.code(),
        error_index: index,
        ..request.clone()
    };
    Some(response.encode())
}

fn decode_request(datagram: &[u8], peer: SocketAddr) -> Message {
    Message::decode(Bytes::copy_from_slice(datagram), peer).unwrap()
}

/// Spawn an agent that handles one request. Returns its `host:port` and a
/// receiver for the decoded request.
async fn spawn_agent(reply: Reply) -> (String, oneshot::Receiver<Message>) {
    let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let addr = socket.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let mut buf = vec![0u8; 65535];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let request = decode_request(&buf[..len], peer);
        if let Some(response) = respond(&request, reply) {
            socket.send_to(&response, peer).await.unwrap();
        }
        let _ = tx.send(request);
    });

    (addr.to_string(), rx)
}

fn outlet(n: u32) -> OutletId {
    OutletId::new(n).unwrap()
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_set_outlet_power_over_udp() {
    let (host, request) = spawn_agent(Reply::Accept).await;

    PduClient::new(host)
        .set_outlet_power(outlet(3), true)
        .await
        .unwrap();

    let request = request.await.unwrap();
    assert_eq!(request.community.as_ref(), b"private");
    assert_eq!(request.kind, PduKind::SetRequest);
    assert_eq!(request.bindings.len(), 1);
    assert_eq!(request.bindings[0].oid, outlet_command_oid(outlet(3)));
    assert_eq!(request.bindings[0].value, BindingValue::Integer(1));
}

#[tokio::test]
async fn test_status_error_over_udp() {
    let (host, _request) = spawn_agent(Reply::Reject(ErrorStatus::NoSuchName, 1)).await;

    let err = PduClient::new(host)
        .set_outlet_power(outlet(12), false)
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "noSuchName at 1.3.6.1.4.1.3808.1.1.3.3.3.1.1.4.12"
    );
}

#[tokio::test]
async fn test_silent_agent_times_out() {
    let (host, request) = spawn_agent(Reply::Silent).await;

    let err = PduClient::new(host)
        .timeout(Duration::from_millis(200))
        .set_outlet_power(outlet(1), true)
        .await
        .unwrap_err();

    assert!(matches!(err, SnmpError::Indication(ref m) if m.contains("timed out")));
    // The agent still saw exactly one request
    request.await.unwrap();
}

#[tokio::test]
async fn test_unresolvable_host_is_indication() {
    let err = PduClient::new("10.0.0.5:notaport")
        .set_outlet_power(outlet(1), true)
        .await
        .unwrap_err();

    assert!(matches!(err, SnmpError::Indication(ref m) if m.contains("could not resolve")));
}

#[test]
fn test_blocking_set_outlet_power() {
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    let host = socket.local_addr().unwrap().to_string();

    let agent = std::thread::spawn(move || {
        let mut buf = [0u8; 1500];
        let (len, peer) = socket.recv_from(&mut buf).unwrap();
        let request = decode_request(&buf[..len], peer);
        let response = respond(&request, Reply::Accept).unwrap();
        socket.send_to(&response, peer).unwrap();
        request
    });

    PduClient::new(host)
        .set_outlet_power_blocking(outlet(5), false)
        .unwrap();

    let request = agent.join().unwrap();
    assert_eq!(request.bindings[0].oid, outlet_command_oid(outlet(5)));
    assert_eq!(request.bindings[0].value, BindingValue::Integer(2));
}
