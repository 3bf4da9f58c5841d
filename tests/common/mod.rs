//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::net::UdpSocket;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use logfan::Capabilities;
use logfan::Handler;
use logfan::Registry;

/// Registry whose environment is the given key/value pairs.
pub fn registry_with(pairs: &[(&str, &str)]) -> Registry {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Registry::with_env(move |key| map.get(key).cloned())
}

/// Handler recording every message it receives, cloneable so tests keep
/// a view after attaching it.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct Capture {
    records: Arc<Mutex<Vec<(&'static str, String)>>>,
}

impl Capture {
    #[allow(dead_code)]
    pub fn records(&self) -> Vec<(&'static str, String)> {
        self.records.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    pub fn messages(&self) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(_, msg)| msg.clone())
            .collect()
    }

    fn push(&self, tag: &'static str, msg: &str) {
        self.records.lock().unwrap().push((tag, msg.to_string()));
    }
}

impl Handler for Capture {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }

    fn info(&self, msg: &str) {
        self.push("info", msg);
    }

    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }

    fn error(&self, msg: &str) {
        self.push("error", msg);
    }

    fn fatal(&self, msg: &str) {
        self.push("fatal", msg);
    }
}

/// Bind a UDP receiver on an ephemeral port, returning the socket and
/// its `host:port` address.
#[allow(dead_code)]
pub fn udp_receiver() -> (UdpSocket, String) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let addr = socket.local_addr().unwrap().to_string();
    (socket, addr)
}

/// Receive one datagram as a string.
#[allow(dead_code)]
pub fn recv_datagram(socket: &UdpSocket) -> String {
    let mut buf = [0u8; 2048];
    let len = socket.recv(&mut buf).unwrap();
    String::from_utf8_lossy(&buf[..len]).to_string()
}
