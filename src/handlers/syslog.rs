//! Remote syslog handler.
//!
//! # Responsibilities
//! - Parse `host:port[/transport]` targets
//! - Dial the collector and keep one connection per handler instance
//! - Send each message as a priority-tagged line
//!
//! # Design Decisions
//! - The priority is derived from the logger threshold at the last
//!   `reinit`, not per message; changing the level tears the connection
//!   down and redials so the priority matches the new threshold
//! - Dialing is blocking with no timeout; a dial failure is a
//!   configuration error surfaced to the caller
//! - Send failures are swallowed: delivery is fire-and-forget with no
//!   retries

use std::io::Write;
use std::net::TcpStream;
use std::net::UdpSocket;
use std::sync::Mutex;

use crate::handlers::Capabilities;
use crate::handlers::Handler;
use crate::handlers::HandlerError;
use crate::level::Level;

/// Syslog facility `user` (1), shifted into the facility bits of the
/// priority value.
const FACILITY_USER: u8 = 1 << 3;

/// Tag used for the root namespace, which has no name of its own.
const DEFAULT_TAG: &str = "logfan";

/// Datagram or stream delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Udp,
    Tcp,
}

impl Transport {
    /// Parse a transport name, case-insensitively.
    pub fn from_name(input: &str) -> Option<Self> {
        if input.eq_ignore_ascii_case("udp") {
            Some(Self::Udp)
        } else if input.eq_ignore_ascii_case("tcp") {
            Some(Self::Tcp)
        } else {
            None
        }
    }
}

/// A parsed syslog destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyslogTarget {
    pub address: String,
    pub transport: Transport,
}

impl SyslogTarget {
    /// Parse `host:port[/transport]`. The transport defaults to UDP.
    pub fn parse(raw: &str) -> Result<Self, HandlerError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(HandlerError::MissingSyslogAddress);
        }

        let (address, transport) = match raw.split_once('/') {
            Some((address, transport_name)) => {
                let transport = Transport::from_name(transport_name).ok_or_else(|| {
                    HandlerError::InvalidTarget(
                        raw.to_string(),
                        format!("unknown transport '{transport_name}'"),
                    )
                })?;
                (address, transport)
            }
            None => (raw, Transport::Udp),
        };

        if address.is_empty() {
            return Err(HandlerError::InvalidTarget(
                raw.to_string(),
                "empty address".to_string(),
            ));
        }

        Ok(Self {
            address: address.to_string(),
            transport,
        })
    }
}

/// Syslog severity for a threshold. `None` floors at the error severity;
/// it is unreachable in practice because the logger gate suppresses all
/// output at that threshold.
fn severity_for(level: Level) -> u8 {
    match level {
        Level::Debug => 7,
        Level::Info => 6,
        Level::Warn => 4,
        Level::Error | Level::None => 3,
    }
}

fn priority_for(level: Level) -> u8 {
    FACILITY_USER | severity_for(level)
}

/// Which severities reach the remote sink at a given threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Routes {
    debug: bool,
    info: bool,
    warn: bool,
    error: bool,
    fatal: bool,
}

fn routes_for(level: Level) -> Routes {
    Routes {
        debug: level >= Level::Debug,
        info: level >= Level::Info,
        warn: level >= Level::Warn,
        error: level >= Level::Error,
        fatal: level >= Level::Error,
    }
}

enum Connection {
    Udp(UdpSocket),
    Tcp(TcpStream),
}

impl Connection {
    fn dial(target: &SyslogTarget) -> Result<Self, HandlerError> {
        let dial_error = |source: std::io::Error| HandlerError::Dial {
            target: target.address.clone(),
            source,
        };

        match target.transport {
            Transport::Udp => {
                let socket = UdpSocket::bind("0.0.0.0:0").map_err(dial_error)?;
                socket.connect(&target.address).map_err(dial_error)?;
                Ok(Self::Udp(socket))
            }
            Transport::Tcp => {
                let stream = TcpStream::connect(&target.address).map_err(dial_error)?;
                Ok(Self::Tcp(stream))
            }
        }
    }

    fn send(&mut self, line: &str) -> std::io::Result<()> {
        match self {
            Self::Udp(socket) => socket.send(line.as_bytes()).map(|_| ()),
            Self::Tcp(stream) => {
                stream.write_all(line.as_bytes())?;
                stream.write_all(b"\n")
            }
        }
    }
}

struct Active {
    conn: Connection,
    priority: u8,
    routes: Routes,
}

/// Handler forwarding messages to a remote syslog collector.
pub struct SyslogHandler {
    tag: String,
    target: SyslogTarget,
    state: Mutex<Option<Active>>,
}

impl SyslogHandler {
    /// Create a handler for the given namespace and destination. No
    /// connection is opened until the first `reinit` (triggered by
    /// attach).
    pub fn new(namespace: &str, target: SyslogTarget) -> Self {
        let tag = if namespace.is_empty() {
            DEFAULT_TAG.to_string()
        } else {
            namespace.to_string()
        };

        Self {
            tag,
            target,
            state: Mutex::new(None),
        }
    }

    fn send(&self, pick: impl Fn(&Routes) -> bool, msg: &str) {
        let mut state = self.state.lock().expect("syslog state poisoned");
        if let Some(active) = state.as_mut() {
            if pick(&active.routes) {
                let line = format!("<{}>{}: {}", active.priority, self.tag, msg);
                let _ = active.conn.send(&line);
            }
        }
    }
}

impl Handler for SyslogHandler {
    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    /// Close-then-redial: the old connection is dropped before the new
    /// dial so the priority embedded in the stream always matches the
    /// current threshold.
    fn reinit(&self, level: Level) -> Result<(), HandlerError> {
        let mut state = self.state.lock().expect("syslog state poisoned");
        *state = None;

        let conn = Connection::dial(&self.target)?;
        *state = Some(Active {
            conn,
            priority: priority_for(level),
            routes: routes_for(level),
        });

        Ok(())
    }

    fn debug(&self, msg: &str) {
        self.send(|r| r.debug, msg);
    }

    fn info(&self, msg: &str) {
        self.send(|r| r.info, msg);
    }

    fn warn(&self, msg: &str) {
        self.send(|r| r.warn, msg);
    }

    fn error(&self, msg: &str) {
        self.send(|r| r.error, msg);
    }

    fn fatal(&self, msg: &str) {
        self.send(|r| r.fatal, msg);
    }
}
