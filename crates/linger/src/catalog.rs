//! Type catalog: canonical type tag → human-readable description.

use std::collections::BTreeMap;

use linger_types::TypeTag;

use crate::TrackerError;

/// Resource kinds known out of the box.
pub const BUILTIN_TYPES: &[(&str, &str)] = &[
    ("TIMEOUT", "Timer scheduled to fire once or on an interval"),
    ("IMMEDIATE", "Callback deferred until the current turn of the event loop completes"),
    ("TICKOBJECT", "Callback queued to run before the next event loop turn"),
    ("MICROTASK", "Queued microtask"),
    ("PROMISE", "Pending promise or future awaiting settlement"),
    ("PROMISEWRAP", "Internal executor driving a promise"),
    ("TASK", "Task spawned onto the runtime scheduler"),
    ("SCRIPT", "Script compiled and evaluated by the runtime"),
    ("PIPEWRAP", "Pipe or local socket handle"),
    ("PIPECONNECTWRAP", "Pending pipe connection request"),
    ("PIPESERVERWRAP", "Pipe server handle"),
    ("TCPWRAP", "TCP socket handle"),
    ("TCPSERVERWRAP", "TCP server handle"),
    ("TCPCONNECTWRAP", "Pending TCP connection request"),
    ("UDPWRAP", "UDP socket handle"),
    ("UDPSENDWRAP", "Pending UDP send request"),
    ("GETADDRINFOREQWRAP", "DNS address lookup request"),
    ("GETNAMEINFOREQWRAP", "DNS reverse lookup request"),
    ("QUERYWRAP", "DNS resolver query"),
    ("FSREQCALLBACK", "File system request"),
    ("FSEVENTWRAP", "File system change watcher"),
    ("STATWATCHER", "File stat polling watcher"),
    ("SIGNALWRAP", "Signal handler"),
    ("PROCESSWRAP", "Child process handle"),
    ("HTTPCLIENTREQUEST", "Outgoing HTTP request"),
    ("HTTPINCOMINGMESSAGE", "Incoming HTTP message"),
    ("HTTPPARSER", "HTTP parser"),
    ("HTTP2SESSION", "HTTP/2 session"),
    ("HTTP2STREAM", "HTTP/2 stream"),
    ("HTTP2PING", "HTTP/2 ping awaiting acknowledgement"),
    ("TLSWRAP", "TLS socket"),
    ("ZLIB", "Compression or decompression stream"),
    ("TTYWRAP", "Terminal handle"),
    ("WRITEWRAP", "Pending stream write request"),
    ("SHUTDOWNWRAP", "Pending stream shutdown request"),
];

/// Case-insensitive mapping from type tag to description.
///
/// Entries are only ever added or overwritten, never removed.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    entries: BTreeMap<TypeTag, String>,
}

impl TypeCatalog {
    /// A catalog seeded with [`BUILTIN_TYPES`].
    pub fn new() -> Self {
        let mut catalog = Self::empty();
        for (kind, description) in BUILTIN_TYPES {
            catalog.register(kind, *description);
        }
        catalog
    }

    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn describe(&self, kind: &str) -> Result<&str, TrackerError> {
        let kind = TypeTag::new(kind);
        self.entries
            .get(kind.as_str())
            .map(String::as_str)
            .ok_or(TrackerError::UnknownType { kind })
    }

    /// Adds `kind`, or overwrites its description if already present.
    pub fn register(&mut self, kind: &str, description: impl Into<String>) {
        self.entries.insert(TypeTag::new(kind), description.into());
    }

    /// Normalizes `kind` and checks that it is known.
    pub fn resolve(&self, kind: &str) -> Result<TypeTag, TrackerError> {
        let kind = TypeTag::new(kind);
        if self.entries.contains_key(kind.as_str()) {
            Ok(kind)
        } else {
            Err(TrackerError::UnknownType { kind })
        }
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(TypeTag::new(kind).as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeTag, &str)> {
        self.entries
            .iter()
            .map(|(kind, description)| (kind, description.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
