use facet::Facet;
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    ZeroId(&'static str),
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroId(field) => write!(f, "{field} must be non-zero"),
        }
    }
}

impl Error for InvariantError {}

/// Runtime-assigned identifier of an async operation.
///
/// Unique among live operations at any instant. Ids are allocated from a
/// process-local counter, so reuse only happens after wrap-around, but
/// consumers must not assume an id is never seen twice.
#[derive(Facet, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[facet(transparent)]
pub struct AsyncId(u64);

impl AsyncId {
    /// The execution context that exists before any async operation runs.
    ///
    /// Top-level resources report this as their trigger id.
    pub const ROOT: AsyncId = AsyncId(1);

    pub fn new(value: u64) -> Result<Self, InvariantError> {
        if value == 0 {
            return Err(InvariantError::ZeroId("async_id"));
        }
        Ok(Self(value))
    }

    /// Allocates the next process-local id. Never returns [`AsyncId::ROOT`].
    pub fn next_process_local() -> Self {
        static NEXT_COUNTER: AtomicU64 = AtomicU64::new(2);
        loop {
            let value = NEXT_COUNTER.fetch_add(1, Ordering::Relaxed);
            // 0 and 1 only come back after wrap-around.
            if value > Self::ROOT.0 {
                return Self(value);
            }
        }
    }

    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for AsyncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
