//! Bridges lifecycle events from the hook channel into the registry.

use parking_lot::Mutex;
use std::cell::Cell;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use linger_runtime::AsyncHooks;
use linger_trace_capture::{CaptureOptions, capture_current};
use linger_types::{AsyncId, OperationRecord, ResourceHandle, TypeTag};
use tracing::debug;

use crate::registry::Registry;

/// Which creations a tracking session records. Decided once per creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    Only(TypeTag),
}

impl Filter {
    pub fn admits(&self, kind: &TypeTag) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all types"),
            Self::Only(kind) => write!(f, "{kind}"),
        }
    }
}

thread_local! {
    static REPORTING: Cell<bool> = const { Cell::new(false) };
}

/// Guard returned by [`suppress_creations`].
pub(crate) struct ReportingScope {
    previous: bool,
    _not_send: PhantomData<*const ()>,
}

/// Ignores creation events raised on this thread until the guard drops.
///
/// Reports run under this so that whatever the act of reporting allocates
/// is not recorded. Settle and destroy events, from any thread, still apply.
pub(crate) fn suppress_creations() -> ReportingScope {
    ReportingScope {
        previous: REPORTING.with(|reporting| reporting.replace(true)),
        _not_send: PhantomData,
    }
}

impl Drop for ReportingScope {
    fn drop(&mut self) {
        REPORTING.with(|reporting| reporting.set(self.previous));
    }
}

fn creations_suppressed() -> bool {
    REPORTING.with(Cell::get)
}

/// Hook callbacks for one tracking session. A new instance is created every
/// time tracking is (re-)enabled, so its filter never changes.
///
/// Every write checks `session` against the registry under its lock. A
/// callback that was already running when the session ended therefore
/// leaves the registry alone.
pub(crate) struct TrackerHooks {
    filter: Filter,
    session: u64,
    registry: Arc<Mutex<Registry>>,
    capture: CaptureOptions,
}

impl TrackerHooks {
    pub(crate) fn new(
        filter: Filter,
        session: u64,
        registry: Arc<Mutex<Registry>>,
        capture: CaptureOptions,
    ) -> Self {
        Self {
            filter,
            session,
            registry,
            capture,
        }
    }

    fn capture_stack(&self) -> Vec<String> {
        match capture_current(self.capture) {
            Ok(stack) => stack.lines(),
            Err(err) => {
                debug!(%err, "stack capture failed; recording without a stack");
                Vec::new()
            }
        }
    }

    fn forget(&self, id: AsyncId) {
        let mut registry = self.registry.lock();
        if registry.is_current(self.session) {
            registry.remove(id);
        }
    }
}

impl AsyncHooks for TrackerHooks {
    fn on_create(&self, id: AsyncId, kind: &str, trigger_id: AsyncId, resource: &ResourceHandle) {
        if creations_suppressed() {
            return;
        }
        let kind = TypeTag::new(kind);
        if !self.filter.admits(&kind) {
            return;
        }

        // Captured before taking the lock; the stack walk is the slow part.
        let stack = self.capture_stack();
        let mut registry = self.registry.lock();
        if !registry.is_current(self.session) {
            return;
        }
        registry.insert(OperationRecord {
            id,
            kind,
            trigger_id,
            stack,
            resource: resource.clone(),
        });
    }

    fn on_destroy(&self, id: AsyncId) {
        self.forget(id);
    }

    fn on_settle(&self, id: AsyncId) {
        self.forget(id);
    }
}
