use std::sync::atomic::{AtomicBool, Ordering};

use linger_types::{AsyncId, ResourceHandle};

use crate::context::{enter_scope, execution_async_id};
use crate::hooks::{emit_destroy, emit_init, emit_settle};

/// RAII announcement of one async resource.
///
/// Construction emits the creation event, [`resolve`](Self::resolve) emits
/// the settlement event at most once, and dropping emits the destruction event.
pub struct AsyncResource {
    id: AsyncId,
    trigger_id: AsyncId,
    kind: String,
    resource: ResourceHandle,
    settled: AtomicBool,
}

impl AsyncResource {
    /// Creates a resource triggered by the current execution context.
    pub fn new(kind: impl Into<String>, resource: ResourceHandle) -> Self {
        Self::with_trigger(kind, execution_async_id(), resource)
    }

    pub fn with_trigger(
        kind: impl Into<String>,
        trigger_id: AsyncId,
        resource: ResourceHandle,
    ) -> Self {
        let kind = kind.into();
        let id = AsyncId::next_process_local();
        emit_init(id, &kind, trigger_id, &resource);
        Self {
            id,
            trigger_id,
            kind,
            resource,
            settled: AtomicBool::new(false),
        }
    }

    pub fn id(&self) -> AsyncId {
        self.id
    }

    pub fn trigger_id(&self) -> AsyncId {
        self.trigger_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn resource(&self) -> &ResourceHandle {
        &self.resource
    }

    /// Signals that the operation settled. Later calls are no-ops.
    pub fn resolve(&self) {
        if !self.settled.swap(true, Ordering::AcqRel) {
            emit_settle(self.id);
        }
    }

    pub fn is_settled(&self) -> bool {
        self.settled.load(Ordering::Acquire)
    }

    /// Runs `f` with this resource as the current execution context.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        let _scope = enter_scope(self.id);
        f()
    }
}

impl Drop for AsyncResource {
    fn drop(&mut self) {
        emit_destroy(self.id);
    }
}

impl std::fmt::Debug for AsyncResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncResource")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("trigger_id", &self.trigger_id)
            .field("settled", &self.is_settled())
            .finish()
    }
}
