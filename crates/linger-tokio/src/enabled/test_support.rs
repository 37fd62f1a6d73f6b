use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};

use linger_runtime::{AsyncHooks, AsyncId, Hook, ResourceHandle, create_hook};

pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static GUARD: OnceLock<std::sync::Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| std::sync::Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Created {
    pub(crate) id: AsyncId,
    pub(crate) kind: String,
    pub(crate) trigger_id: AsyncId,
    pub(crate) resource: String,
}

/// Live view of what the enabled hook has seen: created ids minus settled or
/// destroyed ones.
#[derive(Default)]
pub(crate) struct Live {
    created: Mutex<Vec<Created>>,
}

impl Live {
    pub(crate) fn start() -> (Arc<Self>, Hook) {
        let live = Arc::new(Self::default());
        let hook = create_hook(live.clone());
        hook.enable();
        (live, hook)
    }

    pub(crate) fn outstanding(&self, kind: &str) -> Vec<Created> {
        self.created
            .lock()
            .iter()
            .filter(|created| created.kind == kind)
            .cloned()
            .collect()
    }
}

impl AsyncHooks for Live {
    fn on_create(&self, id: AsyncId, kind: &str, trigger_id: AsyncId, resource: &ResourceHandle) {
        self.created.lock().push(Created {
            id,
            kind: kind.to_string(),
            trigger_id,
            resource: format!("{resource:?}"),
        });
    }

    fn on_destroy(&self, id: AsyncId) {
        self.created.lock().retain(|created| created.id != id);
    }

    fn on_settle(&self, id: AsyncId) {
        self.on_destroy(id);
    }
}
