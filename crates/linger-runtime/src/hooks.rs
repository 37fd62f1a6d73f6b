use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use linger_types::{AsyncId, ResourceHandle};

/// Callbacks invoked for every lifecycle event while a [`Hook`] is enabled.
///
/// Callbacks run synchronously on the thread that emitted the event.
pub trait AsyncHooks: Send + Sync {
    /// A resource was created. `kind` is passed through as the emitter spelled it.
    fn on_create(&self, id: AsyncId, kind: &str, trigger_id: AsyncId, resource: &ResourceHandle);

    /// The resource is gone; its id may be reused afterwards.
    fn on_destroy(&self, id: AsyncId);

    /// The resource settled but has not been destroyed yet.
    fn on_settle(&self, _id: AsyncId) {}
}

// ── Enabled hook storage ─────────────────────────────────
//
// Keyed by hook id so enable/disable are idempotent. Emission clones the
// enabled set and drops the lock before calling out, so callbacks may
// enable or disable hooks (including their own) without deadlocking.

static ENABLED_HOOKS: LazyLock<RwLock<BTreeMap<u64, Arc<dyn AsyncHooks>>>> =
    LazyLock::new(|| RwLock::new(BTreeMap::new()));

static NEXT_HOOK_ID: AtomicU64 = AtomicU64::new(1);

/// A subscription of one [`AsyncHooks`] implementation to the hook channel.
///
/// Starts disabled. Dropping the hook disables it.
pub struct Hook {
    id: u64,
    hooks: Arc<dyn AsyncHooks>,
}

pub fn create_hook(hooks: Arc<dyn AsyncHooks>) -> Hook {
    Hook {
        id: NEXT_HOOK_ID.fetch_add(1, Ordering::Relaxed),
        hooks,
    }
}

impl Hook {
    pub fn enable(&self) {
        ENABLED_HOOKS
            .write()
            .insert(self.id, Arc::clone(&self.hooks));
    }

    pub fn disable(&self) {
        ENABLED_HOOKS.write().remove(&self.id);
    }

    pub fn is_enabled(&self) -> bool {
        ENABLED_HOOKS.read().contains_key(&self.id)
    }
}

impl Drop for Hook {
    fn drop(&mut self) {
        self.disable();
    }
}

impl std::fmt::Debug for Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hook")
            .field("id", &self.id)
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Number of currently enabled hooks, process-wide.
pub fn enabled_hook_count() -> usize {
    ENABLED_HOOKS.read().len()
}

fn enabled_hooks() -> Vec<Arc<dyn AsyncHooks>> {
    ENABLED_HOOKS.read().values().cloned().collect()
}

// ── Emission ─────────────────────────────────────────────

pub fn emit_init(id: AsyncId, kind: &str, trigger_id: AsyncId, resource: &ResourceHandle) {
    for hooks in enabled_hooks() {
        hooks.on_create(id, kind, trigger_id, resource);
    }
}

pub fn emit_destroy(id: AsyncId) {
    for hooks in enabled_hooks() {
        hooks.on_destroy(id);
    }
}

pub fn emit_settle(id: AsyncId) {
    for hooks in enabled_hooks() {
        hooks.on_settle(id);
    }
}
