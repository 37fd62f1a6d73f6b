use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::Arc;

use linger_runtime::{Hook, create_hook};
use linger_types::{AsyncId, OperationRecord, RecordSnapshot, ReportSnapshot, TypeTag};
use tracing::{debug, info, warn};

use crate::catalog::TypeCatalog;
use crate::hooks::{Filter, TrackerHooks, suppress_creations};
use crate::registry::Registry;
use crate::report::write_dump;
use crate::{TrackerConfig, TrackerError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerStatus {
    Disabled,
    Enabled(Filter),
}

enum State {
    Disabled,
    Enabled { filter: Filter, hook: Hook },
}

/// Live registry of outstanding async operations.
///
/// Starts disabled. [`enable`](Self::enable) starts a fresh session,
/// [`disable`](Self::disable) stops recording but keeps what was recorded,
/// and [`reset`](Self::reset) forgets everything without changing state.
pub struct Tracker {
    state: Mutex<State>,
    registry: Arc<Mutex<Registry>>,
    catalog: RwLock<TypeCatalog>,
    config: TrackerConfig,
}

impl Tracker {
    pub fn new() -> Self {
        Self::with_config(TrackerConfig::default())
    }

    pub fn with_config(config: TrackerConfig) -> Self {
        Self {
            state: Mutex::new(State::Disabled),
            registry: Arc::new(Mutex::new(Registry::default())),
            catalog: RwLock::new(TypeCatalog::new()),
            config,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ── State machine ────────────────────────────────────

    /// Starts a new tracking session, optionally restricted to one type.
    ///
    /// Clears the registry and replaces any previous hook binding. An unknown
    /// type fails with [`TrackerError::UnknownType`] and changes nothing.
    pub fn enable(&self, kind: Option<&str>) -> Result<(), TrackerError> {
        let filter = match kind {
            None => Filter::All,
            Some(kind) => Filter::Only(self.catalog.read().resolve(kind)?),
        };
        self.arm(filter);
        Ok(())
    }

    pub fn enable_all(&self) {
        self.arm(Filter::All);
    }

    fn arm(&self, filter: Filter) {
        let mut state = self.state.lock();
        // Detach the previous hook, then bump the session under the registry
        // lock: callbacks of the old hook still in flight see a stale session.
        *state = State::Disabled;
        let session = self.registry.lock().begin_session();

        let hooks = TrackerHooks::new(
            filter.clone(),
            session,
            Arc::clone(&self.registry),
            self.config.capture_options(),
        );
        let hook = create_hook(Arc::new(hooks));
        hook.enable();
        debug!(%filter, session, "async operation tracking enabled");
        *state = State::Enabled { filter, hook };
    }

    /// Stops recording. Already-recorded operations stay until [`reset`](Self::reset).
    pub fn disable(&self) {
        let previous = std::mem::replace(&mut *self.state.lock(), State::Disabled);
        if let State::Enabled { filter, hook } = previous {
            drop(hook);
            self.registry.lock().end_session();
            debug!(%filter, "async operation tracking disabled");
        }
    }

    pub fn reset(&self) {
        let mut registry = self.registry.lock();
        debug!(cleared = registry.len(), "async operation registry reset");
        registry.clear();
    }

    pub fn status(&self) -> TrackerStatus {
        match &*self.state.lock() {
            State::Disabled => TrackerStatus::Disabled,
            State::Enabled { filter, .. } => TrackerStatus::Enabled(filter.clone()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(&*self.state.lock(), State::Enabled { .. })
    }

    // ── Reporting ────────────────────────────────────────

    /// Number of outstanding operations; with `verbose`, also dumps every
    /// record to stderr.
    pub fn report(&self, verbose: bool) -> usize {
        let stderr = io::stderr();
        let mut out = stderr.lock();
        match self.report_to(&mut out, verbose) {
            Ok(count) => count,
            Err(err) => {
                warn!(%err, "failed to write async operation report");
                self.outstanding()
            }
        }
    }

    /// Like [`report`](Self::report), writing the dump to `out`.
    ///
    /// Operations created on this thread while the report is taken and
    /// written are not recorded. Settlement and destruction keep applying.
    pub fn report_to<W: Write>(&self, out: &mut W, verbose: bool) -> io::Result<usize> {
        let _reporting = suppress_creations();

        let records = self.registry.lock().records(None);
        if verbose {
            write_dump(out, &records)?;
        }
        info!(outstanding = records.len(), "async operation report");
        Ok(records.len())
    }

    pub fn outstanding(&self) -> usize {
        self.registry.lock().len()
    }

    // ── Queries ──────────────────────────────────────────

    /// Copies of the outstanding records in insertion order, optionally
    /// restricted to one type (case-insensitive).
    pub fn get_unresolved(&self, kind: Option<&str>) -> Vec<OperationRecord> {
        let kind = kind.map(TypeTag::new);
        self.registry.lock().records(kind.as_ref())
    }

    pub fn get(&self, id: AsyncId) -> Option<OperationRecord> {
        self.registry.lock().get(id).cloned()
    }

    /// `id`'s record followed by the records of its triggers, as far as they
    /// are still outstanding.
    pub fn causal_chain(&self, id: AsyncId) -> Vec<OperationRecord> {
        let registry = self.registry.lock();
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut next = id;
        while visited.insert(next) {
            let Some(record) = registry.get(next) else {
                break;
            };
            next = record.trigger_id;
            chain.push(record.clone());
        }
        chain
    }

    pub fn snapshot(&self, kind: Option<&str>) -> ReportSnapshot {
        let records = self.get_unresolved(kind);
        ReportSnapshot {
            kind: kind.map(|kind| TypeTag::new(kind).as_str().to_string()),
            outstanding: records.len() as u64,
            records: records.iter().map(RecordSnapshot::from).collect(),
        }
    }

    pub fn report_json(&self, kind: Option<&str>) -> Result<String, TrackerError> {
        let _reporting = suppress_creations();
        let snapshot = self.snapshot(kind);
        facet_json::to_string_pretty(&snapshot).map_err(|e| TrackerError::Serialize(e.to_string()))
    }

    // ── Type catalog ─────────────────────────────────────

    pub fn describe(&self, kind: &str) -> Result<String, TrackerError> {
        self.catalog.read().describe(kind).map(str::to_string)
    }

    pub fn register(&self, kind: &str, description: &str) {
        self.catalog.write().register(kind, description);
    }

    pub fn catalog(&self) -> Vec<(TypeTag, String)> {
        self.catalog
            .read()
            .iter()
            .map(|(kind, description)| (kind.clone(), description.to_string()))
            .collect()
    }
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}
