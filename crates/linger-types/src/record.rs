use facet::Facet;
use std::fmt;
use std::sync::Arc;

use crate::{AsyncId, TypeTag};

/// Opaque reference to the runtime object behind an async operation.
///
/// Only ever printed, never interpreted.
#[derive(Clone)]
pub struct ResourceHandle(Arc<dyn fmt::Debug + Send + Sync>);

struct NoResource;

impl fmt::Debug for NoResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<none>")
    }
}

impl ResourceHandle {
    pub fn new<T>(resource: T) -> Self
    where
        T: fmt::Debug + Send + Sync + 'static,
    {
        Self(Arc::new(resource))
    }

    pub fn from_arc(resource: Arc<dyn fmt::Debug + Send + Sync>) -> Self {
        Self(resource)
    }

    pub fn ptr_eq(&self, other: &ResourceHandle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Default for ResourceHandle {
    fn default() -> Self {
        Self::new(NoResource)
    }
}

impl fmt::Debug for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// One outstanding async operation, as captured at creation time.
#[derive(Debug, Clone)]
pub struct OperationRecord {
    pub id: AsyncId,
    pub kind: TypeTag,
    /// Operation whose execution created this one. Informational only:
    /// the referenced operation may already be gone.
    pub trigger_id: AsyncId,
    /// Call-stack lines captured synchronously at creation, innermost first.
    pub stack: Vec<String>,
    pub resource: ResourceHandle,
}

impl OperationRecord {
    pub fn stack_text(&self) -> String {
        self.stack.join("\n")
    }
}

#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    pub id: u64,
    pub kind: String,
    pub trigger_id: u64,
    pub stack: Vec<String>,
    /// `Debug` rendering of the resource handle.
    pub resource: String,
}

impl From<&OperationRecord> for RecordSnapshot {
    fn from(record: &OperationRecord) -> Self {
        Self {
            id: record.id.get(),
            kind: record.kind.as_str().to_string(),
            trigger_id: record.trigger_id.get(),
            stack: record.stack.clone(),
            resource: format!("{:?}", record.resource),
        }
    }
}

#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct ReportSnapshot {
    /// Type the snapshot was restricted to, if any.
    pub kind: Option<String>,
    pub outstanding: u64,
    pub records: Vec<RecordSnapshot>,
}
