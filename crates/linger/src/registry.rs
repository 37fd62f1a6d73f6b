use std::collections::{BTreeMap, HashMap};

use linger_types::{AsyncId, OperationRecord, TypeTag};

/// Outstanding operations keyed by id, iterated in insertion order.
///
/// Holds at most one record per id: a creation event for an id that is
/// still present replaces the older record.
///
/// `session` numbers the hook binding allowed to write. Hooks from an earlier
/// binding may still be mid-callback on other threads; they compare their
/// session under the lock and back off.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    session: u64,
    next_seq: u64,
    by_seq: BTreeMap<u64, OperationRecord>,
    seq_by_id: HashMap<AsyncId, u64>,
}

impl Registry {
    /// Forgets every record and invalidates writers of earlier sessions.
    pub(crate) fn begin_session(&mut self) -> u64 {
        self.clear();
        self.session += 1;
        self.session
    }

    /// Invalidates writers of the current session, keeping its records.
    pub(crate) fn end_session(&mut self) {
        self.session += 1;
    }

    pub(crate) fn is_current(&self, session: u64) -> bool {
        self.session == session
    }

    pub(crate) fn insert(&mut self, record: OperationRecord) {
        if let Some(stale) = self.seq_by_id.remove(&record.id) {
            self.by_seq.remove(&stale);
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.seq_by_id.insert(record.id, seq);
        self.by_seq.insert(seq, record);
    }

    /// Removing an id that was never recorded is a no-op.
    pub(crate) fn remove(&mut self, id: AsyncId) -> Option<OperationRecord> {
        let seq = self.seq_by_id.remove(&id)?;
        self.by_seq.remove(&seq)
    }

    pub(crate) fn get(&self, id: AsyncId) -> Option<&OperationRecord> {
        self.seq_by_id
            .get(&id)
            .and_then(|seq| self.by_seq.get(seq))
    }

    pub(crate) fn len(&self) -> usize {
        self.by_seq.len()
    }

    pub(crate) fn clear(&mut self) {
        self.by_seq.clear();
        self.seq_by_id.clear();
    }

    /// Copies of the current records, oldest first, optionally restricted to one type.
    pub(crate) fn records(&self, kind: Option<&TypeTag>) -> Vec<OperationRecord> {
        self.by_seq
            .values()
            .filter(|record| kind.is_none_or(|kind| record.kind == *kind))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linger_types::ResourceHandle;

    fn record(id: u64, kind: &str) -> OperationRecord {
        OperationRecord {
            id: AsyncId::new(id).expect("non-zero"),
            kind: TypeTag::new(kind),
            trigger_id: AsyncId::ROOT,
            stack: Vec::new(),
            resource: ResourceHandle::default(),
        }
    }

    fn ids(records: &[OperationRecord]) -> Vec<u64> {
        records.iter().map(|record| record.id.get()).collect()
    }

    #[test]
    fn records_keep_insertion_order() {
        let mut registry = Registry::default();
        registry.insert(record(9, "TIMEOUT"));
        registry.insert(record(3, "PROMISE"));
        registry.insert(record(5, "TIMEOUT"));
        assert_eq!(ids(&registry.records(None)), vec![9, 3, 5]);
        assert_eq!(
            ids(&registry.records(Some(&TypeTag::new("timeout")))),
            vec![9, 5]
        );
    }

    #[test]
    fn removing_unknown_ids_is_a_no_op() {
        let mut registry = Registry::default();
        registry.insert(record(4, "PROMISE"));
        assert!(registry.remove(AsyncId::new(40).expect("non-zero")).is_none());
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(AsyncId::new(4).expect("non-zero")).is_some());
        assert!(registry.remove(AsyncId::new(4).expect("non-zero")).is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn reused_id_replaces_the_stale_record() {
        let mut registry = Registry::default();
        registry.insert(record(2, "TIMEOUT"));
        registry.insert(record(3, "PROMISE"));
        registry.insert(record(2, "IMMEDIATE"));

        assert_eq!(registry.len(), 2);
        let records = registry.records(None);
        assert_eq!(ids(&records), vec![3, 2]);
        assert_eq!(records[1].kind.as_str(), "IMMEDIATE");
    }

    #[test]
    fn returned_records_are_copies() {
        let mut registry = Registry::default();
        registry.insert(record(6, "PROMISE"));
        let mut records = registry.records(None);
        records.clear();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(AsyncId::new(6).expect("non-zero")).is_some());

        registry.clear();
        assert_eq!(registry.len(), 0);
        assert!(registry.get(AsyncId::new(6).expect("non-zero")).is_none());
    }

    #[test]
    fn sessions_invalidate_earlier_writers() {
        let mut registry = Registry::default();
        let first = registry.begin_session();
        registry.insert(record(7, "TIMEOUT"));
        assert!(registry.is_current(first));

        registry.end_session();
        assert!(!registry.is_current(first));
        assert_eq!(registry.len(), 1);

        let second = registry.begin_session();
        assert!(registry.is_current(second));
        assert!(!registry.is_current(first));
        assert_eq!(registry.len(), 0);
    }
}
