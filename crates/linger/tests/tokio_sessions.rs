use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use std::time::Duration;

use linger::{Tracker, TrackerError, TypeTag};
use linger_tokio::FutureExt;
use linger_tokio::sync::oneshot;
use linger_tokio::{task, time};

fn test_guard() -> MutexGuard<'static, ()> {
    static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
    GUARD
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[tokio::test]
async fn resolved_promise_leaves_nothing_outstanding() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    tracker.enable(Some("PROMISE")).expect("built in");

    let (tx, rx) = oneshot::channel::<()>("settled");
    tx.send(()).expect("receiver alive");
    rx.await.expect("value was sent");

    assert_eq!(tracker.report(false), 0);
    tracker.disable();
}

#[tokio::test]
async fn pending_promise_is_reported_but_timers_are_filtered_out() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    tracker.enable(Some("PROMISE")).expect("built in");

    let pending = std::future::pending::<()>().tracked();
    let _timer = time::sleep(Duration::from_secs(3600));

    let unresolved = tracker.get_unresolved(None);
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].kind, TypeTag::new("PROMISE"));
    assert_eq!(unresolved[0].id, pending.resource().id());
    tracker.disable();
}

#[tokio::test(start_paused = true)]
async fn leaked_timer_is_found_with_its_creation_site() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    tracker.enable(Some("timeout")).expect("built in");

    let finished = time::sleep(Duration::from_millis(1));
    let leaked = leak_a_timer();
    finished.await;

    let timers = tracker.get_unresolved(Some("TIMEOUT"));
    assert_eq!(timers.len(), 1);
    assert_eq!(timers[0].id, leaked.resource().id());
    assert!(
        timers[0].stack.iter().any(|line| line.contains("leak_a_timer")),
        "creation site missing from:\n{}",
        timers[0].stack_text()
    );

    let mut out = Vec::new();
    let count = tracker.report_to(&mut out, true).expect("in-memory write");
    assert_eq!(count, 1);
    let dump = String::from_utf8(out).expect("utf-8");
    assert!(dump.contains("Type: TIMEOUT"));
    assert!(dump.contains("sleep"));
    tracker.disable();
}

#[inline(never)]
fn leak_a_timer() -> time::Sleep {
    time::sleep(Duration::from_secs(3600))
}

#[tokio::test]
async fn spawned_tasks_trigger_what_they_create() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    tracker.enable_all();

    let (tx, rx) = oneshot::channel::<oneshot::Receiver<()>>("handoff");
    let task = task::spawn("worker", async move {
        let (inner_tx, inner_rx) = oneshot::channel::<()>("inner");
        let _ = tx.send(inner_rx);
        std::future::pending::<()>().await;
        drop(inner_tx);
    });
    let inner_rx = rx.await.expect("worker sends");

    let chain = tracker.causal_chain(inner_rx.resource().id());
    let kinds: Vec<&str> = chain.iter().map(|record| record.kind.as_str()).collect();
    assert_eq!(kinds, vec!["PROMISE", "TASK"]);

    task.abort();
    let _ = task.await;
    drop(inner_rx);
    assert!(tracker.get_unresolved(Some("TASK")).is_empty());
    tracker.disable();
}

#[tokio::test]
async fn custom_types_can_be_registered_and_filtered() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    assert_eq!(
        tracker.enable(Some("DB_QUERY")),
        Err(TrackerError::UnknownType {
            kind: TypeTag::new("DB_QUERY")
        })
    );

    tracker.register("db_query", "Outstanding database round trip");
    tracker.enable(Some("DB_QUERY")).expect("registered");

    let query = std::future::pending::<()>().tracked_as("db_query");
    let _other = std::future::pending::<()>().tracked();
    assert_eq!(tracker.report(false), 1);
    drop(query);
    assert_eq!(tracker.report(false), 0);
    tracker.disable();
}

#[tokio::test]
async fn json_report_lists_outstanding_records() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    tracker.enable(None).expect("no filter");

    let _pending = std::future::pending::<()>().tracked();
    let json = tracker.report_json(Some("promise")).expect("serializable");
    assert!(json.contains("\"kind\""));
    assert!(json.contains("PROMISE"));
    tracker.disable();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reenabling_while_workers_create_timers_keeps_sessions_apart() {
    let _guard = test_guard();
    let tracker = Tracker::new();
    let stop = Arc::new(AtomicBool::new(false));

    let workers: Vec<_> = (0..3)
        .map(|n| {
            let stop = Arc::clone(&stop);
            tokio::spawn(async move {
                let mut held = Vec::new();
                while !stop.load(Ordering::Relaxed) {
                    held.push(time::sleep(Duration::from_secs(3600 + n)));
                    tokio::task::yield_now().await;
                }
                held
            })
        })
        .collect();

    for _ in 0..200 {
        tracker.enable_all();
        tracker.enable(Some("PROMISE")).expect("built in");
    }
    stop.store(true, Ordering::Relaxed);

    let mut held = Vec::new();
    for worker in workers {
        held.push(worker.await.expect("worker finishes"));
    }
    assert!(tracker.get_unresolved(Some("TIMEOUT")).is_empty());
    tracker.disable();
    drop(held);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn timers_dropped_on_other_workers_during_a_report_are_removed() {
    let _guard = test_guard();
    let tracker = Arc::new(Tracker::new());
    tracker.enable(Some("TIMEOUT")).expect("built in");

    let timers: Vec<time::Sleep> = (0..8)
        .map(|_| time::sleep(Duration::from_secs(3600)))
        .collect();
    assert_eq!(tracker.outstanding(), 8);

    struct PausesMidReport {
        out: Vec<u8>,
        started: Option<tokio::sync::oneshot::Sender<()>>,
        resume: std::sync::mpsc::Receiver<()>,
    }

    impl std::io::Write for PausesMidReport {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if let Some(started) = self.started.take() {
                let _ = started.send(());
                let _ = self.resume.recv();
            }
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let (started_tx, started_rx) = tokio::sync::oneshot::channel();
    let (resume_tx, resume_rx) = std::sync::mpsc::channel();
    let reporter = {
        let tracker = Arc::clone(&tracker);
        tokio::task::spawn_blocking(move || {
            let mut writer = PausesMidReport {
                out: Vec::new(),
                started: Some(started_tx),
                resume: resume_rx,
            };
            tracker
                .report_to(&mut writer, true)
                .map_err(|e| e.to_string())
        })
    };

    started_rx.await.expect("report started writing");
    tokio::spawn(async move { drop(timers) })
        .await
        .expect("dropping task");
    resume_tx.send(()).expect("reporter waiting");

    // The snapshot predates the drops; the registry does not.
    assert_eq!(reporter.await.expect("reporter finishes"), Ok(8));
    assert_eq!(tracker.outstanding(), 0);
    tracker.disable();
}
