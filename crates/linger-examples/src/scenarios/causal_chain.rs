use linger::Tracker;
use linger_tokio::sync::oneshot;
use linger_tokio::{FutureExt as _, task};

/// Nested work that never finishes. Prints, for each stuck promise, the
/// outstanding operations that led to it.
pub async fn run(tracker: &Tracker) -> Result<(), String> {
    tracker.enable(None).map_err(|e| e.to_string())?;

    let (ready_tx, ready_rx) = oneshot::channel::<()>("supervisor.ready");
    task::spawn("supervisor", async move {
        task::spawn("connection", async move {
            let (_never_tx, never_rx) = oneshot::channel::<()>("connection.handshake");
            let _ = ready_tx.send(());
            let _ = async move { never_rx.await }.tracked().await;
        });
        std::future::pending::<()>().await;
    });
    ready_rx.await.map_err(|e| e.to_string())?;

    for record in tracker.get_unresolved(Some("PROMISE")) {
        let chain = tracker.causal_chain(record.id);
        let path: Vec<String> = chain
            .iter()
            .map(|link| format!("{} #{}", link.kind, link.id))
            .collect();
        println!("{}", path.join(" <- "));
    }

    Ok(())
}
