use linger::Tracker;
use linger_tokio::sync::oneshot;
use linger_tokio::{FutureExt as _, task, time};
use std::collections::HashMap;
use std::time::Duration;

/// A request table keeps the reply sender under the wrong key, so the waiter
/// never hears back. Timers are filtered out; only the stuck promises show.
pub async fn run(tracker: &Tracker) -> Result<(), String> {
    tracker.enable(Some("PROMISE")).map_err(|e| e.to_string())?;

    let mut pending: HashMap<u64, oneshot::Sender<String>> = HashMap::new();
    let (reply_tx, reply_rx) = oneshot::channel::<String>("request.42.reply");
    // Stored under 24 instead of 42; the responder below never finds it.
    pending.insert(24, reply_tx);

    task::spawn("responder", async move {
        let _table = pending;
        time::sleep(Duration::from_secs(3600)).await;
    });

    task::spawn(
        "waiter",
        async move {
            match reply_rx.await {
                Ok(reply) => println!("waiter got {reply}"),
                Err(_) => println!("waiter: sender dropped"),
            }
        }
        .tracked(),
    );

    let (tx, rx) = oneshot::channel::<()>("request.7.reply");
    tx.send(()).map_err(|_| "receiver dropped".to_string())?;
    rx.await.map_err(|e| e.to_string())?;
    println!("request 7 answered");

    Ok(())
}
