use linger::Tracker;
use linger_tokio::{task, time};
use std::time::Duration;

/// A heartbeat task whose interval nobody ever stops, next to a timer that
/// fires and goes away.
pub async fn run(tracker: &Tracker) -> Result<(), String> {
    tracker.enable(Some("timeout")).map_err(|e| e.to_string())?;

    time::sleep(Duration::from_millis(5)).await;
    println!("warm-up timer fired");

    task::spawn("heartbeat", async {
        let mut every = time::interval(Duration::from_secs(3600));
        loop {
            every.tick().await;
            println!("heartbeat");
        }
    });

    Ok(())
}
