use linger::Tracker;
use linger_tokio::FutureExt as _;
use linger_tokio::task;

/// Library code can announce its own operation types and filter on them.
pub async fn run(tracker: &Tracker) -> Result<(), String> {
    tracker.register("DB_QUERY", "Database round trip awaiting a response");
    println!(
        "DB_QUERY: {}",
        tracker.describe("db_query").map_err(|e| e.to_string())?
    );
    tracker.enable(Some("DB_QUERY")).map_err(|e| e.to_string())?;

    task::spawn("query", async {
        std::future::pending::<()>().tracked_as("DB_QUERY").await;
    });
    std::future::ready(()).tracked_as("DB_QUERY").await;

    Ok(())
}
