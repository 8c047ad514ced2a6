use anyhow::Result;
use portal_application::PortalContext;
use std::time::Duration;
use tokio::time::timeout;

/// Runs the session clock for `seconds`, printing each tick, then shows the
/// collected stats and activity feed.
pub async fn watch(context: &PortalContext, seconds: u64) -> Result<()> {
    let telemetry = &context.telemetry;
    let mut ticks = telemetry.subscribe();

    telemetry.start();
    ticks.borrow_and_update();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(seconds);
    while let Ok(changed) = timeout(
        deadline.saturating_duration_since(tokio::time::Instant::now()),
        ticks.changed(),
    )
    .await
    {
        if changed.is_err() {
            break;
        }
        println!("⏱  {}", *ticks.borrow_and_update());
    }
    telemetry.stop();

    let stats = telemetry.current_session_stats();
    let performance = telemetry.current_performance_stats();
    println!("\n📊 Session");
    println!("  Started:  {}", stats.login_time);
    println!("  Duration: {}", stats.duration);
    println!("  Calls:    {}", stats.call_count);
    println!(
        "  Memory {}% / CPU {}% / Network {}",
        performance.memory, performance.cpu, performance.network
    );

    println!("\n📋 Activity");
    for entry in telemetry.activity_log() {
        println!("  {}  {}", entry.timestamp.format("%H:%M:%S"), entry.text);
    }
    Ok(())
}
