//! System-monitor page — mirrors robot telemetry into the stats table.
//!
//! On every activation the table is blanked first, so stale readings from a
//! previous visit never show before the first fresh poll lands.  Within an
//! activation the update is field-wise: a reading missing from one poll
//! leaves the previously displayed value in place rather than clearing it.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::scheduler::{Page, PageContext, PageError, PageId};

/// Telemetry polling loop.
pub struct SystemMonitorPage;

#[async_trait]
impl Page for SystemMonitorPage {
    fn id(&self) -> PageId {
        PageId::SystemMonitor
    }

    async fn run(&self, ctx: PageContext, cancel: CancellationToken) -> Result<(), PageError> {
        let poll = Duration::from_millis(ctx.config.scheduler.monitor_poll_ms);

        // Blank the table before the first reading of this activation.
        ctx.sink.clear_stats();
        ctx.sink.status("monitoring");

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }

            let report = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.telemetry.read_status() => res?,
            };

            // Only present fields update; absent fields stay stale.
            for (key, value) in &report.readings {
                ctx.sink.set_stat(key, value);
            }

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = tokio::time::sleep(poll) => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{context_with, report, MockCapture, MockGateway, MockTelemetry, NullAudio, RecordingSink};
    use std::sync::Arc;

    fn monitor_context(
        telemetry: Arc<MockTelemetry>,
    ) -> (crate::scheduler::PageContext, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let mut ctx = context_with(
            Arc::new(MockCapture::default()),
            Arc::new(MockGateway::new()),
            telemetry,
            sink.clone(),
            Arc::new(NullAudio::default()),
        );
        ctx.config.scheduler.monitor_poll_ms = 1;
        (ctx, sink)
    }

    async fn run_briefly(ctx: crate::scheduler::PageContext, millis: u64) {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let handle = tokio::spawn(async move { SystemMonitorPage.run(ctx, task_cancel).await });

        tokio::time::sleep(Duration::from_millis(millis)).await;
        cancel.cancel();
        handle.await.unwrap().unwrap();
    }

    /// The stats table is blanked before the first reading renders.
    #[tokio::test]
    async fn clears_stats_before_first_reading() {
        let telemetry = Arc::new(MockTelemetry::with_reports(vec![report(&[
            ("battery", "87.5"),
            ("state", "idle"),
        ])]));
        let (ctx, sink) = monitor_context(telemetry);

        run_briefly(ctx, 30).await;

        let events = sink.events();
        let clear_at = events.iter().position(|e| e == "clear_stats").unwrap();
        let first_stat = events.iter().position(|e| e.starts_with("stat:")).unwrap();
        assert!(clear_at < first_stat, "blank must precede the first reading");
        assert!(events.contains(&"stat:battery=87.5".to_string()));
        assert!(events.contains(&"stat:state=idle".to_string()));
    }

    /// Switching away and back blanks the table again on each activation.
    #[tokio::test]
    async fn every_activation_starts_blank() {
        let telemetry = Arc::new(MockTelemetry::with_reports(vec![
            report(&[("battery", "87.5")]),
            report(&[("battery", "86.0")]),
        ]));
        let (ctx, sink) = monitor_context(telemetry);

        run_briefly(ctx.clone(), 20).await;
        run_briefly(ctx, 20).await;

        let clears = sink
            .events()
            .iter()
            .filter(|e| *e == "clear_stats")
            .count();
        assert_eq!(clears, 2);
    }

    /// A field missing from a later poll is not re-written: the sink keeps
    /// the stale value (only present fields generate updates).
    #[tokio::test]
    async fn missing_field_leaves_previous_value_stale() {
        let telemetry = Arc::new(MockTelemetry::with_reports(vec![
            report(&[("battery", "87.5"), ("state", "idle")]),
            report(&[("state", "moving")]),
        ]));
        let (ctx, sink) = monitor_context(telemetry);

        run_briefly(ctx, 40).await;

        let battery_updates = sink.events_with_prefix("stat:battery=");
        assert_eq!(
            battery_updates,
            vec!["stat:battery=87.5".to_string()],
            "battery must be written once and then left stale"
        );
        assert!(sink.events().contains(&"stat:state=moving".to_string()));
    }

    /// A failed telemetry read terminates the loop with an error.
    #[tokio::test]
    async fn telemetry_failure_terminates_loop() {
        let (ctx, _sink) = monitor_context(Arc::new(MockTelemetry::failing()));

        let cancel = CancellationToken::new();
        let result = SystemMonitorPage.run(ctx, cancel).await;
        assert!(matches!(result, Err(PageError::Telemetry(_))));
    }
}
