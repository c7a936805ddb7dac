//! Object-detector page — live detection boxes plus spoken announcements.
//!
//! Each iteration pulls a frame, runs remote detection, draws the accepted
//! boxes, and announces each class the first time it is seen during this
//! activation.  The announced-class set is recreated every time the page is
//! (re)activated, so switching away and back re-announces everything.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::gateway::Detection;
use crate::scheduler::{Page, PageContext, PageError, PageId};

/// Polling loop for live object detection.
pub struct ObjectDetectorPage;

#[async_trait]
impl Page for ObjectDetectorPage {
    fn id(&self) -> PageId {
        PageId::ObjectDetector
    }

    async fn run(&self, ctx: PageContext, cancel: CancellationToken) -> Result<(), PageError> {
        let threshold = ctx.config.detector.confidence_threshold;
        let (width, height) = (ctx.config.capture.frame_width, ctx.config.capture.frame_height);
        let poll = Duration::from_millis(ctx.config.scheduler.detector_poll_ms);

        // Classes announced via speech during this activation only.
        let mut announced: HashSet<String> = HashSet::new();

        ctx.sink.status("watching");

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }

            let frame = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.capture.next_frame(width, height) => res?,
            };

            let detections = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.gateway.detect_objects(&frame) => res?,
            };

            let accepted: Vec<Detection> = detections
                .into_iter()
                .filter(|d| d.accepted(threshold))
                .collect();

            ctx.sink.draw_frame(&frame, &accepted)?;

            for det in &accepted {
                if announced.insert(det.label.clone()) {
                    let phrase = format!("I see a {}", det.label);
                    let clip = tokio::select! {
                        _ = cancel.cancelled() => return Ok(()),
                        res = ctx.gateway.text_to_speech(&phrase) => res?,
                    };

                    tokio::select! {
                        _ = cancel.cancelled() => return Ok(()),
                        _ = ctx.audio.play(&clip) => {}
                    }
                }
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
