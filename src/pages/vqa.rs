//! Vision Q&A page — spoken questions answered about the current view.
//!
//! Each round records a short microphone window, transcribes it, grabs a
//! frame, classifies what is visible, and hands question plus labels to the
//! chat model.  The answer is rendered to the status line and spoken back.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::scheduler::{Page, PageContext, PageError, PageId};

/// How many classification results to request per frame.
const TOP_N: usize = 3;

/// Build the chat prompt from the transcribed question and visible labels.
fn build_prompt(question: &str, visible: &[String]) -> String {
    if visible.is_empty() {
        question.to_string()
    } else {
        format!(
            "The camera currently sees: {}. {question}",
            visible.join(", ")
        )
    }
}

/// Ask-about-what-you-see polling loop.
pub struct VisionQaPage;

#[async_trait]
impl Page for VisionQaPage {
    fn id(&self) -> PageId {
        PageId::VisionQa
    }

    async fn run(&self, ctx: PageContext, cancel: CancellationToken) -> Result<(), PageError> {
        let (width, height) = (ctx.config.capture.frame_width, ctx.config.capture.frame_height);
        let window = Duration::from_millis(ctx.config.capture.audio_window_ms);
        let threshold = ctx.config.detector.confidence_threshold;

        ctx.sink.status("listening");

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }

            // Bracketed recording window for one question.
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.capture.start_audio_capture() => res?,
            }

            tokio::select! {
                _ = cancel.cancelled() => {
                    // Close the window before leaving; the clip is discarded.
                    let _ = ctx.capture.stop_audio_capture().await;
                    return Ok(());
                }
                _ = tokio::time::sleep(window) => {}
            }

            let clip = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.capture.stop_audio_capture() => res?,
            };

            if clip.is_empty() {
                continue;
            }

            let question = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.gateway.speech_to_text(&clip) => res?,
            };

            if question.is_empty() {
                continue;
            }

            ctx.sink.status(&format!("Q: {question}"));

            let frame = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.capture.next_frame(width, height) => res?,
            };

            let classifications = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.gateway.classify(&frame, TOP_N) => res?,
            };

            let visible: Vec<String> = classifications
                .iter()
                .filter(|c| c.accepted(threshold))
                .map(|c| c.label.clone())
                .collect();

            let prompt = build_prompt(&question, &visible);

            let answer = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.gateway.chat_complete(&prompt) => res?,
            };

            ctx.sink.status(&format!("A: {answer}"));

            let speech = tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                res = ctx.gateway.text_to_speech(&answer) => res?,
            };

            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = ctx.audio.play(&speech) => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
