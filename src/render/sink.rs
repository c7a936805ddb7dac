//! Render and audio sink capability traits.
//!
//! The page loops never touch an output surface directly; they go through
//! [`RenderSink`] (boxes, status text, stats table) and [`AudioSink`]
//! (synthesized speech playback).  This keeps the control logic testable
//! with in-memory doubles.

use async_trait::async_trait;
use thiserror::Error;

use crate::capture::CaptureFrame;
use crate::gateway::Detection;

// ---------------------------------------------------------------------------
// RenderError
// ---------------------------------------------------------------------------

/// Errors that can occur while compositing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The frame bytes could not be decoded as an image.
    #[error("failed to decode frame: {0}")]
    Decode(String),

    /// The composited canvas could not be re-encoded.
    #[error("failed to encode canvas: {0}")]
    Encode(String),
}

// ---------------------------------------------------------------------------
// RenderSink trait
// ---------------------------------------------------------------------------

/// Output surface for the page loops.
///
/// Implementations must be `Send + Sync`; the scheduler guarantees only the
/// currently active page's loop calls into the sink.
pub trait RenderSink: Send + Sync {
    /// Composite `frame` with boxes and labels for `detections` onto the
    /// canvas.  The detections passed in have already cleared the page's
    /// confidence threshold.
    fn draw_frame(&self, frame: &CaptureFrame, detections: &[Detection]) -> Result<(), RenderError>;

    /// Replace the one-line status text.
    fn status(&self, line: &str);

    /// Update a single row of the stats table.
    fn set_stat(&self, key: &str, value: &str);

    /// Blank the stats table.
    fn clear_stats(&self);

    /// Surface an error message to the user.
    fn show_error(&self, message: &str);
}

// Compile-time assertion: Box<dyn RenderSink> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn RenderSink>) {}
};

// ---------------------------------------------------------------------------
// AudioSink trait
// ---------------------------------------------------------------------------

/// Playback collaborator for synthesized speech.
///
/// Decoding and actual playback live outside this crate; implementations
/// may hand the bytes to a platform player or simply log them.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Play one clip of encoded audio.
    async fn play(&self, audio: &[u8]);
}

// ---------------------------------------------------------------------------
// LogAudioSink
// ---------------------------------------------------------------------------

/// Audio sink that logs clip sizes instead of touching hardware.
#[derive(Debug, Default)]
pub struct LogAudioSink;

#[async_trait]
impl AudioSink for LogAudioSink {
    async fn play(&self, audio: &[u8]) {
        log::info!("audio sink: playing {} byte clip", audio.len());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_audio_sink_accepts_any_clip() {
        let sink = LogAudioSink;
        sink.play(&[0u8; 128]).await;
        sink.play(&[]).await;
    }

    #[test]
    fn audio_sink_is_object_safe() {
        let _: Box<dyn AudioSink> = Box::new(LogAudioSink);
    }
}
