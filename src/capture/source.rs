//! Capture source — "give me the next still frame" plus bracketed audio
//! recording over the live robot streams.
//!
//! [`CaptureSource`] is the capability interface the page loops poll.  The
//! production implementation, [`RobotCaptureSource`], fetches frames and
//! audio over the authenticated robot session.  Frame requests are
//! serialized internally: a second caller waits on an async mutex instead of
//! racing the first.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::robot::{RobotSession, SessionError};

use super::frame::{AudioClip, AudioFormat, CaptureFrame};

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while pulling frames or audio from the robot.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The underlying robot session call failed.
    #[error("capture transport failed: {0}")]
    Session(#[from] SessionError),

    /// The camera endpoint returned a payload that could not be decoded.
    #[error("bad frame payload: {0}")]
    BadFrame(#[from] super::frame::FrameError),

    /// `stop_audio_capture` was called without a matching start.
    #[error("audio capture was not started")]
    AudioNotStarted,
}

// ---------------------------------------------------------------------------
// CaptureSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface over the live camera and microphone.
///
/// # Contract
///
/// - [`next_frame`](Self::next_frame) pulls the next available frame from
///   the live video track, downsampled to the requested dimensions.
/// - [`start_audio_capture`](Self::start_audio_capture) /
///   [`stop_audio_capture`](Self::stop_audio_capture) bracket one recording
///   window; stop returns the recorded clip.
/// - At most one page loop uses the source at a time; the scheduler
///   guarantees this, and implementations additionally serialize overlapping
///   frame requests.
#[async_trait]
pub trait CaptureSource: Send + Sync {
    /// Pull the next still frame, downsampled to `width` × `height`.
    async fn next_frame(&self, width: u32, height: u32) -> Result<CaptureFrame, CaptureError>;

    /// Begin a microphone recording window.
    async fn start_audio_capture(&self) -> Result<(), CaptureError>;

    /// End the recording window and return the captured audio.
    async fn stop_audio_capture(&self) -> Result<AudioClip, CaptureError>;
}

// Compile-time assertion: Box<dyn CaptureSource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn CaptureSource>) {}
};

// ---------------------------------------------------------------------------
// RobotCaptureSource
// ---------------------------------------------------------------------------

/// HTTP capture source backed by the robot session.
///
/// The camera endpoint may answer with raw JPEG bytes or with a
/// `data:image/jpeg;base64,…` text payload; both are handled.
pub struct RobotCaptureSource {
    session: Arc<RobotSession>,
    // Serializes frame fetches; overlapping callers queue here.
    frame_lock: Mutex<()>,
}

impl RobotCaptureSource {
    /// Wrap an established robot session.
    pub fn new(session: Arc<RobotSession>) -> Self {
        Self {
            session,
            frame_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl CaptureSource for RobotCaptureSource {
    async fn next_frame(&self, width: u32, height: u32) -> Result<CaptureFrame, CaptureError> {
        let _guard = self.frame_lock.lock().await;

        let response = self
            .session
            .get(&format!("/api/camera/frame?width={width}&height={height}"))
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("image/") {
            let bytes = response
                .bytes()
                .await
                .map_err(|e| SessionError::Request(e.to_string()))?;
            return Ok(CaptureFrame {
                bytes: bytes.to_vec(),
                width,
                height,
                mime_type: content_type,
            });
        }

        // Text body: a canvas-style data URI.
        let text = response
            .text()
            .await
            .map_err(|e| SessionError::Request(e.to_string()))?;
        Ok(CaptureFrame::from_data_uri(text.trim(), width, height)?)
    }

    async fn start_audio_capture(&self) -> Result<(), CaptureError> {
        self.session.post("/api/audio/start").await?;
        Ok(())
    }

    async fn stop_audio_capture(&self) -> Result<AudioClip, CaptureError> {
        let response = self.session.post("/api/audio/stop").await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| SessionError::Request(e.to_string()))?;
        Ok(AudioClip {
            bytes: bytes.to_vec(),
            format: AudioFormat::Wav,
        })
    }
}
