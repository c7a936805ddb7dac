//! Frame and audio value types produced by the capture source.
//!
//! A [`CaptureFrame`] is an opaque encoded still image plus its pixel
//! dimensions, produced on demand from the live camera stream and consumed
//! within a single page-loop iteration.  [`AudioClip`] is the result of one
//! bracketed microphone recording window.

use base64::Engine;
use thiserror::Error;

// ---------------------------------------------------------------------------
// FrameError
// ---------------------------------------------------------------------------

/// Errors that can occur while decoding a camera frame payload.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The payload claimed to be a data URI but had no `;base64,` marker.
    #[error("malformed data URI: missing base64 marker")]
    MissingBase64Marker,

    /// The base64 body of a data URI could not be decoded.
    #[error("invalid base64 in data URI: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

// ---------------------------------------------------------------------------
// CaptureFrame
// ---------------------------------------------------------------------------

/// One encoded still image pulled from the live video stream.
///
/// Produced and consumed within a single page-loop iteration; never cached
/// across iterations.
#[derive(Debug, Clone)]
pub struct CaptureFrame {
    /// Encoded image bytes (typically JPEG).
    pub bytes: Vec<u8>,
    /// Pixel width of the encoded image.
    pub width: u32,
    /// Pixel height of the encoded image.
    pub height: u32,
    /// MIME type of `bytes`, e.g. `"image/jpeg"`.
    pub mime_type: String,
}

impl CaptureFrame {
    /// Build a JPEG frame from raw encoded bytes.
    pub fn jpeg(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
            mime_type: "image/jpeg".into(),
        }
    }

    /// Build a frame from a `data:<mime>;base64,<body>` URI as delivered by
    /// camera endpoints that export canvas-style payloads.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::MissingBase64Marker`] when the marker is absent
    /// and [`FrameError::InvalidBase64`] when the body fails to decode.
    pub fn from_data_uri(uri: &str, width: u32, height: u32) -> Result<Self, FrameError> {
        const MARKER: &str = ";base64,";

        let marker_at = uri.find(MARKER).ok_or(FrameError::MissingBase64Marker)?;
        let body = &uri[marker_at + MARKER.len()..];
        let bytes = base64::engine::general_purpose::STANDARD.decode(body)?;

        // "data:image/jpeg;base64,…" → "image/jpeg"; tolerate a bare body.
        let mime_type = uri
            .strip_prefix("data:")
            .map(|rest| rest[..marker_at - "data:".len()].to_string())
            .unwrap_or_else(|| "image/jpeg".into());

        Ok(Self {
            bytes,
            width,
            height,
            mime_type,
        })
    }
}

// ---------------------------------------------------------------------------
// AudioClip
// ---------------------------------------------------------------------------

/// Container format of a recorded [`AudioClip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    /// WAV container (PCM).
    Wav,
    /// MP3 stream.
    Mp3,
}

impl AudioFormat {
    /// MIME type string sent to the speech-to-text service.
    pub fn mime_type(&self) -> &'static str {
        match self {
            AudioFormat::Wav => "audio/wav",
            AudioFormat::Mp3 => "audio/mpeg",
        }
    }
}

/// Opaque recorded audio from one start/stop capture window.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Encoded audio bytes.
    pub bytes: Vec<u8>,
    /// Container format of `bytes`.
    pub format: AudioFormat,
}

impl AudioClip {
    /// `true` when the recording window captured no audio at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
