//! Test doubles for the capability traits.
//!
//! Compiled only for tests.  Each mock is deliberately dumb: scripted
//! responses in, recorded calls out, no timing behaviour of its own.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::capture::{AudioClip, AudioFormat, CaptureError, CaptureFrame, CaptureSource};
use crate::gateway::{Classification, Detection, GatewayError, InferenceGateway};
use crate::render::{AudioSink, RenderError, RenderSink};
use crate::robot::{SessionError, StatusReport, TelemetrySource};

// ---------------------------------------------------------------------------
// Detection helpers
// ---------------------------------------------------------------------------

/// A detection with a plausible box, for scripting mock gateways.
pub fn detection(label: &str, confidence: f64) -> Detection {
    Detection {
        label: label.into(),
        confidence,
        x_min: 10.0,
        y_min: 10.0,
        x_max: 90.0,
        y_max: 70.0,
    }
}

// ---------------------------------------------------------------------------
// MockCapture
// ---------------------------------------------------------------------------

/// Capture source that serves a fixed dummy frame and empty audio clips.
#[derive(Default)]
pub struct MockCapture {
    /// Number of `next_frame` calls issued so far.
    pub frames_served: Mutex<usize>,
    /// Audio bytes returned by `stop_audio_capture`.
    pub audio_bytes: Vec<u8>,
}

impl MockCapture {
    pub fn with_audio(bytes: Vec<u8>) -> Self {
        Self {
            frames_served: Mutex::new(0),
            audio_bytes: bytes,
        }
    }
}

#[async_trait]
impl CaptureSource for MockCapture {
    async fn next_frame(&self, width: u32, height: u32) -> Result<CaptureFrame, CaptureError> {
        *self.frames_served.lock().unwrap() += 1;
        // SOI marker only; mocks downstream never decode it.
        Ok(CaptureFrame::jpeg(vec![0xFF, 0xD8], width, height))
    }

    async fn start_audio_capture(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn stop_audio_capture(&self) -> Result<AudioClip, CaptureError> {
        Ok(AudioClip {
            bytes: self.audio_bytes.clone(),
            format: AudioFormat::Wav,
        })
    }
}

// ---------------------------------------------------------------------------
// MockGateway
// ---------------------------------------------------------------------------

/// Inference gateway with scripted responses and recorded calls.
///
/// Scripted queues pop one entry per call; an exhausted queue yields an
/// empty result (or empty string) rather than an error, unless `fail_all`
/// is set.
#[derive(Default)]
pub struct MockGateway {
    pub scripted_detections: Mutex<VecDeque<Vec<Detection>>>,
    pub scripted_classifications: Mutex<VecDeque<Vec<Classification>>>,
    pub scripted_transcripts: Mutex<VecDeque<String>>,
    pub chat_response: Mutex<String>,

    pub tts_calls: Mutex<Vec<String>>,
    pub chat_calls: Mutex<Vec<String>>,

    /// When set, every call fails with a transport error.
    pub fail_all: bool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    pub fn push_detections(&self, dets: Vec<Detection>) {
        self.scripted_detections.lock().unwrap().push_back(dets);
    }

    pub fn push_classifications(&self, classes: Vec<Classification>) {
        self.scripted_classifications
            .lock()
            .unwrap()
            .push_back(classes);
    }

    pub fn push_transcript(&self, text: &str) {
        self.scripted_transcripts
            .lock()
            .unwrap()
            .push_back(text.to_string());
    }

    pub fn set_chat_response(&self, text: &str) {
        *self.chat_response.lock().unwrap() = text.to_string();
    }

    fn check_fail(&self) -> Result<(), GatewayError> {
        if self.fail_all {
            Err(GatewayError::Request("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InferenceGateway for MockGateway {
    async fn detect_objects(&self, _frame: &CaptureFrame) -> Result<Vec<Detection>, GatewayError> {
        self.check_fail()?;
        Ok(self
            .scripted_detections
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn classify(
        &self,
        _frame: &CaptureFrame,
        _top_n: usize,
    ) -> Result<Vec<Classification>, GatewayError> {
        self.check_fail()?;
        Ok(self
            .scripted_classifications
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn speech_to_text(&self, _audio: &AudioClip) -> Result<String, GatewayError> {
        self.check_fail()?;
        Ok(self
            .scripted_transcripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }

    async fn text_to_speech(&self, text: &str) -> Result<Vec<u8>, GatewayError> {
        self.check_fail()?;
        self.tts_calls.lock().unwrap().push(text.to_string());
        Ok(vec![0u8; 4])
    }

    async fn chat_complete(&self, prompt: &str) -> Result<String, GatewayError> {
        self.check_fail()?;
        self.chat_calls.lock().unwrap().push(prompt.to_string());
        Ok(self.chat_response.lock().unwrap().clone())
    }
}

// ---------------------------------------------------------------------------
// MockTelemetry
// ---------------------------------------------------------------------------

/// Telemetry source serving a scripted sequence of reports.
///
/// An exhausted script yields empty reports (no fields present).
#[derive(Default)]
pub struct MockTelemetry {
    pub scripted_reports: Mutex<VecDeque<StatusReport>>,
    pub fail_all: bool,
}

impl MockTelemetry {
    pub fn with_reports(reports: Vec<StatusReport>) -> Self {
        Self {
            scripted_reports: Mutex::new(reports.into()),
            fail_all: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            scripted_reports: Mutex::new(VecDeque::new()),
            fail_all: true,
        }
    }
}

#[async_trait]
impl TelemetrySource for MockTelemetry {
    async fn read_status(&self) -> Result<StatusReport, SessionError> {
        if self.fail_all {
            return Err(SessionError::Request("connection refused".into()));
        }
        Ok(self
            .scripted_reports
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default())
    }
}

/// Build a [`StatusReport`] from key/value pairs.
pub fn report(fields: &[(&str, &str)]) -> StatusReport {
    let mut r = StatusReport::default();
    for (k, v) in fields {
        r.readings.insert((*k).to_string(), (*v).to_string());
    }
    r
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

/// Render sink that records every call as a readable event string.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events in call order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    /// Events starting with `prefix`.
    pub fn events_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }

    fn record(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl RenderSink for RecordingSink {
    fn draw_frame(&self, _frame: &CaptureFrame, detections: &[Detection]) -> Result<(), RenderError> {
        let labels: Vec<&str> = detections.iter().map(|d| d.label.as_str()).collect();
        self.record(format!("draw:{}", labels.join(",")));
        Ok(())
    }

    fn status(&self, line: &str) {
        self.record(format!("status:{line}"));
    }

    fn set_stat(&self, key: &str, value: &str) {
        self.record(format!("stat:{key}={value}"));
    }

    fn clear_stats(&self) {
        self.record("clear_stats".into());
    }

    fn show_error(&self, message: &str) {
        self.record(format!("error:{message}"));
    }
}

// ---------------------------------------------------------------------------
// PageContext helper
// ---------------------------------------------------------------------------

/// Build a [`PageContext`] from mock collaborators and default config.
///
/// [`PageContext`]: crate::scheduler::PageContext
pub fn context_with(
    capture: std::sync::Arc<dyn CaptureSource>,
    gateway: std::sync::Arc<dyn InferenceGateway>,
    telemetry: std::sync::Arc<dyn TelemetrySource>,
    sink: std::sync::Arc<dyn RenderSink>,
    audio: std::sync::Arc<dyn AudioSink>,
) -> crate::scheduler::PageContext {
    crate::scheduler::PageContext {
        capture,
        gateway,
        telemetry,
        sink,
        audio,
        config: crate::config::AppConfig::default(),
    }
}

/// [`context_with`] wired entirely to fresh default mocks; returns the
/// context plus the handles a test usually asserts on.
pub fn default_context() -> (
    crate::scheduler::PageContext,
    std::sync::Arc<MockGateway>,
    std::sync::Arc<RecordingSink>,
) {
    let gateway = std::sync::Arc::new(MockGateway::new());
    let sink = std::sync::Arc::new(RecordingSink::new());
    let ctx = context_with(
        std::sync::Arc::new(MockCapture::default()),
        gateway.clone(),
        std::sync::Arc::new(MockTelemetry::default()),
        sink.clone(),
        std::sync::Arc::new(NullAudio::default()),
    );
    (ctx, gateway, sink)
}

// ---------------------------------------------------------------------------
// NullAudio
// ---------------------------------------------------------------------------

/// Audio sink that counts plays and discards the bytes.
#[derive(Default)]
pub struct NullAudio {
    pub plays: Mutex<usize>,
}

#[async_trait]
impl AudioSink for NullAudio {
    async fn play(&self, _audio: &[u8]) {
        *self.plays.lock().unwrap() += 1;
    }
}
