//! Page identity, the `Page` trait and the page-scoped context.
//!
//! A **page** is one mutually-exclusive UI mode with its own polling loop.
//! The set of pages is fixed at startup; pages are toggled repeatedly for
//! the life of the session.  Each activation hands the loop a fresh
//! [`PageContext`] clone and a [`CancellationToken`]; the loop must check
//! the token at the top of every iteration and at every suspension point,
//! and exit promptly once it is cancelled.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::capture::{CaptureError, CaptureSource};
use crate::config::AppConfig;
use crate::gateway::{GatewayError, InferenceGateway};
use crate::render::{AudioSink, RenderError, RenderSink};
use crate::robot::{SessionError, TelemetrySource};

// ---------------------------------------------------------------------------
// PageId
// ---------------------------------------------------------------------------

/// The fixed set of kiosk pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageId {
    /// Robot telemetry stats table.
    SystemMonitor,
    /// Live object detection with spoken announcements.
    ObjectDetector,
    /// Fingerspelling reader that submits completed words to the chat model.
    GestureSpeller,
    /// Ask-a-question-about-what-you-see loop.
    VisionQa,
}

impl PageId {
    /// A short human-readable label for the status line.
    pub fn label(&self) -> &'static str {
        match self {
            PageId::SystemMonitor => "system-monitor",
            PageId::ObjectDetector => "object-detector",
            PageId::GestureSpeller => "gesture-speller",
            PageId::VisionQa => "vision-qa",
        }
    }

    /// Parse a user-entered page name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "monitor" | "system-monitor" => Some(PageId::SystemMonitor),
            "detector" | "object-detector" => Some(PageId::ObjectDetector),
            "speller" | "gesture-speller" => Some(PageId::GestureSpeller),
            "vqa" | "vision-qa" => Some(PageId::VisionQa),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// PageError
// ---------------------------------------------------------------------------

/// Errors that can terminate a page loop.
///
/// A failed remote call is not retried: the loop returns the error, the
/// scheduler logs it and surfaces it through the render sink, and the page
/// is left inactive.
#[derive(Debug, Error)]
pub enum PageError {
    /// Frame or audio capture failed.
    #[error("capture failed: {0}")]
    Capture(#[from] CaptureError),

    /// A remote inference call failed.
    #[error("inference failed: {0}")]
    Gateway(#[from] GatewayError),

    /// A telemetry read failed.
    #[error("telemetry failed: {0}")]
    Telemetry(#[from] SessionError),

    /// The render sink rejected a frame.
    #[error("render failed: {0}")]
    Render(#[from] RenderError),
}

// ---------------------------------------------------------------------------
// PageContext
// ---------------------------------------------------------------------------

/// Capability bundle owned by the currently active page loop.
///
/// Cloning is cheap (`Arc` clones plus a config snapshot); the scheduler
/// hands a fresh clone to each activation so no loop ever reaches for a
/// global handle.
#[derive(Clone)]
pub struct PageContext {
    /// Camera / microphone capture.
    pub capture: Arc<dyn CaptureSource>,
    /// Remote inference services.
    pub gateway: Arc<dyn InferenceGateway>,
    /// Robot telemetry reads.
    pub telemetry: Arc<dyn TelemetrySource>,
    /// Canvas / status / stats output.
    pub sink: Arc<dyn RenderSink>,
    /// Synthesized speech playback.
    pub audio: Arc<dyn AudioSink>,
    /// Configuration snapshot taken at scheduler construction.
    pub config: AppConfig,
}

// ---------------------------------------------------------------------------
// Page trait
// ---------------------------------------------------------------------------

/// One kiosk page: an identity plus a cancellable polling loop.
///
/// `run` must return promptly after `cancel` fires — the scheduler awaits
/// the loop's completion before activating the next page, so a loop that
/// ignores its token blocks every subsequent page switch.
#[async_trait]
pub trait Page: Send + Sync {
    /// Which page this is.
    fn id(&self) -> PageId;

    /// Drive the page's polling loop until cancellation or failure.
    async fn run(&self, ctx: PageContext, cancel: CancellationToken) -> Result<(), PageError>;
}

// Compile-time assertion: Box<dyn Page> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Page>) {}
};

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
