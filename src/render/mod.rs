//! Output surfaces — canvas painting, status/stats mirroring, speech
//! playback.

pub mod canvas;
pub mod sink;

pub use canvas::CanvasSink;
pub use sink::{AudioSink, LogAudioSink, RenderError, RenderSink};
