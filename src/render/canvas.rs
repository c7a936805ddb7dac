//! In-memory canvas sink built on the `image` crate.
//!
//! [`CanvasSink`] decodes each JPEG frame, strokes bounding boxes for the
//! accepted detections, and keeps a label legend, a one-line status and an
//! ordered stats table.  The composited canvas can be exported as JPEG for
//! snapshots.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::sync::Mutex;

use image::{Rgb, RgbImage};

use crate::capture::CaptureFrame;
use crate::gateway::Detection;

use super::sink::{RenderError, RenderSink};

/// Stroke colour for boxes, matching the classic `#aa0000` detection red.
const BOX_COLOR: Rgb<u8> = Rgb([0xAA, 0x00, 0x00]);
/// Stroke thickness in pixels.
const BOX_STROKE: u32 = 2;

// ---------------------------------------------------------------------------
// CanvasSink
// ---------------------------------------------------------------------------

#[derive(Default)]
struct CanvasState {
    canvas: Option<RgbImage>,
    legend: Vec<String>,
    status: String,
    stats: BTreeMap<String, String>,
    error: Option<String>,
}

/// Render sink backed by an in-memory RGB canvas.
///
/// All mutation happens under a short-lived internal lock; the sink is safe
/// to hand to the page loops behind an `Arc<dyn RenderSink>`.
#[derive(Default)]
pub struct CanvasSink {
    state: Mutex<CanvasState>,
}

impl CanvasSink {
    /// Create an empty canvas sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Export the current canvas as JPEG, or `None` before the first frame.
    pub fn snapshot_jpeg(&self) -> Result<Option<Vec<u8>>, RenderError> {
        let state = self.state.lock().unwrap();
        let Some(canvas) = state.canvas.as_ref() else {
            return Ok(None);
        };

        let mut out = Cursor::new(Vec::new());
        canvas
            .write_to(&mut out, image::ImageFormat::Jpeg)
            .map_err(|e| RenderError::Encode(e.to_string()))?;
        Ok(Some(out.into_inner()))
    }

    /// Labels drawn with the most recent frame, formatted `label confidence`.
    pub fn legend(&self) -> Vec<String> {
        self.state.lock().unwrap().legend.clone()
    }

    /// Current one-line status text.
    pub fn status_line(&self) -> String {
        self.state.lock().unwrap().status.clone()
    }

    /// Snapshot of the stats table in key order.
    pub fn stats(&self) -> BTreeMap<String, String> {
        self.state.lock().unwrap().stats.clone()
    }

    /// Most recent error message, if any.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().unwrap().error.clone()
    }
}

/// Stroke an axis-aligned rectangle outline onto `img`, clamping to bounds.
fn stroke_rect(img: &mut RgbImage, x_min: f64, y_min: f64, x_max: f64, y_max: f64) {
    let (w, h) = img.dimensions();
    let clamp_x = |v: f64| (v.max(0.0) as u32).min(w.saturating_sub(1));
    let clamp_y = |v: f64| (v.max(0.0) as u32).min(h.saturating_sub(1));

    let (x0, x1) = (clamp_x(x_min), clamp_x(x_max));
    let (y0, y1) = (clamp_y(y_min), clamp_y(y_max));

    for t in 0..BOX_STROKE {
        // Horizontal edges.
        for x in x0..=x1 {
            if y0 + t < h {
                img.put_pixel(x, y0 + t, BOX_COLOR);
            }
            if y1 >= t {
                img.put_pixel(x, y1 - t, BOX_COLOR);
            }
        }
        // Vertical edges.
        for y in y0..=y1 {
            if x0 + t < w {
                img.put_pixel(x0 + t, y, BOX_COLOR);
            }
            if x1 >= t {
                img.put_pixel(x1 - t, y, BOX_COLOR);
            }
        }
    }
}

impl RenderSink for CanvasSink {
    fn draw_frame(&self, frame: &CaptureFrame, detections: &[Detection]) -> Result<(), RenderError> {
        let decoded = image::load_from_memory(&frame.bytes)
            .map_err(|e| RenderError::Decode(e.to_string()))?;
        let mut canvas = decoded.to_rgb8();

        let mut legend = Vec::with_capacity(detections.len());
        for det in detections {
            stroke_rect(&mut canvas, det.x_min, det.y_min, det.x_max, det.y_max);
            legend.push(format!("{} {:.2}", det.label, det.confidence));
        }

        let mut state = self.state.lock().unwrap();
        state.canvas = Some(canvas);
        state.legend = legend;
        Ok(())
    }

    fn status(&self, line: &str) {
        let mut state = self.state.lock().unwrap();
        state.status = line.to_string();
    }

    fn set_stat(&self, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        state.stats.insert(key.to_string(), value.to_string());
    }

    fn clear_stats(&self) {
        let mut state = self.state.lock().unwrap();
        state.stats.clear();
    }

    fn show_error(&self, message: &str) {
        log::error!("render sink: {message}");
        let mut state = self.state.lock().unwrap();
        state.error = Some(message.to_string());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Encode a small solid-grey JPEG for use as a fake camera frame.
    fn test_frame(width: u32, height: u32) -> CaptureFrame {
        let img = RgbImage::from_pixel(width, height, Rgb([128, 128, 128]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Jpeg)
            .expect("encode test frame");
        CaptureFrame::jpeg(out.into_inner(), width, height)
    }

    fn dog_at(x_min: f64, y_min: f64) -> Detection {
        Detection {
            label: "dog".into(),
            confidence: 0.91,
            x_min,
            y_min,
            x_max: x_min + 40.0,
            y_max: y_min + 30.0,
        }
    }

    #[test]
    fn draw_frame_populates_canvas_and_legend() {
        let sink = CanvasSink::new();
        let frame = test_frame(64, 48);

        sink.draw_frame(&frame, &[dog_at(5.0, 5.0)]).expect("draw");

        assert_eq!(sink.legend(), vec!["dog 0.91".to_string()]);
        let jpeg = sink.snapshot_jpeg().expect("encode").expect("canvas");
        assert!(!jpeg.is_empty());
    }

    #[test]
    fn draw_frame_clamps_out_of_bounds_boxes() {
        let sink = CanvasSink::new();
        let frame = test_frame(32, 32);

        // Box extends well past the frame; must not panic.
        sink.draw_frame(&frame, &[dog_at(20.0, 20.0)]).expect("draw");
    }

    #[test]
    fn draw_frame_rejects_garbage_bytes() {
        let sink = CanvasSink::new();
        let frame = CaptureFrame::jpeg(vec![1, 2, 3], 640, 480);

        let err = sink.draw_frame(&frame, &[]).unwrap_err();
        assert!(matches!(err, RenderError::Decode(_)));
    }

    #[test]
    fn snapshot_before_first_frame_is_none() {
        let sink = CanvasSink::new();
        assert!(sink.snapshot_jpeg().expect("encode").is_none());
    }

    #[test]
    fn stats_update_and_clear() {
        let sink = CanvasSink::new();
        sink.set_stat("battery", "87.5");
        sink.set_stat("state", "idle");
        assert_eq!(sink.stats().len(), 2);

        sink.clear_stats();
        assert!(sink.stats().is_empty());
    }

    #[test]
    fn status_and_error_are_retained() {
        let sink = CanvasSink::new();
        sink.status("watching");
        sink.show_error("boom");

        assert_eq!(sink.status_line(), "watching");
        assert_eq!(sink.last_error().as_deref(), Some("boom"));
    }
}
