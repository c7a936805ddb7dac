//! Detection and classification value types returned by the inference
//! gateway.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// One detected object in the coordinate space of the inferenced image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Class label, e.g. `"dog"`.
    pub label: String,
    /// Model confidence in `[0.0, 1.0]`.
    pub confidence: f64,
    /// Left edge of the bounding box, pixels.
    pub x_min: f64,
    /// Top edge of the bounding box, pixels.
    pub y_min: f64,
    /// Right edge of the bounding box, pixels.
    pub x_max: f64,
    /// Bottom edge of the bounding box, pixels.
    pub y_max: f64,
}

impl Detection {
    /// `true` when this detection clears `threshold`.
    ///
    /// Comparison is strict greater-than: a detection at exactly the
    /// threshold is rejected.
    pub fn accepted(&self, threshold: f64) -> bool {
        self.confidence > threshold
    }

    /// Bounding box width in pixels.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Bounding box height in pixels.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// One label/score pair from the image classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Class or answer label.
    pub label: String,
    /// Model score in `[0.0, 1.0]`.
    pub score: f64,
}

impl Classification {
    /// Strict greater-than acceptance, same semantics as [`Detection`].
    pub fn accepted(&self, threshold: f64) -> bool {
        self.score > threshold
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
