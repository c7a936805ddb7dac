//! Camera / microphone capture abstraction.
//!
//! * [`CaptureSource`] — capability trait the page loops poll for frames and
//!   bracketed audio windows.
//! * [`RobotCaptureSource`] — HTTP implementation over the robot session.
//! * [`CaptureFrame`] / [`AudioClip`] — ephemeral value types, produced and
//!   consumed within a single loop iteration.

pub mod frame;
pub mod source;

pub use frame::{AudioClip, AudioFormat, CaptureFrame, FrameError};
pub use source::{CaptureError, CaptureSource, RobotCaptureSource};
