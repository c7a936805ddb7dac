//! Robot kiosk — a thin client that drives remote AI services over a live
//! robot camera and microphone.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   frames/audio   ┌────────────────┐
//! │ capture    │◀────────────────▶│                │
//! ├────────────┤                  │  scheduler     │   one active
//! │ gateway    │◀── inference ───▶│  (page loops)  │◀── page at a
//! ├────────────┤                  │                │     time
//! │ robot      │◀── telemetry ───▶│                │
//! └────────────┘                  └───────┬────────┘
//!                                         │ draw / status / speech
//!                                   ┌─────▼──────┐
//!                                   │   render   │
//!                                   └────────────┘
//! ```
//!
//! The scheduler owns the fixed page set (system monitor, object detector,
//! gesture speller, vision Q&A) and guarantees mutual exclusion over the
//! shared capture device and canvas: switching pages cancels the outgoing
//! loop's token and awaits its completion before the next loop starts.

pub mod capture;
pub mod config;
pub mod gateway;
pub mod pages;
pub mod render;
pub mod robot;
pub mod scheduler;

#[cfg(test)]
pub mod testutil;
