//! Robot platform connection — session handshake and telemetry.

pub mod session;

pub use session::{RobotSession, SessionError, StatusReport, TelemetrySource};
