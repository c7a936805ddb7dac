//! Robot platform session — authenticated handshake and telemetry reads.
//!
//! [`RobotSession::connect`] performs the one-time api-key handshake against
//! the robot host.  Connection failure is terminal: `main` logs it and
//! aborts, there is no retry (see the startup sequence in `main.rs`).
//!
//! Telemetry polling is exposed through the [`TelemetrySource`] trait so the
//! system-monitor page can be tested without a robot on the network.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::RobotConfig;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Errors that can occur while connecting to or talking to the robot.
#[derive(Debug, Error)]
pub enum SessionError {
    /// HTTP transport or connection error.
    #[error("robot request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("robot request timed out")]
    Timeout,

    /// The handshake response was missing the session token.
    #[error("handshake response carried no session token")]
    NoToken,

    /// A response body could not be parsed as the expected JSON.
    #[error("failed to parse robot response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SessionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SessionError::Timeout
        } else {
            SessionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// StatusReport
// ---------------------------------------------------------------------------

/// One telemetry snapshot from the robot.
///
/// Readings are keyed by sensor field name.  A field absent from one poll is
/// simply not present in the map — the monitor page leaves the previously
/// displayed value stale rather than clearing it.
#[derive(Debug, Clone, Default)]
pub struct StatusReport {
    /// Present sensor readings, rendered to display strings.
    pub readings: BTreeMap<String, String>,
}

impl StatusReport {
    /// Build a report from a JSON object, skipping non-scalar values.
    ///
    /// Malformed or nested fields are tolerated by omission, matching the
    /// defensive presence checks the monitor relies on.
    pub fn from_json(value: &serde_json::Value) -> Self {
        let mut readings = BTreeMap::new();
        if let Some(map) = value.as_object() {
            for (key, val) in map {
                let rendered = match val {
                    serde_json::Value::String(s) => Some(s.clone()),
                    serde_json::Value::Number(n) => Some(n.to_string()),
                    serde_json::Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                };
                if let Some(text) = rendered {
                    readings.insert(key.clone(), text);
                }
            }
        }
        Self { readings }
    }
}

// ---------------------------------------------------------------------------
// TelemetrySource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for robot telemetry reads.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn TelemetrySource>` and polled from the monitor page loop.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Fetch the current telemetry snapshot.
    async fn read_status(&self) -> Result<StatusReport, SessionError>;
}

// Compile-time assertion: Box<dyn TelemetrySource> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn TelemetrySource>) {}
};

// ---------------------------------------------------------------------------
// RobotSession
// ---------------------------------------------------------------------------

/// Authenticated HTTP session with the robot host.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` is already
/// reference-counted.
pub struct RobotSession {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RobotSession {
    /// Perform the api-key handshake and return a live session.
    ///
    /// The credential payload, auth entity (key id) and signaling address
    /// come from [`RobotConfig`]; nothing is hardcoded.
    ///
    /// # Errors
    ///
    /// Any transport failure, timeout, or a handshake response without a
    /// token.  Callers treat this as fatal at startup.
    pub async fn connect(config: &RobotConfig) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let base_url = normalize_base_url(&config.host);

        let body = serde_json::json!({
            "credential": {
                "type": "api-key",
                "payload": config.api_key,
            },
            "auth_entity": config.api_key_id,
            "signaling_address": config.signaling_address,
        });

        let response = client
            .post(format!("{base_url}/api/session"))
            .json(&body)
            .send()
            .await?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SessionError::Parse(e.to_string()))?;

        let token = json["token"]
            .as_str()
            .ok_or(SessionError::NoToken)?
            .to_string();

        log::info!("robot session established with {base_url}");

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Base URL of the robot host, scheme included.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue an authenticated GET and return the raw response.
    pub(crate) async fn get(&self, path: &str) -> Result<reqwest::Response, SessionError> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(response)
    }

    /// Issue an authenticated POST with an empty body.
    pub(crate) async fn post(&self, path: &str) -> Result<reqwest::Response, SessionError> {
        let response = self
            .client
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl TelemetrySource for RobotSession {
    async fn read_status(&self) -> Result<StatusReport, SessionError> {
        let response = self.get("/api/status").await?;
        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SessionError::Parse(e.to_string()))?;
        Ok(StatusReport::from_json(&json))
    }
}

/// Prefix the host with `http://` unless a scheme is already present.
fn normalize_base_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", host.trim_end_matches('/'))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
