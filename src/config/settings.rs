//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// RobotConfig
// ---------------------------------------------------------------------------

/// Connection settings for the remote robot platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    /// Host address of the main part of the robot.
    pub host: String,
    /// API key credential payload.
    pub api_key: String,
    /// API key identifier, sent as the auth entity during the handshake.
    pub api_key_id: String,
    /// Signaling endpoint used during session negotiation.
    pub signaling_address: String,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            host: "robot.local:8080".into(),
            api_key: String::new(),
            api_key_id: String::new(),
            signaling_address: "https://app.viam.com:443".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// GatewayConfig
// ---------------------------------------------------------------------------

/// Settings for the remote inference gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the inference service endpoint.
    pub base_url: String,
    /// API key — `None` for deployments that require no authentication.
    pub api_key: Option<String>,
    /// Name of the vision service used for object detection.
    pub detector_name: String,
    /// Name of the vision service used for classification.
    pub classifier_name: String,
    /// Chat model identifier sent with completion requests.
    pub chat_model: String,
    /// Maximum seconds to wait for any remote call before timing out.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".into(),
            api_key: None,
            detector_name: "coco-detector".into(),
            classifier_name: "vqa-classifier".into(),
            chat_model: "gpt-4o-mini".into(),
            timeout_secs: 15,
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

/// Settings for camera frame and microphone capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Target frame width in pixels after downsampling.
    pub frame_width: u32,
    /// Target frame height in pixels after downsampling.
    pub frame_height: u32,
    /// Length of the recording window used by the vision Q&A page,
    /// milliseconds.
    pub audio_window_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_width: 640,
            frame_height: 480,
            audio_window_ms: 3_000,
        }
    }
}

// ---------------------------------------------------------------------------
// SchedulerConfig
// ---------------------------------------------------------------------------

/// Page scheduler timing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Delay between system-monitor telemetry polls, milliseconds.
    pub monitor_poll_ms: u64,
    /// Delay between object-detector iterations, milliseconds.
    pub detector_poll_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            monitor_poll_ms: 1_000,
            detector_poll_ms: 250,
        }
    }
}

// ---------------------------------------------------------------------------
// DetectorConfig
// ---------------------------------------------------------------------------

/// Object-detector page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum confidence for a detection to be accepted.  Comparison is
    /// strict greater-than: a detection at exactly this value is dropped.
    pub confidence_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
        }
    }
}

// ---------------------------------------------------------------------------
// SpellerConfig
// ---------------------------------------------------------------------------

/// Gesture-speller page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellerConfig {
    /// Gesture label that, when seen twice consecutively, ends a round.
    pub terminator: String,
    /// Minimum confidence for a gesture to be accepted (strict greater-than).
    pub confidence_threshold: f64,
    /// Pause after each accepted letter so the same gesture is not read
    /// twice, milliseconds.
    pub inter_letter_delay_ms: u64,
}

impl Default for SpellerConfig {
    fn default() -> Self {
        Self {
            terminator: "V".into(),
            confidence_threshold: 0.7,
            inter_letter_delay_ms: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use robot_kiosk::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Robot connection settings.
    pub robot: RobotConfig,
    /// Remote inference gateway settings.
    pub gateway: GatewayConfig,
    /// Camera / microphone capture settings.
    pub capture: CaptureConfig,
    /// Page scheduler timing.
    pub scheduler: SchedulerConfig,
    /// Object-detector page settings.
    pub detector: DetectorConfig,
    /// Gesture-speller page settings.
    pub speller: SpellerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            gateway: GatewayConfig::default(),
            capture: CaptureConfig::default(),
            scheduler: SchedulerConfig::default(),
            detector: DetectorConfig::default(),
            speller: SpellerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
