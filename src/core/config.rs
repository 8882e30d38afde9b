//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.fete/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::core::navigation::{DEFAULT_VOLUME, Timings};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FeteConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub effects: EffectsConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub recipient: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TimingConfig {
    pub transition_ms: Option<u64>,
    pub effect_delay_ms: Option<u64>,
    pub autoplay_ms: Option<u64>,
    pub loading_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AudioConfig {
    pub enabled: Option<bool>,
    pub volume: Option<f32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EffectsConfig {
    pub particles: Option<bool>,
    pub max_particles: Option<usize>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TITLE: &str = "fete";
pub const DEFAULT_MAX_PARTICLES: usize = 400;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub recipient: String,
    pub title: String,
    pub timings: Timings,
    pub audio_enabled: bool,
    pub volume: f32,
    pub particles: bool,
    pub max_particles: usize,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.fete/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".fete").join("config.toml"))
}

/// Load config from `~/.fete/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FeteConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FeteConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FeteConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FeteConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: FeteConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# fete configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# recipient = "Sam"              # Or set FETE_RECIPIENT, or pass --recipient
# title = "fete"

# [timing]
# transition_ms = 500            # Slide transition lock
# effect_delay_ms = 300          # Delay before arrival effects
# autoplay_ms = 4000             # Quote carousel interval
# loading_ms = 2000              # Loading screen

# [audio]
# enabled = true                 # FETE_NO_AUDIO=1 or --mute turns it off
# volume = 0.5                   # 0.0 to 1.0, or set FETE_VOLUME

# [effects]
# particles = true
# max_particles = 400
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// `f32::clamp` lets NaN through, so non-finite volumes are dropped here.
fn finite_volume(source: &str, volume: f32) -> Option<f32> {
    if volume.is_finite() {
        Some(volume)
    } else {
        warn!("Ignoring {} = {}, volume must be a number", source, volume);
        None
    }
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_recipient` is from the `--recipient` flag (None = not specified),
/// `cli_mute` from `--mute`.
pub fn resolve(config: &FeteConfig, cli_recipient: Option<&str>, cli_mute: bool) -> ResolvedConfig {
    // Recipient: CLI → env → config → nobody in particular
    let recipient = cli_recipient
        .map(|s| s.to_string())
        .or_else(|| std::env::var("FETE_RECIPIENT").ok())
        .or_else(|| config.general.recipient.clone())
        .unwrap_or_default();

    // Audio: --mute and FETE_NO_AUDIO both win over the file
    let env_no_audio = std::env::var("FETE_NO_AUDIO").is_ok_and(|v| v != "0");
    let audio_enabled = !cli_mute && !env_no_audio && config.audio.enabled.unwrap_or(true);

    // Volume: env → config → default
    let volume = std::env::var("FETE_VOLUME")
        .ok()
        .and_then(|v| match v.parse::<f32>() {
            Ok(parsed) => finite_volume("FETE_VOLUME", parsed),
            Err(e) => {
                warn!("Ignoring FETE_VOLUME={:?}: {}", v, e);
                None
            }
        })
        .or_else(|| config.audio.volume.and_then(|v| finite_volume("[audio] volume", v)))
        .unwrap_or(DEFAULT_VOLUME)
        .clamp(0.0, 1.0);

    ResolvedConfig {
        recipient,
        title: config
            .general
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        timings: resolve_timings(&config.timing),
        audio_enabled,
        volume,
        particles: config.effects.particles.unwrap_or(true),
        max_particles: config
            .effects
            .max_particles
            .unwrap_or(DEFAULT_MAX_PARTICLES),
    }
}

fn resolve_timings(timing: &TimingConfig) -> Timings {
    let defaults = Timings::default();
    Timings {
        transition_ms: timing.transition_ms.unwrap_or(defaults.transition_ms),
        effect_delay_ms: timing.effect_delay_ms.unwrap_or(defaults.effect_delay_ms),
        autoplay_ms: timing.autoplay_ms.unwrap_or(defaults.autoplay_ms),
        loading_ms: timing.loading_ms.unwrap_or(defaults.loading_ms),
        ..defaults
    }
}
