use crate::core::error::{Error, Result};
use crate::core::phase::TrackOptions;
use crate::core::tracker::TrackerSettings;
use crate::utils::config_file;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound for the completion animation window
pub const MAX_ANIMATION_COMPLETE_MS: u64 = 10_000;

/// Progress display configuration shared by every slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// How long the settled indicator stays up after a transfer stops
    /// (default: 300ms, max: 10s)
    #[serde(default = "default_animation_complete_ms")]
    pub animation_complete_ms: u64,
    #[serde(default = "default_true")]
    pub track_download: bool,
    #[serde(default)]
    pub track_upload: bool,
    #[serde(default)]
    pub show_cancel_control: bool,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            animation_complete_ms: default_animation_complete_ms(),
            track_download: true,
            track_upload: false,
            show_cancel_control: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_animation_complete_ms() -> u64 {
    300
}

impl ProgressConfig {
    /// Rejects values that would make the animation window meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.animation_complete_ms > MAX_ANIMATION_COMPLETE_MS {
            return Err(Error::config(
                "animation_complete_ms",
                format!(
                    "{} exceeds the maximum of {MAX_ANIMATION_COMPLETE_MS}",
                    self.animation_complete_ms
                ),
            ));
        }
        Ok(())
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            options: TrackOptions {
                track_download: self.track_download,
                track_upload: self.track_upload,
            },
            show_cancel_control: self.show_cancel_control,
            animation_complete: Duration::from_millis(
                self.animation_complete_ms.min(MAX_ANIMATION_COMPLETE_MS),
            ),
        }
    }
}

/// Saves the config to `path` using an atomic write pattern.
/// 1. Writes to a temporary file next to the target.
/// 2. Sets restrictive permissions (0o600) on Unix.
/// 3. Atomically renames to the target path.
pub async fn save_config_to(config: &ProgressConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    let temp_path = path.with_extension("json.tmp");

    #[cfg(unix)]
    {
        use tokio::fs::OpenOptions;
        use tokio::io::AsyncWriteExt;

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .mode(0o600)
            .open(&temp_path)
            .await?;

        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    #[cfg(not(unix))]
    {
        use tokio::io::AsyncWriteExt;

        let mut file = tokio::fs::File::create(&temp_path).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
    }

    tokio::fs::rename(&temp_path, path).await?;
    Ok(())
}

/// Saves the config to `<data dir>/config.json`.
pub async fn save_config(config: &ProgressConfig) -> Result<()> {
    if let Some(path) = config_file() {
        save_config_to(config, &path).await?;
    }
    Ok(())
}

/// Loads a config file, failing on unreadable or invalid content.
pub async fn load_config_from(path: &Path) -> Result<ProgressConfig> {
    let json = tokio::fs::read_to_string(path).await?;
    let config: ProgressConfig = serde_json::from_str(&json)?;
    config.validate()?;
    Ok(config)
}

/// Loads `<data dir>/config.json`, or returns defaults if it is missing or
/// broken.
pub async fn load_config() -> ProgressConfig {
    let Some(path) = config_file() else {
        return ProgressConfig::default();
    };

    match load_config_from(&path).await {
        Ok(config) => config,
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => ProgressConfig::default(),
        Err(e) => {
            tracing::warn!("Ignoring config at {}: {}", path.display(), e);
            ProgressConfig::default()
        }
    }
}
