//! Recognizer configuration
//!
//! Stored as JSON under the platform config directory
//! (`<config_dir>/fingerspell/config.json`). Missing fields fall back to
//! their defaults so older files keep loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FingerspellError, Result};
use crate::geometry::NEAR_THRESHOLD;

/// Tunables for the recognition pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Minimum time between two transcript appends (ms)
    pub cooldown_ms: u64,
    /// Fingertip proximity threshold in normalized frame units
    pub near_threshold: f32,
    /// Only evaluate rules marked stable
    pub skip_flagged_rules: bool,
    /// Observations buffered for the background worker before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 2000,
            near_threshold: NEAR_THRESHOLD,
            skip_flagged_rules: false,
            queue_capacity: 2,
        }
    }
}

impl RecognizerConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("fingerspell");
            p.push("config.json");
            p
        })
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&contents)?;
        config.sanitize();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)?;
        Ok(())
    }

    /// Load from the default location, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config at {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path().ok_or(FingerspellError::NoConfigDir)?;
        self.save_to_file(&path)
    }

    /// Clamp values that would stall or disable the pipeline
    fn sanitize(&mut self) {
        self.queue_capacity = self.queue_capacity.max(1);
        if !self.near_threshold.is_finite() || self.near_threshold < 0.0 {
            self.near_threshold = NEAR_THRESHOLD;
        }
    }
}
