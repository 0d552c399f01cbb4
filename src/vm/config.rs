//! VM configuration — loads optional ~/.superscope/config.yaml.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Sample-count range and RNG seed for a [`SuperscopeVm`](super::SuperscopeVm).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScopeConfig {
    /// Lower bound for the sample count.
    #[serde(default = "default_min_samples")]
    pub min_samples: usize,
    /// Upper bound for the sample count.
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,
    /// Sample count before any script sets `n`.
    #[serde(default = "default_samples")]
    pub default_samples: usize,
    /// Seed for the script `rand()` generator.
    #[serde(default)]
    pub seed: u64,
}

fn default_min_samples() -> usize {
    16
}

fn default_max_samples() -> usize {
    8192
}

fn default_samples() -> usize {
    100
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            max_samples: default_max_samples(),
            default_samples: default_samples(),
            seed: 0,
        }
    }
}

impl ScopeConfig {
    /// Make the range usable: `1 <= min <= default <= max`.
    pub fn normalized(mut self) -> Self {
        if self.min_samples > self.max_samples {
            std::mem::swap(&mut self.min_samples, &mut self.max_samples);
        }
        self.min_samples = self.min_samples.max(1);
        self.max_samples = self.max_samples.max(self.min_samples);
        self.default_samples = self.clamp_samples(self.default_samples);
        self
    }

    pub fn clamp_samples(&self, samples: usize) -> usize {
        samples.clamp(self.min_samples, self.max_samples)
    }

    /// Parse a YAML document; missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str::<ScopeConfig>(yaml).map(ScopeConfig::normalized)
    }

    /// Load ~/.superscope/config.yaml, falling back to defaults when the
    /// file is missing or unreadable.
    pub fn load() -> Self {
        config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|content| Self::from_yaml(&content).ok())
            .unwrap_or_default()
    }
}

/// Get the config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".superscope").join("config.yaml"))
}
