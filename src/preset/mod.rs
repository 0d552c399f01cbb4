//! Presets — YAML documents bundling the four phase scripts.
//!
//! ```yaml
//! name: spiral
//! init: n = 800
//! frame: rot = rot + 0.02
//! point: |
//!   r = i / n
//!   x = r * cos(i * 0.1 + rot)
//!   y = r * sin(i * 0.1 + rot)
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::vm::ScriptSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Preset {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub init: String,
    #[serde(default)]
    pub frame: String,
    #[serde(default)]
    pub beat: String,
    #[serde(default)]
    pub point: String,
}

impl Preset {
    pub fn from_yaml(yaml: &str) -> Result<Self, io::Error> {
        serde_yaml::from_str(yaml).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn to_yaml(&self) -> Result<String, io::Error> {
        serde_yaml::to_string(self).map_err(io::Error::other)
    }

    pub fn scripts(&self) -> ScriptSet {
        ScriptSet::new(
            self.init.as_str(),
            self.frame.as_str(),
            self.beat.as_str(),
            self.point.as_str(),
        )
    }
}

/// Load a preset from a YAML file.
pub fn load_preset(path: &Path) -> Result<Preset, io::Error> {
    let content = std::fs::read_to_string(path)?;
    Preset::from_yaml(&content)
}

/// Save a preset to a YAML file, creating parent directories as needed.
pub fn save_preset(path: &Path, preset: &Preset) -> Result<(), io::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, preset.to_yaml()?)
}
