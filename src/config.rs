//! Engine configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty document is a
//! valid configuration:
//!
//! ```toml
//! [display]
//! width = 480
//! height = 320
//!
//! [input]
//! cell_width = 8
//! cell_height = 16
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Top-level configuration handed to [`Context::new`](crate::engine::Context::new).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub display: DisplayConfig,
    pub input: InputConfig,
}

/// Display resolution. Screens are created with this size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
        }
    }
}

/// Scaling from terminal cells to screen pixels for pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            cell_width: 1,
            cell_height: 1,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "loading engine config");
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<()> {
        if self.display.width <= 0 || self.display.height <= 0 {
            return Err(EngineError::configuration(format!(
                "display size must be positive, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        if self.input.cell_width <= 0 || self.input.cell_height <= 0 {
            return Err(EngineError::configuration("input cell size must be positive"));
        }
        Ok(())
    }
}
