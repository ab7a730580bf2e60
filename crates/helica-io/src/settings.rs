use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::IoError;

/// Name of the settings file inside a scene folder.
pub const SETTINGS_FILE: &str = "settings.txt";

/// Per-scene display settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Time of the first animation step, in seconds.
    pub time_start: f64,
    /// Time of the last animation step, in seconds.
    pub time_end: f64,
    /// Scale applied to the object models.
    pub models_scale: f64,
    /// Scale applied to the axis glyphs.
    pub glyphs_scale: f64,
    /// Width of one correlation outline ring.
    pub outline_width: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time_start: 0.0,
            time_end: 5.0,
            models_scale: 1.0,
            glyphs_scale: 1.0,
            outline_width: 3.0,
        }
    }
}

impl Settings {
    /// Set a value by its file key. Returns `false` for unknown keys.
    pub fn set(&mut self, key: &str, value: f64) -> bool {
        let field = match key {
            "time_start" => &mut self.time_start,
            "time_end" => &mut self.time_end,
            "models_scale" => &mut self.models_scale,
            "glyphs_scale" => &mut self.glyphs_scale,
            "outline_width" => &mut self.outline_width,
            _ => return false,
        };
        *field = value;
        true
    }

    /// Parse the `name value` lines of a settings file on top of the defaults.
    pub fn parse(text: &str, path: &Path) -> Result<Self, IoError> {
        let mut settings = Self::default();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parse_error = |msg: String| IoError::Parse {
                path: path.to_path_buf(),
                line: i + 1,
                msg,
            };

            let mut parts = line.split_whitespace();
            let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err(parse_error(format!("expected 'name value', got '{line}'")));
            };
            let value = value
                .parse::<f64>()
                .map_err(|e| parse_error(format!("{key}: {e}")))?;

            if !settings.set(key, value) {
                log::warn!("{}:{}: ignoring unknown setting '{key}'", path.display(), i + 1);
            }
        }

        Ok(settings)
    }
}

/// Read a settings file. A missing file yields the defaults.
pub fn read_settings(path: impl AsRef<Path>) -> Result<Settings, IoError> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::info!("no settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }
        Err(e) => return Err(e.into()),
    };
    Settings::parse(&text, path)
}
