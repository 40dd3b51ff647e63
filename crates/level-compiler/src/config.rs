//! Compilation settings.

use brush_kernel::Tolerance;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Editor-only textures that mark invisible faces.
pub const TOOL_TEXTURES: [&str; 5] = ["clip", "trigger", "skip", "hint", "origin"];

/// Settings for [`Compiler`](crate::Compiler).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Geometric thresholds for solid reconstruction and plane construction.
    pub tolerance: Tolerance,
    /// Compile brushes on the rayon thread pool.
    pub parallel: bool,
    /// Drop faces textured with a [`TOOL_TEXTURES`] name.
    pub skip_tool_textures: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            parallel: false,
            skip_tool_textures: false,
        }
    }
}

impl CompileConfig {
    /// Parallel compilation with tool faces removed, for display.
    pub fn viewer() -> Self {
        Self {
            parallel: true,
            skip_tool_textures: true,
            ..Self::default()
        }
    }

    /// Lenient tolerances for hand-edited levels.
    pub fn lenient() -> Self {
        Self {
            tolerance: Tolerance::lenient(),
            ..Self::default()
        }
    }

    /// Load from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Whether `texture` is an editor tool texture, ignoring ASCII case.
pub fn is_tool_texture(texture: &str) -> bool {
    TOOL_TEXTURES.iter().any(|t| t.eq_ignore_ascii_case(texture))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CompileConfig::from_json(r#"{ "parallel": true }"#).unwrap();
        assert!(config.parallel);
        assert!(!config.skip_tool_textures);
        assert_eq!(config.tolerance, Tolerance::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = CompileConfig::viewer();
        let json = config.to_json().unwrap();
        assert_eq!(CompileConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            CompileConfig::from_json("{ parallel: yes }"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_tool_textures() {
        assert!(is_tool_texture("CLIP"));
        assert!(is_tool_texture("trigger"));
        assert!(!is_tool_texture("clipboard"));
        assert!(!is_tool_texture("sky1"));
    }
}
