use crate::error::ConfigError;
use crate::geometry::tolerance::{EDGE_PICK_THRESHOLD_PX, NODE_PICK_RADIUS_PX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Editor tunables. Every field has a default, so a partial JSON object
/// (or `{}`) is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub node_pick_radius_px: f64,
    pub edge_pick_threshold_px: f64,
    /// Screen pixels per world unit at zoom step 0.
    pub base_scale: f64,
    /// Scale multiplier per scroll step.
    pub zoom_factor: f64,
    /// Target of the save/load key bindings.
    pub document_path: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            node_pick_radius_px: NODE_PICK_RADIUS_PX,
            edge_pick_threshold_px: EDGE_PICK_THRESHOLD_PX,
            base_scale: 100.0,
            zoom_factor: 1.2,
            document_path: PathBuf::from("graph.json"),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: EditorConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("node_pick_radius_px", self.node_pick_radius_px),
            ("edge_pick_threshold_px", self.edge_pick_threshold_px),
            ("base_scale", self.base_scale),
            ("zoom_factor", self.zoom_factor),
        ];
        for (param, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ConfigError::NotPositive { param });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = EditorConfig::from_json_str(r#"{"base_scale": 50.0}"#).unwrap();
        assert_eq!(cfg.base_scale, 50.0);
        assert_eq!(cfg.zoom_factor, 1.2);
        assert_eq!(cfg.document_path, PathBuf::from("graph.json"));
    }

    #[test]
    fn rejects_non_positive_values() {
        let err = EditorConfig::from_json_str(r#"{"zoom_factor": 0.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::NotPositive { param: "zoom_factor" }));
        assert_eq!(err.code(), "invalid_config");
        let bad = EditorConfig::from_json_str("not json").unwrap_err();
        assert_eq!(bad.code(), "malformed_json");
    }
}
