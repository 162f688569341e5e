//! Mind map configuration.

use serde::{Deserialize, Serialize};

use crate::tree::Measure;

/// Behaviour switches and tuning constants of a mind map.
///
/// Deserialized from a plain JS object; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MindMapConfig {
    /// Allow structural edits (add, remove, drag, title editing).
    pub editing: bool,
    /// Allow toggling the `marked` flag.
    pub marking: bool,
    /// Only zoom with the wheel while ctrl is held.
    pub force_ctrl_for_wheel: bool,
    /// Lower bound of the scale factor.
    pub min_scale: f64,
    /// Factor applied by `scale_up` / `scale_down`.
    pub scale_step: f64,
    /// Scale change per wheel notch.
    pub wheel_step: f64,
    /// Pointer travel in pixels before a press turns into a drag.
    pub drag_threshold: f64,
    /// Extra room around the map when fitting it into the viewport.
    pub fit_padding: f64,
    /// Measurement used when no measurer is installed.
    pub default_measure: Measure,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            editing: true,
            marking: true,
            force_ctrl_for_wheel: true,
            min_scale: 0.1,
            scale_step: 1.5,
            wheel_step: 0.1,
            drag_threshold: 4.0,
            fit_padding: 80.0,
            default_measure: Measure::boxed(100.0, 24.0, 10.0),
        }
    }
}
