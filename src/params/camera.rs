//! Camera controller configuration.

use serde::Deserialize;

/// Camera controller parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraParams {
    /// Distance from the orbit target (world units)
    pub distance: f32,

    /// Auto-pan angular rate (rad/s)
    pub auto_pan_rate: f32,

    /// Follow-mouse sensitivity (radians per pixel of pointer motion)
    pub mouse_sensitivity: f32,

    /// Pitch used by the top view (radians, just short of straight down)
    pub top_pitch_rad: f32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane
    pub far_plane: f32,
}

impl Default for CameraParams {
    fn default() -> Self {
        Self {
            distance: 4.5,
            auto_pan_rate: 0.35,
            mouse_sensitivity: 0.005,
            top_pitch_rad: -1.55,
            fov_degrees: 60.0,
            near_plane: 0.05,
            far_plane: 100.0,
        }
    }
}
