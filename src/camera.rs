//! Orbit camera with fixed views, mouse follow, and auto-pan.

use glam::{Mat4, Vec3};
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::params::CameraParams;

/// Pitch limit for mouse control (just short of straight up/down)
const PITCH_LIMIT: f32 = 1.55;

/// Camera controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraView {
    Front,
    Rear,
    Top,
    FollowMouse,
    AutoPan,
}

impl CameraView {
    pub fn name(self) -> &'static str {
        match self {
            CameraView::Front => "front",
            CameraView::Rear => "rear",
            CameraView::Top => "top",
            CameraView::FollowMouse => "mouse",
            CameraView::AutoPan => "pan",
        }
    }
}

impl fmt::Display for CameraView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CameraView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" => Ok(CameraView::Front),
            "rear" | "back" => Ok(CameraView::Rear),
            "top" => Ok(CameraView::Top),
            "mouse" | "follow" | "followmouse" => Ok(CameraView::FollowMouse),
            "pan" | "auto" | "autopan" => Ok(CameraView::AutoPan),
            other => Err(format!("unknown camera view '{}'", other)),
        }
    }
}

/// Orientation of the orbit camera around the scene origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    pub view: CameraView,
    /// Rotation about the vertical axis (radians, 0 = looking down -Z)
    pub yaw: f32,
    /// Elevation (radians, negative = looking down on the scene)
    pub pitch: f32,
    pub distance: f32,
    /// Auto-pan rotation phase in [0, 2pi)
    pub pan_phase: f32,
}

impl CameraState {
    /// Eye position in world space
    pub fn eye(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            -self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        ) * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }
}

/// Camera controller: discrete view changes plus continuous auto-pan
pub struct CameraController {
    state: CameraState,
    params: CameraParams,
}

impl CameraController {
    /// Create controller in the front view
    pub fn new(params: CameraParams) -> Self {
        Self {
            state: CameraState {
                view: CameraView::Front,
                yaw: 0.0,
                pitch: 0.0,
                distance: params.distance,
                pan_phase: 0.0,
            },
            params,
        }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    /// Switch view
    ///
    /// Fixed views set their orientation; entering auto-pan continues from the
    /// current yaw; leaving follow-mouse or auto-pan keeps the last orientation.
    pub fn set_state(&mut self, view: CameraView) {
        match view {
            CameraView::Front => {
                self.state.yaw = 0.0;
                self.state.pitch = 0.0;
            }
            CameraView::Rear => {
                self.state.yaw = PI;
                self.state.pitch = 0.0;
            }
            CameraView::Top => {
                self.state.yaw = 0.0;
                self.state.pitch = self.params.top_pitch_rad;
            }
            CameraView::FollowMouse => {}
            CameraView::AutoPan => {
                self.state.pan_phase = self.state.yaw.rem_euclid(TAU);
            }
        }
        debug!("Camera view: {} -> {}", self.state.view, view);
        self.state.view = view;
    }

    /// Apply pointer motion (pixels); ignored unless following the mouse
    pub fn on_pointer_delta(&mut self, dx: f32, dy: f32) {
        if self.state.view != CameraView::FollowMouse {
            return;
        }
        let sensitivity = self.params.mouse_sensitivity;
        self.state.yaw = (self.state.yaw + dx * sensitivity).rem_euclid(TAU);
        self.state.pitch = (self.state.pitch + dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Advance continuous motion by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        if self.state.view == CameraView::AutoPan {
            self.state.pan_phase = (self.state.pan_phase + self.params.auto_pan_rate * dt).rem_euclid(TAU);
            self.state.yaw = self.state.pan_phase;
        }
    }

    /// Combined view-projection matrix for the given aspect ratio
    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(
            self.params.fov_degrees.to_radians(),
            aspect,
            self.params.near_plane,
            self.params.far_plane,
        );
        proj * self.state.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn angle_distance(a: f32, b: f32) -> f32 {
        let d = (a - b).rem_euclid(TAU);
        d.min(TAU - d)
    }

    #[test]
    fn test_fixed_views_set_orientation() {
        let mut camera = CameraController::new(CameraParams::default());

        assert!(camera.state().eye().z > 0.0);

        camera.set_state(CameraView::Rear);
        assert!(camera.state().eye().z < 0.0);

        camera.set_state(CameraView::Top);
        let eye = camera.state().eye();
        assert!(eye.y > eye.z.abs() * 10.0);
    }

    #[test]
    fn test_pointer_only_moves_in_follow_mouse() {
        let mut camera = CameraController::new(CameraParams::default());

        camera.on_pointer_delta(100.0, 0.0);
        assert_eq!(camera.state().yaw, 0.0);

        camera.set_state(CameraView::FollowMouse);
        camera.on_pointer_delta(100.0, 50.0);
        assert!(camera.state().yaw > 0.0);
        assert!(camera.state().pitch > 0.0);

        camera.on_pointer_delta(0.0, 1.0e6);
        assert_eq!(camera.state().pitch, PITCH_LIMIT);
    }

    #[test]
    fn test_leaving_follow_mouse_freezes_orientation() {
        let mut camera = CameraController::new(CameraParams::default());
        camera.set_state(CameraView::FollowMouse);
        camera.on_pointer_delta(120.0, -40.0);
        let before = *camera.state();

        camera.set_state(CameraView::AutoPan);
        assert_eq!(camera.state().yaw, before.yaw);
        assert_eq!(camera.state().pitch, before.pitch);

        camera.advance(1.0);
        camera.set_state(CameraView::FollowMouse);
        let frozen = *camera.state();
        camera.advance(1.0);
        assert_eq!(camera.state().yaw, frozen.yaw);
        assert!(camera.state().yaw != before.yaw);
    }

    #[test]
    fn test_advance_is_noop_outside_auto_pan() {
        let mut camera = CameraController::new(CameraParams::default());
        camera.advance(5.0);
        assert_eq!(camera.state().yaw, 0.0);
    }

    #[test]
    fn test_view_proj_is_finite() {
        let camera = CameraController::new(CameraParams::default());
        let view_proj = camera.view_proj(16.0 / 9.0);
        assert_ne!(view_proj, Mat4::IDENTITY);
        assert!(view_proj.to_cols_array().iter().all(|v| v.is_finite()));
    }

    proptest! {
        #[test]
        fn prop_auto_pan_phase_integrates_rate(
            start in 0.0f32..10.0,
            steps in prop::collection::vec(0.0f32..0.1, 1..200),
        ) {
            let params = CameraParams::default();
            let rate = params.auto_pan_rate;
            let mut camera = CameraController::new(params);
            camera.set_state(CameraView::AutoPan);
            camera.advance(start);

            let phase_t1 = camera.state().pan_phase;
            let elapsed: f32 = steps.iter().sum();
            for dt in &steps {
                camera.advance(*dt);
            }
            let expected = (phase_t1 + rate * elapsed).rem_euclid(TAU);

            prop_assert!(angle_distance(camera.state().pan_phase, expected) < 1e-3);
            prop_assert!(camera.state().pan_phase >= 0.0 && camera.state().pan_phase < TAU);
        }
    }
}
