//! Frame loop core: audio in, features, mode, camera, effects, pixels out.
//!
//! The engine owns every piece of mutable visualizer state and is driven one
//! tick at a time, either by the window event loop or by headless recording.

use std::f32::consts::TAU;
use tracing::{debug, info};

use crate::analysis::{FeatureExtractor, Features};
use crate::audio::{AudioFrame, AudioInputAdapter, InputStatus};
use crate::camera::{CameraController, CameraState, CameraView};
use crate::effects::{EffectConfig, EffectKind, EffectPipeline};
use crate::modes::{ActiveMode, ModeKind, ModeParams};
use crate::params::{EffectParams, VisualizerConfig};
use crate::render::{Canvas, Projector, RenderContext};

/// User-facing command applied between ticks
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SwitchMode(ModeKind),
    NextMode,
    ToggleEffect(EffectKind),
    SetCameraState(CameraView),
    SetSensitivity(f32),
    /// Add a delta to the current sensitivity gain
    AdjustSensitivity(f32),
    /// Pointer motion in pixels since the last event
    PointerDelta { dx: f32, dy: f32 },
}

/// Visualizer engine
pub struct Engine {
    adapter: AudioInputAdapter,
    extractor: FeatureExtractor,
    mode_params: ModeParams,
    mode: ActiveMode,
    camera: CameraController,
    effects: EffectConfig,
    effect_params: EffectParams,
    pipeline: EffectPipeline,
    canvas: Canvas,
    revolve_angle: f32,
    fresh_frame: Option<AudioFrame>,
    /// Time covered by ticks that reused features, owed to the next fresh frame
    held_dt: f32,
    ticks: u64,
}

impl Engine {
    /// Create an engine reading from `adapter`, starting in vortex mode with the front camera
    pub fn new(config: &VisualizerConfig, adapter: AudioInputAdapter) -> Self {
        let extractor = FeatureExtractor::new(&config.fft, adapter.sample_rate());
        let mode_params = ModeParams::from(config);
        let mode = ActiveMode::new(ModeKind::Vortex, &mode_params);

        info!(
            "Engine ready: {} bands, {}x{} canvas, {} Hz input",
            config.fft.band_count,
            config.render.canvas_width,
            config.render.canvas_height,
            adapter.sample_rate()
        );

        Self {
            adapter,
            extractor,
            mode_params,
            mode,
            camera: CameraController::new(config.camera.clone()),
            effects: EffectConfig::default(),
            effect_params: config.effects.clone(),
            pipeline: EffectPipeline::new(&config.effects),
            canvas: Canvas::new(config.render.canvas_width, config.render.canvas_height),
            revolve_angle: 0.0,
            fresh_frame: None,
            held_dt: 0.0,
            ticks: 0,
        }
    }

    /// Run one frame of `dt` seconds and return the finished canvas
    ///
    /// Never waits on capture: if no new frame has been published the
    /// previous features are reused, and the skipped time is folded into
    /// the smoothing step of the next fresh frame.
    pub fn tick(&mut self, dt: f32) -> &Canvas {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        self.fresh_frame = self.adapter.poll_frame();
        let features = match &self.fresh_frame {
            Some(frame) => {
                let elapsed = self.held_dt + dt;
                self.held_dt = 0.0;
                self.extractor.process(frame, elapsed).clone()
            }
            None => {
                self.held_dt += dt;
                self.extractor.hold().clone()
            }
        };

        self.mode.update(&features.bands, features.level, dt);
        self.camera.advance(dt);
        if self.effects.revolve {
            self.revolve_angle = (self.revolve_angle + self.effect_params.revolve_rate * dt).rem_euclid(TAU);
        }

        self.canvas.clear();
        let projector = Projector::new(
            self.camera.view_proj(self.canvas.aspect_ratio()),
            self.canvas.width(),
            self.canvas.height(),
        );
        let ctx = RenderContext::new(
            self.camera.state(),
            &self.effects,
            &self.effect_params,
            projector,
            features.level,
            self.revolve_angle,
        );
        self.mode.render(&ctx, &mut self.canvas);
        self.pipeline.apply(&mut self.canvas, &self.effects, features.level, dt);

        self.ticks += 1;
        &self.canvas
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::SwitchMode(kind) => self.switch_mode(kind),
            Command::NextMode => self.switch_mode(self.mode.kind().next()),
            Command::ToggleEffect(kind) => {
                self.toggle_effect(kind);
            }
            Command::SetCameraState(view) => self.set_camera_state(view),
            Command::SetSensitivity(gain) => {
                self.set_sensitivity(gain);
            }
            Command::AdjustSensitivity(delta) => {
                self.set_sensitivity(self.extractor.sensitivity() + delta);
            }
            Command::PointerDelta { dx, dy } => self.camera.on_pointer_delta(dx, dy),
        }
    }

    /// Replace the active mode with a fresh instance of `kind`
    pub fn switch_mode(&mut self, kind: ModeKind) {
        self.mode.switch(kind, &self.mode_params);
    }

    /// Flip an effect toggle and return its new state
    pub fn toggle_effect(&mut self, kind: EffectKind) -> bool {
        let enabled = self.effects.toggle(kind);
        info!("Effect {}: {}", kind, if enabled { "on" } else { "off" });
        enabled
    }

    pub fn set_effect(&mut self, kind: EffectKind, enabled: bool) {
        self.effects.set(kind, enabled);
    }

    pub fn set_camera_state(&mut self, view: CameraView) {
        self.camera.set_state(view);
    }

    /// Set the sensitivity gain (clamped); returns the applied value
    pub fn set_sensitivity(&mut self, gain: f32) -> f32 {
        let applied = self.extractor.set_sensitivity(gain);
        info!("Sensitivity: {:.2}", applied);
        applied
    }

    /// Start keeping every input sample for recording; `false` if the input cannot tap
    pub fn start_audio_tap(&mut self) -> bool {
        self.adapter.start_tap()
    }

    /// Input samples since the last drain, or `None` when no tap is running
    pub fn drain_audio_tap(&mut self) -> Option<Vec<f32>> {
        self.adapter.drain_tap()
    }

    /// Pending audio warning for display (cleared on read)
    pub fn take_warning(&mut self) -> Option<String> {
        self.adapter.take_warning()
    }

    pub fn mode(&self) -> &ActiveMode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn camera(&self) -> &CameraState {
        self.camera.state()
    }

    pub fn effects(&self) -> &EffectConfig {
        &self.effects
    }

    pub fn features(&self) -> &Features {
        self.extractor.hold()
    }

    pub fn sensitivity(&self) -> f32 {
        self.extractor.sensitivity()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Audio frame analyzed by the last tick, if a fresh one arrived
    pub fn fresh_frame(&self) -> Option<&AudioFrame> {
        self.fresh_frame.as_ref()
    }

    pub fn input_status(&self) -> InputStatus {
        self.adapter.status()
    }

    pub fn sample_rate(&self) -> u32 {
        self.adapter.sample_rate()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        debug!("Engine stopped after {} ticks", self.ticks);
    }
}
