//! Visualization modes sharing the update/render contract.
//!
//! Exactly one mode is active at a time. Switching discards the active mode's
//! state and builds the next one from scratch.

mod droplet;
mod terrain;
mod vortex;

use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::analysis::SpectralBands;
use crate::error::VisualizerError;
use crate::params::{DropletParams, TerrainParams, VisualizerConfig, VortexParams};
use crate::render::{Canvas, RenderContext};

// Re-export public types
pub use droplet::DropletMode;
pub use terrain::TerrainMode;
pub use vortex::VortexMode;

/// Contract shared by all visualization modes
pub trait VisualMode {
    fn kind(&self) -> ModeKind;

    /// Advance animated state by `dt` seconds from the current features
    fn update(&mut self, bands: &SpectralBands, level: f32, dt: f32);

    /// Draw the current state
    fn render(&self, ctx: &RenderContext, canvas: &mut Canvas);

    /// How far the state is from the idle configuration (0 at rest)
    fn rest_deviation(&self) -> f32;
}

/// Available modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Vortex,
    Terrain,
    Droplet,
}

impl ModeKind {
    pub const ALL: [ModeKind; 3] = [ModeKind::Vortex, ModeKind::Terrain, ModeKind::Droplet];

    pub fn name(self) -> &'static str {
        match self {
            ModeKind::Vortex => "vortex",
            ModeKind::Terrain => "terrain",
            ModeKind::Droplet => "droplet",
        }
    }

    /// Cycle order used by the "next mode" key
    pub fn next(self) -> Self {
        match self {
            ModeKind::Vortex => ModeKind::Terrain,
            ModeKind::Terrain => ModeKind::Droplet,
            ModeKind::Droplet => ModeKind::Vortex,
        }
    }

    pub fn from_index(index: usize) -> Result<Self, VisualizerError> {
        Self::ALL.get(index).copied().ok_or_else(|| {
            VisualizerError::InvalidModeTransition(format!("no mode at index {}", index))
        })
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeKind {
    type Err = VisualizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| VisualizerError::InvalidModeTransition(format!("unknown mode '{}'", s)))
    }
}

/// Parameters needed to build any mode
#[derive(Debug, Clone)]
pub struct ModeParams {
    pub band_count: usize,
    pub vortex: VortexParams,
    pub terrain: TerrainParams,
    pub droplet: DropletParams,
}

impl From<&VisualizerConfig> for ModeParams {
    fn from(config: &VisualizerConfig) -> Self {
        Self {
            band_count: config.fft.band_count,
            vortex: config.vortex.clone(),
            terrain: config.terrain.clone(),
            droplet: config.droplet.clone(),
        }
    }
}

/// The single active mode; each variant owns disjoint state
pub enum ActiveMode {
    Vortex(VortexMode),
    Terrain(TerrainMode),
    Droplet(DropletMode),
}

impl ActiveMode {
    /// Fresh-initialized mode of the given kind
    pub fn new(kind: ModeKind, params: &ModeParams) -> Self {
        match kind {
            ModeKind::Vortex => ActiveMode::Vortex(VortexMode::new(params.vortex.clone(), params.band_count)),
            ModeKind::Terrain => ActiveMode::Terrain(TerrainMode::new(params.terrain.clone())),
            ModeKind::Droplet => ActiveMode::Droplet(DropletMode::new(params.droplet.clone())),
        }
    }

    /// Discard the current state and activate a fresh `next`
    pub fn switch(&mut self, next: ModeKind, params: &ModeParams) {
        info!("Mode: {} -> {}", self.kind(), next);
        *self = Self::new(next, params);
    }

    pub fn as_mode(&self) -> &dyn VisualMode {
        match self {
            ActiveMode::Vortex(mode) => mode,
            ActiveMode::Terrain(mode) => mode,
            ActiveMode::Droplet(mode) => mode,
        }
    }

    pub fn as_mode_mut(&mut self) -> &mut dyn VisualMode {
        match self {
            ActiveMode::Vortex(mode) => mode,
            ActiveMode::Terrain(mode) => mode,
            ActiveMode::Droplet(mode) => mode,
        }
    }

    pub fn kind(&self) -> ModeKind {
        self.as_mode().kind()
    }

    pub fn update(&mut self, bands: &SpectralBands, level: f32, dt: f32) {
        self.as_mode_mut().update(bands, level, dt);
    }

    pub fn render(&self, ctx: &RenderContext, canvas: &mut Canvas) {
        self.as_mode().render(ctx, canvas);
    }

    pub fn rest_deviation(&self) -> f32 {
        self.as_mode().rest_deviation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ModeParams {
        ModeParams::from(&VisualizerConfig::default())
    }

    #[test]
    fn test_mode_names_round_trip_and_cycle() {
        for kind in ModeKind::ALL {
            assert_eq!(kind.name().parse::<ModeKind>().unwrap(), kind);
            assert_eq!(kind.next().next().next(), kind);
        }
        assert!(matches!(
            "plasma".parse::<ModeKind>(),
            Err(VisualizerError::InvalidModeTransition(_))
        ));
        assert!(ModeKind::from_index(3).is_err());
        assert_eq!(ModeKind::from_index(1).unwrap(), ModeKind::Terrain);
    }

    #[test]
    fn test_all_modes_converge_to_rest_on_silence() {
        let params = params();
        let loud = SpectralBands::new(vec![1.0; params.band_count]);
        let silent = SpectralBands::zeros(params.band_count);

        for kind in ModeKind::ALL {
            let mut mode = ActiveMode::new(kind, &params);
            for _ in 0..30 {
                mode.update(&loud, 1.0, 1.0 / 60.0);
            }
            assert!(mode.rest_deviation() > 0.01, "{} did not react", kind);

            // Ten seconds of silence is well past every decay horizon
            for _ in 0..600 {
                mode.update(&silent, 0.0, 1.0 / 60.0);
            }
            assert!(
                mode.rest_deviation() < 1e-3,
                "{} still {} from rest",
                kind,
                mode.rest_deviation()
            );
        }
    }

    #[test]
    fn test_switch_starts_fresh() {
        let params = params();
        let loud = SpectralBands::new(vec![1.0; params.band_count]);
        let mut mode = ActiveMode::new(ModeKind::Vortex, &params);

        for kind in [ModeKind::Terrain, ModeKind::Droplet, ModeKind::Vortex, ModeKind::Vortex] {
            for _ in 0..20 {
                mode.update(&loud, 1.0, 1.0 / 60.0);
            }
            mode.switch(kind, &params);
            assert_eq!(mode.kind(), kind);
            assert_eq!(mode.rest_deviation(), 0.0);
        }
    }
}
