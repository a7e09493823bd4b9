//! Effect toggles and the post-processing pipeline.
//!
//! Highlight, expand and revolve modify geometry while a mode renders; blur,
//! particle and invert are pixel passes run afterwards in that order.

mod particles;
mod pipeline;

use std::fmt;
use std::str::FromStr;

// Re-export public types
pub use particles::{Particle, ParticleField};
pub use pipeline::{box_blur, invert, EffectPipeline};

/// Individually toggleable effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Highlight,
    Expand,
    Revolve,
    Particle,
    Blur,
    Invert,
}

impl EffectKind {
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Highlight,
        EffectKind::Expand,
        EffectKind::Revolve,
        EffectKind::Particle,
        EffectKind::Blur,
        EffectKind::Invert,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Highlight => "highlight",
            EffectKind::Expand => "expand",
            EffectKind::Revolve => "revolve",
            EffectKind::Particle => "particle",
            EffectKind::Blur => "blur",
            EffectKind::Invert => "invert",
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s || (s == "particles" && *kind == EffectKind::Particle))
            .ok_or_else(|| format!("unknown effect '{}'", s))
    }
}

/// Process-wide effect toggles, passed explicitly into rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EffectConfig {
    pub highlight: bool,
    pub expand: bool,
    pub revolve: bool,
    pub particle: bool,
    pub blur: bool,
    pub invert: bool,
}

impl EffectConfig {
    fn flag_mut(&mut self, kind: EffectKind) -> &mut bool {
        match kind {
            EffectKind::Highlight => &mut self.highlight,
            EffectKind::Expand => &mut self.expand,
            EffectKind::Revolve => &mut self.revolve,
            EffectKind::Particle => &mut self.particle,
            EffectKind::Blur => &mut self.blur,
            EffectKind::Invert => &mut self.invert,
        }
    }

    pub fn is_enabled(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Highlight => self.highlight,
            EffectKind::Expand => self.expand,
            EffectKind::Revolve => self.revolve,
            EffectKind::Particle => self.particle,
            EffectKind::Blur => self.blur,
            EffectKind::Invert => self.invert,
        }
    }

    /// Flip one toggle and return its new state
    pub fn toggle(&mut self, kind: EffectKind) -> bool {
        let flag = self.flag_mut(kind);
        *flag = !*flag;
        *flag
    }

    pub fn set(&mut self, kind: EffectKind, enabled: bool) {
        *self.flag_mut(kind) = enabled;
    }

    pub fn enabled(&self) -> Vec<EffectKind> {
        EffectKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}
