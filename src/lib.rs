//! Animus library - audio-reactive visualization engine

pub mod analysis;
pub mod audio;
pub mod camera;
pub mod cli;
pub mod controls;
pub mod effects;
pub mod engine;
pub mod error;
pub mod modes;
pub mod params;
pub mod recording;
pub mod render;
