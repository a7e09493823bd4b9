//! Software canvas, projection, and the windowed presenter.

mod canvas;
mod context;
mod surface;

// Re-export public types
pub use canvas::{hsv_to_rgb, Canvas, Projector, Rgb};
pub use context::RenderContext;
pub use surface::RenderSystem;
