//! Core library for the Pulseline audio spectrum visualiser.
//!
//! The crate turns raw FFT frames into a row (or column) of animated line
//! segments whose lengths track per-bin dB magnitude, plus a color pipeline
//! that picks the paint color from competing sources (accent, album art,
//! lava lamp, static). Each module owns a distinct subsystem: geometry
//! layout, per-bar animation, dB smoothing, color animation, color-source
//! policy and the draw boundary. The host view, settings store and FFT
//! source stay outside; they talk to [`SolidLineRenderer`] through the
//! boundary calls it exposes.

pub mod animator;
pub mod color;
pub mod config;
pub mod error;
pub mod layout;
pub mod policy;
pub mod render;
pub mod renderer;
pub mod smoothing;
pub mod spectrum;

pub use animator::{ColorAnimator, ColorEvent};
pub use color::{contrast_ratio, ensure_contrast, Color};
pub use config::RendererConfig;
pub use error::{PulseVizError, Result};
pub use layout::{BarLayout, Orientation};
pub use policy::ColorSource;
pub use render::{CollectingSurface, DrawCommand, LineBatch, RenderSurface};
pub use renderer::SolidLineRenderer;
pub use smoothing::MovingAverage;
pub use spectrum::SpectrumAnimator;
