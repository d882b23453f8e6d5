//! # projlet
//!
//! Projection-aware rendering and animation core for geographic maps.
//!
//! The crate animates projection parameters frame by frame, reprojects
//! RGBA rasters between projections by inverse mapping, measures local
//! distortion with Tissot's indicatrix, picks a suitable projection for the
//! current view, and benchmarks the CPU cost of raster reprojection.

pub mod animation;
pub mod benchmark;
pub mod core;
pub mod input;
pub mod prelude;
pub mod projection;
pub mod raster;
pub mod rendering;
pub mod selector;
pub mod tissot;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{EngineConfig, EngineProfile},
    geo::{LatLng, Point},
    viewport::ViewportState,
};

pub use projection::{Capabilities, Projection, ProjectionKind, ProjectionParams, ProjectionState};

pub use animation::{
    engine::AnimationEngine,
    interpolation::EasingFunction,
    scheduler::{Clock, FrameScheduler, ManualClock, ManualScheduler},
    tweening::Tween,
};

pub use raster::{
    buffer::RasterBuffer,
    reproject::{reproject, Reprojection, SamplingMode, SourceProjection},
};

pub use tissot::{compute_distortion_grid, TissotOverlay, TissotSample};

pub use selector::{ProjectionSelector, Recommendation, ViewClass};

pub use benchmark::{harness::BenchmarkHarness, metrics::BenchmarkResult};

pub use rendering::surface::{DrawingSurface, SurfaceError};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ProjletError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum ProjletError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown projection: {0}")]
    UnknownProjection(String),

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[cfg(feature = "png")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Error type alias for convenience
pub type Error = ProjletError;
