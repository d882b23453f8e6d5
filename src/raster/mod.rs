//! RGBA rasters and their reprojection between map projections

pub mod buffer;
pub mod reproject;
pub mod sampling;

pub use buffer::RasterBuffer;
pub use reproject::{
    display_projection, reproject, reproject_to, Reprojection, SamplingMode, SourceProjection,
};
