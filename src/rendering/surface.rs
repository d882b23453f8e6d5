//! Drawing surface contract and an in-memory recording implementation

use crate::core::geo::Point;
use crate::raster::buffer::RasterBuffer;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Failures that mean the environment cannot draw at all
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SurfaceError {
    #[error("drawing context '{0}' is not available")]
    ContextUnavailable(String),

    #[error("opacity must be within [0, 1], got {0}")]
    InvalidOpacity(f32),
}

/// Fill and stroke of a path layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathStyle {
    pub fill: Option<[u8; 4]>,
    pub stroke: Option<[u8; 4]>,
    pub stroke_width: f32,
    pub opacity: f32,
}

impl PathStyle {
    pub fn stroke(color: [u8; 4], width: f32) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            stroke_width: width,
            opacity: 1.0,
        }
    }

    pub fn fill(color: [u8; 4]) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self::stroke([0, 0, 0, 255], 1.0)
    }
}

/// A run of projected points; closed rings are filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathRing {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl PathRing {
    pub fn open(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Point>) -> Self {
        Self {
            points,
            closed: true,
        }
    }
}

/// Where projected paths and pixels end up
///
/// Submitting a layer replaces only that layer. A surface that has not been
/// initialised yet accepts everything and draws nothing.
pub trait DrawingSurface {
    fn is_ready(&self) -> bool;

    fn size(&self) -> (u32, u32);

    fn draw_layer(
        &mut self,
        layer: &str,
        paths: Vec<PathRing>,
        style: PathStyle,
    ) -> Result<(), SurfaceError>;

    fn clear_layer(&mut self, layer: &str);

    /// Copy an RGBA buffer to the surface origin
    fn blit_pixels(&mut self, buffer: &RasterBuffer, opacity: f32) -> Result<(), SurfaceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub paths: Vec<PathRing>,
    pub style: PathStyle,
}

/// Commands issued to a [`RecordingSurface`], in order
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Layer { name: String, path_count: usize },
    ClearLayer { name: String },
    Blit { width: u32, height: u32, opacity: f32 },
}

/// Keeps the latest content of every layer and a log of draw calls
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    context: Option<String>,
    layers: FxHashMap<String, Layer>,
    layer_order: Vec<String>,
    pixels: Option<(RasterBuffer, f32)>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Kinds of drawing context this surface can provide
    pub const SUPPORTED_CONTEXTS: [&'static str; 1] = ["2d"];

    /// An uninitialised surface; call [`RecordingSurface::acquire_context`] first
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Ready-to-draw 2d surface
    pub fn ready(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let mut surface = Self::new(width, height);
        surface.acquire_context("2d")?;
        Ok(surface)
    }

    pub fn acquire_context(&mut self, kind: &str) -> Result<(), SurfaceError> {
        if !Self::SUPPORTED_CONTEXTS.contains(&kind) {
            return Err(SurfaceError::ContextUnavailable(kind.to_string()));
        }
        self.context = Some(kind.to_string());
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Layer names in the order they were first drawn
    pub fn layer_names(&self) -> &[String] {
        &self.layer_order
    }

    pub fn pixels(&self) -> Option<&(RasterBuffer, f32)> {
        self.pixels.as_ref()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }
}

fn check_opacity(opacity: f32) -> Result<(), SurfaceError> {
    if (0.0..=1.0).contains(&opacity) {
        Ok(())
    } else {
        Err(SurfaceError::InvalidOpacity(opacity))
    }
}

impl DrawingSurface for RecordingSurface {
    fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn draw_layer(
        &mut self,
        layer: &str,
        paths: Vec<PathRing>,
        style: PathStyle,
    ) -> Result<(), SurfaceError> {
        if !self.is_ready() {
            return Ok(());
        }
        check_opacity(style.opacity)?;

        self.commands.push(DrawCommand::Layer {
            name: layer.to_string(),
            path_count: paths.len(),
        });
        if !self.layers.contains_key(layer) {
            self.layer_order.push(layer.to_string());
        }
        self.layers.insert(layer.to_string(), Layer { paths, style });
        Ok(())
    }

    fn clear_layer(&mut self, layer: &str) {
        if !self.is_ready() {
            return;
        }
        self.commands.push(DrawCommand::ClearLayer {
            name: layer.to_string(),
        });
        self.layers.remove(layer);
        self.layer_order.retain(|name| name != layer);
    }

    fn blit_pixels(&mut self, buffer: &RasterBuffer, opacity: f32) -> Result<(), SurfaceError> {
        if !self.is_ready() {
            return Ok(());
        }
        check_opacity(opacity)?;

        self.commands.push(DrawCommand::Blit {
            width: buffer.width(),
            height: buffer.height(),
            opacity,
        });
        self.pixels = Some((buffer.clone(), opacity));
        Ok(())
    }
}
