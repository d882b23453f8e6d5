//! Per-frame drawing of the sphere, graticule, features, indicatrix and raster

use crate::animation::engine::CrossFade;
use crate::core::config::TissotConfig;
use crate::projection::{Projection, ProjectionKind, ProjectionState};
use crate::raster::buffer::RasterBuffer;
use crate::raster::reproject::{reproject_to, SamplingMode, SourceProjection};
use crate::rendering::path::{
    project_geometry, project_graticule, sphere_outline, Feature, GRATICULE_STEP,
};
use crate::rendering::surface::{DrawingSurface, PathRing, PathStyle, SurfaceError};
use crate::tissot::TissotOverlay;

pub const SPHERE_LAYER: &str = "sphere";
pub const GRATICULE_LAYER: &str = "graticule";
pub const FEATURE_LAYER: &str = "features";
pub const OUTGOING_FEATURE_LAYER: &str = "features-outgoing";
pub const TISSOT_LAYER: &str = "tissot";

#[derive(Debug, Clone, PartialEq)]
pub struct SceneStyle {
    pub sphere: PathStyle,
    pub graticule: PathStyle,
    pub features: PathStyle,
    pub tissot: PathStyle,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            sphere: PathStyle {
                fill: Some([200, 225, 245, 255]),
                stroke: Some([40, 40, 40, 255]),
                stroke_width: 1.0,
                opacity: 1.0,
            },
            graticule: PathStyle::stroke([120, 120, 120, 255], 0.5).with_opacity(0.6),
            features: PathStyle {
                fill: Some([225, 215, 190, 255]),
                stroke: Some([90, 90, 90, 255]),
                stroke_width: 0.5,
                opacity: 1.0,
            },
            tissot: PathStyle {
                fill: Some([220, 40, 40, 255]),
                stroke: Some([160, 20, 20, 255]),
                stroke_width: 0.5,
                opacity: 0.4,
            },
        }
    }
}

/// Draws a frame into per-layer paths, skipping layers that did not change
#[derive(Debug, Clone)]
pub struct SceneRenderer {
    style: SceneStyle,
    outline_segments: usize,
    show_graticule: bool,
    tissot: Option<TissotOverlay>,
    drawn_for: Option<(ProjectionKind, ProjectionState)>,
    drawn_features: Vec<String>,
    cross_fading: bool,
}

impl SceneRenderer {
    pub fn new(style: SceneStyle) -> Self {
        Self {
            style,
            outline_segments: 128,
            show_graticule: true,
            tissot: None,
            drawn_for: None,
            drawn_features: Vec::new(),
            cross_fading: false,
        }
    }

    pub fn set_graticule(&mut self, visible: bool) {
        self.show_graticule = visible;
        self.drawn_for = None;
    }

    pub fn enable_tissot(&mut self, config: TissotConfig) {
        match &mut self.tissot {
            Some(overlay) => overlay.set_config(config),
            None => self.tissot = Some(TissotOverlay::new(config)),
        }
        self.drawn_for = None;
    }

    pub fn disable_tissot(&mut self) {
        self.tissot = None;
        self.drawn_for = None;
    }

    pub fn tissot(&self) -> Option<&TissotOverlay> {
        self.tissot.as_ref()
    }

    /// Draw the current projection and, during a cross-fade, the outgoing one
    pub fn render(
        &mut self,
        surface: &mut dyn DrawingSurface,
        projection: &Projection,
        cross_fade: Option<&CrossFade>,
        features: &[Feature],
    ) -> Result<(), SurfaceError> {
        if !surface.is_ready() {
            return Ok(());
        }

        let key = (projection.kind(), *projection.state());
        let ids_changed = features.len() != self.drawn_features.len()
            || features
                .iter()
                .zip(&self.drawn_features)
                .any(|(feature, id)| &feature.id != id);
        let projection_changed = self.drawn_for.as_ref() != Some(&key);

        let incoming_opacity = cross_fade.map_or(1.0, |fade| fade.incoming_opacity as f32);
        let fading = cross_fade.is_some();

        if projection_changed || fading || self.cross_fading {
            surface.draw_layer(
                SPHERE_LAYER,
                sphere_outline(projection, self.outline_segments),
                self.style.sphere.with_opacity(self.style.sphere.opacity * incoming_opacity),
            )?;
            if self.show_graticule {
                surface.draw_layer(
                    GRATICULE_LAYER,
                    project_graticule(projection, GRATICULE_STEP),
                    self.style
                        .graticule
                        .with_opacity(self.style.graticule.opacity * incoming_opacity),
                )?;
            } else {
                surface.clear_layer(GRATICULE_LAYER);
            }
        }

        if projection_changed || ids_changed || fading || self.cross_fading {
            surface.draw_layer(
                FEATURE_LAYER,
                project_features(projection, features),
                self.style
                    .features
                    .with_opacity(self.style.features.opacity * incoming_opacity),
            )?;
            self.drawn_features = features.iter().map(|feature| feature.id.clone()).collect();
        }

        match cross_fade {
            Some(fade) => surface.draw_layer(
                OUTGOING_FEATURE_LAYER,
                project_features(&fade.outgoing, features),
                self.style
                    .features
                    .with_opacity(self.style.features.opacity * fade.outgoing_opacity as f32),
            )?,
            None if self.cross_fading => surface.clear_layer(OUTGOING_FEATURE_LAYER),
            None => {}
        }
        self.cross_fading = fading;

        if let Some(overlay) = &mut self.tissot {
            if overlay.update(projection) || projection_changed {
                let rings = overlay.outlines().into_iter().map(PathRing::closed).collect();
                surface.draw_layer(TISSOT_LAYER, rings, self.style.tissot)?;
            }
        }

        self.drawn_for = Some(key);
        Ok(())
    }

    /// Reproject `source` through `projection` and blit it
    pub fn render_raster(
        &self,
        surface: &mut dyn DrawingSurface,
        projection: &Projection,
        source: &RasterBuffer,
        source_projection: SourceProjection,
        mode: SamplingMode,
    ) -> Result<f64, SurfaceError> {
        if !surface.is_ready() {
            return Ok(0.0);
        }
        let (width, height) = surface.size();
        let result = reproject_to(source, source_projection, projection, width, height, mode);
        surface.blit_pixels(&result.buffer, 1.0)?;
        Ok(result.elapsed_ms)
    }
}

impl Default for SceneRenderer {
    fn default() -> Self {
        Self::new(SceneStyle::default())
    }
}

fn project_features(projection: &Projection, features: &[Feature]) -> Vec<PathRing> {
    features
        .iter()
        .flat_map(|feature| project_geometry(projection, &feature.geometry))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::surface::{DrawCommand, RecordingSurface};
    use geo_types::polygon;

    fn land() -> Vec<Feature> {
        vec![Feature::new(
            "square",
            polygon![
                (x: -10.0, y: -10.0),
                (x: 10.0, y: -10.0),
                (x: 10.0, y: 10.0),
                (x: -10.0, y: 10.0),
                (x: -10.0, y: -10.0),
            ],
        )]
    }

    #[test]
    fn test_unchanged_frame_submits_nothing() {
        let mut surface = RecordingSurface::ready(960, 500).unwrap();
        let mut renderer = SceneRenderer::default();
        let projection = Projection::new(ProjectionKind::Orthographic);

        renderer.render(&mut surface, &projection, None, &land()).unwrap();
        assert_eq!(surface.layer_names(), [SPHERE_LAYER, GRATICULE_LAYER, FEATURE_LAYER]);
        assert_eq!(surface.layer(FEATURE_LAYER).unwrap().paths.len(), 1);

        surface.clear_commands();
        renderer.render(&mut surface, &projection, None, &land()).unwrap();
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_cross_fade_draws_both_projections() {
        let mut surface = RecordingSurface::ready(960, 500).unwrap();
        let mut renderer = SceneRenderer::default();
        let incoming = Projection::new(ProjectionKind::Orthographic);
        let fade = CrossFade {
            outgoing: Projection::new(ProjectionKind::Mercator),
            outgoing_opacity: 0.75,
            incoming_opacity: 0.25,
        };

        renderer
            .render(&mut surface, &incoming, Some(&fade), &land())
            .unwrap();
        assert_eq!(surface.layer(OUTGOING_FEATURE_LAYER).unwrap().style.opacity, 0.75);
        assert_eq!(surface.layer(FEATURE_LAYER).unwrap().style.opacity, 0.25);

        renderer.render(&mut surface, &incoming, None, &land()).unwrap();
        assert!(surface.layer(OUTGOING_FEATURE_LAYER).is_none());
        assert_eq!(surface.layer(FEATURE_LAYER).unwrap().style.opacity, 1.0);
    }

    #[test]
    fn test_tissot_layer_follows_projection() {
        let mut surface = RecordingSurface::ready(960, 500).unwrap();
        let mut renderer = SceneRenderer::default();
        renderer.enable_tissot(TissotConfig {
            grid_spacing_deg: 30.0,
            ..TissotConfig::default()
        });

        let mut projection = Projection::new(ProjectionKind::Mercator);
        renderer.render(&mut surface, &projection, None, &[]).unwrap();
        assert_eq!(surface.layer(TISSOT_LAYER).unwrap().paths.len(), 65);

        projection.set_scale(300.0);
        renderer.render(&mut surface, &projection, None, &[]).unwrap();
        assert_eq!(renderer.tissot().unwrap().recomputations(), 2);
    }

    #[test]
    fn test_raster_blit() {
        let mut surface = RecordingSurface::ready(64, 32).unwrap();
        let renderer = SceneRenderer::default();
        let mut projection = Projection::new(ProjectionKind::Equirectangular);
        projection.set_scale(64.0 / std::f64::consts::TAU);
        projection.set_translate(crate::core::geo::Point::new(32.0, 16.0));

        renderer
            .render_raster(
                &mut surface,
                &projection,
                &RasterBuffer::solid(64, 64, [0, 0, 255, 255]),
                SourceProjection::Equirectangular,
                SamplingMode::Nearest,
            )
            .unwrap();
        assert!(matches!(
            surface.commands().last(),
            Some(DrawCommand::Blit {
                width: 64,
                height: 32,
                ..
            })
        ));
        let (buffer, _) = surface.pixels().unwrap();
        assert_eq!(buffer.pixel(32, 16), Some([0, 0, 255, 255]));
    }
}
