//! Picking a projection family that suits the current view
//!
//! The selector classifies a [`ViewportState`] as global, regional or local
//! and maps that class plus the center latitude to a projection family.
//! It only recommends; nothing changes until the caller confirms.

pub mod catalog;
pub mod classifier;
pub mod distortion;
pub mod factory;

use crate::animation::engine::{AnimationEngine, CompletionCallback};
use crate::animation::scheduler::FrameScheduler;
use crate::core::config::SelectorConfig;
use crate::core::geo::LatLng;
use crate::core::viewport::ViewportState;
use crate::projection::{Projection, ProjectionKind};
use serde::Serialize;

pub use catalog::ProjectionConfig;
pub use classifier::{ScaleClassifier, ViewClass};
pub use distortion::{get_distortion_info, DistortionInfo};
pub use factory::{base_scale, create_projection, transfer_state};

/// A suggested switch to another projection family
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub kind: ProjectionKind,
    pub previous: ProjectionKind,
    pub class: ViewClass,
    pub reason: &'static str,
    /// Relative scale the classification was based on
    pub effective_scale: f64,
    pub center: LatLng,
    /// Viewport `(width, height)` the recommendation was made for
    pub viewport_size: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct ProjectionSelector {
    config: SelectorConfig,
    active: ProjectionKind,
    classifier: ScaleClassifier,
    /// Fitted pixel scale of the active family; relative scales divide by it
    baseline_scale: Option<f64>,
}

impl ProjectionSelector {
    pub fn new(active: ProjectionKind, config: SelectorConfig) -> Self {
        Self {
            config,
            active,
            classifier: ScaleClassifier::new(),
            baseline_scale: None,
        }
    }

    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    pub fn active(&self) -> ProjectionKind {
        self.active
    }

    /// Pixel scale that fits the active family to the viewport, once confirmed
    pub fn baseline_scale(&self) -> Option<f64> {
        self.baseline_scale
    }

    /// Pixel `scale` as a multiple of the baseline; unchanged before any confirm
    pub fn relative_to_baseline(&self, scale: f64) -> f64 {
        match self.baseline_scale {
            Some(baseline) if baseline > 0.0 => scale / baseline,
            _ => scale,
        }
    }

    /// Recommend a family for `viewport`; `None` when the active one still fits
    pub fn classify(&mut self, viewport: &ViewportState) -> Option<Recommendation> {
        let (class, effective_scale) = self.classifier.classify(viewport.scale, &self.config);
        let (kind, reason) =
            classifier::select_kind(class, effective_scale, viewport.center.lat, &self.config);

        if kind == self.active {
            return None;
        }
        log::debug!(
            "recommending {} over {} for {:?} view at scale {:.2}",
            kind,
            self.active,
            class,
            effective_scale
        );
        Some(Recommendation {
            kind,
            previous: self.active,
            class,
            reason,
            effective_scale,
            center: viewport.center,
            viewport_size: (viewport.width, viewport.height),
        })
    }

    /// Make the recommended family the active one and rebase on its fitted scale
    pub fn confirm(&mut self, recommendation: &Recommendation) {
        let (width, height) = recommendation.viewport_size;
        self.active = recommendation.kind;
        self.baseline_scale = Some(base_scale(recommendation.kind, width, height));
    }

    /// Confirm and build the recommended projection showing the same view
    pub fn confirm_and_transfer(
        &mut self,
        recommendation: &Recommendation,
        from: &Projection,
        width: f64,
        height: f64,
    ) -> Projection {
        self.confirm(recommendation);
        transfer_state(from, recommendation.kind, width, height)
    }

    /// Confirm, then move `engine` to the recommended family
    ///
    /// The engine transitions to the transferred projection and its relative
    /// scale is rebased on the new baseline, so the view keeps its zoom level.
    pub fn switch_engine(
        &mut self,
        recommendation: &Recommendation,
        engine: &mut AnimationEngine,
        duration_ms: Option<f64>,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
        on_complete: Option<CompletionCallback>,
    ) {
        let (width, height) = recommendation.viewport_size;
        let incoming =
            self.confirm_and_transfer(recommendation, engine.projection(), width, height);
        engine.transition_to(incoming, None, duration_ms, now_ms, scheduler, on_complete);
        if let Some(baseline) = self.baseline_scale {
            engine.set_initial_scale(baseline);
        }
    }
}

impl Default for ProjectionSelector {
    fn default() -> Self {
        Self::new(ProjectionKind::NaturalEarth, SelectorConfig::default())
    }
}
