//! View classification by relative scale, with hysteresis

use crate::core::config::SelectorConfig;
use crate::projection::ProjectionKind;
use serde::{Deserialize, Serialize};

/// How much of the globe the view covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewClass {
    Global,
    Regional,
    Local,
}

impl ViewClass {
    pub fn from_scale(scale: f64, config: &SelectorConfig) -> Self {
        if scale < config.global_threshold {
            ViewClass::Global
        } else if scale > config.regional_threshold {
            ViewClass::Local
        } else {
            ViewClass::Regional
        }
    }
}

/// Holds on to the last classification-triggering scale
///
/// A new scale only replaces it once it moves further than
/// `hysteresis * last` away; smaller moves classify with the old value.
#[derive(Debug, Clone, Default)]
pub struct ScaleClassifier {
    last_trigger: Option<f64>,
}

impl ScaleClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scale the next classification is based on
    pub fn effective_scale(&mut self, scale: f64, hysteresis: f64) -> f64 {
        match self.last_trigger {
            Some(last) if (scale - last).abs() < hysteresis * last => last,
            _ => {
                self.last_trigger = Some(scale);
                scale
            }
        }
    }

    pub fn classify(&mut self, scale: f64, config: &SelectorConfig) -> (ViewClass, f64) {
        let effective = self.effective_scale(scale, config.hysteresis);
        (ViewClass::from_scale(effective, config), effective)
    }

    pub fn last_trigger(&self) -> Option<f64> {
        self.last_trigger
    }

    pub fn reset(&mut self) {
        self.last_trigger = None;
    }
}

/// Ordered selection rule, first match wins
pub fn select_kind(
    class: ViewClass,
    effective_scale: f64,
    latitude: f64,
    config: &SelectorConfig,
) -> (ProjectionKind, &'static str) {
    let abs_lat = latitude.abs();
    match class {
        ViewClass::Global if effective_scale < config.orthographic_threshold => {
            (ProjectionKind::Orthographic, "globe")
        }
        ViewClass::Global => (
            ProjectionKind::NaturalEarth,
            "balanced global, less distortion than Mercator",
        ),
        ViewClass::Local if abs_lat > config.polar_local_latitude => (
            ProjectionKind::Stereographic,
            "polar, minimizes shape distortion",
        ),
        ViewClass::Local => (ProjectionKind::Mercator, "navigation-friendly, conformal"),
        ViewClass::Regional if abs_lat > config.polar_regional_latitude => (
            ProjectionKind::AzimuthalEqualArea,
            "polar region, preserves area",
        ),
        ViewClass::Regional if abs_lat > config.mid_latitude => (
            ProjectionKind::ConicEqualArea,
            "mid-latitude region, preserves area",
        ),
        ViewClass::Regional => (
            ProjectionKind::NaturalEarth,
            "near-equatorial region, balanced distortion",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds() {
        let config = SelectorConfig::default();
        assert_eq!(ViewClass::from_scale(1.0, &config), ViewClass::Global);
        assert_eq!(ViewClass::from_scale(1.5, &config), ViewClass::Regional);
        assert_eq!(ViewClass::from_scale(6.0, &config), ViewClass::Regional);
        assert_eq!(ViewClass::from_scale(6.5, &config), ViewClass::Local);
    }

    #[test]
    fn test_selection_rules() {
        let config = SelectorConfig::default();
        let pick = |class, scale, lat| select_kind(class, scale, lat, &config).0;

        assert_eq!(pick(ViewClass::Global, 0.5, 0.0), ProjectionKind::Orthographic);
        assert_eq!(pick(ViewClass::Global, 1.0, 0.0), ProjectionKind::NaturalEarth);
        assert_eq!(pick(ViewClass::Local, 8.0, -75.0), ProjectionKind::Stereographic);
        assert_eq!(pick(ViewClass::Local, 8.0, 70.0), ProjectionKind::Mercator);
        assert_eq!(pick(ViewClass::Regional, 3.0, 65.0), ProjectionKind::AzimuthalEqualArea);
        assert_eq!(pick(ViewClass::Regional, 3.0, 60.0), ProjectionKind::ConicEqualArea);
        assert_eq!(pick(ViewClass::Regional, 3.0, -35.0), ProjectionKind::ConicEqualArea);
        assert_eq!(pick(ViewClass::Regional, 3.0, 20.0), ProjectionKind::NaturalEarth);
    }

    #[test]
    fn test_hysteresis_reuses_previous_scale() {
        let config = SelectorConfig::default();
        let mut classifier = ScaleClassifier::new();

        assert_eq!(classifier.classify(1.45, &config), (ViewClass::Global, 1.45));
        // Inside the band: still classified with 1.45
        for scale in [1.55, 1.42, 1.58, 1.47] {
            assert_eq!(classifier.classify(scale, &config).0, ViewClass::Global);
        }
        assert_eq!(classifier.last_trigger(), Some(1.45));

        // A real move crosses over
        assert_eq!(classifier.classify(1.7, &config), (ViewClass::Regional, 1.7));
        classifier.reset();
        assert_eq!(classifier.last_trigger(), None);
    }
}
