//! Static catalog of the projection families the selector can choose from

use crate::projection::ProjectionKind;
use fxhash::FxHashMap;
use once_cell::sync::Lazy;
use serde::Serialize;

/// What a projection family is good at
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionConfig {
    pub kind: ProjectionKind,
    pub display_name: &'static str,
    pub description: &'static str,
    pub global: bool,
    pub regional: bool,
    pub local: bool,
    pub equal_area: bool,
    pub conformal: bool,
    /// Clip radius applied whenever the factory builds this family
    pub clip_angle: Option<f64>,
    /// Latitude band, in absolute degrees, where the family works best
    pub optimal_latitude: Option<(f64, f64)>,
}

static CATALOG: Lazy<FxHashMap<&'static str, ProjectionConfig>> = Lazy::new(|| {
    let entries = [
        ProjectionConfig {
            kind: ProjectionKind::Equirectangular,
            display_name: "Equirectangular",
            description: "Plate carrée, simple and fast",
            global: true,
            regional: false,
            local: false,
            equal_area: false,
            conformal: false,
            clip_angle: None,
            optimal_latitude: None,
        },
        ProjectionConfig {
            kind: ProjectionKind::Mercator,
            display_name: "Mercator",
            description: "Navigation-friendly, conformal",
            global: false,
            regional: true,
            local: true,
            equal_area: false,
            conformal: true,
            clip_angle: None,
            optimal_latitude: Some((0.0, 60.0)),
        },
        ProjectionConfig {
            kind: ProjectionKind::Orthographic,
            display_name: "Orthographic",
            description: "Globe view",
            global: true,
            regional: false,
            local: false,
            equal_area: false,
            conformal: false,
            clip_angle: Some(90.0),
            optimal_latitude: None,
        },
        ProjectionConfig {
            kind: ProjectionKind::NaturalEarth,
            display_name: "Natural Earth",
            description: "Balanced global, less distortion than Mercator",
            global: true,
            regional: true,
            local: false,
            equal_area: false,
            conformal: false,
            clip_angle: None,
            optimal_latitude: None,
        },
        ProjectionConfig {
            kind: ProjectionKind::AzimuthalEqualArea,
            display_name: "Azimuthal Equal-Area",
            description: "Polar regions, preserves area",
            global: false,
            regional: true,
            local: false,
            equal_area: true,
            conformal: false,
            clip_angle: Some(180.0 - 1e-3),
            optimal_latitude: Some((60.0, 90.0)),
        },
        ProjectionConfig {
            kind: ProjectionKind::ConicEqualArea,
            display_name: "Conic Equal-Area",
            description: "Mid-latitude regions, preserves area",
            global: false,
            regional: true,
            local: false,
            equal_area: true,
            conformal: false,
            clip_angle: None,
            optimal_latitude: Some((20.0, 60.0)),
        },
        ProjectionConfig {
            kind: ProjectionKind::Albers,
            display_name: "Albers",
            description: "Equal-area conic tuned for the United States",
            global: false,
            regional: true,
            local: false,
            equal_area: true,
            conformal: false,
            clip_angle: None,
            optimal_latitude: Some((25.0, 50.0)),
        },
        ProjectionConfig {
            kind: ProjectionKind::AlbersUsa,
            display_name: "Albers USA",
            description: "United States with Alaska and Hawaii insets",
            global: false,
            regional: true,
            local: false,
            equal_area: true,
            conformal: false,
            clip_angle: None,
            optimal_latitude: Some((15.0, 72.0)),
        },
        ProjectionConfig {
            kind: ProjectionKind::Stereographic,
            display_name: "Stereographic",
            description: "Polar, minimizes shape distortion",
            global: false,
            regional: false,
            local: true,
            equal_area: false,
            conformal: true,
            clip_angle: Some(142.0),
            optimal_latitude: Some((70.0, 90.0)),
        },
    ];
    entries
        .into_iter()
        .map(|entry| (entry.kind.name(), entry))
        .collect()
});

/// Catalog entry by kebab-case name, e.g. `"natural-earth"`
pub fn lookup(name: &str) -> Option<&'static ProjectionConfig> {
    CATALOG.get(name)
}

pub fn config_for(kind: ProjectionKind) -> Option<&'static ProjectionConfig> {
    CATALOG.get(kind.name())
}

/// Every catalog entry, in no particular order
pub fn entries() -> impl Iterator<Item = &'static ProjectionConfig> {
    CATALOG.values()
}
