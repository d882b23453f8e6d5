//! Prelude module for common projlet types and traits
//!
//! `use projlet::prelude::*;` brings in what a typical map view needs.

pub use crate::core::{
    config::{
        AnimationConfig, BenchmarkConfig, EngineConfig, EngineProfile, SelectorConfig,
        TissotConfig,
    },
    geo::{LatLng, Point},
    viewport::ViewportState,
};

pub use crate::projection::{
    Capabilities, Projection, ProjectionKind, ProjectionParams, ProjectionState,
};

pub use crate::animation::{
    engine::{AnimationEngine, CrossFade, FrameOutcome},
    interpolation::{EasingFunction, Interpolatable},
    scheduler::{Clock, FrameHandle, FrameScheduler, ManualClock, ManualScheduler, SystemClock},
    transitions::{AnimationSequence, AnimationStep, SequenceState, TransitionMode},
    tweening::Tween,
};

pub use crate::input::{EventHandled, InputEvent, InteractionHandler};

pub use crate::raster::{
    buffer::RasterBuffer,
    reproject::{reproject, reproject_to, SamplingMode, SourceProjection},
};

pub use crate::tissot::{compute_distortion_grid, TissotOverlay, TissotSample};

pub use crate::selector::{
    create_projection, transfer_state, ProjectionSelector, Recommendation, ViewClass,
};

pub use crate::benchmark::{BenchmarkHarness, BenchmarkResult, BenchmarkSuite, FrameMetrics};

pub use crate::rendering::{
    DrawingSurface, Feature, PathStyle, RecordingSurface, SceneRenderer, SurfaceError,
};

pub use crate::{ProjletError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
