//! Core constants shared by the projection, raster and distortion engines.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Mean earth radius in meters (IUGG).
pub const EARTH_RADIUS_MEAN: f64 = 6_371_008.8;

/// Latitude beyond which a Web Mercator source tile has no data.
pub const MERCATOR_MAX_LATITUDE: f64 = 85.0;

/// Smallest rotation change (degrees) that still counts as a visible update.
pub const ROTATION_EPSILON: f64 = 1e-4;

/// Smallest scale change (pixels) that still counts as a visible update.
pub const SCALE_EPSILON: f64 = 1e-3;

/// Upper bound applied to the relative scale when deriving rotation smoothing.
pub const MAX_SMOOTHING_SCALE: f64 = 4.0;

/// Cap on the scale spring smoothing factor.
pub const MAX_SCALE_SMOOTHING: f64 = 0.5;

/// Damping applied to the spring pull toward the target scale.
pub const SCALE_PULL_DAMPING: f64 = 0.3;

/// Number of frame samples kept by the benchmark history.
pub const FRAME_HISTORY_CAPACITY: usize = 120;

/// Default frame rate a reprojection run has to sustain to pass.
pub const DEFAULT_TARGET_FPS: f64 = 23.0;

/// Nominal duration of one display frame in milliseconds.
pub const FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;
