//! Turning projected geometry and rasters into drawing-surface calls

pub mod path;
pub mod scene;
pub mod surface;

pub use path::{graticule, project_geometry, sphere_outline, Feature};
pub use scene::{SceneRenderer, SceneStyle};
pub use surface::{DrawCommand, DrawingSurface, PathRing, PathStyle, RecordingSurface, SurfaceError};
