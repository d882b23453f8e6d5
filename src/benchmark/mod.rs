//! Frame timing and the reprojection benchmark

pub mod harness;
pub mod metrics;

pub use harness::{BenchmarkHarness, BenchmarkReport, BenchmarkSuite};
pub use metrics::{BenchmarkResult, FrameMetrics, MetricsHistory};
