//! Benchmark runs over the raster reprojection loop
//!
//! Timing comes from a [`Clock`], so tests can drive the harness with a
//! manual clock and real runs use [`SystemClock`].

use crate::animation::scheduler::{Clock, SystemClock};
use crate::benchmark::metrics::{BenchmarkResult, FrameMetrics, MetricsHistory};
use crate::core::config::BenchmarkConfig;
use crate::raster::buffer::RasterBuffer;
use crate::raster::reproject::{reproject, SamplingMode, SourceProjection};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Longitude the view spins by between benchmark frames
const SPIN_PER_FRAME_DEG: f64 = 3.0;

/// Collects frame metrics between `start` and `stop`
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    target_fps: f64,
    history: MetricsHistory,
    running: bool,
    started_at_ms: f64,
}

impl BenchmarkHarness {
    pub fn new(config: &BenchmarkConfig) -> Self {
        Self {
            target_fps: config.target_fps,
            history: MetricsHistory::new(config.history_capacity),
            running: false,
            started_at_ms: 0.0,
        }
    }

    /// Begin a run, dropping whatever the previous one recorded
    pub fn start(&mut self, now_ms: f64) {
        self.history.clear();
        self.running = true;
        self.started_at_ms = now_ms;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Record a frame; ignored unless a run is in progress
    pub fn record(&mut self, frame: FrameMetrics) {
        if self.running {
            self.history.push(frame);
        }
    }

    pub fn record_frame(&mut self, frame_time_ms: f64, reprojection_time_ms: f64, now_ms: f64) {
        self.record(FrameMetrics::new(frame_time_ms, reprojection_time_ms, now_ms));
    }

    pub fn history(&self) -> &MetricsHistory {
        &self.history
    }

    /// End the run and summarise it; the recorded frames are discarded
    pub fn stop(&mut self, test_name: &str, viewport_size: (u32, u32), now_ms: f64) -> BenchmarkResult {
        let duration_ms = if self.running {
            (now_ms - self.started_at_ms).max(0.0)
        } else {
            0.0
        };
        self.running = false;
        let result = self
            .history
            .aggregate(test_name, viewport_size, duration_ms, self.target_fps);
        self.history.clear();
        result
    }

    /// Reproject `frames` frames of a spinning view and time each one
    pub fn run_reprojection(
        &mut self,
        source: &RasterBuffer,
        source_projection: SourceProjection,
        size: (u32, u32),
        mode: SamplingMode,
        frames: usize,
        clock: &dyn Clock,
    ) -> BenchmarkResult {
        let (width, height) = size;
        let scale = width as f64 / TAU;
        let name = format!("{}-{}x{}", mode, width, height);

        self.start(clock.now_ms());
        for frame in 0..frames {
            let frame_start = clock.now_ms();
            let center_lon = (frame as f64 * SPIN_PER_FRAME_DEG) % 360.0 - 180.0;
            let result = reproject(
                source,
                source_projection,
                width,
                height,
                scale,
                center_lon,
                0.0,
                mode,
            );
            let now = clock.now_ms();
            self.record_frame(now - frame_start, result.elapsed_ms, now);
        }
        let result = self.stop(&name, size, clock.now_ms());

        log::info!(
            "{}: {:.1} fps avg ({:.1}..{:.1}), reprojection {:.2} ms, {}",
            result.test_name,
            result.avg_fps,
            result.min_fps,
            result.max_fps,
            result.avg_reprojection_time,
            if result.passes_target { "pass" } else { "fail" }
        );
        result
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new(&BenchmarkConfig::default())
    }
}

/// Every sampling mode at every configured viewport size
#[derive(Debug, Clone)]
pub struct BenchmarkSuite {
    config: BenchmarkConfig,
    modes: Vec<SamplingMode>,
    source: RasterBuffer,
    source_projection: SourceProjection,
}

impl BenchmarkSuite {
    pub fn new(config: BenchmarkConfig, source: RasterBuffer, source_projection: SourceProjection) -> Self {
        Self {
            config,
            modes: SamplingMode::ALL.to_vec(),
            source,
            source_projection,
        }
    }

    /// Restrict the suite to these modes
    pub fn with_modes(mut self, modes: Vec<SamplingMode>) -> Self {
        self.modes = modes;
        self
    }

    pub fn run(&self) -> BenchmarkReport {
        self.run_with_clock(&SystemClock::new())
    }

    pub fn run_with_clock(&self, clock: &dyn Clock) -> BenchmarkReport {
        let mut harness = BenchmarkHarness::new(&self.config);
        let mut results = Vec::new();
        for &size in &self.config.viewport_sizes {
            for &mode in &self.modes {
                results.push(harness.run_reprojection(
                    &self.source,
                    self.source_projection,
                    (size, size),
                    mode,
                    self.config.frame_count,
                    clock,
                ));
            }
        }
        BenchmarkReport {
            source_size: (self.source.width(), self.source.height()),
            source_projection: self.source_projection,
            target_fps: self.config.target_fps,
            results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    pub source_size: (u32, u32),
    pub source_projection: SourceProjection,
    pub target_fps: f64,
    pub results: Vec<BenchmarkResult>,
}

impl BenchmarkReport {
    pub fn all_pass(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|result| result.passes_target)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
