use crate::core::constants::{DEFAULT_TARGET_FPS, FRAME_HISTORY_CAPACITY};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Timing of one rendered frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameMetrics {
    pub frame_time_ms: f64,
    /// `1000 / frame_time_ms`
    pub fps: f64,
    pub reprojection_time_ms: f64,
    pub timestamp_ms: f64,
}

impl FrameMetrics {
    pub fn new(frame_time_ms: f64, reprojection_time_ms: f64, timestamp_ms: f64) -> Self {
        let fps = if frame_time_ms > 0.0 {
            1000.0 / frame_time_ms
        } else {
            0.0
        };
        Self {
            frame_time_ms,
            fps,
            reprojection_time_ms,
            timestamp_ms,
        }
    }
}

/// Bounded frame history, oldest samples evicted first
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    frames: VecDeque<FrameMetrics>,
    capacity: usize,
}

impl MetricsHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, frame: FrameMetrics) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrameMetrics> {
        self.frames.iter()
    }

    /// Summarise the history; an empty history gives an all-zero result
    pub fn aggregate(
        &self,
        test_name: &str,
        viewport_size: (u32, u32),
        duration_ms: f64,
        target_fps: f64,
    ) -> BenchmarkResult {
        let total_pixels = viewport_size.0 as u64 * viewport_size.1 as u64;
        if self.frames.is_empty() {
            return BenchmarkResult {
                test_name: test_name.to_string(),
                viewport_size,
                total_pixels,
                ..BenchmarkResult::default()
            };
        }

        let count = self.frames.len() as f64;
        let mut fps_sum = 0.0;
        let mut frame_time_sum = 0.0;
        let mut reprojection_sum = 0.0;
        let mut min_fps = f64::INFINITY;
        let mut max_fps = f64::NEG_INFINITY;
        for frame in &self.frames {
            fps_sum += frame.fps;
            frame_time_sum += frame.frame_time_ms;
            reprojection_sum += frame.reprojection_time_ms;
            min_fps = min_fps.min(frame.fps);
            max_fps = max_fps.max(frame.fps);
        }

        let avg_fps = fps_sum / count;
        BenchmarkResult {
            test_name: test_name.to_string(),
            viewport_size,
            total_pixels,
            avg_fps,
            min_fps,
            max_fps,
            avg_frame_time: frame_time_sum / count,
            avg_reprojection_time: reprojection_sum / count,
            frame_count: self.frames.len(),
            duration_ms,
            passes_target: avg_fps >= target_fps,
        }
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(FRAME_HISTORY_CAPACITY)
    }
}

/// Aggregated outcome of one benchmark run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub test_name: String,
    pub viewport_size: (u32, u32),
    pub total_pixels: u64,
    pub avg_fps: f64,
    pub min_fps: f64,
    pub max_fps: f64,
    pub avg_frame_time: f64,
    pub avg_reprojection_time: f64,
    pub frame_count: usize,
    pub duration_ms: f64,
    pub passes_target: bool,
}

impl BenchmarkResult {
    /// Frames per second the reprojection alone could sustain
    pub fn reprojection_fps(&self) -> f64 {
        if self.avg_reprojection_time > 0.0 {
            1000.0 / self.avg_reprojection_time
        } else {
            0.0
        }
    }

    /// Pass check against the default 23 fps target
    pub fn passes_default_target(&self) -> bool {
        self.frame_count > 0 && self.avg_fps >= DEFAULT_TARGET_FPS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fps_from_frame_time() {
        let frame = FrameMetrics::new(40.0, 5.0, 0.0);
        assert_eq!(frame.fps, 25.0);
        assert_eq!(FrameMetrics::new(0.0, 0.0, 0.0).fps, 0.0);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = MetricsHistory::new(3);
        for i in 0..5 {
            history.push(FrameMetrics::new(10.0, 1.0, i as f64));
        }
        assert_eq!(history.len(), 3);
        let stamps: Vec<f64> = history.iter().map(|f| f.timestamp_ms).collect();
        assert_eq!(stamps, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_aggregate() {
        let mut history = MetricsHistory::default();
        for (i, frame_time) in [20.0, 50.0, 25.0].into_iter().enumerate() {
            history.push(FrameMetrics::new(frame_time, 4.0, i as f64 * frame_time));
        }
        let result = history.aggregate("nearest", (256, 256), 95.0, 23.0);
        assert_eq!(result.frame_count, 3);
        assert_eq!(result.total_pixels, 65_536);
        assert_eq!(result.min_fps, 20.0);
        assert_eq!(result.max_fps, 50.0);
        assert_abs_diff_eq!(result.avg_fps, (50.0 + 20.0 + 40.0) / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.avg_frame_time, 95.0 / 3.0, epsilon = 1e-9);
        assert_eq!(result.avg_reprojection_time, 4.0);
        assert_eq!(result.reprojection_fps(), 250.0);
        assert!(result.passes_target);
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        let result = MetricsHistory::default().aggregate("empty", (10, 10), 0.0, 23.0);
        assert_eq!(result.frame_count, 0);
        assert_eq!(result.avg_fps, 0.0);
        assert_eq!(result.min_fps, 0.0);
        assert!(!result.passes_target);
        assert!(!result.passes_default_target());
    }
}
