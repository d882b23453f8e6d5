//! Continuous damped convergence toward a moving target
//!
//! Rotation follows its target with a per-axis lerp whose factor grows with
//! the zoom level; scale follows a damped spring with friction. Each step
//! reports whether anything moved perceptibly, which is the only condition
//! that keeps the frame loop alive.

use crate::core::config::AnimationConfig;
use crate::core::constants::{
    MAX_SCALE_SMOOTHING, MAX_SMOOTHING_SCALE, ROTATION_EPSILON, SCALE_EPSILON, SCALE_PULL_DAMPING,
};

/// Current and target rotation/scale pairs tracked by the convergence loop
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub current_rotation: [f64; 3],
    pub target_rotation: [f64; 3],
    pub current_scale: f64,
    pub target_scale: f64,
    pub velocity: f64,
    initial_scale: f64,
}

impl Convergence {
    /// Start at rest: current equals target
    pub fn new(rotation: [f64; 3], scale: f64) -> Self {
        Self {
            current_rotation: rotation,
            target_rotation: rotation,
            current_scale: scale,
            target_scale: scale,
            velocity: 0.0,
            initial_scale: scale,
        }
    }

    pub fn initial_scale(&self) -> f64 {
        self.initial_scale
    }

    pub fn set_initial_scale(&mut self, scale: f64) {
        if scale > 0.0 && scale.is_finite() {
            self.initial_scale = scale;
        }
    }

    pub fn relative_scale(&self) -> f64 {
        self.current_scale / self.initial_scale
    }

    /// Reset both current and target to the given values and drop velocity
    pub fn sync_to(&mut self, rotation: [f64; 3], scale: f64) {
        self.current_rotation = rotation;
        self.target_rotation = rotation;
        self.current_scale = scale;
        self.target_scale = scale;
        self.velocity = 0.0;
    }

    /// Clamp a scale into the configured extent around the initial scale
    pub fn clamp_scale(&self, scale: f64, config: &AnimationConfig) -> f64 {
        scale.clamp(
            config.min_scale(self.initial_scale),
            config.max_scale(self.initial_scale),
        )
    }

    /// True once current and target agree within the movement epsilons
    pub fn is_settled(&self) -> bool {
        self.current_rotation
            .iter()
            .zip(self.target_rotation.iter())
            .all(|(current, target)| (target - current).abs() <= ROTATION_EPSILON)
            && (self.target_scale - self.current_scale).abs() <= SCALE_EPSILON
            && self.velocity.abs() <= SCALE_EPSILON
    }

    /// Advance one frame; returns true if the change was perceptible
    pub fn step(&mut self, config: &AnimationConfig) -> bool {
        let relative_scale = self.relative_scale();
        let previous_rotation = self.current_rotation;
        let previous_scale = self.current_scale;

        let smoothing = (config.smoothing_base * relative_scale.min(MAX_SMOOTHING_SCALE)).min(1.0);
        for (current, target) in self
            .current_rotation
            .iter_mut()
            .zip(self.target_rotation.iter())
        {
            *current += (target - *current) * smoothing;
        }

        let scale_smoothing =
            (config.scale_smoothing_base * relative_scale.max(0.5)).min(MAX_SCALE_SMOOTHING);
        self.current_scale += self.velocity;
        self.current_scale +=
            (self.target_scale - self.current_scale) * scale_smoothing * SCALE_PULL_DAMPING;
        self.velocity *= config.friction;
        if (self.target_scale - self.current_scale).abs()
            < config.near_target_fraction * self.initial_scale
        {
            self.velocity *= config.near_target_damping;
        }
        self.current_scale = self.clamp_scale(self.current_scale, config);

        let rotated = self
            .current_rotation
            .iter()
            .zip(previous_rotation.iter())
            .any(|(current, previous)| (current - previous).abs() > ROTATION_EPSILON);
        let scaled = (self.current_scale - previous_scale).abs() > SCALE_EPSILON;

        rotated || scaled
    }

    /// Jump the current state onto the target and clear velocity
    pub fn snap_to_target(&mut self) {
        self.current_rotation = self.target_rotation;
        self.current_scale = self.target_scale;
        self.velocity = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until_still(convergence: &mut Convergence, config: &AnimationConfig) -> usize {
        let mut frames = 0;
        while convergence.step(config) {
            frames += 1;
            assert!(frames < 10_000, "convergence never stopped");
        }
        frames + 1
    }

    #[test]
    fn test_rotation_converges_within_frame_budget() {
        let config = AnimationConfig::default();
        let mut convergence = Convergence::new([0.0, 0.0, 0.0], 200.0);
        convergence.target_rotation = [90.0, -45.0, 0.0];

        let frames = run_until_still(&mut convergence, &config);
        assert!(frames < 200, "took {} frames", frames);
        assert!((convergence.current_rotation[0] - 90.0).abs() < 1e-2);
        assert!((convergence.current_rotation[1] + 45.0).abs() < 1e-2);
    }

    #[test]
    fn test_zoomed_in_rotation_converges_faster() {
        let config = AnimationConfig::default();
        let mut base = Convergence::new([0.0; 3], 200.0);
        base.target_rotation = [60.0, 0.0, 0.0];

        let mut zoomed = Convergence::new([0.0; 3], 200.0);
        zoomed.current_scale = 800.0;
        zoomed.target_scale = 800.0;
        zoomed.target_rotation = [60.0, 0.0, 0.0];

        assert!(run_until_still(&mut zoomed, &config) < run_until_still(&mut base, &config));
    }

    #[test]
    fn test_scale_stays_inside_extent() {
        let config = AnimationConfig::default();
        let mut convergence = Convergence::new([0.0; 3], 100.0);
        convergence.target_scale = 10_000.0;
        convergence.velocity = 5_000.0;

        for _ in 0..300 {
            convergence.step(&config);
            assert!(convergence.current_scale <= config.max_scale(100.0));
            assert!(convergence.current_scale >= config.min_scale(100.0));
        }

        convergence.target_scale = 0.0;
        convergence.velocity = -5_000.0;
        for _ in 0..300 {
            convergence.step(&config);
            assert!(convergence.current_scale >= config.min_scale(100.0));
        }
    }

    #[test]
    fn test_at_rest_reports_no_motion() {
        let config = AnimationConfig::default();
        let mut convergence = Convergence::new([10.0, 20.0, 0.0], 150.0);
        assert!(convergence.is_settled());
        assert!(!convergence.step(&config));
    }
}
