use crate::animation::interpolation::{EasingFunction, Interpolatable};

/// State of a tween
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenState {
    NotStarted,
    Running,
    Paused,
    Finished,
}

/// A fixed-duration eased animation between two values
///
/// Time is passed in as milliseconds from a [`Clock`](crate::animation::scheduler::Clock),
/// so a tween never reads the wall clock itself.
#[derive(Debug, Clone)]
pub struct Tween<T: Interpolatable + Clone> {
    /// Starting value
    pub from: T,
    /// Ending value
    pub to: T,
    /// Animation duration in milliseconds
    pub duration_ms: f64,
    /// Easing function to use
    pub easing: EasingFunction,
    start_ms: Option<f64>,
    /// Progress frozen at pause time
    paused_at: Option<f64>,
    state: TweenState,
}

impl<T: Interpolatable + Clone> Tween<T> {
    /// Create a new tween with the default ease-in-out cubic easing
    pub fn new(from: T, to: T, duration_ms: f64) -> Self {
        Self::with_easing(from, to, duration_ms, EasingFunction::default())
    }

    pub fn with_easing(from: T, to: T, duration_ms: f64, easing: EasingFunction) -> Self {
        Self {
            from,
            to,
            duration_ms: duration_ms.max(0.0),
            easing,
            start_ms: None,
            paused_at: None,
            state: TweenState::NotStarted,
        }
    }

    pub fn start(&mut self, now_ms: f64) {
        self.start_ms = Some(now_ms);
        self.paused_at = None;
        self.state = TweenState::Running;
    }

    pub fn pause(&mut self, now_ms: f64) {
        if self.state == TweenState::Running {
            self.paused_at = Some(self.elapsed(now_ms));
            self.state = TweenState::Paused;
        }
    }

    /// Resume from the progress held at pause time
    pub fn resume(&mut self, now_ms: f64) {
        if let (TweenState::Paused, Some(elapsed)) = (self.state, self.paused_at) {
            self.start_ms = Some(now_ms - elapsed);
            self.paused_at = None;
            self.state = TweenState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.start_ms = None;
        self.paused_at = None;
        self.state = TweenState::NotStarted;
    }

    pub fn state(&self) -> TweenState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TweenState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == TweenState::Finished
    }

    fn elapsed(&self, now_ms: f64) -> f64 {
        if let Some(elapsed) = self.paused_at {
            return elapsed;
        }
        match self.start_ms {
            Some(start) => (now_ms - start).max(0.0),
            None => 0.0,
        }
    }

    /// Linear progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f64 {
        match self.state {
            TweenState::NotStarted => 0.0,
            TweenState::Finished => 1.0,
            _ if self.duration_ms <= 0.0 => 1.0,
            _ => (self.elapsed(now_ms) / self.duration_ms).min(1.0),
        }
    }

    /// Eased value at the given time without advancing state
    pub fn value_at(&self, now_ms: f64) -> T {
        let t = self.easing.apply(self.progress(now_ms));
        self.from.lerp(&self.to, t)
    }

    /// Advance to `now_ms` and return the current value
    ///
    /// Returns `None` before the tween has started. Once progress reaches 1
    /// the exact end value is returned and the tween becomes finished.
    pub fn update(&mut self, now_ms: f64) -> Option<T> {
        match self.state {
            TweenState::NotStarted => None,
            TweenState::Finished => Some(self.to.clone()),
            TweenState::Paused => Some(self.value_at(now_ms)),
            TweenState::Running => {
                if self.progress(now_ms) >= 1.0 {
                    self.state = TweenState::Finished;
                    Some(self.to.clone())
                } else {
                    Some(self.value_at(now_ms))
                }
            }
        }
    }

    /// Retarget a running tween, starting from its current value
    pub fn change_target(&mut self, new_to: T, now_ms: f64) {
        if self.is_running() {
            self.from = self.value_at(now_ms);
            self.to = new_to;
            self.start(now_ms);
        } else {
            self.to = new_to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tween_runs_to_completion() {
        let mut tween = Tween::new(0.0, 100.0, 1000.0);
        assert_eq!(tween.update(0.0), None);

        tween.start(0.0);
        assert_eq!(tween.update(500.0), Some(50.0));
        let early = tween.update(250.0).unwrap();
        assert!(early < 25.0);
        assert_eq!(tween.update(1000.0), Some(100.0));
        assert!(tween.is_finished());
        assert_eq!(tween.update(5000.0), Some(100.0));
    }

    #[test]
    fn test_pause_and_resume_preserve_progress() {
        let mut tween = Tween::with_easing(0.0, 10.0, 100.0, EasingFunction::Linear);
        tween.start(0.0);
        tween.update(40.0);
        tween.pause(40.0);
        assert_abs_diff_eq!(tween.update(90.0).unwrap(), 4.0, epsilon = 1e-12);

        tween.resume(1000.0);
        assert_abs_diff_eq!(tween.update(1030.0).unwrap(), 7.0, epsilon = 1e-12);
        assert_eq!(tween.update(1060.0), Some(10.0));
        assert!(tween.is_finished());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut tween = Tween::new(Point::new(0.0, 0.0), Point::new(5.0, 5.0), 0.0);
        tween.start(10.0);
        assert_eq!(tween.update(10.0), Some(Point::new(5.0, 5.0)));
        assert!(tween.is_finished());
    }

    #[test]
    fn test_change_target_restarts_from_current_value() {
        let mut tween = Tween::with_easing(0.0, 10.0, 100.0, EasingFunction::Linear);
        tween.start(0.0);
        tween.change_target(20.0, 50.0);
        assert_eq!(tween.from, 5.0);
        assert_eq!(tween.update(100.0), Some(12.5));
    }
}
