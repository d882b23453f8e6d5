use crate::animation::interpolation::{EasingFunction, Interpolatable, Interpolation};
use crate::animation::tweening::Tween;
use crate::projection::{Projection, ProjectionKind, ProjectionParams};

/// How two projections are combined while switching between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionMode {
    /// Interpolate scale, translate and rotation into the incoming projection
    Blend,
    /// Draw both projections with complementary opacities
    CrossFade,
}

impl TransitionMode {
    /// Cross-fade when the two families cannot be blended meaningfully
    pub fn between(from: ProjectionKind, to: ProjectionKind) -> Self {
        let is_globe = |kind: ProjectionKind| kind == ProjectionKind::Orthographic;
        if from == ProjectionKind::AlbersUsa
            || to == ProjectionKind::AlbersUsa
            || is_globe(from) != is_globe(to)
        {
            TransitionMode::CrossFade
        } else {
            TransitionMode::Blend
        }
    }
}

/// Output of one transition frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionFrame {
    Blend(ProjectionParams),
    CrossFade { outgoing: f64, incoming: f64 },
}

/// Time-bounded switch from one projection to another
#[derive(Debug, Clone)]
pub struct ProjectionTransition {
    outgoing: Projection,
    incoming: Projection,
    mode: TransitionMode,
    from_params: ProjectionParams,
    to_params: ProjectionParams,
    progress: Tween<f64>,
}

impl ProjectionTransition {
    pub fn new(
        outgoing: Projection,
        incoming: Projection,
        mode: TransitionMode,
        duration_ms: f64,
    ) -> Self {
        let from_params = outgoing.state().params();
        let to_params = incoming.state().params();
        Self {
            outgoing,
            incoming,
            mode,
            from_params,
            to_params,
            progress: Tween::with_easing(0.0, 1.0, duration_ms, EasingFunction::EaseInOutCubic),
        }
    }

    pub fn mode(&self) -> TransitionMode {
        self.mode
    }

    pub fn outgoing(&self) -> &Projection {
        &self.outgoing
    }

    pub fn incoming(&self) -> &Projection {
        &self.incoming
    }

    pub fn target_params(&self) -> ProjectionParams {
        self.to_params
    }

    pub fn start(&mut self, now_ms: f64) {
        self.progress.start(now_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.progress.is_finished()
    }

    /// Advance to `now_ms`; `None` until started
    pub fn update(&mut self, now_ms: f64) -> Option<TransitionFrame> {
        let t = self.progress.update(now_ms)?;
        Some(match self.mode {
            TransitionMode::Blend => {
                TransitionFrame::Blend(self.from_params.lerp(&self.to_params, t))
            }
            TransitionMode::CrossFade => {
                let (outgoing, incoming) = Interpolation::cross_fade(t);
                TransitionFrame::CrossFade { outgoing, incoming }
            }
        })
    }

    pub fn into_incoming(self) -> Projection {
        self.incoming
    }
}

/// One step of a scripted animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationStep {
    pub target: ProjectionParams,
    pub duration_ms: f64,
    /// Pause after reaching the target before the next step begins
    pub hold_ms: f64,
}

impl AnimationStep {
    pub fn new(target: ProjectionParams, duration_ms: f64) -> Self {
        Self {
            target,
            duration_ms,
            hold_ms: 0.0,
        }
    }

    pub fn with_hold(mut self, hold_ms: f64) -> Self {
        self.hold_ms = hold_ms.max(0.0);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceState {
    Idle,
    PlayingStep(usize),
    Paused,
    Completed,
}

/// Queue of steps driven by a single frame loop
///
/// Each step tweens from wherever the previous one ended. Finishing a step
/// (including its hold) advances the queue index; the last step completes
/// the sequence or wraps around when looping.
#[derive(Debug, Clone)]
pub struct AnimationSequence {
    steps: Vec<AnimationStep>,
    state: SequenceState,
    looping: bool,
    easing: EasingFunction,
    tween: Option<Tween<ProjectionParams>>,
    hold_until: Option<f64>,
    paused_step: Option<usize>,
    paused_hold_left: Option<f64>,
    last: ProjectionParams,
}

impl AnimationSequence {
    pub fn new(steps: Vec<AnimationStep>) -> Self {
        Self {
            steps,
            state: SequenceState::Idle,
            looping: false,
            easing: EasingFunction::default(),
            tween: None,
            hold_until: None,
            paused_step: None,
            paused_hold_left: None,
            last: ProjectionParams::default(),
        }
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn steps(&self) -> &[AnimationStep] {
        &self.steps
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SequenceState::PlayingStep(_))
    }

    /// Begin at the first step, tweening away from `from`
    pub fn play(&mut self, from: ProjectionParams, now_ms: f64) {
        self.last = from;
        self.paused_step = None;
        self.paused_hold_left = None;
        if self.steps.is_empty() {
            self.state = SequenceState::Completed;
            return;
        }
        self.begin_step(0, now_ms);
    }

    pub fn pause(&mut self, now_ms: f64) {
        if let SequenceState::PlayingStep(index) = self.state {
            if let Some(tween) = self.tween.as_mut() {
                tween.pause(now_ms);
            }
            self.paused_hold_left = self.hold_until.map(|until| (until - now_ms).max(0.0));
            self.paused_step = Some(index);
            self.state = SequenceState::Paused;
        }
    }

    pub fn resume(&mut self, now_ms: f64) {
        if let (SequenceState::Paused, Some(index)) = (self.state, self.paused_step.take()) {
            if let Some(tween) = self.tween.as_mut() {
                tween.resume(now_ms);
            }
            self.hold_until = self.paused_hold_left.take().map(|left| now_ms + left);
            self.state = SequenceState::PlayingStep(index);
        }
    }

    pub fn stop(&mut self) {
        self.tween = None;
        self.hold_until = None;
        self.paused_step = None;
        self.paused_hold_left = None;
        self.state = SequenceState::Idle;
    }

    /// Advance to `now_ms` and return the parameters to display
    ///
    /// Returns `None` unless a step is playing.
    pub fn update(&mut self, now_ms: f64) -> Option<ProjectionParams> {
        let SequenceState::PlayingStep(index) = self.state else {
            return None;
        };

        if let Some(until) = self.hold_until {
            if now_ms >= until {
                self.hold_until = None;
                self.advance(index, now_ms);
            }
            return Some(self.last);
        }

        let tween = self.tween.as_mut()?;
        let params = tween.update(now_ms)?;
        self.last = params;
        if tween.is_finished() {
            let hold = self.steps[index].hold_ms;
            if hold > 0.0 {
                self.hold_until = Some(now_ms + hold);
            } else {
                self.advance(index, now_ms);
            }
        }
        Some(params)
    }

    fn begin_step(&mut self, index: usize, now_ms: f64) {
        let step = self.steps[index];
        let mut tween = Tween::with_easing(self.last, step.target, step.duration_ms, self.easing);
        tween.start(now_ms);
        self.tween = Some(tween);
        self.hold_until = None;
        self.state = SequenceState::PlayingStep(index);
    }

    fn advance(&mut self, index: usize, now_ms: f64) {
        let next = index + 1;
        if next < self.steps.len() {
            self.begin_step(next, now_ms);
        } else if self.looping {
            self.begin_step(0, now_ms);
        } else {
            self.tween = None;
            self.state = SequenceState::Completed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::Point;

    fn params(scale: f64, lambda: f64) -> ProjectionParams {
        ProjectionParams::new(scale, Point::new(480.0, 250.0), [lambda, 0.0, 0.0])
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(
            TransitionMode::between(ProjectionKind::Mercator, ProjectionKind::NaturalEarth),
            TransitionMode::Blend
        );
        assert_eq!(
            TransitionMode::between(ProjectionKind::Orthographic, ProjectionKind::Mercator),
            TransitionMode::CrossFade
        );
        assert_eq!(
            TransitionMode::between(ProjectionKind::Albers, ProjectionKind::AlbersUsa),
            TransitionMode::CrossFade
        );
    }

    #[test]
    fn test_cross_fade_weights_follow_progress() {
        let mut transition = ProjectionTransition::new(
            Projection::new(ProjectionKind::Orthographic),
            Projection::new(ProjectionKind::Equirectangular),
            TransitionMode::CrossFade,
            100.0,
        );
        assert!(transition.update(0.0).is_none());

        transition.start(0.0);
        assert_eq!(
            transition.update(50.0),
            Some(TransitionFrame::CrossFade {
                outgoing: 0.5,
                incoming: 0.5
            })
        );
        assert_eq!(
            transition.update(100.0),
            Some(TransitionFrame::CrossFade {
                outgoing: 0.0,
                incoming: 1.0
            })
        );
        assert!(transition.is_finished());
    }

    #[test]
    fn test_blend_ends_on_incoming_params() {
        let mut outgoing = Projection::new(ProjectionKind::Mercator);
        outgoing.set_rotation([170.0, 0.0, 0.0]);
        let mut incoming = Projection::new(ProjectionKind::NaturalEarth);
        incoming.set_rotation([-170.0, 0.0, 0.0]);
        incoming.set_scale(300.0);

        let mut transition =
            ProjectionTransition::new(outgoing, incoming, TransitionMode::Blend, 200.0);
        transition.start(0.0);

        match transition.update(100.0) {
            Some(TransitionFrame::Blend(mid)) => {
                assert_eq!(mid.rotate[0].abs(), 180.0);
                assert_eq!(mid.scale, 225.0);
            }
            other => panic!("unexpected frame {:?}", other),
        }
        assert_eq!(
            transition.update(250.0),
            Some(TransitionFrame::Blend(transition.target_params()))
        );
    }

    #[test]
    fn test_sequence_walks_steps_and_completes() {
        let mut sequence = AnimationSequence::new(vec![
            AnimationStep::new(params(200.0, 10.0), 100.0).with_hold(50.0),
            AnimationStep::new(params(300.0, 20.0), 100.0),
        ]);
        assert_eq!(sequence.state(), SequenceState::Idle);
        assert_eq!(sequence.update(0.0), None);

        sequence.play(params(100.0, 0.0), 0.0);
        assert_eq!(sequence.state(), SequenceState::PlayingStep(0));
        assert_eq!(sequence.update(100.0), Some(params(200.0, 10.0)));
        // Holding on step 0
        assert_eq!(sequence.update(120.0), Some(params(200.0, 10.0)));
        assert_eq!(sequence.state(), SequenceState::PlayingStep(0));

        sequence.update(150.0);
        assert_eq!(sequence.state(), SequenceState::PlayingStep(1));
        assert_eq!(sequence.update(250.0), Some(params(300.0, 20.0)));
        assert_eq!(sequence.state(), SequenceState::Completed);
        assert_eq!(sequence.update(300.0), None);
    }

    #[test]
    fn test_sequence_pause_resume_and_stop() {
        let mut sequence = AnimationSequence::new(vec![AnimationStep::new(params(200.0, 0.0), 100.0)])
            .with_easing(EasingFunction::Linear);
        sequence.play(params(100.0, 0.0), 0.0);
        sequence.update(50.0);
        sequence.pause(50.0);
        assert_eq!(sequence.state(), SequenceState::Paused);
        assert_eq!(sequence.update(500.0), None);

        sequence.resume(1000.0);
        assert_eq!(sequence.state(), SequenceState::PlayingStep(0));
        assert_eq!(sequence.update(1025.0).map(|p| p.scale), Some(175.0));

        sequence.stop();
        assert_eq!(sequence.state(), SequenceState::Idle);
        assert_eq!(sequence.update(1100.0), None);
    }

    #[test]
    fn test_looping_sequence_restarts() {
        let mut sequence = AnimationSequence::new(vec![
            AnimationStep::new(params(200.0, 0.0), 10.0),
            AnimationStep::new(params(100.0, 0.0), 10.0),
        ])
        .looping(true);
        sequence.play(params(100.0, 0.0), 0.0);
        sequence.update(10.0);
        sequence.update(20.0);
        assert_eq!(sequence.state(), SequenceState::PlayingStep(0));
    }
}
