//! Frame-driven animation of projection parameters
//!
//! The engine owns the displayed [`Projection`] and is the only writer of its
//! state. Interaction sets targets synchronously; the current state advances
//! only when the host fires the frame the engine asked for. One frame is
//! pending at most, and every frame notifies all subscribers.

use crate::animation::convergence::Convergence;
use crate::animation::scheduler::{FrameHandle, FrameScheduler};
use crate::animation::transitions::{
    AnimationSequence, ProjectionTransition, SequenceState, TransitionFrame, TransitionMode,
};
use crate::animation::tweening::Tween;
use crate::core::config::AnimationConfig;
use crate::core::viewport::ViewportState;
use crate::projection::{Projection, ProjectionParams, ProjectionState};

/// Called once when a timed animation reaches its end
pub type CompletionCallback = Box<dyn FnOnce()>;

/// Called after every frame with the freshly written state
pub type Subscriber = Box<dyn FnMut(&ProjectionState)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// What a frame did and whether the loop keeps running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Another frame has been requested
    Continue,
    /// Convergence made no perceptible change; the loop stopped
    Settled,
    /// A timed animation, transition or sequence reached its end
    Completed,
    /// Nothing to advance (for example a paused sequence)
    Idle,
}

/// Outgoing projection still drawn during a cross-fade
#[derive(Debug, Clone)]
pub struct CrossFade {
    pub outgoing: Projection,
    pub outgoing_opacity: f64,
    pub incoming_opacity: f64,
}

enum ActiveAnimation {
    Tween {
        tween: Tween<ProjectionParams>,
        on_complete: Option<CompletionCallback>,
    },
    Transition {
        transition: Box<ProjectionTransition>,
        on_complete: Option<CompletionCallback>,
    },
    Sequence(AnimationSequence),
}

pub struct AnimationEngine {
    config: AnimationConfig,
    projection: Projection,
    width: f64,
    height: f64,
    convergence: Convergence,
    active: Option<ActiveAnimation>,
    cross_fade: Option<CrossFade>,
    pending_frame: Option<FrameHandle>,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
    settle_deadline: Option<f64>,
    frames_rendered: u64,
}

impl AnimationEngine {
    /// Take over a projection; its current scale becomes the initial scale
    pub fn new(projection: Projection, width: f64, height: f64, config: AnimationConfig) -> Self {
        let convergence = Convergence::new(projection.rotate(), projection.scale());
        Self {
            config,
            projection,
            width,
            height,
            convergence,
            active: None,
            cross_fade: None,
            pending_frame: None,
            subscribers: Vec::new(),
            next_subscription: 0,
            settle_deadline: None,
            frames_rendered: 0,
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn state(&self) -> &ProjectionState {
        self.projection.state()
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn initial_scale(&self) -> f64 {
        self.convergence.initial_scale()
    }

    /// Rebase relative-scale calculations on a new fitted scale
    pub fn set_initial_scale(&mut self, scale: f64) {
        self.convergence.set_initial_scale(scale);
    }

    pub fn relative_scale(&self) -> f64 {
        self.projection.scale() / self.convergence.initial_scale()
    }

    pub fn target_rotation(&self) -> [f64; 3] {
        self.convergence.target_rotation
    }

    pub fn target_scale(&self) -> f64 {
        self.convergence.target_scale
    }

    pub fn set_dynamic_projection(&mut self, enabled: bool) {
        self.config.dynamic_projection = enabled;
        if !enabled {
            self.settle_deadline = None;
        }
    }

    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// True while a frame is pending
    pub fn is_animating(&self) -> bool {
        self.pending_frame.is_some()
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending_frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn cross_fade(&self) -> Option<&CrossFade> {
        self.cross_fade.as_ref()
    }

    pub fn sequence_state(&self) -> Option<SequenceState> {
        match &self.active {
            Some(ActiveAnimation::Sequence(sequence)) => Some(sequence.state()),
            _ => None,
        }
    }

    /// Snapshot for the projection selector
    pub fn viewport_state(&self) -> ViewportState {
        ViewportState::new(
            self.projection.view_center(),
            self.relative_scale(),
            self.width,
            self.height,
        )
    }

    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&ProjectionState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Set the rotation target; a no-op for projections that cannot rotate
    pub fn set_target_rotation(&mut self, rotation: [f64; 3], scheduler: &mut dyn FrameScheduler) {
        if !self.projection.capabilities().supports_rotation {
            return;
        }
        self.interrupt_timed();
        self.convergence.target_rotation = rotation;
        self.ensure_frame(scheduler);
    }

    pub fn rotate_by(&mut self, delta: [f64; 3], scheduler: &mut dyn FrameScheduler) {
        if !self.projection.capabilities().supports_rotation {
            return;
        }
        self.interrupt_timed();
        let mut target = self.convergence.target_rotation;
        for (axis, d) in target.iter_mut().zip(delta.iter()) {
            *axis += d;
        }
        self.set_target_rotation(target, scheduler);
    }

    /// Set the scale target, clamped to the configured extent
    pub fn set_target_scale(&mut self, scale: f64, scheduler: &mut dyn FrameScheduler) {
        if !(scale.is_finite() && scale > 0.0) {
            log::warn!("ignoring invalid target scale {}", scale);
            return;
        }
        self.interrupt_timed();
        self.convergence.target_scale = self.convergence.clamp_scale(scale, &self.config);
        self.ensure_frame(scheduler);
    }

    /// Multiply the scale target and give the spring a matching impulse
    pub fn zoom_by(&mut self, factor: f64, scheduler: &mut dyn FrameScheduler) {
        if !(factor.is_finite() && factor > 0.0) {
            return;
        }
        self.interrupt_timed();
        let previous = self.convergence.target_scale;
        let target = self
            .convergence
            .clamp_scale(previous * factor, &self.config);
        self.convergence.velocity += (target - previous) * self.config.zoom_impulse;
        self.convergence.target_scale = target;
        self.ensure_frame(scheduler);
    }

    /// Ease from the current parameters to `target`, replacing any running animation
    pub fn animate_to(
        &mut self,
        target: ProjectionParams,
        duration_ms: Option<f64>,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
        on_complete: Option<CompletionCallback>,
    ) {
        self.cancel(scheduler);
        let mut target = target;
        target.scale = self.convergence.clamp_scale(target.scale, &self.config);

        let duration = duration_ms.unwrap_or(self.config.default_duration_ms);
        let mut tween = Tween::new(self.projection.state().params(), target, duration);
        tween.start(now_ms);
        self.active = Some(ActiveAnimation::Tween { tween, on_complete });
        self.request_frame(scheduler);
    }

    /// Switch to another projection, blending or cross-fading over `duration_ms`
    ///
    /// The initial scale is left alone; a confirmed family switch rebases it
    /// through [`crate::selector::ProjectionSelector::switch_engine`].
    pub fn transition_to(
        &mut self,
        incoming: Projection,
        mode: Option<TransitionMode>,
        duration_ms: Option<f64>,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
        on_complete: Option<CompletionCallback>,
    ) {
        self.cancel(scheduler);
        let mode = mode
            .unwrap_or_else(|| TransitionMode::between(self.projection.kind(), incoming.kind()));
        let duration = duration_ms.unwrap_or(self.config.default_duration_ms);

        let outgoing = std::mem::replace(&mut self.projection, incoming.clone());
        if mode == TransitionMode::Blend {
            self.projection.apply_params(&outgoing.state().params());
        }
        log::debug!(
            "transition {} -> {} ({:?})",
            outgoing.kind(),
            incoming.kind(),
            mode
        );

        if mode == TransitionMode::CrossFade {
            self.cross_fade = Some(CrossFade {
                outgoing: outgoing.clone(),
                outgoing_opacity: 1.0,
                incoming_opacity: 0.0,
            });
        }

        let mut transition = ProjectionTransition::new(outgoing, incoming, mode, duration);
        transition.start(now_ms);
        self.active = Some(ActiveAnimation::Transition {
            transition: Box::new(transition),
            on_complete,
        });
        self.request_frame(scheduler);
    }

    /// Play a scripted sequence from the current parameters
    pub fn play_sequence(
        &mut self,
        mut sequence: AnimationSequence,
        now_ms: f64,
        scheduler: &mut dyn FrameScheduler,
    ) {
        self.cancel(scheduler);
        sequence.play(self.projection.state().params(), now_ms);
        self.active = Some(ActiveAnimation::Sequence(sequence));
        self.request_frame(scheduler);
    }

    /// Pause a playing sequence; no frames are requested while paused
    pub fn pause_sequence(&mut self, now_ms: f64, scheduler: &mut dyn FrameScheduler) {
        if let Some(ActiveAnimation::Sequence(sequence)) = self.active.as_mut() {
            sequence.pause(now_ms);
            if let Some(handle) = self.pending_frame.take() {
                scheduler.cancel_frame(handle);
            }
        }
    }

    pub fn resume_sequence(&mut self, now_ms: f64, scheduler: &mut dyn FrameScheduler) {
        if let Some(ActiveAnimation::Sequence(sequence)) = self.active.as_mut() {
            if sequence.state() == SequenceState::Paused {
                sequence.resume(now_ms);
                self.ensure_frame(scheduler);
            }
        }
    }

    /// Cancel the pending frame and drop any animation without completing it
    pub fn stop(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.cancel(scheduler);
        self.settle_deadline = None;
        self.convergence
            .sync_to(self.projection.rotate(), self.projection.scale());
    }

    /// Replace the projection and start over from rest
    pub fn reset(&mut self, projection: Projection, scheduler: &mut dyn FrameScheduler) {
        self.cancel(scheduler);
        self.settle_deadline = None;
        self.convergence = Convergence::new(projection.rotate(), projection.scale());
        self.projection = projection;
    }

    /// Run one frame; called by the host when the pending frame fires
    pub fn frame(&mut self, now_ms: f64, scheduler: &mut dyn FrameScheduler) -> FrameOutcome {
        self.pending_frame = None;
        self.frames_rendered += 1;

        let outcome = match self.active.take() {
            Some(ActiveAnimation::Tween {
                mut tween,
                on_complete,
            }) => {
                if let Some(params) = tween.update(now_ms) {
                    self.projection.apply_params(&params);
                }
                if tween.is_finished() {
                    self.finish_timed(on_complete);
                    FrameOutcome::Completed
                } else {
                    self.active = Some(ActiveAnimation::Tween { tween, on_complete });
                    FrameOutcome::Continue
                }
            }
            Some(ActiveAnimation::Transition {
                mut transition,
                on_complete,
            }) => {
                match transition.update(now_ms) {
                    Some(TransitionFrame::Blend(params)) => self.projection.apply_params(&params),
                    Some(TransitionFrame::CrossFade { outgoing, incoming }) => {
                        if let Some(fade) = self.cross_fade.as_mut() {
                            fade.outgoing_opacity = outgoing;
                            fade.incoming_opacity = incoming;
                        }
                    }
                    None => {}
                }
                if transition.is_finished() {
                    self.cross_fade = None;
                    self.finish_timed(on_complete);
                    FrameOutcome::Completed
                } else {
                    self.active = Some(ActiveAnimation::Transition {
                        transition,
                        on_complete,
                    });
                    FrameOutcome::Continue
                }
            }
            Some(ActiveAnimation::Sequence(mut sequence)) => {
                if let Some(params) = sequence.update(now_ms) {
                    self.projection.apply_params(&params);
                }
                match sequence.state() {
                    SequenceState::PlayingStep(_) => {
                        self.active = Some(ActiveAnimation::Sequence(sequence));
                        FrameOutcome::Continue
                    }
                    SequenceState::Paused => {
                        self.active = Some(ActiveAnimation::Sequence(sequence));
                        FrameOutcome::Idle
                    }
                    SequenceState::Completed => {
                        self.finish_timed(None);
                        FrameOutcome::Completed
                    }
                    SequenceState::Idle => FrameOutcome::Idle,
                }
            }
            None => self.converge(now_ms),
        };

        if outcome == FrameOutcome::Continue {
            self.request_frame(scheduler);
        }
        self.notify();
        outcome
    }

    /// Viewport snapshot once the settle debounce has elapsed
    ///
    /// Fires at most once per settle and only with dynamic projection enabled.
    pub fn poll_settle_check(&mut self, now_ms: f64) -> Option<ViewportState> {
        match self.settle_deadline {
            Some(deadline) if now_ms >= deadline => {
                self.settle_deadline = None;
                Some(self.viewport_state())
            }
            _ => None,
        }
    }

    pub fn settle_deadline(&self) -> Option<f64> {
        self.settle_deadline
    }

    fn converge(&mut self, now_ms: f64) -> FrameOutcome {
        let moved = self.convergence.step(&self.config);
        if !moved {
            self.convergence.snap_to_target();
        }
        let params = ProjectionParams::new(
            self.convergence.current_scale,
            self.projection.translate(),
            self.convergence.current_rotation,
        );
        self.projection.apply_params(&params);

        if moved {
            return FrameOutcome::Continue;
        }
        log::debug!(
            "frame loop settled after {} frames at scale {:.3}",
            self.frames_rendered,
            self.projection.scale()
        );
        if self.config.dynamic_projection {
            self.settle_deadline = Some(now_ms + self.config.settle_debounce_ms);
        }
        FrameOutcome::Settled
    }

    fn finish_timed(&mut self, on_complete: Option<CompletionCallback>) {
        self.convergence
            .sync_to(self.projection.rotate(), self.projection.scale());
        if let Some(callback) = on_complete {
            callback();
        }
    }

    /// Interactive input takes over from a timed animation without completing it
    fn interrupt_timed(&mut self) {
        self.settle_deadline = None;
        if self.active.take().is_some() {
            self.cross_fade = None;
            self.convergence
                .sync_to(self.projection.rotate(), self.projection.scale());
        }
    }

    fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(handle) = self.pending_frame.take() {
            scheduler.cancel_frame(handle);
        }
        self.active = None;
        self.cross_fade = None;
    }

    fn ensure_frame(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.pending_frame.is_none() {
            self.request_frame(scheduler);
        }
    }

    fn request_frame(&mut self, scheduler: &mut dyn FrameScheduler) {
        self.pending_frame = Some(scheduler.request_frame());
    }

    fn notify(&mut self) {
        let state = self.projection.state();
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(state);
        }
    }
}
