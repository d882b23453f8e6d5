pub mod convergence;
pub mod engine;
pub mod interpolation;
pub mod scheduler;
pub mod transitions;
pub mod tweening;

// Re-export commonly used types and functions for convenience
pub use convergence::Convergence;
pub use engine::{AnimationEngine, CrossFade, FrameOutcome, SubscriptionId};
pub use interpolation::{EasingFunction, Interpolatable, Interpolation};
pub use scheduler::{Clock, FrameHandle, FrameScheduler, ManualClock, ManualScheduler, SystemClock};
pub use transitions::{
    AnimationSequence, AnimationStep, ProjectionTransition, SequenceState, TransitionFrame,
    TransitionMode,
};
pub use tweening::{Tween, TweenState};
