//! Transition Task
//!
//! A fade / glide / fade relocation as a resumable state object. The owner
//! steps it once per tick and reacts to the [`TransitionStep`] it reports:
//!
//! ```text
//! FadingOut --(overlay opaque)--> Moving --(pose committed)--> Arrived
//!     Arrived --(owner swaps state, calls begin_fade_in)--> FadingIn --> Finished
//! ```
//!
//! While `FadingOut` the viewpoint still belongs to the enabled controller.
//! From `Covered` until the owner re-enables a controller the task is the
//! viewpoint's only writer.

use crate::camera::viewpoint::{Pose, Viewpoint, smoothstep};
use crate::navigation::events::TransitionKind;
use crate::navigation::fade::FadeOverlay;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionPhase {
    FadingOut,
    Moving { from: Pose, elapsed: f32 },
    /// Final pose committed, waiting for the owner to swap state
    Arrived,
    FadingIn,
}

/// What happened during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStep {
    /// Nothing changed phase
    InProgress,
    /// The screen is opaque; controllers must be disabled now
    Covered,
    /// The target pose is committed; swap rooms, re-enable a controller, then fade in
    Arrived,
    /// The overlay is clear again; the task is done
    Finished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTask {
    kind: TransitionKind,
    target: Pose,
    phase: TransitionPhase,
    fade_duration: f32,
    move_duration: f32,
}

impl TransitionTask {
    /// Create the task and start fading out.
    pub fn begin(
        kind: TransitionKind,
        target: Pose,
        fade_duration: f32,
        move_duration: f32,
        fade: &mut dyn FadeOverlay,
    ) -> Self {
        fade.fade_out(fade_duration);
        Self {
            kind,
            target,
            phase: TransitionPhase::FadingOut,
            fade_duration,
            move_duration,
        }
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn target(&self) -> Pose {
        self.target
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Advance at most one phase.
    pub fn step(
        &mut self,
        delta_time: f32,
        viewpoint: &mut Viewpoint,
        fade: &dyn FadeOverlay,
    ) -> TransitionStep {
        match self.phase {
            TransitionPhase::FadingOut => {
                if !fade.is_complete() {
                    return TransitionStep::InProgress;
                }
                self.phase = TransitionPhase::Moving {
                    from: viewpoint.pose(),
                    elapsed: 0.0,
                };
                TransitionStep::Covered
            }
            TransitionPhase::Moving { from, elapsed } => {
                let elapsed = elapsed + delta_time;
                let t = if self.move_duration > 0.0 {
                    (elapsed / self.move_duration).min(1.0)
                } else {
                    1.0
                };
                if t >= 1.0 {
                    // Exact commit, no interpolation error at the end
                    viewpoint.set_pose(self.target);
                    self.phase = TransitionPhase::Arrived;
                    return TransitionStep::Arrived;
                }
                viewpoint.set_pose(from.lerp(&self.target, smoothstep(t)));
                self.phase = TransitionPhase::Moving { from, elapsed };
                TransitionStep::InProgress
            }
            // Waiting on the owner
            TransitionPhase::Arrived => TransitionStep::InProgress,
            TransitionPhase::FadingIn => {
                if fade.is_complete() {
                    TransitionStep::Finished
                } else {
                    TransitionStep::InProgress
                }
            }
        }
    }

    /// Start fading back in once the arrival state is in place.
    pub fn begin_fade_in(&mut self, fade: &mut dyn FadeOverlay) {
        if self.phase != TransitionPhase::Arrived {
            log::warn!("[Transition] fade-in requested in phase {:?}", self.phase);
            return;
        }
        fade.fade_in(self.fade_duration);
        self.phase = TransitionPhase::FadingIn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::viewpoint::Orientation;
    use crate::navigation::fade::TimedFade;
    use crate::world::entities::DoorId;
    use glam::Vec3;

    fn target() -> Pose {
        Pose::new(Vec3::new(10.0, 1.7, 5.0), Orientation::looking(0.0, 90.0))
    }

    #[test]
    fn test_full_sequence() {
        let mut fade = TimedFade::new();
        let mut viewpoint = Viewpoint::new(Vec3::new(0.0, 60.0, 0.0), Orientation::looking(30.0, 0.0));
        let mut task = TransitionTask::begin(TransitionKind::Enter(DoorId(0)), target(), 0.2, 0.5, &mut fade);

        let dt = 0.1;
        let mut steps = Vec::new();
        for _ in 0..40 {
            fade.tick(dt);
            let step = task.step(dt, &mut viewpoint, &fade);
            if step == TransitionStep::Arrived {
                assert_eq!(viewpoint.pose(), target());
                task.begin_fade_in(&mut fade);
            }
            if step != TransitionStep::InProgress {
                steps.push(step);
            }
            if step == TransitionStep::Finished {
                break;
            }
        }
        assert_eq!(
            steps,
            vec![TransitionStep::Covered, TransitionStep::Arrived, TransitionStep::Finished]
        );
        assert_eq!(viewpoint.pose(), target());
    }

    #[test]
    fn test_viewpoint_untouched_while_fading_out() {
        let mut fade = TimedFade::new();
        let start = Viewpoint::new(Vec3::new(0.0, 60.0, 0.0), Orientation::default());
        let mut viewpoint = start;
        let mut task = TransitionTask::begin(TransitionKind::Exit(DoorId(0)), target(), 1.0, 0.5, &mut fade);
        fade.tick(0.5);
        assert_eq!(task.step(0.5, &mut viewpoint, &fade), TransitionStep::InProgress);
        assert_eq!(viewpoint, start);
    }

    #[test]
    fn test_glide_passes_between_endpoints() {
        let mut fade = TimedFade::new();
        let mut viewpoint = Viewpoint::new(Vec3::ZERO, Orientation::default());
        let mut task = TransitionTask::begin(TransitionKind::Enter(DoorId(0)), target(), 0.0, 1.0, &mut fade);
        assert_eq!(task.step(0.0, &mut viewpoint, &fade), TransitionStep::Covered);
        assert_eq!(task.step(0.5, &mut viewpoint, &fade), TransitionStep::InProgress);
        assert!((viewpoint.position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_move_duration_commits_immediately() {
        let mut fade = TimedFade::new();
        let mut viewpoint = Viewpoint::default();
        let mut task = TransitionTask::begin(TransitionKind::Enter(DoorId(0)), target(), 0.0, 0.0, &mut fade);
        task.step(0.0, &mut viewpoint, &fade);
        assert_eq!(task.step(0.0, &mut viewpoint, &fade), TransitionStep::Arrived);
        assert_eq!(viewpoint.pose(), target());
    }
}
