//! Fade effects used by dialog surfaces
//!
//! `Fade` drives the backdrop opacity; `FadeInDown` fades the inner panel in
//! while it settles downward into place. Both start on `open()`.

use super::{Animatable, AnimationConfig, EasingType, Transition};
use std::time::Duration;
use tokio::time::Instant;

/// Rows the inner panel travels while fading in
pub const FADE_IN_DOWN_DISTANCE: u16 = 2;

/// Opacity fade from transparent to a target opacity
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    transition: Transition,
    target_opacity: f32,
}

impl Fade {
    pub fn fade_in(duration: Duration, target_opacity: f32, started_at: Instant) -> Self {
        Self {
            transition: Transition::start_at(
                AnimationConfig::new()
                    .duration(duration)
                    .easing(EasingType::EaseOut),
                started_at,
            ),
            target_opacity: target_opacity.clamp(0.0, 1.0),
        }
    }

    pub fn duration(&self) -> Duration {
        self.transition.duration()
    }

    /// Opacity at `now`
    pub fn opacity_at(&self, now: Instant) -> f32 {
        0.0_f32.interpolate(&self.target_opacity, self.transition.progress_at(now))
    }
}

/// Fade in combined with a short downward slide
#[derive(Debug, Clone, Copy)]
pub struct FadeInDown {
    transition: Transition,
    distance: u16,
}

impl FadeInDown {
    pub fn new(duration: Duration, reduced_motion: bool, started_at: Instant) -> Self {
        Self {
            transition: Transition::start_at(
                AnimationConfig::new()
                    .duration(duration)
                    .easing(EasingType::EaseOut),
                started_at,
            ),
            distance: if reduced_motion { 0 } else { FADE_IN_DOWN_DISTANCE },
        }
    }

    pub fn duration(&self) -> Duration {
        self.transition.duration()
    }

    pub fn opacity_at(&self, now: Instant) -> f32 {
        self.transition.progress_at(now)
    }

    /// Rows above the resting position the panel is drawn at
    pub fn lift_at(&self, now: Instant) -> u16 {
        let remaining = 1.0 - self.transition.progress_at(now);
        (self.distance as f32 * remaining).round() as u16
    }
}

/// Backdrop and inner panel entry, started together
#[derive(Debug, Clone, Copy)]
pub struct EntryTransition {
    pub backdrop: Fade,
    pub inner: FadeInDown,
}

impl EntryTransition {
    pub fn start(
        backdrop_fade: Duration,
        backdrop_opacity: f32,
        inner_fade: Duration,
        reduced_motion: bool,
    ) -> Self {
        let now = Instant::now();
        Self {
            backdrop: Fade::fade_in(backdrop_fade, backdrop_opacity, now),
            inner: FadeInDown::new(inner_fade, reduced_motion, now),
        }
    }

    /// Time until both layers have finished
    pub fn total(&self) -> Duration {
        self.backdrop.duration().max(self.inner.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backdrop_reaches_target_opacity() {
        let start = Instant::now();
        let fade = Fade::fade_in(Duration::from_millis(150), 0.8, start);
        assert_eq!(fade.opacity_at(start), 0.0);
        let end = fade.opacity_at(start + Duration::from_millis(150));
        assert!((end - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fade_in_down_settles() {
        let start = Instant::now();
        let inner = FadeInDown::new(Duration::from_millis(100), false, start);
        assert_eq!(inner.lift_at(start), FADE_IN_DOWN_DISTANCE);
        assert_eq!(inner.lift_at(start + Duration::from_millis(100)), 0);
        assert_eq!(inner.opacity_at(start + Duration::from_millis(100)), 1.0);
    }

    #[test]
    fn test_reduced_motion_has_no_slide() {
        let start = Instant::now();
        let inner = FadeInDown::new(Duration::from_millis(100), true, start);
        assert_eq!(inner.lift_at(start), 0);
    }

    #[test]
    fn test_entry_total_is_longest_layer() {
        let entry = EntryTransition::start(
            Duration::from_millis(150),
            0.8,
            Duration::from_millis(100),
            false,
        );
        assert_eq!(entry.total(), Duration::from_millis(150));
    }
}
