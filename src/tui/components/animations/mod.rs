//! Animation primitives for dialog transitions
//!
//! Dialog surfaces animate in two layers that start together: the backdrop
//! fades in and the inner panel fades in while sliding down. Timings here also
//! drive the controller's `Opening -> Open` timer, so a transition is just a
//! clock reading turned into progress.

pub mod fade;

use ratatui::style::Color;
use std::time::Duration;
use tokio::time::Instant;

pub use fade::{EntryTransition, Fade, FadeInDown};

/// Easing functions for smooth animations
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EasingType {
    /// Linear interpolation (constant speed)
    Linear,
    /// Ease in (slow start)
    EaseIn,
    /// Ease out (slow end)
    #[default]
    EaseOut,
    /// Ease in-out (slow start and end)
    EaseInOut,
}

impl EasingType {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    pub fn apply(self, progress: f32) -> f32 {
        let progress = progress.clamp(0.0, 1.0);
        match self {
            EasingType::Linear => progress,
            EasingType::EaseIn => progress * progress,
            EasingType::EaseOut => 1.0 - (1.0 - progress) * (1.0 - progress),
            EasingType::EaseInOut => {
                if progress < 0.5 {
                    2.0 * progress * progress
                } else {
                    1.0 - 2.0 * (1.0 - progress) * (1.0 - progress)
                }
            }
        }
    }
}

/// Animation configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationConfig {
    /// Duration of the animation
    pub duration: Duration,
    /// Easing function to use
    pub easing: EasingType,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(150),
            easing: EasingType::EaseOut,
        }
    }
}

impl AnimationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn easing(mut self, easing: EasingType) -> Self {
        self.easing = easing;
        self
    }
}

/// Values that can be interpolated between two endpoints
pub trait Animatable {
    /// Interpolate between two values given a progress (0.0 to 1.0)
    fn interpolate(&self, target: &Self, progress: f32) -> Self;
}

impl Animatable for f32 {
    fn interpolate(&self, target: &Self, progress: f32) -> Self {
        self + (target - self) * progress
    }
}

impl Animatable for Color {
    fn interpolate(&self, target: &Self, progress: f32) -> Self {
        match (self, target) {
            (Color::Rgb(r1, g1, b1), Color::Rgb(r2, g2, b2)) => {
                let channel = |a: u8, b: u8| (a as f32).interpolate(&(b as f32), progress).round() as u8;
                Color::Rgb(channel(*r1, *r2), channel(*g1, *g2), channel(*b1, *b2))
            }
            // Named colors cannot blend, switch halfway
            _ => {
                if progress < 0.5 {
                    *self
                } else {
                    *target
                }
            }
        }
    }
}

/// A single timed transition
#[derive(Debug, Clone, Copy)]
pub struct Transition {
    config: AnimationConfig,
    started_at: Instant,
}

impl Transition {
    pub fn start(config: AnimationConfig) -> Self {
        Self::start_at(config, Instant::now())
    }

    pub fn start_at(config: AnimationConfig, started_at: Instant) -> Self {
        Self { config, started_at }
    }

    pub fn duration(&self) -> Duration {
        self.config.duration
    }

    /// Eased progress at `now`
    pub fn progress_at(&self, now: Instant) -> f32 {
        if self.config.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        let raw = elapsed.as_secs_f32() / self.config.duration.as_secs_f32();
        self.config.easing.apply(raw)
    }

    pub fn progress(&self) -> f32 {
        self.progress_at(Instant::now())
    }

    pub fn is_complete_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started_at) >= self.config.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingType::Linear,
            EasingType::EaseIn,
            EasingType::EaseOut,
            EasingType::EaseInOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
            assert_eq!(easing.apply(3.0), 1.0);
        }
        assert!(EasingType::EaseOut.apply(0.5) > 0.5);
        assert!(EasingType::EaseIn.apply(0.5) < 0.5);
    }

    #[test]
    fn test_color_interpolation() {
        let from = Color::Rgb(0, 0, 0);
        let to = Color::Rgb(200, 100, 50);
        assert_eq!(from.interpolate(&to, 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(Color::Red.interpolate(&Color::Blue, 0.4), Color::Red);
        assert_eq!(Color::Red.interpolate(&Color::Blue, 0.6), Color::Blue);
    }

    #[test]
    fn test_transition_progress() {
        let start = Instant::now();
        let transition = Transition::start_at(
            AnimationConfig::new()
                .duration(Duration::from_millis(100))
                .easing(EasingType::Linear),
            start,
        );
        assert_eq!(transition.progress_at(start), 0.0);
        let half = transition.progress_at(start + Duration::from_millis(50));
        assert!((half - 0.5).abs() < 0.01);
        assert_eq!(transition.progress_at(start + Duration::from_millis(500)), 1.0);
        assert!(transition.is_complete_at(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_zero_duration_is_complete() {
        let transition = Transition::start(AnimationConfig::new().duration(Duration::ZERO));
        assert_eq!(transition.progress(), 1.0);
    }
}
