//! Transition phases and fade opacity

use crate::foundation::math::utils::unit_to_alpha;

/// Phase of the scene transition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// No transition; requests are accepted
    #[default]
    Idle,
    /// Fading to black
    Entering,
    /// Fully black; the swap happens at the end of this phase
    Active,
    /// Fading back in on the new scene
    Exiting,
}

impl TransitionPhase {
    /// Whether a transition is running
    pub fn is_transitioning(self) -> bool {
        self != Self::Idle
    }
}

/// Overlay opacity while fading out of a scene
///
/// Zero until `timer` drops into the fade window, then rising to 255 as it
/// reaches zero.
pub fn fade_in_alpha(timer: f32, fade_window: f32) -> u8 {
    unit_to_alpha(1.0 - timer / fade_window)
}

/// Overlay opacity while fading into a scene, falling from 255 to zero
pub fn fade_out_alpha(timer: f32, fade_window: f32) -> u8 {
    unit_to_alpha(timer / fade_window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_ramp() {
        assert_eq!(fade_in_alpha(0.5, 0.5), 0);
        assert_eq!(fade_in_alpha(0.25, 0.5), 127);
        assert_eq!(fade_in_alpha(0.0, 0.5), 255);
        assert_eq!(fade_in_alpha(-0.1, 0.5), 255);
        // Before the window the ratio is above one and clamps to zero
        assert_eq!(fade_in_alpha(2.0, 0.5), 0);
    }

    #[test]
    fn test_fade_out_ramp() {
        assert_eq!(fade_out_alpha(0.5, 0.5), 255);
        assert_eq!(fade_out_alpha(0.25, 0.5), 127);
        assert_eq!(fade_out_alpha(-0.2, 0.5), 0);
    }
}
