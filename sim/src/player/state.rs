//! Explicit locomotion state, replacing the usual pile of boolean flags.

/// The avatar's movement state for one frame. `Jumping` cannot coexist
/// with `grounded` by construction: the transition function only yields it
/// on the airborne branch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LocomotionState {
    #[default]
    Idle,
    Walking,
    Running,
    /// Airborne with the jump clip still playing.
    Jumping,
    /// Airborne without a jump clip (walked off a ledge, clip finished).
    Airborne,
}

/// Pure transition function; the controller calls this once per frame
/// after ground resolution, so `grounded` is the frame's final value.
pub fn next_state(
    moving: bool,
    sprinting: bool,
    grounded: bool,
    jump_clip_active: bool,
) -> LocomotionState {
    if !grounded {
        if jump_clip_active {
            LocomotionState::Jumping
        } else {
            LocomotionState::Airborne
        }
    } else if moving {
        if sprinting {
            LocomotionState::Running
        } else {
            LocomotionState::Walking
        }
    } else {
        LocomotionState::Idle
    }
}
