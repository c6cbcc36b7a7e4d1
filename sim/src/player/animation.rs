//! Animation action bookkeeping: which clip is active and which crossfade
//! the playback layer should run next.
//!
//! The controller only decides names and fade timing; clip handles and the
//! actual blending live in the viewer's playback system, which drains
//! [`AnimationTrack::take_crossfade`] once per frame.

use crate::constants::{ANIMATION_FADE_SECONDS, JUMP_CLIP_SECONDS};

/// Names of the playable clips in the action set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimationName {
    #[default]
    Idle,
    Walk,
    Run,
    StrafeLeft,
    StrafeRight,
    /// Non-looping; clamps on its last frame.
    Jump,
}

/// A requested blend from one clip to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Crossfade {
    pub from: AnimationName,
    pub to: AnimationName,
    pub seconds: f32,
}

/// At most one clip is active at a time; transitions are time-bounded
/// crossfades. A running jump clip may not be pre-empted by movement
/// clips until it finishes or the player grounds again.
#[derive(Debug, Default)]
pub struct AnimationTrack {
    active: AnimationName,
    /// Elapsed time in the jump clip, while one is playing.
    jump_elapsed: Option<f32>,
    pending: Option<Crossfade>,
}

impl AnimationTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> AnimationName {
        self.active
    }

    /// True while the jump clip has started and not yet run its length.
    pub fn jump_clip_active(&self) -> bool {
        matches!(self.jump_elapsed, Some(elapsed) if elapsed < JUMP_CLIP_SECONDS)
    }

    /// Begin the jump clip from its first frame, fading from whatever was
    /// active.
    pub fn start_jump(&mut self) {
        self.push_fade(AnimationName::Jump);
        self.jump_elapsed = Some(0.0);
    }

    /// Ask for `target` to become the active clip. Called with the state
    /// machine's pick for the frame; a no-op when it is already active.
    pub fn request(&mut self, target: AnimationName) {
        if target == self.active {
            return;
        }
        self.push_fade(target);
        if target != AnimationName::Jump {
            self.jump_elapsed = None;
        }
    }

    pub fn tick(&mut self, dt: f32) {
        if let Some(elapsed) = &mut self.jump_elapsed {
            *elapsed += dt;
        }
    }

    /// Crossfade requested this frame, if any. The playback layer consumes
    /// it; simulation-only callers may ignore it.
    pub fn take_crossfade(&mut self) -> Option<Crossfade> {
        self.pending.take()
    }

    fn push_fade(&mut self, target: AnimationName) {
        self.pending = Some(Crossfade {
            from: self.active,
            to: target,
            seconds: ANIMATION_FADE_SECONDS,
        });
        self.active = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_emits_one_crossfade() {
        let mut track = AnimationTrack::new();
        track.request(AnimationName::Walk);
        let fade = track.take_crossfade().unwrap();
        assert_eq!(fade.from, AnimationName::Idle);
        assert_eq!(fade.to, AnimationName::Walk);
        assert_eq!(fade.seconds, ANIMATION_FADE_SECONDS);
        // Drained; re-requesting the active clip emits nothing.
        track.request(AnimationName::Walk);
        assert!(track.take_crossfade().is_none());
    }

    #[test]
    fn jump_clip_expires_after_its_length() {
        let mut track = AnimationTrack::new();
        track.start_jump();
        assert!(track.jump_clip_active());
        track.tick(JUMP_CLIP_SECONDS * 0.5);
        assert!(track.jump_clip_active());
        track.tick(JUMP_CLIP_SECONDS);
        assert!(!track.jump_clip_active());
        assert_eq!(track.active(), AnimationName::Jump);
    }

    #[test]
    fn movement_request_clears_jump_state() {
        let mut track = AnimationTrack::new();
        track.start_jump();
        track.request(AnimationName::Idle);
        assert!(!track.jump_clip_active());
        assert_eq!(track.active(), AnimationName::Idle);
    }
}
