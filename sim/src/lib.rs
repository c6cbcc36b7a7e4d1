//! Core simulation for the riverside scene viewer.
//!
//! Everything here is frame-driven and engine-agnostic apart from `bevy`
//! math types: the viewer feeds an [`input::InputSnapshot`], a camera yaw and
//! a delta time into [`session::Session::update`] once per rendered frame
//! and reads back the player transform, the active animation and the
//! particle buffers.

pub mod camera;
pub mod constants;
pub mod input;
pub mod player;
pub mod session;
pub mod terrain;
pub mod water;

pub use constants::*;
pub use input::InputSnapshot;
pub use session::Session;
