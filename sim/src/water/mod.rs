//! River simulation: configuration, the scalar wave field, and the two
//! particle populations riding it.

mod config;
mod foam;
mod mist;
mod surface;

pub use config::*;
pub use foam::*;
pub use mist::*;
pub use surface::*;
