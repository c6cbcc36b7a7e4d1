//! Static terrain collision: triangle mesh storage and ray probes.

mod mesh;
mod probe;

pub use mesh::*;
pub use probe::*;
