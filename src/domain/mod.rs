// Domain layer: core models and ports (interfaces). No external dependencies
// beyond std/serde/chrono when needed.

pub mod model;
pub mod ports;
