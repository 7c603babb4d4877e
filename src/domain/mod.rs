// Domain layer: value types and ports. Storage and clock live outside this module.

pub mod model;
pub mod ports;
