// Domain layer: tree, palette and report models plus the ports the core talks through.

pub mod model;
pub mod palette;
pub mod ports;
