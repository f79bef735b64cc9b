// Domain layer: status model and the ports the workflow drives.

pub mod model;
pub mod ports;
