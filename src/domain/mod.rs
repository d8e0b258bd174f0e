// Domain layer: content models, load states and the ports the pipeline talks through.

pub mod model;
pub mod ports;
