// Domain layer: bundle models and the ports the pipeline is written against.

pub mod model;
pub mod ports;
