// Domain layer: request/result models and the provider port. No HTTP types here.

pub mod model;
pub mod ports;
