// Domain layer: request-scoped models and the ports the providers plug into.

pub mod model;
pub mod ports;
