// Domain layer: models, ports, and the conversion algorithms. No I/O here.

pub mod model;
pub mod ports;

pub mod services;
