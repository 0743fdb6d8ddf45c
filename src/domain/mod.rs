// Domain layer: value objects and ports (interfaces). Everything here is
// created per request; no shared mutable state crosses requests.

pub mod model;
pub mod ports;
