// Domain layer: raw records, order entities and the ports the adapters implement.

pub mod model;
pub mod money;
pub mod order;
pub mod ports;
