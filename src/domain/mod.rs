// Domain layer: models, ports and the static catalog. No HTTP or host specifics here.

pub mod catalog;
pub mod model;
pub mod node;
pub mod ports;
