// Domain layer: records, lookup arguments and ports. No network code lives here.

pub mod lookup;
pub mod model;
pub mod ports;
