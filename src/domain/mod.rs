// Domain layer: tenant project models, theme objects and the fetch port.

pub mod model;
pub mod ports;
pub mod theme;
