// Domain layer: the model base, its variants and the storage port.

mod macros;

pub mod amenity;
pub mod model;
pub mod ports;
pub mod registry;
