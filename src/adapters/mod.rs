// Adapters layer: concrete storage collaborators behind the domain's Storage port.

pub mod memory;
