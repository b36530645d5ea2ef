pub mod controller;
pub mod model;
pub mod router;
pub mod seed;
pub mod service;

pub use model::*;
pub use router::init_rbac_router;
