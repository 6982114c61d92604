pub mod error;
pub mod openapi;
pub mod params;

pub use error::*;
pub use params::*;
