pub mod classification;
pub mod constructors;
pub mod conversions;
pub mod types;

pub use constructors::*;
pub use types::{Error, Kind, Result};

pub use types::BoxError;
