pub mod cs;
pub mod error;

pub use cs::hashing;
pub use error::{Error, Result};
