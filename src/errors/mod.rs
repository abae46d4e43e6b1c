pub mod types;
pub mod classification;

pub use types::StatusError;
pub use classification::{ErrorClassification, ErrorKind};
