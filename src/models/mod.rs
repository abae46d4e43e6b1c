pub mod audit;
pub mod run;
pub mod run_data;
pub mod summary;

pub use audit::*;
pub use run::*;
pub use run_data::*;
pub use summary::*;
