pub mod commands;
pub mod status;

pub use commands::Cli;
pub use status::{build_config, handle_status};
