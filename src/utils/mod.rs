pub mod formatting;

pub use formatting::{format_coverage_period, format_run_time, format_size, group_thousands};
