pub mod aggregator;
pub mod orchestrator;
pub mod resolver;

pub use aggregator::{parse_timestamp, RunDataAggregator};
pub use orchestrator::{run_pipeline, PipelineReport, RunOutcome};
pub use resolver::resolve_run_identifiers;
