pub mod gateway;
pub mod gcs;

pub use gateway::ObjectStoreGateway;
pub use gcs::GcsGateway;
