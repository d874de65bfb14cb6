pub mod config;
pub mod error;
pub mod generator;
pub mod ingest;
pub mod observe;
pub mod output;
pub mod pipeline;
pub mod schema;
pub mod transform;
pub mod types;
