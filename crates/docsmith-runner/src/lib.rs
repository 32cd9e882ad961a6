pub mod agent;
pub mod config;
pub mod executor;
pub mod output;
pub mod pipeline;
pub mod tool;

pub use agent::Agent;
pub use config::{PipelineSettings, RunnerConfig};
