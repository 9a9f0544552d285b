//! The ordered diagnostic pipeline: stage contract, assembly and the
//! concrete stages.

pub mod builder;
pub mod stage;
pub mod stages;
pub mod standard;

pub use builder::{Pipeline, PipelineBuilder, PipelineReport, StageStat};
pub use stage::Stage;
pub use standard::standard_pipeline;
