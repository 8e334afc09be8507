//! Render pipeline construction.

mod builder;

pub use builder::{Pipeline, PipelineBuildError, PipelineBuilder};
