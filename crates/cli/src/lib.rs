pub mod pipelines;
pub mod wind;
