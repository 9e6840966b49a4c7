pub mod client;
pub mod generator;
pub mod prompts;

pub use client::{GenOverrides, GenParams, HfClient, LlmError};
pub use generator::TextGenerator;
