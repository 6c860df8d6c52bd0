//! Business logic: classification, resource synthesis, and the chat
//! pipeline that ties them to the completion provider.

pub mod classifier;
pub mod extraction;
pub mod pipeline;
pub mod providers;
pub mod regions;
pub mod resources;

pub use pipeline::{ChatOutcome, ChatPipeline};
