pub mod combination;
pub mod config;
pub mod engine;
pub mod error;
pub mod sampling;
pub mod statistics;
pub mod strategies;

pub use combination::{Combination, History, Pair};
pub use config::EngineConfig;
pub use engine::GenerationEngine;
pub use error::{CombinationError, EngineError, Fallback};
pub use statistics::{analyze, analyze_with, Statistics, SumBounds};
pub use strategies::Strategy;
