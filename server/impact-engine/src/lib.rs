//! Change-Impact Risk Engine — deterministic, rule-based.
//!
//! Scores the regression risk of a set of changed source files by combining
//! structural breaking-change detection on exported declarations, usage-graph
//! fan-in (blast radius, subsystem spread), a missing-test heuristic, and
//! line-churn stats, under a validated configuration of weights and
//! thresholds.
//!
//! No AI, no DB, no network; pure computation over a supplied snapshot.

pub mod config;
pub mod coverage;
pub mod detect;
pub mod engine;
pub mod error;
pub mod frontend;
pub mod score;
pub mod types;

pub use config::ResolvedConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use types::{AggregatedResult, AnalysisRequest};
