//! Usage graph over a repository snapshot — deterministic, rule-based.
//!
//! Builds a directed graph of cross-file import/export relationships from
//! supplied source text, then answers impact queries: blast radius (how far a
//! change fans out through dependents) and subsystem spread (how many
//! structurally distinct areas import a file).
//!
//! No AI, no DB, no network; pure computation over an in-memory snapshot.

pub mod builder;
pub mod parse;
pub mod paths;
pub mod radius;
pub mod types;

pub use builder::{BuildOptions, GraphBuilder};
pub use radius::{blast_radius, subsystem_spread};
pub use types::{GraphNode, SourceFile, UsageGraph};
