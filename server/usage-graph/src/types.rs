//! Graph model: interned paths, per-file nodes, and the usage graph itself.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Dense index into the path intern table.
pub type PathId = usize;

/// One source file fed to the builder (JSON contract — what the caller sends).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
  pub path: String,
  pub text: String,
}

/// Intern table mapping canonical paths to dense indices.
///
/// The graph stores integer ids everywhere so BFS never hashes or clones
/// path strings, and a visited set is just a bit per node.
#[derive(Debug, Default)]
pub struct PathTable {
  paths: Vec<String>,
  index: HashMap<String, PathId>,
}

impl PathTable {
  /// Intern a canonical path, returning its id (existing or new).
  pub fn intern(&mut self, canonical: &str) -> PathId {
    if let Some(&id) = self.index.get(canonical) {
      return id;
    }
    let id = self.paths.len();
    self.paths.push(canonical.to_string());
    self.index.insert(canonical.to_string(), id);
    id
  }

  pub fn get(&self, canonical: &str) -> Option<PathId> {
    self.index.get(canonical).copied()
  }

  pub fn path(&self, id: PathId) -> &str {
    &self.paths[id]
  }

  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }
}

/// One resolved import recorded on the importer.
#[derive(Debug, Clone)]
pub struct Import {
  pub from: PathId,
  pub symbols: Vec<String>,
}

/// Per-file node. Invariant: `imported_by` never contains the node's own id
/// and holds each importer at most once.
#[derive(Debug, Default)]
pub struct GraphNode {
  pub exports: BTreeSet<String>,
  pub imports: Vec<Import>,
  pub imported_by: Vec<PathId>,
  pub subsystems: BTreeSet<String>,
  /// True when at least one import specifier could not be statically resolved.
  pub partial: bool,
}

/// Immutable usage graph for one analysis run. Nodes are indexed by PathId.
#[derive(Debug, Default)]
pub struct UsageGraph {
  pub paths: PathTable,
  pub nodes: Vec<GraphNode>,
}

impl UsageGraph {
  /// Look up a node by (possibly un-canonicalized) path.
  pub fn node(&self, path: &str) -> Option<(PathId, &GraphNode)> {
    let canonical = crate::paths::canonicalize(path);
    let id = self.paths.get(&canonical)?;
    Some((id, &self.nodes[id]))
  }
}

/// Per-file stats emitted by the binary (JSON contract — what we emit).
#[derive(Debug, Clone, Serialize)]
pub struct FileGraphSummary {
  pub path: String,
  pub exports: Vec<String>,
  pub imported_by: Vec<String>,
  pub subsystems: Vec<String>,
  pub blast_radius: u32,
  pub partial: bool,
}

impl FileGraphSummary {
  pub fn for_node(graph: &UsageGraph, id: PathId) -> Self {
    let node = &graph.nodes[id];
    Self {
      path: graph.paths.path(id).to_string(),
      exports: node.exports.iter().cloned().collect(),
      imported_by: node
        .imported_by
        .iter()
        .map(|&dep| graph.paths.path(dep).to_string())
        .collect(),
      subsystems: node.subsystems.iter().cloned().collect(),
      blast_radius: crate::radius::blast_radius_of(graph, id),
      partial: node.partial,
    }
  }
}
