//! Graph construction: scope filtering, import resolution, edge wiring.

use tracing::{debug, warn};

use crate::parse;
use crate::paths;
use crate::types::{Import, PathId, SourceFile, UsageGraph};

/// Candidate suffixes tried when resolving an extensionless specifier.
const RESOLVE_CANDIDATES: &[&str] = &[
  "",
  ".ts",
  ".tsx",
  ".js",
  ".jsx",
  "/index.ts",
  "/index.tsx",
  "/index.js",
];

/// Scope and sizing options for one build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
  /// Extensions (without dot) considered source files.
  pub extensions: Vec<String>,
  /// Path substrings excluded from the graph.
  pub exclude: Vec<String>,
  /// Path substrings marking test files (excluded from the graph).
  pub test_markers: Vec<String>,
  /// Cap on files fed into the graph; extra files are dropped from the tail.
  pub max_files: Option<usize>,
}

impl Default for BuildOptions {
  fn default() -> Self {
    Self {
      extensions: vec!["ts".into(), "tsx".into(), "js".into(), "jsx".into()],
      exclude: Vec::new(),
      test_markers: vec![".test.".into(), ".spec.".into(), "__tests__/".into()],
      max_files: None,
    }
  }
}

impl BuildOptions {
  pub fn in_scope(&self, canonical: &str) -> bool {
    let has_extension = match canonical.rsplit_once('.') {
      Some((_, ext)) => self.extensions.iter().any(|e| e == ext),
      None => false,
    };
    has_extension
      && !self.exclude.iter().any(|pat| canonical.contains(pat.as_str()))
      && !self.test_markers.iter().any(|pat| canonical.contains(pat.as_str()))
  }
}

/// Builds an immutable usage graph from a repository snapshot.
pub struct GraphBuilder {
  options: BuildOptions,
}

impl GraphBuilder {
  pub fn new(options: BuildOptions) -> Self {
    Self { options }
  }

  pub fn with_defaults() -> Self {
    Self::new(BuildOptions::default())
  }

  /// Build the graph. Files are taken in supplied order; unresolvable
  /// imports mark the importing node partial and never abort the build.
  pub fn build(&self, files: &[SourceFile]) -> UsageGraph {
    let mut graph = UsageGraph::default();

    let mut in_scope: Vec<(String, &SourceFile)> = files
      .iter()
      .filter_map(|f| {
        let canonical = paths::canonicalize(&f.path);
        self.options.in_scope(&canonical).then_some((canonical, f))
      })
      .collect();

    if let Some(cap) = self.options.max_files {
      if in_scope.len() > cap {
        warn!(total = in_scope.len(), cap, "graph capped; dropping files from the tail");
        in_scope.truncate(cap);
      }
    }

    // Pass 1: create every node so imports can resolve forward references.
    for (canonical, file) in &in_scope {
      let id = graph.paths.intern(canonical);
      if id == graph.nodes.len() {
        graph.nodes.push(Default::default());
      }
      graph.nodes[id].exports = parse::scan_exports(&file.text);
    }

    // Pass 2: wire edges.
    for (canonical, file) in &in_scope {
      let importer = match graph.paths.get(canonical) {
        Some(id) => id,
        None => continue,
      };
      for raw in parse::scan_imports(&file.text) {
        match self.resolve(&graph, canonical, raw.specifier.as_deref()) {
          Resolution::Resolved(target) => {
            graph.nodes[importer].imports.push(Import {
              from: target,
              symbols: raw.symbols,
            });
            add_dependent(&mut graph, importer, canonical, target);
          }
          Resolution::External => {}
          Resolution::Unresolved => {
            debug!(
              importer = canonical.as_str(),
              specifier = raw.specifier.as_deref().unwrap_or("<dynamic>"),
              "import could not be resolved; marking node partial"
            );
            graph.nodes[importer].partial = true;
          }
        }
      }
    }

    graph
  }

  fn resolve(&self, graph: &UsageGraph, importer: &str, specifier: Option<&str>) -> Resolution {
    let Some(spec) = specifier else {
      return Resolution::Unresolved;
    };
    if !paths::is_relative_specifier(spec) {
      // Bare specifier: an external package, outside the snapshot.
      return Resolution::External;
    }
    let base = paths::resolve_relative(importer, spec);
    for suffix in RESOLVE_CANDIDATES {
      if let Some(id) = graph.paths.get(&format!("{}{}", base, suffix)) {
        return Resolution::Resolved(id);
      }
    }
    Resolution::Unresolved
  }
}

enum Resolution {
  Resolved(PathId),
  External,
  Unresolved,
}

/// Record `importer` as a dependent of `target`: deduplicated, never self,
/// and tag the target with the importer's subsystem.
fn add_dependent(graph: &mut UsageGraph, importer: PathId, importer_path: &str, target: PathId) {
  if importer == target {
    return;
  }
  let tag = paths::subsystem_tag(importer_path);
  let node = &mut graph.nodes[target];
  if !node.imported_by.contains(&importer) {
    node.imported_by.push(importer);
  }
  node.subsystems.insert(tag);
}
