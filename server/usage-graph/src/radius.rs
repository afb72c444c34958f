//! Impact queries over a built graph: blast radius and subsystem spread.

use std::collections::VecDeque;

use crate::types::{PathId, UsageGraph};

/// Edge-weighted blast radius of a file.
///
/// Breadth-first expansion over `imported_by`, expanding each node at most
/// once; every expansion adds that node's direct dependent count to the
/// total. This rewards breadth of fan-out at each hop rather than counting
/// distinct reachable files — an intermediate module imported by many files
/// raises the score even when the reachable set is small. Deliberate policy,
/// kept as-is; confirm with stakeholders before changing the semantic.
pub fn blast_radius(graph: &UsageGraph, path: &str) -> u32 {
  match graph.node(path) {
    Some((id, _)) => blast_radius_of(graph, id),
    None => 0,
  }
}

/// Blast radius by node id (see [`blast_radius`]).
pub fn blast_radius_of(graph: &UsageGraph, start: PathId) -> u32 {
  let mut visited = vec![false; graph.nodes.len()];
  let mut queue = VecDeque::new();
  visited[start] = true;
  queue.push_back(start);

  let mut total = 0u32;
  while let Some(id) = queue.pop_front() {
    let node = &graph.nodes[id];
    total += node.imported_by.len() as u32;
    for &dep in &node.imported_by {
      if !visited[dep] {
        visited[dep] = true;
        queue.push_back(dep);
      }
    }
  }
  total
}

/// Number of structurally distinct areas importing this file — the size of
/// the node's own subsystem set, not transitively expanded.
pub fn subsystem_spread(graph: &UsageGraph, path: &str) -> usize {
  match graph.node(path) {
    Some((_, node)) => node.subsystems.len(),
    None => 0,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::builder::GraphBuilder;
  use crate::types::SourceFile;

  fn file(path: &str, text: &str) -> SourceFile {
    SourceFile {
      path: path.into(),
      text: text.into(),
    }
  }

  #[test]
  fn zero_without_dependents() {
    let files = vec![file("src/a.ts", "export const a = 1;\n")];
    let graph = GraphBuilder::with_defaults().build(&files);
    assert_eq!(blast_radius(&graph, "src/a.ts"), 0);
  }

  #[test]
  fn unknown_file_is_zero() {
    let graph = GraphBuilder::with_defaults().build(&[]);
    assert_eq!(blast_radius(&graph, "src/nope.ts"), 0);
    assert_eq!(subsystem_spread(&graph, "src/nope.ts"), 0);
  }

  #[test]
  fn direct_dependents_only() {
    let files = vec![
      file("src/a.ts", "export const a = 1;\n"),
      file("src/b.ts", "import { a } from './a';\n"),
      file("src/c.ts", "import { a } from './a';\n"),
    ];
    let graph = GraphBuilder::with_defaults().build(&files);
    assert_eq!(blast_radius(&graph, "src/a.ts"), 2);
  }

  #[test]
  fn fan_out_at_each_hop_accumulates() {
    // a <- b <- {c, d}: expanding a adds 1 (b), expanding b adds 2 (c, d).
    let files = vec![
      file("src/a.ts", "export const a = 1;\n"),
      file("src/b.ts", "import { a } from './a';\nexport const b = 1;\n"),
      file("src/c.ts", "import { b } from './b';\n"),
      file("src/d.ts", "import { b } from './b';\n"),
    ];
    let graph = GraphBuilder::with_defaults().build(&files);
    assert_eq!(blast_radius(&graph, "src/a.ts"), 3);
  }

  #[test]
  fn diamond_expands_each_node_once() {
    // a <- {b, c} <- d: d imports both b and c, so d's dependency edges are
    // counted via both b and c, but d itself is expanded only once.
    let files = vec![
      file("src/a.ts", "export const a = 1;\n"),
      file("src/b.ts", "import { a } from './a';\nexport const b = 1;\n"),
      file("src/c.ts", "import { a } from './a';\nexport const c = 1;\n"),
      file("src/d.ts", "import { b } from './b';\nimport { c } from './c';\n"),
    ];
    let graph = GraphBuilder::with_defaults().build(&files);
    // a expands to 2 (b, c); b and c each add their one dependent (d).
    assert_eq!(blast_radius(&graph, "src/a.ts"), 4);
  }

  #[test]
  fn cycles_terminate() {
    let files = vec![
      file("src/a.ts", "import { b } from './b';\nexport const a = 1;\n"),
      file("src/b.ts", "import { a } from './a';\nexport const b = 1;\n"),
    ];
    let graph = GraphBuilder::with_defaults().build(&files);
    // a's dependents: b (1); b's dependents: a (1), already visited.
    assert_eq!(blast_radius(&graph, "src/a.ts"), 2);
  }

  #[test]
  fn monotonic_under_edge_addition() {
    let base = vec![
      file("src/a.ts", "export const a = 1;\n"),
      file("src/b.ts", "import { a } from './a';\nexport const b = 1;\n"),
      file("src/c.ts", "export const c = 1;\n"),
    ];
    let before = blast_radius(&GraphBuilder::with_defaults().build(&base), "src/a.ts");

    // Add one importer edge (c now imports b) and re-measure everything.
    let extended = vec![
      base[0].clone(),
      base[1].clone(),
      file("src/c.ts", "import { b } from './b';\nexport const c = 1;\n"),
    ];
    let after_graph = GraphBuilder::with_defaults().build(&extended);
    assert!(blast_radius(&after_graph, "src/a.ts") >= before);
    assert!(blast_radius(&after_graph, "src/b.ts") >= 1);
  }

  #[test]
  fn spread_counts_direct_subsystems() {
    let files = vec![
      file("src/lib/core.ts", "export const x = 1;\n"),
      file("src/components/App.tsx", "import { x } from '../lib/core';\n"),
      file("src/api/users.ts", "import { x } from '../lib/core';\n"),
      file("src/pages/home.tsx", "import { x } from '../lib/core';\n"),
    ];
    let graph = GraphBuilder::with_defaults().build(&files);
    assert_eq!(subsystem_spread(&graph, "src/lib/core.ts"), 3);
  }
}
