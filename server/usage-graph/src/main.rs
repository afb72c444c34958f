//! Binary entrypoint: read one JSON snapshot from stdin, write JSON lines to stdout.
//!
//! Input: `{"files": [{"path": "...", "text": "..."}], "max_files": 500}`.
//! Output: one FileGraphSummary JSON line per in-scope file, in graph order.

use std::io::{self, Read, Write};

use serde::Deserialize;
use usage_graph::types::FileGraphSummary;
use usage_graph::{BuildOptions, GraphBuilder, SourceFile};

#[derive(Deserialize)]
struct Request {
  files: Vec<SourceFile>,
  #[serde(default)]
  exclude: Vec<String>,
  #[serde(default)]
  max_files: Option<usize>,
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "usage-graph error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let request: Request = serde_json::from_str(&raw)?;

  let options = BuildOptions {
    exclude: request.exclude,
    max_files: request.max_files,
    ..BuildOptions::default()
  };
  let graph = GraphBuilder::new(options).build(&request.files);

  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  for id in 0..graph.nodes.len() {
    let summary = FileGraphSummary::for_node(&graph, id);
    serde_json::to_writer(&mut out, &summary)?;
    writeln!(out)?;
  }
  out.flush()?;
  Ok(())
}
