//! Binary entrypoint: read one JSON analysis request from stdin, write one
//! aggregated result to stdout. Config problems are fatal; per-file problems
//! land in the result's skip buckets.

use std::io::{self, Read, Write};

use impact_engine::{AnalysisRequest, Engine};

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_writer(io::stderr)
    .init();

  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "impact-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let request: AnalysisRequest = serde_json::from_str(&raw)?;

  let engine = match request.config.clone() {
    Some(config) => Engine::new(config)?,
    None => Engine::with_defaults(),
  };
  let result = engine.analyze(&request);

  let json = serde_json::to_vec(&result)?;
  io::stdout().write_all(&json)?;
  Ok(())
}
