//! Orchestrates one analysis run: change validation, scope checks,
//! structural detection, graph signals, coverage, aggregation.

use tracing::debug;

use usage_graph::{BuildOptions, GraphBuilder, UsageGraph};

use crate::config::{ResolvedConfig, SUPPORTED_EXTENSIONS};
use crate::coverage::{self, TestCorpus};
use crate::detect;
use crate::error::EngineError;
use crate::frontend::{SourceFrontEnd, SyntaxFrontEnd};
use crate::score::{self, FileSignals};
use crate::types::{
  AggregatedResult, AnalysisRequest, ChangeStatus, FileChange, FileGraphInfo, RiskFactor,
  ScoredRisk, SkippedFiles,
};

/// The change-impact risk engine. Stateless across runs; the config is
/// validated once at construction and immutable afterwards.
#[derive(Debug)]
pub struct Engine<F = SyntaxFrontEnd> {
  config: ResolvedConfig,
  frontend: F,
}

impl Engine<SyntaxFrontEnd> {
  pub fn new(config: ResolvedConfig) -> Result<Self, EngineError> {
    Self::with_frontend(config, SyntaxFrontEnd)
  }

  pub fn with_defaults() -> Self {
    // The default config always validates.
    Self {
      config: ResolvedConfig::default(),
      frontend: SyntaxFrontEnd,
    }
  }
}

impl<F: SourceFrontEnd> Engine<F> {
  /// Construct with an alternate source front-end (tests, compiler services).
  pub fn with_frontend(config: ResolvedConfig, frontend: F) -> Result<Self, EngineError> {
    config.validate()?;
    Ok(Self { config, frontend })
  }

  /// Run one analysis. Per-file failures become skip buckets, never errors;
  /// the whole pipeline is synchronous and processes changes in input order.
  pub fn analyze(&self, request: &AnalysisRequest) -> AggregatedResult {
    let test_markers = self.config.exclusions.test_markers_or_default();

    // Both snapshots are computed once and read-only for the rest of the
    // run: every file's coverage check must see the identical corpus, and
    // scoring never feeds back into the graph.
    let corpus = self
      .config
      .analysis
      .include_test_coverage
      .then(|| TestCorpus::from_snapshot(&request.source_files, &test_markers));
    let graph = self.config.analysis.include_usage_graph.then(|| {
      GraphBuilder::new(BuildOptions {
        extensions: SUPPORTED_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        exclude: self.config.exclusions.paths.clone(),
        test_markers: test_markers.clone(),
        max_files: self.config.analysis.max_files_in_graph,
      })
      .build(&request.source_files)
    });

    let mut skipped = SkippedFiles::default();
    let mut graph_info: Vec<FileGraphInfo> = Vec::new();
    let mut signals: Vec<FileSignals> = Vec::new();

    for change in &request.changes {
      if !valid_rename(change) {
        debug!(path = change.path.as_str(), "invalid rename dropped from change list");
        continue;
      }
      if test_markers.iter().any(|m| change.path.contains(m.as_str())) {
        skipped.tests.push(change.path.clone());
        continue;
      }
      if !self.supported(&change.path) {
        skipped.unsupported.push(change.path.clone());
        continue;
      }

      // Deleted files carry one risk and are never diffed, regardless of
      // what content (if any) is still retrievable.
      if change.status == ChangeStatus::Deleted {
        let mut risks = vec![ScoredRisk::new(
          change.path.clone(),
          RiskFactor::FileRemoved,
          self.config.weights.for_factor(RiskFactor::FileRemoved),
          format!("file {} was deleted", change.path),
        )];
        if let Some(graph) = &graph {
          risks.extend(self.graph_risks(graph, &change.path, &mut graph_info));
        }
        signals.push(FileSignals {
          path: change.path.clone(),
          risks,
        });
        continue;
      }

      let (old_text, new_text) = match resolve_contents(change) {
        Contents::Failed => {
          skipped.failed.push(change.path.clone());
          continue;
        }
        Contents::Empty => {
          skipped.empty.push(change.path.clone());
          continue;
        }
        Contents::Ready(old, new) => (old, new),
      };

      let mut risks = Vec::new();
      match change.status {
        ChangeStatus::Added | ChangeStatus::Untracked => {
          risks.push(ScoredRisk::new(
            change.path.clone(),
            RiskFactor::FileAdded,
            self.config.weights.for_factor(RiskFactor::FileAdded),
            format!("file {} is new", change.path),
          ));
        }
        ChangeStatus::Renamed => {
          let from = change.renamed_from.as_deref().unwrap_or("unknown");
          risks.push(ScoredRisk::new(
            change.path.clone(),
            RiskFactor::FileRenamed,
            self.config.weights.for_factor(RiskFactor::FileRenamed),
            format!("file renamed from {} to {}", from, change.path),
          ));
        }
        ChangeStatus::Modified | ChangeStatus::Deleted => {}
      }

      let analysis = detect::analyze_file(
        &self.frontend,
        &change.path,
        &old_text,
        &new_text,
        &self.config.weights,
      );
      risks.extend(analysis.risks);

      if let Some(graph) = &graph {
        risks.extend(self.graph_risks(graph, &change.path, &mut graph_info));
      }

      if let Some(corpus) = &corpus {
        let symbols = if analysis.changed_symbols.is_empty() {
          vec![coverage::file_placeholder(&change.path)]
        } else {
          analysis.changed_symbols
        };
        let untested = coverage::find_untested(&symbols, corpus);
        if !untested.is_empty() {
          // One flat-weight risk per file, no matter how many symbols.
          risks.push(ScoredRisk::new(
            change.path.clone(),
            RiskFactor::MissingTest,
            self.config.weights.for_factor(RiskFactor::MissingTest),
            format!("no test mentions {}", summarize_names(&untested)),
          ));
        }
      }

      signals.push(FileSignals {
        path: change.path.clone(),
        risks,
      });
    }

    score::aggregate(signals, &request.line_stats, skipped, graph_info, &self.config)
  }

  fn supported(&self, path: &str) -> bool {
    let has_extension = match path.rsplit_once('.') {
      Some((_, ext)) => SUPPORTED_EXTENSIONS.contains(&ext),
      None => false,
    };
    has_extension
      && !self
        .config
        .exclusions
        .paths
        .iter()
        .any(|pat| path.contains(pat.as_str()))
  }

  /// Graph-derived risks for one changed file, recording its graph stats.
  fn graph_risks(
    &self,
    graph: &UsageGraph,
    path: &str,
    graph_info: &mut Vec<FileGraphInfo>,
  ) -> Vec<ScoredRisk> {
    let Some((id, node)) = graph.node(path) else {
      return Vec::new();
    };
    let blast = usage_graph::radius::blast_radius_of(graph, id);

    graph_info.push(FileGraphInfo {
      path: path.to_string(),
      imported_by: node.imported_by.len(),
      blast_radius: blast,
      subsystems: node.subsystems.iter().cloned().collect(),
      partial: node.partial,
    });

    let mut risks = Vec::new();
    if !node.imported_by.is_empty() {
      risks.push(ScoredRisk::new(
        path,
        RiskFactor::ImportedInFiles,
        self.config.weights.for_factor(RiskFactor::ImportedInFiles),
        format!(
          "imported by {} file(s), blast radius {}",
          node.imported_by.len(),
          blast
        ),
      ));
    }
    if node.subsystems.len() > 1 {
      let tags: Vec<&str> = node.subsystems.iter().map(String::as_str).collect();
      risks.push(ScoredRisk::new(
        path,
        RiskFactor::CrossSubsystem,
        self.config.weights.for_factor(RiskFactor::CrossSubsystem),
        format!("used across {} subsystems: {}", tags.len(), tags.join(", ")),
      ));
    }
    if node.partial {
      risks.push(ScoredRisk::new(
        path,
        RiskFactor::UnresolvedImport,
        0.0,
        "one or more imports could not be statically resolved".to_string(),
      ));
    }
    risks
  }
}

/// A rename is kept only when the provider confirmed the old path, and the
/// pair is not a phantom (content missing on both sides).
fn valid_rename(change: &FileChange) -> bool {
  if change.status != ChangeStatus::Renamed {
    return true;
  }
  change.renamed_from.is_some()
    && (change.old_content.is_some() || change.new_content.is_some())
}

enum Contents {
  Failed,
  Empty,
  Ready(String, String),
}

/// Status-aware content resolution. For brand-new files the old side is
/// legitimately absent and treated as empty text; for everything else a
/// missing side is a retrieval failure.
fn resolve_contents(change: &FileChange) -> Contents {
  match change.status {
    ChangeStatus::Added | ChangeStatus::Untracked => match &change.new_content {
      None => Contents::Failed,
      Some(new) if new.trim().is_empty() => Contents::Empty,
      Some(new) => Contents::Ready(change.old_content.clone().unwrap_or_default(), new.clone()),
    },
    _ => match (&change.old_content, &change.new_content) {
      (Some(old), Some(new)) => {
        if old.trim().is_empty() || new.trim().is_empty() {
          Contents::Empty
        } else {
          Contents::Ready(old.clone(), new.clone())
        }
      }
      _ => Contents::Failed,
    },
  }
}

/// At most three names verbatim, then a count.
fn summarize_names(names: &[String]) -> String {
  let shown: Vec<&str> = names.iter().take(3).map(String::as_str).collect();
  if names.len() > 3 {
    format!("`{}` and {} more", shown.join("`, `"), names.len() - 3)
  } else {
    format!("`{}`", shown.join("`, `"))
  }
}
