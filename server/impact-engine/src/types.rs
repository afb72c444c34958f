//! Core types for the impact engine (JSON contracts + internal models).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::{ResolvedConfig, Thresholds};
pub use usage_graph::SourceFile;

// ---------------------------------------------------------------------------
// Inbound types (JSON contract — what the caller sends)
// ---------------------------------------------------------------------------

/// One analysis request from stdin. Unknown fields are silently ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
  /// Optional config overrides; defaults apply when absent.
  #[serde(default)]
  pub config: Option<ResolvedConfig>,
  /// Whole-repo snapshot: feeds the usage graph and the test corpus.
  #[serde(default)]
  pub source_files: Vec<SourceFile>,
  /// Changed files in change-provider order.
  pub changes: Vec<FileChange>,
  /// Per-path line churn from the change provider.
  #[serde(default)]
  pub line_stats: HashMap<String, LineStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeStatus {
  Added,
  Deleted,
  Modified,
  Renamed,
  Untracked,
}

/// One changed file. Content is inlined by the content provider; `None`
/// is the retrieval-failure sentinel (never an exception).
#[derive(Debug, Clone, Deserialize)]
pub struct FileChange {
  pub path: String,
  pub status: ChangeStatus,
  #[serde(default)]
  pub renamed_from: Option<String>,
  #[serde(default)]
  pub old_content: Option<String>,
  #[serde(default)]
  pub new_content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LineStats {
  pub added: u32,
  pub removed: u32,
  pub total_lines: u32,
}

// ---------------------------------------------------------------------------
// Risk factors and scored risks
// ---------------------------------------------------------------------------

/// Fixed enumeration of detectable risk conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
  ExportAdded,
  ExportRemoved,
  ReturnTypeChanged,
  PropsChanged,
  MissingTest,
  FileAdded,
  FileRemoved,
  FileRenamed,
  LargeChange,
  ImportedInFiles,
  CrossSubsystem,
  UnresolvedImport,
}

impl RiskFactor {
  /// Stable wire name, used for hashing into the analysis id.
  pub fn name(self) -> &'static str {
    match self {
      Self::ExportAdded => "export_added",
      Self::ExportRemoved => "export_removed",
      Self::ReturnTypeChanged => "return_type_changed",
      Self::PropsChanged => "props_changed",
      Self::MissingTest => "missing_test",
      Self::FileAdded => "file_added",
      Self::FileRemoved => "file_removed",
      Self::FileRenamed => "file_renamed",
      Self::LargeChange => "large_change",
      Self::ImportedInFiles => "imported_in_files",
      Self::CrossSubsystem => "cross_subsystem",
      Self::UnresolvedImport => "unresolved_import",
    }
  }
}

/// One detected risk condition. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRisk {
  pub subject: String,
  pub factor: RiskFactor,
  pub points: f64,
  pub explanation: String,
}

impl ScoredRisk {
  pub fn new(subject: impl Into<String>, factor: RiskFactor, points: f64, explanation: impl Into<String>) -> Self {
    Self {
      subject: subject.into(),
      factor,
      points,
      explanation: explanation.into(),
    }
  }
}

// ---------------------------------------------------------------------------
// Risk levels (presentational only)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
  VeryHigh,
}

impl RiskLevel {
  /// Classify a numeric score against configured thresholds. Buckets gate
  /// nothing in the engine; they exist for the report layer.
  pub fn classify(score: f64, thresholds: &Thresholds) -> Self {
    if score >= thresholds.very_high_risk {
      Self::VeryHigh
    } else if score >= thresholds.high_risk {
      Self::High
    } else if score >= thresholds.medium_risk {
      Self::Medium
    } else {
      Self::Low
    }
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract — what we emit)
// ---------------------------------------------------------------------------

/// Skipped files, partitioned by reason. Each path appears in at most one bucket.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SkippedFiles {
  pub unsupported: Vec<String>,
  pub failed: Vec<String>,
  pub empty: Vec<String>,
  pub tests: Vec<String>,
}

/// Graph stats for one analyzed file.
#[derive(Debug, Clone, Serialize)]
pub struct FileGraphInfo {
  pub path: String,
  pub imported_by: usize,
  pub blast_radius: u32,
  pub subsystems: Vec<String>,
  pub partial: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
  pub path: String,
  pub total: f64,
  pub risk_level: RiskLevel,
  pub risks: Vec<ScoredRisk>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub line_stats: Option<LineStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregatedResult {
  /// Stable id derived from the scored content (identical inputs, identical id).
  pub analysis_id: String,
  pub total_risk_score: f64,
  pub average_risk_score: f64,
  pub risk_level: RiskLevel,
  /// Sorted by total descending; input order breaks ties.
  pub files: Vec<FileReport>,
  pub skipped: SkippedFiles,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub graph: Vec<FileGraphInfo>,
}
