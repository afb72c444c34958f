//! Engine configuration: risk weights, thresholds, exclusions, toggles.
//!
//! Validated eagerly at engine construction; an invalid config aborts the
//! whole run before any analysis happens.

use serde::Deserialize;

use crate::error::EngineError;
use crate::types::RiskFactor;

/// Extensions (without dot) the detector and the graph treat as source files.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

/// Point weight per risk factor. All weights must be non-negative.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
  /// Informational by default: a new export breaks nobody.
  pub export_added: f64,
  /// Most severe default: removing an export breaks every importer.
  pub export_removed: f64,
  /// Covers return narrowing and positional parameter issues alike.
  pub return_type_changed: f64,
  pub props_changed: f64,
  pub missing_test: f64,
  pub file_added: f64,
  pub file_removed: f64,
  pub file_renamed: f64,
  pub large_change: f64,
  pub imported_in_files: f64,
  pub cross_subsystem: f64,
}

impl Default for RiskWeights {
  fn default() -> Self {
    Self {
      export_added: 0.0,
      export_removed: 25.0,
      return_type_changed: 15.0,
      props_changed: 10.0,
      missing_test: 10.0,
      file_added: 2.0,
      file_removed: 20.0,
      file_renamed: 5.0,
      large_change: 10.0,
      imported_in_files: 8.0,
      cross_subsystem: 5.0,
    }
  }
}

impl RiskWeights {
  pub fn for_factor(&self, factor: RiskFactor) -> f64 {
    match factor {
      RiskFactor::ExportAdded => self.export_added,
      RiskFactor::ExportRemoved => self.export_removed,
      RiskFactor::ReturnTypeChanged => self.return_type_changed,
      RiskFactor::PropsChanged => self.props_changed,
      RiskFactor::MissingTest => self.missing_test,
      RiskFactor::FileAdded => self.file_added,
      RiskFactor::FileRemoved => self.file_removed,
      RiskFactor::FileRenamed => self.file_renamed,
      RiskFactor::LargeChange => self.large_change,
      RiskFactor::ImportedInFiles => self.imported_in_files,
      RiskFactor::CrossSubsystem => self.cross_subsystem,
      // Always informational; not configurable.
      RiskFactor::UnresolvedImport => 0.0,
    }
  }

  fn entries(&self) -> [(&'static str, f64); 11] {
    [
      ("export_added", self.export_added),
      ("export_removed", self.export_removed),
      ("return_type_changed", self.return_type_changed),
      ("props_changed", self.props_changed),
      ("missing_test", self.missing_test),
      ("file_added", self.file_added),
      ("file_removed", self.file_removed),
      ("file_renamed", self.file_renamed),
      ("large_change", self.large_change),
      ("imported_in_files", self.imported_in_files),
      ("cross_subsystem", self.cross_subsystem),
    ]
  }
}

/// Risk-level cut points and the large-change percentage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Thresholds {
  pub medium_risk: f64,
  pub high_risk: f64,
  pub very_high_risk: f64,
  /// Percentage of a file's lines changed before LargeChange fires. (0, 100].
  pub large_change_percentage: f64,
}

impl Default for Thresholds {
  fn default() -> Self {
    Self {
      medium_risk: 10.0,
      high_risk: 25.0,
      very_high_risk: 50.0,
      large_change_percentage: 40.0,
    }
  }
}

/// Scope exclusions shared by the detector and the graph builder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Exclusions {
  /// Path substrings excluded from analysis entirely.
  pub paths: Vec<String>,
  /// Path substrings marking test files.
  pub test_markers: Vec<String>,
}

impl Exclusions {
  pub fn test_markers_or_default(&self) -> Vec<String> {
    if self.test_markers.is_empty() {
      vec![".test.".into(), ".spec.".into(), "__tests__/".into()]
    } else {
      self.test_markers.clone()
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisToggles {
  pub include_test_coverage: bool,
  pub include_usage_graph: bool,
  /// Cap on files fed into the graph builder.
  pub max_files_in_graph: Option<usize>,
}

impl Default for AnalysisToggles {
  fn default() -> Self {
    Self {
      include_test_coverage: true,
      include_usage_graph: true,
      max_files_in_graph: Some(500),
    }
  }
}

/// Fully merged configuration, as handed to the engine by the (out-of-scope)
/// config-discovery layer. Treated as immutable for the run.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResolvedConfig {
  pub weights: RiskWeights,
  pub thresholds: Thresholds,
  pub exclusions: Exclusions,
  pub analysis: AnalysisToggles,
}

impl ResolvedConfig {
  /// Eager validation; any failure is fatal for the run.
  pub fn validate(&self) -> Result<(), EngineError> {
    for (name, value) in self.weights.entries() {
      if value < 0.0 || !value.is_finite() {
        return Err(EngineError::config(
          &format!("weights.{}", name),
          "must be a non-negative number",
        ));
      }
    }
    let t = &self.thresholds;
    if !(t.medium_risk < t.high_risk && t.high_risk < t.very_high_risk) {
      return Err(EngineError::config(
        "thresholds",
        "must satisfy medium_risk < high_risk < very_high_risk",
      ));
    }
    if !(t.large_change_percentage > 0.0 && t.large_change_percentage <= 100.0) {
      return Err(EngineError::config(
        "thresholds.large_change_percentage",
        "must be in (0, 100]",
      ));
    }
    Ok(())
  }
}
