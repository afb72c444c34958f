//! Weighted aggregation of per-file signals into the final scored result.

use std::collections::HashMap;

use crate::config::ResolvedConfig;
use crate::types::{
  AggregatedResult, FileGraphInfo, FileReport, LineStats, RiskFactor, RiskLevel, ScoredRisk,
  SkippedFiles,
};

/// Signals collected for one analyzed file, in input order.
#[derive(Debug)]
pub struct FileSignals {
  pub path: String,
  pub risks: Vec<ScoredRisk>,
}

/// Fold all per-file signals into the final result.
///
/// The derived LargeChange risk is appended here, at presentation time: it
/// folds into the reported totals only, never into any detection-time score.
pub fn aggregate(
  signals: Vec<FileSignals>,
  line_stats: &HashMap<String, LineStats>,
  skipped: SkippedFiles,
  graph: Vec<FileGraphInfo>,
  config: &ResolvedConfig,
) -> AggregatedResult {
  let mut files: Vec<FileReport> = signals
    .into_iter()
    .map(|signal| {
      let stats = line_stats.get(&signal.path).copied();
      let mut risks = signal.risks;

      if let Some(stats) = stats {
        if let Some(percentage) = large_change_percentage(&stats) {
          if percentage > config.thresholds.large_change_percentage {
            risks.push(ScoredRisk::new(
              signal.path.clone(),
              RiskFactor::LargeChange,
              config.weights.for_factor(RiskFactor::LargeChange),
              format!(
                "{:.0}% of the file changed (+{} / -{} over {} lines)",
                percentage, stats.added, stats.removed, stats.total_lines
              ),
            ));
          }
        }
      }

      let total = risks.iter().map(|r| r.points).sum();
      FileReport {
        path: signal.path,
        total,
        risk_level: RiskLevel::classify(total, &config.thresholds),
        risks,
        line_stats: stats,
      }
    })
    .collect();

  // Stable sort: highest total first, input order on ties.
  files.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

  let total_risk_score: f64 = files.iter().map(|f| f.total).sum();
  let average_risk_score = if files.is_empty() {
    0.0
  } else {
    total_risk_score / files.len() as f64
  };

  AggregatedResult {
    analysis_id: analysis_id(&files),
    total_risk_score,
    average_risk_score,
    risk_level: RiskLevel::classify(total_risk_score, &config.thresholds),
    files,
    skipped,
    graph,
  }
}

fn large_change_percentage(stats: &LineStats) -> Option<f64> {
  if stats.total_lines == 0 {
    return None;
  }
  Some((stats.added + stats.removed) as f64 / stats.total_lines as f64 * 100.0)
}

/// Stable id over the scored content: identical inputs, identical id.
fn analysis_id(files: &[FileReport]) -> String {
  let mut hasher = blake3::Hasher::new();
  for file in files {
    hasher.update(file.path.as_bytes());
    hasher.update(b"|");
    hasher.update(&file.total.to_le_bytes());
    for risk in &file.risks {
      hasher.update(risk.factor.name().as_bytes());
      hasher.update(b":");
      hasher.update(risk.subject.as_bytes());
      hasher.update(b";");
    }
  }
  let hex = hasher.finalize().to_hex();
  format!("imp-{}", &hex[..16])
}
