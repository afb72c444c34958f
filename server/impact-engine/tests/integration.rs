//! Integration tests for the impact engine.

use impact_engine::types::{RiskFactor, RiskLevel};
use impact_engine::{AnalysisRequest, Engine};

fn fixture_request() -> AnalysisRequest {
  let json = r#"{
    "source_files": [
      {"path": "src/lib/a.ts", "text": "export function bar(): number {}\n"},
      {"path": "src/components/B.tsx", "text": "import { foo } from '../lib/a';\n"},
      {"path": "src/api/c.ts", "text": "import { foo } from '../lib/a';\n"},
      {"path": "src/lib/a.test.ts", "text": "describe('bar', () => { expect(bar()); });\n"}
    ],
    "changes": [
      {
        "path": "src/lib/a.ts",
        "status": "modified",
        "old_content": "export function foo(): string {}\nexport function bar(): number {}\n",
        "new_content": "export function bar(): number {}\n"
      }
    ],
    "line_stats": {
      "src/lib/a.ts": {"added": 0, "removed": 1, "total_lines": 2}
    }
  }"#;
  serde_json::from_str(json).unwrap()
}

#[test]
fn removed_export_with_dependents_scores_high() {
  let engine = Engine::with_defaults();
  let result = engine.analyze(&fixture_request());

  assert!(result.analysis_id.starts_with("imp-"));
  assert_eq!(result.files.len(), 1);
  let report = &result.files[0];
  assert_eq!(report.path, "src/lib/a.ts");

  let factors: Vec<RiskFactor> = report.risks.iter().map(|r| r.factor).collect();
  assert!(factors.contains(&RiskFactor::ExportRemoved), "foo was removed");
  assert!(factors.contains(&RiskFactor::ImportedInFiles), "two files import a.ts");
  assert!(factors.contains(&RiskFactor::CrossSubsystem), "UI and API both import a.ts");
  assert!(factors.contains(&RiskFactor::MissingTest), "no test mentions foo");

  // 25 (removed export) + 8 (fan-in) + 5 (spread) + 10 (missing test) = 48.
  assert_eq!(report.total, 48.0);
  assert_eq!(report.risk_level, RiskLevel::High);

  assert_eq!(result.graph.len(), 1);
  assert_eq!(result.graph[0].imported_by, 2);
  assert_eq!(result.graph[0].blast_radius, 2);
  assert!(!result.graph[0].partial);
}

#[test]
fn deterministic_output_across_runs() {
  let request = fixture_request();

  let json1 = serde_json::to_string(&Engine::with_defaults().analyze(&request)).unwrap();
  let json2 = serde_json::to_string(&Engine::with_defaults().analyze(&request)).unwrap();

  assert_eq!(json1, json2, "Same inputs must produce identical JSON output");
}

#[test]
fn deleted_file_scores_file_removed_without_diffing() {
  let json = r#"{
    "changes": [
      {"path": "src/old.ts", "status": "deleted", "old_content": "export function gone(): void {}\n"}
    ]
  }"#;
  let request: AnalysisRequest = serde_json::from_str(json).unwrap();
  let result = Engine::with_defaults().analyze(&request);

  assert_eq!(result.files.len(), 1);
  let removed: Vec<_> = result.files[0]
    .risks
    .iter()
    .filter(|r| r.factor == RiskFactor::FileRemoved)
    .collect();
  assert_eq!(removed.len(), 1);
  assert!(result.files[0]
    .risks
    .iter()
    .all(|r| r.factor != RiskFactor::ExportRemoved), "deleted files are not diffed");
}

#[test]
fn skip_buckets_partition_problem_files() {
  let json = r#"{
    "changes": [
      {"path": "src/a.test.ts", "status": "modified", "old_content": "x", "new_content": "y"},
      {"path": "docs/guide.md", "status": "modified", "old_content": "x", "new_content": "y"},
      {"path": "src/gone.ts", "status": "modified", "new_content": "export const a = 1;"},
      {"path": "src/blank.ts", "status": "modified", "old_content": "  \n", "new_content": "export const a = 1;"}
    ]
  }"#;
  let request: AnalysisRequest = serde_json::from_str(json).unwrap();
  let result = Engine::with_defaults().analyze(&request);

  assert!(result.files.is_empty());
  assert_eq!(result.skipped.tests, vec!["src/a.test.ts"]);
  assert_eq!(result.skipped.unsupported, vec!["docs/guide.md"]);
  assert_eq!(result.skipped.failed, vec!["src/gone.ts"]);
  assert_eq!(result.skipped.empty, vec!["src/blank.ts"]);
  assert_eq!(result.total_risk_score, 0.0);
  assert_eq!(result.risk_level, RiskLevel::Low);
}

#[test]
fn large_change_folds_into_the_reported_total() {
  let json = r#"{
    "changes": [
      {
        "path": "src/big.ts",
        "status": "modified",
        "old_content": "export const a = 1;\n",
        "new_content": "export const a = 2;\n"
      }
    ],
    "line_stats": {
      "src/big.ts": {"added": 60, "removed": 30, "total_lines": 100}
    }
  }"#;
  let request: AnalysisRequest = serde_json::from_str(json).unwrap();
  let result = Engine::with_defaults().analyze(&request);

  let large: Vec<_> = result.files[0]
    .risks
    .iter()
    .filter(|r| r.factor == RiskFactor::LargeChange)
    .collect();
  assert_eq!(large.len(), 1);
  assert!(result.files[0].total >= large[0].points);
  assert_eq!(result.total_risk_score, result.files.iter().map(|f| f.total).sum::<f64>());
}

#[test]
fn unknown_request_fields_are_ignored() {
  let json = r#"{
    "changes": [
      {"path": "src/a.ts", "status": "added", "new_content": "export const a = 1;\n", "mystery": 7}
    ],
    "future_option": {"nested": true}
  }"#;
  let request: AnalysisRequest = serde_json::from_str(json).unwrap();
  let result = Engine::with_defaults().analyze(&request);
  assert_eq!(result.files.len(), 1);
}

#[test]
fn config_overrides_apply_and_invalid_config_is_fatal() {
  let json = r#"{
    "config": {"weights": {"export_removed": 40}},
    "changes": [
      {
        "path": "src/a.ts",
        "status": "modified",
        "old_content": "export function foo(): void {}\n",
        "new_content": "const internal = 1;\nexport const keep = internal;\n"
      }
    ]
  }"#;
  let request: AnalysisRequest = serde_json::from_str(json).unwrap();
  let engine = Engine::new(request.config.clone().unwrap()).unwrap();
  let result = engine.analyze(&request);
  let removed = result.files[0]
    .risks
    .iter()
    .find(|r| r.factor == RiskFactor::ExportRemoved)
    .unwrap();
  assert_eq!(removed.points, 40.0);

  let bad = r#"{"thresholds": {"medium_risk": 90}}"#;
  let config: impact_engine::ResolvedConfig = serde_json::from_str(bad).unwrap();
  assert!(Engine::new(config).is_err(), "non-monotonic thresholds must abort the run");
}

#[test]
fn graph_risks_reach_beyond_direct_importers() {
  // core <- util <- {page1, page2}: blast radius 3, but only util imports
  // core directly.
  let json = r#"{
    "source_files": [
      {"path": "src/lib/core.ts", "text": "export const core = 1;\n"},
      {"path": "src/lib/util.ts", "text": "import { core } from './core';\nexport const util = core;\n"},
      {"path": "src/pages/one.tsx", "text": "import { util } from '../lib/util';\n"},
      {"path": "src/pages/two.tsx", "text": "import { util } from '../lib/util';\n"}
    ],
    "changes": [
      {
        "path": "src/lib/core.ts",
        "status": "modified",
        "old_content": "export const core = 1;\n",
        "new_content": "export const core = 2;\n"
      }
    ]
  }"#;
  let request: AnalysisRequest = serde_json::from_str(json).unwrap();
  let result = Engine::with_defaults().analyze(&request);

  assert_eq!(result.graph.len(), 1);
  assert_eq!(result.graph[0].imported_by, 1);
  assert_eq!(result.graph[0].blast_radius, 3);
}
