//! Structural breaking-change detection between two versions of a file.
//!
//! Old and new text are parsed into two fully independent declaration maps;
//! nothing is shared between the versions, so one side can never shadow the
//! other's declarations.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::RiskWeights;
use crate::frontend::{Declaration, Property, SourceFrontEnd};
use crate::types::{RiskFactor, ScoredRisk};

/// Result of diffing one file's exported declarations.
#[derive(Debug, Default)]
pub struct FileAnalysis {
  pub risks: Vec<ScoredRisk>,
  /// Every symbol touched by any detected change (feeds the coverage check).
  pub changed_symbols: Vec<String>,
  /// Sum of risk points from structural detection only (the derived
  /// LargeChange contribution is never folded in here).
  pub score: f64,
  /// Unscored informational findings (e.g. newly added interface properties).
  pub notes: Vec<String>,
}

impl FileAnalysis {
  fn push(&mut self, risk: ScoredRisk, symbol: &str) {
    self.score += risk.points;
    self.risks.push(risk);
    if !self.changed_symbols.iter().any(|s| s == symbol) {
      self.changed_symbols.push(symbol.to_string());
    }
  }
}

/// Diff exported declarations of `old_text` vs `new_text`.
pub fn analyze_file<F: SourceFrontEnd>(
  frontend: &F,
  subject: &str,
  old_text: &str,
  new_text: &str,
  weights: &RiskWeights,
) -> FileAnalysis {
  let old_decls = frontend.exported_declarations(old_text);
  let new_decls = frontend.exported_declarations(new_text);

  let names: BTreeSet<&String> = old_decls.keys().chain(new_decls.keys()).collect();
  let mut analysis = FileAnalysis::default();

  for name in names {
    match (old_decls.get(name), new_decls.get(name)) {
      (None, Some(_)) => {
        analysis.push(
          ScoredRisk::new(
            name.clone(),
            RiskFactor::ExportAdded,
            weights.for_factor(RiskFactor::ExportAdded),
            format!("export `{}` added in {}", name, subject),
          ),
          name,
        );
      }
      (Some(_), None) => {
        analysis.push(
          ScoredRisk::new(
            name.clone(),
            RiskFactor::ExportRemoved,
            weights.for_factor(RiskFactor::ExportRemoved),
            format!("export `{}` removed from {}", name, subject),
          ),
          name,
        );
      }
      (Some(old), Some(new)) => match (old, new) {
        (
          Declaration::Function {
            return_type: old_ret,
            params: old_params,
          },
          Declaration::Function {
            return_type: new_ret,
            params: new_params,
          },
        ) => diff_function(frontend, name, old_ret, old_params, new_ret, new_params, weights, &mut analysis),
        (Declaration::Interface { props: old_props }, Declaration::Interface { props: new_props }) => {
          diff_interface(name, old_props, new_props, weights, &mut analysis)
        }
        _ => {
          // Uncovered declaration kinds (classes, type aliases, enums) and
          // kind transitions are out of scope; skipped, not silently diffed.
          debug!(symbol = name.as_str(), file = subject, "declaration kind not diffed");
        }
      },
      // Names come from the union of both maps.
      (None, None) => {}
    }
  }

  analysis
}

/// "Narrowed" means the new type is strictly more restrictive: the old type
/// no longer fits where the new one is required, while the new still fits
/// everywhere the old did.
fn is_narrowed<F: SourceFrontEnd>(frontend: &F, old: &str, new: &str) -> bool {
  !frontend.is_assignable(old, new) && frontend.is_assignable(new, old)
}

#[allow(clippy::too_many_arguments)]
fn diff_function<F: SourceFrontEnd>(
  frontend: &F,
  name: &str,
  old_ret: &str,
  old_params: &[String],
  new_ret: &str,
  new_params: &[String],
  weights: &RiskWeights,
  analysis: &mut FileAnalysis,
) {
  let weight = weights.for_factor(RiskFactor::ReturnTypeChanged);

  if is_narrowed(frontend, old_ret, new_ret) {
    analysis.push(
      ScoredRisk::new(
        name,
        RiskFactor::ReturnTypeChanged,
        weight,
        format!("return type of `{}` narrowed from `{}` to `{}`", name, old_ret, new_ret),
      ),
      name,
    );
  }

  // Parameters compare positionally; names are not matched.
  if old_params.len() != new_params.len() {
    let (verb, count) = if new_params.len() > old_params.len() {
      ("added", new_params.len() - old_params.len())
    } else {
      ("removed", old_params.len() - new_params.len())
    };
    analysis.push(
      ScoredRisk::new(
        name,
        RiskFactor::ReturnTypeChanged,
        weight,
        format!("`{}` {} {} parameter(s)", name, verb, count),
      ),
      name,
    );
  }
  for (position, (old_ty, new_ty)) in old_params.iter().zip(new_params.iter()).enumerate() {
    if is_narrowed(frontend, old_ty, new_ty) {
      analysis.push(
        ScoredRisk::new(
          name,
          RiskFactor::ReturnTypeChanged,
          weight,
          format!(
            "parameter {} of `{}` narrowed from `{}` to `{}`",
            position + 1,
            name,
            old_ty,
            new_ty
          ),
        ),
        name,
      );
    }
  }
}

fn diff_interface(
  name: &str,
  old_props: &[Property],
  new_props: &[Property],
  weights: &RiskWeights,
  analysis: &mut FileAnalysis,
) {
  let weight = weights.for_factor(RiskFactor::PropsChanged);

  for old_prop in old_props {
    match new_props.iter().find(|p| p.name == old_prop.name) {
      None => {
        analysis.push(
          ScoredRisk::new(
            name,
            RiskFactor::PropsChanged,
            weight,
            format!("property `{}` removed from `{}`", old_prop.name, name),
          ),
          name,
        );
      }
      Some(new_prop) if old_prop.optional && !new_prop.optional => {
        analysis.push(
          ScoredRisk::new(
            name,
            RiskFactor::PropsChanged,
            weight,
            format!("property `{}` of `{}` is now required", old_prop.name, name),
          ),
          name,
        );
      }
      Some(_) => {}
    }
  }

  for new_prop in new_props {
    if !old_props.iter().any(|p| p.name == new_prop.name) {
      // New properties are informational only; never scored.
      let note = format!("property `{}` added to `{}`", new_prop.name, name);
      debug!(symbol = name, "{}", note);
      analysis.notes.push(note);
      if !analysis.changed_symbols.iter().any(|s| s == name) {
        analysis.changed_symbols.push(name.to_string());
      }
    }
  }
}
