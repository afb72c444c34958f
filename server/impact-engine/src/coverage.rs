//! Missing-test heuristic: literal substring search over the test corpus.

use usage_graph::SourceFile;

/// Concatenated text of all recognized test files, built once per run and
/// read-only afterwards. Threaded explicitly into every check so the engine
/// holds no hidden global state and tests can swap corpora freely.
#[derive(Debug, Clone, Default)]
pub struct TestCorpus {
  text: String,
  file_count: usize,
}

impl TestCorpus {
  /// Collect every file whose path matches a test marker.
  pub fn from_snapshot(files: &[SourceFile], test_markers: &[String]) -> Self {
    let mut text = String::new();
    let mut file_count = 0;
    for file in files {
      if test_markers.iter().any(|m| file.path.contains(m.as_str())) {
        text.push_str(&file.text);
        text.push('\n');
        file_count += 1;
      }
    }
    Self { text, file_count }
  }

  pub fn file_count(&self) -> usize {
    self.file_count
  }

  pub fn mentions(&self, symbol: &str) -> bool {
    self.text.contains(symbol)
  }
}

/// Symbols with no literal mention anywhere in the corpus, in input order.
pub fn find_untested(changed_symbols: &[String], corpus: &TestCorpus) -> Vec<String> {
  changed_symbols
    .iter()
    .filter(|s| !corpus.mentions(s))
    .cloned()
    .collect()
}

/// Placeholder symbol for a file that changed without symbol-level detail:
/// the file stem, the most recognizable token a test would mention.
pub fn file_placeholder(path: &str) -> String {
  let basename = path.rsplit('/').next().unwrap_or(path);
  match basename.split_once('.') {
    Some((stem, _)) if !stem.is_empty() => stem.to_string(),
    _ => basename.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn file(path: &str, text: &str) -> SourceFile {
    SourceFile {
      path: path.into(),
      text: text.into(),
    }
  }

  fn markers() -> Vec<String> {
    vec![".test.".into(), ".spec.".into(), "__tests__/".into()]
  }

  #[test]
  fn corpus_collects_only_test_files() {
    let files = vec![
      file("src/a.ts", "export const a = 1;"),
      file("src/a.test.ts", "import { a } from './a'; expect(a);"),
      file("src/__tests__/b.ts", "checkB();"),
    ];
    let corpus = TestCorpus::from_snapshot(&files, &markers());
    assert_eq!(corpus.file_count(), 2);
    assert!(corpus.mentions("checkB"));
    assert!(!corpus.mentions("export const a"));
  }

  #[test]
  fn untested_symbols_found_by_substring() {
    let files = vec![file("x.spec.ts", "describe('fetchUser', () => {});")];
    let corpus = TestCorpus::from_snapshot(&files, &markers());
    let untested = find_untested(
      &["fetchUser".to_string(), "deleteUser".to_string()],
      &corpus,
    );
    assert_eq!(untested, vec!["deleteUser"]);
  }

  #[test]
  fn empty_corpus_leaves_everything_untested() {
    let corpus = TestCorpus::default();
    let untested = find_untested(&["a".to_string()], &corpus);
    assert_eq!(untested, vec!["a"]);
  }

  #[test]
  fn placeholder_is_the_file_stem() {
    assert_eq!(file_placeholder("src/utils/date.ts"), "date");
    assert_eq!(file_placeholder("src/Button.test.tsx"), "Button");
    assert_eq!(file_placeholder("Makefile"), "Makefile");
  }
}
