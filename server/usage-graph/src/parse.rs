//! Line-level extraction of export names and import statements.
//!
//! This is a surface scan of TypeScript/JavaScript module syntax, not a full
//! parser: one statement per line is assumed, which holds for the
//! formatter-normalized codebases this engine targets.

use std::collections::BTreeSet;

/// One import statement as written. `specifier` is None when the module
/// specifier is not a literal string (dynamic import of an expression).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
  pub specifier: Option<String>,
  pub symbols: Vec<String>,
}

/// Collect exported symbol names from source text.
pub fn scan_exports(text: &str) -> BTreeSet<String> {
  let mut names = BTreeSet::new();
  for line in text.lines() {
    let line = line.trim();
    let Some(rest) = line.strip_prefix("export ") else {
      continue;
    };
    let rest = rest.trim_start();

    if rest.starts_with("default") {
      names.insert("default".to_string());
      continue;
    }
    if let Some(clause) = rest.strip_prefix('{') {
      // export { a, b as c } [from '...']
      if let Some(end) = clause.find('}') {
        for part in clause[..end].split(',') {
          if let Some(name) = exported_alias(part) {
            names.insert(name);
          }
        }
      }
      continue;
    }
    if rest.starts_with('*') {
      // export * from '...' — names unknown without resolving the target.
      continue;
    }

    let rest = rest.strip_prefix("declare ").unwrap_or(rest);
    let rest = rest.strip_prefix("abstract ").unwrap_or(rest);
    let rest = rest.strip_prefix("async ").unwrap_or(rest);
    for keyword in ["function", "const", "let", "var", "class", "interface", "type", "enum"] {
      let Some(decl) = rest.strip_prefix(keyword) else {
        continue;
      };
      // Keyword must end here (`export constant` is not `export const`).
      if !decl.starts_with(|c: char| c.is_whitespace() || c == '*') {
        continue;
      }
      if let Some(name) = leading_identifier(decl.trim_start_matches('*').trim_start()) {
        names.insert(name);
      }
      break;
    }
  }
  names
}

/// Collect import statements (including `export ... from` re-exports and
/// dynamic `import(...)` calls) from source text.
pub fn scan_imports(text: &str) -> Vec<RawImport> {
  let mut imports = Vec::new();
  for line in text.lines() {
    let line = line.trim();

    if line.starts_with("import ") || line.starts_with("import{") {
      let body = &line["import".len()..];
      if let Some(idx) = find_from(body) {
        imports.push(RawImport {
          specifier: quoted_literal(&body[idx + "from".len()..]),
          symbols: import_clause_symbols(&body[..idx]),
        });
        continue;
      }
      // Side-effect import: import './polyfill'
      if let Some(spec) = quoted_literal(body) {
        imports.push(RawImport {
          specifier: Some(spec),
          symbols: Vec::new(),
        });
        continue;
      }
    }

    if line.starts_with("export ") {
      let body = &line["export".len()..];
      if let Some(idx) = find_from(body) {
        let clause = &body[..idx];
        let symbols = if clause.trim() == "*" || clause.trim().starts_with("* as") {
          vec!["*".to_string()]
        } else {
          import_clause_symbols(clause)
        };
        imports.push(RawImport {
          specifier: quoted_literal(&body[idx + "from".len()..]),
          symbols,
        });
        continue;
      }
    }

    // Dynamic import anywhere in the line: await import('./x') or import(expr).
    let mut rest = line;
    while let Some(pos) = rest.find("import(") {
      let arg = &rest[pos + "import(".len()..];
      imports.push(RawImport {
        specifier: leading_quoted_literal(arg),
        symbols: vec!["*".to_string()],
      });
      rest = arg;
    }
  }
  imports
}

/// Symbols named by an import/re-export clause: `d, { a, b as c }, * as ns`.
/// Default imports record "default"; namespace imports record "*"; aliased
/// named imports record the original (exported) name.
fn import_clause_symbols(clause: &str) -> Vec<String> {
  let mut symbols = Vec::new();
  let mut rest = clause.trim();
  loop {
    rest = rest.trim_start_matches(',').trim();
    if rest.is_empty() {
      break;
    }
    if let Some(after) = rest.strip_prefix('{') {
      let end = after.find('}').unwrap_or(after.len());
      for part in after[..end].split(',') {
        if let Some(name) = imported_source_name(part) {
          symbols.push(name);
        }
      }
      rest = after.get(end + 1..).unwrap_or("");
      continue;
    }
    if rest.starts_with('*') {
      symbols.push("*".to_string());
      break;
    }
    // Default import binding: a bare identifier before `,` or end.
    let end = rest.find(',').unwrap_or(rest.len());
    if leading_identifier(&rest[..end]).is_some() {
      symbols.push("default".to_string());
    }
    rest = &rest[end..];
  }
  symbols
}

/// For `a as b` inside an import clause the source symbol is `a`.
fn imported_source_name(part: &str) -> Option<String> {
  let part = part.trim();
  if part.is_empty() {
    return None;
  }
  let source = part.split_whitespace().next().unwrap_or(part);
  leading_identifier(source)
}

/// For `a as b` inside an export clause the exported name is `b`.
fn exported_alias(part: &str) -> Option<String> {
  let part = part.trim();
  if part.is_empty() {
    return None;
  }
  let name = match part.rsplit_once(" as ") {
    Some((_, alias)) => alias.trim(),
    None => part,
  };
  leading_identifier(name)
}

fn leading_identifier(s: &str) -> Option<String> {
  let name: String = s
    .trim_start()
    .chars()
    .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == '$')
    .collect();
  if name.is_empty() {
    None
  } else {
    Some(name)
  }
}

/// Position of the ` from ` keyword in an import/export body, outside quotes.
fn find_from(body: &str) -> Option<usize> {
  let bytes = body.as_bytes();
  let mut in_quote: Option<u8> = None;
  let needle = b" from ";
  let mut i = 0;
  while i < bytes.len() {
    let b = bytes[i];
    match in_quote {
      Some(q) => {
        if b == q {
          in_quote = None;
        }
      }
      None => {
        if b == b'\'' || b == b'"' || b == b'`' {
          in_quote = Some(b);
        } else if bytes[i..].starts_with(needle) {
          return Some(i + 1);
        }
      }
    }
    i += 1;
  }
  None
}

/// First quoted string literal anywhere in `s`.
fn quoted_literal(s: &str) -> Option<String> {
  let start = s.find(|c| c == '\'' || c == '"')?;
  let quote = s.as_bytes()[start] as char;
  let rest = &s[start + 1..];
  let end = rest.find(quote)?;
  Some(rest[..end].to_string())
}

/// Quoted string literal only if it starts the (trimmed) text — used for
/// dynamic import arguments, where `import(someVar)` must stay unresolved.
fn leading_quoted_literal(s: &str) -> Option<String> {
  let s = s.trim_start();
  if s.starts_with('\'') || s.starts_with('"') {
    quoted_literal(s)
  } else {
    None
  }
}
