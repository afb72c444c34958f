//! Source analysis front-end: exported declarations and type assignability.
//!
//! The detector only needs two queries, so they live behind a trait: tests
//! and alternate parsers (e.g. a real compiler service subprocess) plug in
//! through the same seam. The shipped [`SyntaxFrontEnd`] is a line-level
//! surface scanner with a small structural assignability rule set.

use std::collections::BTreeMap;

/// One interface property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
  pub name: String,
  pub optional: bool,
}

/// An exported declaration, as a tagged variant. Kinds outside Function and
/// Interface are deliberately not diffed; `Other` makes that branch explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
  Function {
    return_type: String,
    params: Vec<String>,
  },
  Interface {
    props: Vec<Property>,
  },
  Other,
}

/// Parsing + assignability queries consumed by the detector.
pub trait SourceFrontEnd {
  /// Exported declarations of one file's text, keyed by exported name.
  /// Each call parses into a fresh map; no state is shared between calls,
  /// so old and new versions of a file can never contaminate each other.
  fn exported_declarations(&self, text: &str) -> BTreeMap<String, Declaration>;

  /// Whether a value of type `src` is assignable to type `dst`.
  fn is_assignable(&self, src: &str, dst: &str) -> bool;
}

/// Line-level TypeScript-surface front-end.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntaxFrontEnd;

impl SourceFrontEnd for SyntaxFrontEnd {
  fn exported_declarations(&self, text: &str) -> BTreeMap<String, Declaration> {
    let mut decls = BTreeMap::new();
    let lines: Vec<&str> = text.lines().collect();
    let mut i = 0;
    while i < lines.len() {
      let line = lines[i].trim();
      if let Some(rest) = line.strip_prefix("export ") {
        let rest = rest.trim_start();
        if let Some(sig) = strip_function_prefix(rest) {
          if let Some((name, decl)) = parse_function(sig) {
            decls.insert(name, decl);
          }
        } else if let Some(body) = rest.strip_prefix("interface ") {
          if let Some(name) = leading_identifier(body) {
            let (props, consumed) = parse_interface_props(&lines[i..]);
            decls.insert(name, Declaration::Interface { props });
            i += consumed;
            continue;
          }
        } else if let Some(name) = other_exported_name(rest) {
          decls.insert(name, Declaration::Other);
        }
      }
      i += 1;
    }
    decls
  }

  fn is_assignable(&self, src: &str, dst: &str) -> bool {
    let src = src.trim();
    let dst = dst.trim();
    if src == dst {
      return true;
    }
    if dst == "any" || dst == "unknown" {
      return true;
    }
    if src == "any" || src == "never" {
      return true;
    }
    // Union source: every member must fit the target.
    let src_members = split_union(src);
    if src_members.len() > 1 {
      return src_members.iter().all(|m| self.is_assignable(m, dst));
    }
    // Union target: the source must fit some member.
    let dst_members = split_union(dst);
    if dst_members.len() > 1 {
      return dst_members.iter().any(|m| self.is_assignable(src, m));
    }
    // Literal widening.
    if is_string_literal(src) && dst == "string" {
      return true;
    }
    if is_number_literal(src) && dst == "number" {
      return true;
    }
    if (src == "true" || src == "false") && dst == "boolean" {
      return true;
    }
    false
  }
}

fn strip_function_prefix(rest: &str) -> Option<&str> {
  let rest = rest.strip_prefix("default ").unwrap_or(rest);
  let rest = rest.strip_prefix("async ").unwrap_or(rest);
  let sig = rest.strip_prefix("function")?;
  if sig.starts_with(|c: char| c.is_whitespace() || c == '*' || c == '(') {
    Some(sig.trim_start_matches('*').trim_start())
  } else {
    None
  }
}

/// Parse `name(params): ret {` from a single-line signature.
fn parse_function(sig: &str) -> Option<(String, Declaration)> {
  let open = sig.find('(')?;
  let name = leading_identifier(&sig[..open]).unwrap_or_else(|| "default".to_string());
  let rest = &sig[open + 1..];
  let close = matching_paren(rest)?;
  let params = split_top_level(&rest[..close], ',')
    .into_iter()
    .filter(|p| !p.trim().is_empty())
    .map(param_type)
    .collect();
  let after = rest[close + 1..].trim_start();
  let return_type = match after.strip_prefix(':') {
    Some(ret) => {
      let ret = ret.trim();
      let end = ret.find('{').unwrap_or(ret.len());
      ret[..end].trim().trim_end_matches(';').trim().to_string()
    }
    None => "any".to_string(),
  };
  Some((name, Declaration::Function { return_type, params }))
}

/// Type of one parameter: text after the top-level `:`, default value
/// stripped; untyped parameters are `any`.
fn param_type(param: String) -> String {
  let no_default = split_top_level(&param, '=').into_iter().next().unwrap_or(param.clone());
  match no_default.split_once(':') {
    Some((_, ty)) => ty.trim().to_string(),
    None => "any".to_string(),
  }
}

/// Collect `{ name?: type }` properties from an interface body starting at
/// the declaration line. Returns the props and the number of lines consumed.
fn parse_interface_props(lines: &[&str]) -> (Vec<Property>, usize) {
  let mut props = Vec::new();
  let mut depth = 0i32;
  let mut started = false;
  for (consumed, raw) in lines.iter().enumerate() {
    let line = raw.trim();
    for c in line.chars() {
      match c {
        '{' => {
          depth += 1;
          started = true;
        }
        '}' => depth -= 1,
        _ => {}
      }
    }
    if started && depth == 1 && !line.contains('{') {
      if let Some(prop) = parse_property(line) {
        props.push(prop);
      }
    }
    if started && depth <= 0 {
      return (props, consumed + 1);
    }
  }
  (props, lines.len())
}

fn parse_property(line: &str) -> Option<Property> {
  if line.is_empty() || line.starts_with("//") || line.starts_with('*') || line.starts_with("/*") {
    return None;
  }
  let name = leading_identifier(line.trim_start_matches("readonly ").trim_start())?;
  let after = &line.trim_start_matches("readonly ").trim_start()[name.len()..];
  let optional = after.trim_start().starts_with('?');
  Some(Property { name, optional })
}

/// Exported name for non-function, non-interface forms (all kind `Other`).
fn other_exported_name(rest: &str) -> Option<String> {
  if rest.starts_with("default") {
    return Some("default".to_string());
  }
  for keyword in ["const ", "let ", "var ", "class ", "type ", "enum ", "abstract class "] {
    if let Some(decl) = rest.strip_prefix(keyword) {
      return leading_identifier(decl);
    }
  }
  None
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

/// Index of the `)` matching an already-consumed `(`.
fn matching_paren(s: &str) -> Option<usize> {
  let mut depth = 0i32;
  for (i, c) in s.char_indices() {
    match c {
      '(' | '[' | '{' | '<' => depth += 1,
      ')' if depth == 0 => return Some(i),
      ')' | ']' | '}' | '>' => depth -= 1,
      _ => {}
    }
  }
  None
}

/// Split on `sep` at nesting depth zero (parens, brackets, braces, generics).
fn split_top_level(s: &str, sep: char) -> Vec<String> {
  let mut parts = Vec::new();
  let mut depth = 0i32;
  let mut current = String::new();
  for c in s.chars() {
    match c {
      '(' | '[' | '{' | '<' => depth += 1,
      ')' | ']' | '}' | '>' => depth -= 1,
      _ => {}
    }
    if c == sep && depth == 0 {
      parts.push(std::mem::take(&mut current));
    } else {
      current.push(c);
    }
  }
  parts.push(current);
  parts
}

fn split_union(s: &str) -> Vec<String> {
  split_top_level(s, '|')
    .into_iter()
    .map(|m| m.trim().to_string())
    .filter(|m| !m.is_empty())
    .collect()
}

fn is_string_literal(s: &str) -> bool {
  (s.len() >= 2 && s.starts_with('\'') && s.ends_with('\''))
    || (s.len() >= 2 && s.starts_with('"') && s.ends_with('"'))
}

fn is_number_literal(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}
