//! Path canonicalization and the subsystem tag heuristic.

/// Canonicalize a path for stable comparison:
/// - backslash -> forward slash
/// - collapse repeated slashes
/// - strip leading ./
/// - resolve `.` and `..` segments logically (no filesystem access)
pub fn canonicalize(p: &str) -> String {
  let s = p.replace('\\', "/");
  let mut out: Vec<&str> = Vec::new();
  for seg in s.split('/') {
    match seg {
      "" | "." => {}
      ".." => {
        if out.pop().is_none() {
          // Above the root of the snapshot; keep the segment so the
          // path stays distinct instead of silently aliasing.
          out.push("..");
        }
      }
      other => out.push(other),
    }
  }
  out.join("/")
}

/// Directory part of a canonical path ("" for a root-level file).
pub fn dirname(canonical: &str) -> &str {
  match canonical.rfind('/') {
    Some(idx) => &canonical[..idx],
    None => "",
  }
}

/// Resolve a relative specifier against the importer's directory.
pub fn resolve_relative(importer: &str, specifier: &str) -> String {
  let dir = dirname(importer);
  if dir.is_empty() {
    canonicalize(specifier)
  } else {
    canonicalize(&format!("{}/{}", dir, specifier))
  }
}

/// Specifiers starting with ./ or ../ point inside the snapshot; anything
/// else is an external module.
pub fn is_relative_specifier(spec: &str) -> bool {
  spec.starts_with("./") || spec.starts_with("../")
}

/// Infer a coarse subsystem tag from an importer's path.
///
/// First matching well-known segment wins; otherwise the second path
/// segment; otherwise "root".
pub fn subsystem_tag(canonical: &str) -> String {
  let segments: Vec<&str> = canonical.split('/').collect();
  for seg in &segments {
    let tag = match *seg {
      "components" => "UI",
      "lib" => "Library",
      "hooks" => "Hooks",
      "pages" => "Pages",
      "api" => "API",
      _ => continue,
    };
    return tag.to_string();
  }
  match segments.get(1) {
    Some(seg) => (*seg).to_string(),
    None => "root".to_string(),
  }
}
