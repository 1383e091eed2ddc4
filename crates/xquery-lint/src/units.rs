//! Loading source units from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use xquery_analyzer::SourceUnit;
use xquery_syntax::{parse_tree, NotationError, MAX_DEPTH};

/// Extension of files holding a tree in notation form
pub const NOTATION_EXTENSION: &str = "xqt";

/// JSON nesting of a unit document whose tree is `MAX_DEPTH` nodes deep:
/// an object and a `children` array per node, plus the document and the
/// innermost tokens.
const MAX_JSON_DEPTH: usize = 2 * MAX_DEPTH + 2;

#[derive(Debug, Error)]
pub enum UnitError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid unit document {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("tree in {} nests deeper than {limit} levels", path.display())]
    TooDeep { path: PathBuf, limit: usize },

    #[error("invalid tree notation in {}: {source}", path.display())]
    Notation {
        path: PathBuf,
        #[source]
        source: NotationError,
    },
}

/// Load a unit document (JSON) or a notation file (`.xqt`).
///
/// Notation units are named after their path and carry no parse problems.
pub fn load_unit(path: &Path) -> Result<SourceUnit, UnitError> {
    let content = fs::read_to_string(path).map_err(|source| UnitError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if path.extension().is_some_and(|ext| ext == NOTATION_EXTENSION) {
        let tree = parse_tree(&content).map_err(|source| UnitError::Notation {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(SourceUnit::new(path.display().to_string(), tree));
    }

    if json_depth(&content) > MAX_JSON_DEPTH {
        return Err(UnitError::TooDeep {
            path: path.to_path_buf(),
            limit: MAX_DEPTH,
        });
    }

    let json_error = |source: serde_json::Error| UnitError::Json {
        path: path.to_path_buf(),
        source,
    };
    let mut deserializer = serde_json::Deserializer::from_str(&content);
    deserializer.disable_recursion_limit();
    let unit = SourceUnit::deserialize(&mut deserializer).map_err(json_error)?;
    deserializer.end().map_err(json_error)?;
    Ok(unit)
}

/// Deepest bracket nesting of a JSON text, ignoring brackets inside strings
fn json_depth(content: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;

    for byte in content.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Load every path, logging and skipping the ones that fail
pub fn load_units<P: AsRef<Path>>(paths: &[P]) -> Vec<SourceUnit> {
    paths
        .iter()
        .filter_map(|path| match load_unit(path.as_ref()) {
            Ok(unit) => {
                tracing::debug!("Loaded {}", unit.name);
                Some(unit)
            }
            Err(e) => {
                tracing::error!("Skipping unit: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("xquery-lint-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("should create temp dir");
        let path = dir.join(name);
        fs::write(&path, content).expect("should write temp file");
        path
    }

    #[test]
    fn test_load_notation_unit() {
        let path = temp_file("main.xqt", r#"(module@1 (mainModule (queryBody "1")))"#);
        let unit = load_unit(&path).expect("should load");
        assert_eq!(unit.name, path.display().to_string());
        assert_eq!(unit.tree.kind, "module");
        assert!(unit.problems.is_empty());
    }

    #[test]
    fn test_load_json_unit() {
        let json = r#"{
            "name": "lib/test.xqy",
            "tree": { "type": "node", "kind": "module", "line": 1, "children": [
                { "type": "token", "text": "1", "line": 1 }
            ] },
            "problems": [ { "line": 3, "column": 4, "message": "missing ';'" } ]
        }"#;
        let path = temp_file("unit.json", json);
        let unit = load_unit(&path).expect("should load");
        assert_eq!(unit.name, "lib/test.xqy");
        assert_eq!(unit.tree.text(), "1");
        assert_eq!(unit.problems.len(), 1);
        assert_eq!(unit.problems[0].line, 3);
    }

    /// A unit whose tree is a chain of `depth` nested `expr` nodes
    fn nested_unit(depth: usize) -> String {
        let mut tree = r#"{ "type": "token", "text": "1", "line": 1 }"#.to_string();
        for _ in 0..depth {
            tree = format!(r#"{{ "type": "node", "kind": "expr", "line": 1, "children": [{tree}] }}"#);
        }
        format!(r#"{{ "name": "deep.xqy", "tree": {tree} }}"#)
    }

    #[test]
    fn test_deep_json_unit_loads() {
        let path = temp_file("deep.json", &nested_unit(100));
        let unit = load_unit(&path).expect("should load");
        assert_eq!(unit.tree.depth(), 100);
        assert_eq!(unit.tree.text(), "1");
    }

    #[test]
    fn test_json_unit_past_nesting_limit() {
        let path = temp_file("too_deep.json", &nested_unit(MAX_DEPTH + 1));
        assert!(matches!(
            load_unit(&path),
            Err(UnitError::TooDeep { limit: MAX_DEPTH, .. })
        ));
    }

    #[test]
    fn test_json_depth_skips_strings() {
        assert_eq!(json_depth(r#"{ "a": [1, { "b": "[[{" }] }"#), 3);
        assert_eq!(json_depth(r#"{ "a": "\"[" }"#), 1);
        assert_eq!(json_depth("1"), 0);
    }

    #[test]
    fn test_load_errors() {
        let missing = std::env::temp_dir().join("xquery-lint-does-not-exist.json");
        assert!(matches!(load_unit(&missing), Err(UnitError::Io { .. })));

        let bad_json = temp_file("bad.json", "{ not json");
        assert!(matches!(load_unit(&bad_json), Err(UnitError::Json { .. })));

        let bad_tree = temp_file("bad.xqt", "(module \"unterminated");
        assert!(matches!(load_unit(&bad_tree), Err(UnitError::Notation { .. })));

        let trailing = temp_file("trailing.json", r#"{ "name": "a", "tree": { "kind": "module", "line": 1 } } x"#);
        assert!(matches!(load_unit(&trailing), Err(UnitError::Json { .. })));
    }

    #[test]
    fn test_failed_units_are_skipped() {
        let good = temp_file("good.xqt", "(module)");
        let missing = std::env::temp_dir().join("xquery-lint-missing.xqt");
        let units = load_units(&[good, missing]);
        assert_eq!(units.len(), 1);
    }
}
