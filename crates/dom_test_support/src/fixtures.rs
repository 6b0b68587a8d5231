//! Golden fixtures for declared operation scripts.
//!
//! A fixture file (`.toml` or `.json`) holds a list of cases. Each case
//! replays one or more passes against the same document root, each pass with
//! a fresh reconciler, then checks the final snapshot lines and, optionally,
//! the error of the last pass and the mutation counts of the last pass.
//!
//! ```toml
//! [[case]]
//! name = "prune-trailing-children"
//!
//! [[case.pass]]
//! ops = [
//!   { op = "open", tag = "ul" },
//!   { op = "text", value = "a" },
//!   { op = "close", tag = "ul" },
//!   { op = "finish" },
//! ]
//!
//! [case.expect]
//! lines = ["#document-fragment", "  <UL>", "    \"a\""]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FixtureStatus {
    #[default]
    Active,
    Xfail,
}

#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    #[serde(default, rename = "case")]
    pub cases: Vec<Fixture>,
}

#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    #[serde(default)]
    pub status: FixtureStatus,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(rename = "pass")]
    pub passes: Vec<Pass>,
    pub expect: Expectation,
}

#[derive(Debug, Deserialize)]
pub struct Pass {
    pub ops: Vec<OpSpec>,
}

/// One declared builder call. `custom = true` makes `tag` a custom element
/// type name instead of a plain tag name.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum OpSpec {
    Open {
        tag: String,
        #[serde(default)]
        custom: bool,
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        #[serde(default)]
        style: BTreeMap<String, String>,
        #[serde(default)]
        props: BTreeMap<String, serde_json::Value>,
    },
    Text {
        value: String,
    },
    Close {
        #[serde(default)]
        tag: Option<String>,
        #[serde(default)]
        custom: bool,
    },
    Finish,
}

#[derive(Debug, Deserialize)]
pub struct Expectation {
    #[serde(default)]
    pub lines: Vec<String>,
    /// Substring of the error reported by the last pass.
    #[serde(default)]
    pub error: Option<String>,
    /// Structural mutations (create/append/replace/remove) of the last pass.
    #[serde(default)]
    pub structural_last_pass: Option<u64>,
    /// Attribute, property and style writes of the last pass.
    #[serde(default)]
    pub writes_last_pass: Option<u64>,
}

/// Load every `.toml` / `.json` fixture file in `dir`, sorted by file name.
pub fn load_fixtures(dir: &Path) -> Vec<Fixture> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .unwrap_or_else(|err| panic!("failed to read fixture root {dir:?}: {err}"))
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut fixtures = Vec::new();
    for entry in entries {
        let path = entry.path();
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        let content = match ext {
            "toml" | "json" => fs::read_to_string(&path)
                .unwrap_or_else(|err| panic!("failed to read fixture {path:?}: {err}")),
            _ => continue,
        };
        let file: FixtureFile = if ext == "toml" {
            toml::from_str(&content)
                .unwrap_or_else(|err| panic!("invalid TOML fixture {path:?}: {err}"))
        } else {
            serde_json::from_str(&content)
                .unwrap_or_else(|err| panic!("invalid JSON fixture {path:?}: {err}"))
        };
        for fixture in &file.cases {
            assert!(
                !fixture.passes.is_empty(),
                "fixture '{}' in {path:?} has no passes",
                fixture.name
            );
        }
        fixtures.extend(file.cases);
    }
    fixtures
}

/// Name filter read from an environment variable; unset matches everything.
pub struct FixtureFilter {
    raw: Option<String>,
}

impl FixtureFilter {
    pub fn from_env(var: &str) -> Self {
        Self {
            raw: env::var(var).ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        let Some(filter) = &self.raw else {
            return true;
        };
        name.contains(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::{FixtureFile, FixtureStatus, OpSpec};

    #[test]
    fn toml_and_json_describe_the_same_case() {
        let toml_src = r##"
            [[case]]
            name = "one"
            status = "xfail"
            [[case.pass]]
            ops = [
              { op = "open", tag = "div", attrs = { id = "a" }, props = { "$value" = 3 } },
              { op = "close" },
              { op = "finish" },
            ]
            [case.expect]
            lines = ["#document-fragment"]
        "##;
        let json_src = r##"{"case": [{
            "name": "one",
            "status": "xfail",
            "pass": [{"ops": [
                {"op": "open", "tag": "div", "attrs": {"id": "a"}, "props": {"$value": 3}},
                {"op": "close"},
                {"op": "finish"}
            ]}],
            "expect": {"lines": ["#document-fragment"]}
        }]}"##;
        let from_toml: FixtureFile = toml::from_str(toml_src).unwrap();
        let from_json: FixtureFile = serde_json::from_str(json_src).unwrap();
        for file in [from_toml, from_json] {
            let case = &file.cases[0];
            assert_eq!(case.status, FixtureStatus::Xfail);
            let ops = &case.passes[0].ops;
            assert_eq!(ops.len(), 3);
            match &ops[0] {
                OpSpec::Open {
                    tag, attrs, props, ..
                } => {
                    assert_eq!(tag, "div");
                    assert_eq!(attrs.get("id").map(String::as_str), Some("a"));
                    assert_eq!(props.get("$value").and_then(|v| v.as_i64()), Some(3));
                }
                other => panic!("unexpected op {other:?}"),
            }
            assert!(matches!(ops[1], OpSpec::Close { tag: None, .. }));
            assert!(matches!(ops[2], OpSpec::Finish));
        }
    }
}
