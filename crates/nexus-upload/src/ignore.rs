//! Ignore-pattern compilation.
//!
//! Two pattern forms are accepted: a glob-like literal where `*` matches any
//! run of characters and the whole pattern is anchored to the start of the
//! relative path, and a raw regular expression marked by a leading `/`
//! (author-anchored, compiled verbatim once the delimiters are shed). A
//! fixed built-in pattern is always appended so an archive can never swallow
//! version control state, installed dependencies, or this tool's own control
//! files.

use regex::Regex;

use crate::archive::EntryFilter;
use crate::error::{PublishError, Result};

/// Always-appended exclusions: VCS state, vendored dependencies, and the
/// files that configure this tool.
pub const BUILT_IN_PATTERN: &str = r"^(\.git|vendor|composer\.lock|\.gitignore|\.nexus)";

/// A compiled set of ignore matchers.
///
/// Matching always runs against forward-slash relative paths, on every
/// platform; a path is ignored as soon as any one matcher hits.
#[derive(Debug)]
pub struct IgnoreSet {
    matchers: Vec<Regex>,
}

impl IgnoreSet {
    /// Compile user patterns and append the built-in exclusions.
    ///
    /// Empty entries are dropped. An entry starting with `/` is a ready-made
    /// regular expression: the leading `/` and one trailing `/` are stripped
    /// and the body compiles as written. Anything else is escaped so its
    /// characters stay literal, each `*` is widened back to "any sequence",
    /// and the result is anchored to the start of the path.
    pub fn compile(patterns: &[String]) -> Result<Self> {
        let mut matchers = Vec::with_capacity(patterns.len() + 1);
        for raw in patterns {
            if raw.trim().is_empty() {
                continue;
            }
            let expr = match raw.strip_prefix('/') {
                Some(body) => body.strip_suffix('/').unwrap_or(body).to_string(),
                None => glob_to_regex(raw),
            };
            let matcher = Regex::new(&expr).map_err(|source| PublishError::InvalidPattern {
                pattern: raw.clone(),
                source,
            })?;
            matchers.push(matcher);
        }

        let built_in =
            Regex::new(BUILT_IN_PATTERN).map_err(|source| PublishError::InvalidPattern {
                pattern: BUILT_IN_PATTERN.to_string(),
                source,
            })?;
        matchers.push(built_in);

        Ok(Self { matchers })
    }

    /// Whether `relative_path` (forward-slash form) is excluded.
    pub fn ignores(&self, relative_path: &str) -> bool {
        self.matchers.iter().any(|matcher| matcher.is_match(relative_path))
    }
}

impl EntryFilter for IgnoreSet {
    fn includes(&self, relative_path: &str) -> bool {
        !self.ignores(relative_path)
    }
}

fn glob_to_regex(pattern: &str) -> String {
    format!("^{}", regex::escape(pattern).replace(r"\*", ".*"))
}
