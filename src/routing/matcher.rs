//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile `{name}` templates into anchored regular expressions
//! - Decide whether a concrete path matches a pattern
//! - Extract captured values keyed by placeholder name
//!
//! # Design Decisions
//! - A placeholder captures one or more characters other than `/`
//! - Literal text is escaped, so `.` or `+` in a pattern mean themselves
//! - Whole-path anchoring: no prefix matches
//! - Trailing slashes are significant (no normalization)
//! - Malformed patterns are compile errors, never matchers that silently fail

use regex::Regex;
use thiserror::Error;

/// Capture expression substituted for every placeholder.
const SEGMENT_CAPTURE: &str = "([^/]+)";

/// Errors produced while compiling a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unclosed placeholder at byte {position} in `{pattern}`")]
    Unclosed { pattern: String, position: usize },

    #[error("unexpected `}}` at byte {position} in `{pattern}`")]
    UnexpectedClose { pattern: String, position: usize },

    #[error("nested `{{` at byte {position} in `{pattern}`")]
    Nested { pattern: String, position: usize },

    #[error("empty placeholder at byte {position} in `{pattern}`")]
    EmptyName { pattern: String, position: usize },

    #[error("invalid placeholder name `{name}` in `{pattern}`")]
    InvalidName { pattern: String, name: String },

    #[error("placeholder `{name}` appears more than once in `{pattern}`")]
    DuplicateName { pattern: String, name: String },

    #[error("`{pattern}` did not compile: {reason}")]
    Regex { pattern: String, reason: String },
}

impl PatternError {
    /// The pattern that failed to compile.
    pub fn pattern(&self) -> &str {
        match self {
            PatternError::Unclosed { pattern, .. }
            | PatternError::UnexpectedClose { pattern, .. }
            | PatternError::Nested { pattern, .. }
            | PatternError::EmptyName { pattern, .. }
            | PatternError::InvalidName { pattern, .. }
            | PatternError::DuplicateName { pattern, .. }
            | PatternError::Regex { pattern, .. } => pattern,
        }
    }
}

/// Captured path parameters in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(Vec<(String, String)>);

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for PathParams {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    names: Vec<String>,
}

impl PathPattern {
    /// Compile `pattern`, e.g. `/jobs/{job_id}/applications`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut expr = String::with_capacity(pattern.len() + 16);
        let mut names: Vec<String> = Vec::new();
        let mut rest = pattern;
        let mut offset = 0;

        expr.push('^');
        while let Some(idx) = rest.find(['{', '}']) {
            let position = offset + idx;
            if rest.as_bytes()[idx] == b'}' {
                return Err(PatternError::UnexpectedClose {
                    pattern: pattern.to_string(),
                    position,
                });
            }

            expr.push_str(&regex::escape(&rest[..idx]));

            let after = &rest[idx + 1..];
            let close = after.find('}').ok_or_else(|| PatternError::Unclosed {
                pattern: pattern.to_string(),
                position,
            })?;
            let name = &after[..close];

            if let Some(nested) = name.find('{') {
                return Err(PatternError::Nested {
                    pattern: pattern.to_string(),
                    position: position + 1 + nested,
                });
            }
            if name.is_empty() {
                return Err(PatternError::EmptyName {
                    pattern: pattern.to_string(),
                    position,
                });
            }
            if !is_valid_name(name) {
                return Err(PatternError::InvalidName {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
            if names.iter().any(|existing| existing == name) {
                return Err(PatternError::DuplicateName {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }

            names.push(name.to_string());
            expr.push_str(SEGMENT_CAPTURE);

            let consumed = idx + close + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }
        expr.push_str(&regex::escape(rest));
        expr.push('$');

        let regex = Regex::new(&expr).map_err(|e| PatternError::Regex {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            names,
        })
    }

    /// The pattern text as registered.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholder names in order of appearance.
    pub fn placeholders(&self) -> &[String] {
        &self.names
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and return the captured values, or `None` on mismatch.
    pub fn captures(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;
        Some(
            self.names
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (name.clone(), m.as_str().to_string())))
                .collect(),
        )
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
