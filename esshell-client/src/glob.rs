//! Simple `*` glob matching for names.

use serde::{Deserialize, Serialize};

/// Match `value` against a pattern where `*` matches any run of characters.
///
/// Patterns may contain several wildcards; a pattern without one must equal
/// the value.
pub fn simple_match(pattern: &str, value: &str) -> bool {
    let Some(first) = pattern.find('*') else {
        return pattern == value;
    };

    if first == 0 {
        if pattern.len() == 1 {
            return true;
        }
        let rest = &pattern[1..];
        let Some(next) = rest.find('*') else {
            return value.ends_with(rest);
        };
        if next == 0 {
            // collapse "**"
            return simple_match(rest, value);
        }
        let part = &rest[..next];
        let mut offset = 0;
        while let Some(found) = value[offset..].find(part) {
            let start = offset + found;
            if simple_match(&rest[next..], &value[start + part.len()..]) {
                return true;
            }
            offset = start + 1;
            if offset > value.len() {
                break;
            }
            while !value.is_char_boundary(offset) {
                offset += 1;
            }
        }
        return false;
    }

    value.len() >= first
        && value.is_char_boundary(first)
        && pattern[..first] == value[..first]
        && simple_match(&pattern[first..], &value[first..])
}

/// Optional name pattern; an absent or empty pattern matches every name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameFilter(Option<String>);

impl NameFilter {
    /// A filter that matches everything.
    pub fn any() -> Self {
        Self(None)
    }

    /// A filter for a glob pattern.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self(Some(pattern.into()))
    }

    /// The configured pattern, if any.
    pub fn as_pattern(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether `name` passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        match self.0.as_deref() {
            None | Some("") => true,
            Some(pattern) => simple_match(pattern, name),
        }
    }
}

impl From<Option<String>> for NameFilter {
    fn from(pattern: Option<String>) -> Self {
        Self(pattern)
    }
}

impl From<&str> for NameFilter {
    fn from(pattern: &str) -> Self {
        Self::pattern(pattern)
    }
}
