//! Glob matching against single directory-entry names.

use glob::{MatchOptions, Pattern};

use crate::error::WalkError;

// Unlike shell globbing, `*` and `?` may match a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A shell-style glob matched against entry names, dotfiles included.
///
/// `.` and `..` never match, even though `.*` would otherwise accept them.
#[derive(Debug, Clone)]
pub struct EntryPattern {
    pattern: Pattern,
}

impl EntryPattern {
    /// Compile `raw` into a pattern.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::InvalidPattern`] if `raw` is not a valid glob.
    pub fn new(raw: &str) -> Result<Self, WalkError> {
        let pattern = Pattern::new(raw).map_err(|e| WalkError::InvalidPattern {
            pattern: raw.to_string(),
            message: e.msg.to_string(),
        })?;

        Ok(Self { pattern })
    }

    /// Whether the entry `name` matches.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        if name == "." || name == ".." {
            return false;
        }
        self.pattern.matches_with(name, MATCH_OPTIONS)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
