//! Pattern components.
//!
//! A glob pattern is a relative path whose components may contain
//! wildcards. Each component is classified on its own:
//!
//! - `sub-01` is a precise name, looked up directly
//! - `*.h5` is a wildcard, tested against every child
//! - `**` is the recursive wildcard: zero or more directory levels

use thiserror::Error;

use crate::fnmatch::{Pattern, is_wildcard_pattern};

/// Errors when parsing glob patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unacceptable pattern: empty")]
    Empty,
    #[error("non-relative patterns are unsupported: {0:?}")]
    Absolute(String),
    #[error("invalid pattern: '**' can only be an entire path component: {0:?}")]
    InvalidGlobstar(String),
}

/// One classified pattern component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// No wildcard characters: a single specific child.
    Precise(String),
    /// `*`, `?` or `[` somewhere in the component.
    Wildcard(Pattern),
    /// Exactly `**`.
    Recursive,
}

impl Component {
    /// Classify one component.
    ///
    /// ```
    /// use spimio_glob::{Component, PatternError};
    ///
    /// assert_eq!(Component::parse("**"), Ok(Component::Recursive));
    /// assert!(matches!(Component::parse("*.h5"), Ok(Component::Wildcard(_))));
    /// assert_eq!(Component::parse("a.h5"), Ok(Component::Precise("a.h5".into())));
    /// assert!(matches!(Component::parse("a**"), Err(PatternError::InvalidGlobstar(_))));
    /// ```
    pub fn parse(component: &str) -> Result<Self, PatternError> {
        if component == "**" {
            Ok(Component::Recursive)
        } else if component.contains("**") {
            Err(PatternError::InvalidGlobstar(component.to_string()))
        } else if is_wildcard_pattern(component) {
            Ok(Component::Wildcard(Pattern::new(component)))
        } else {
            Ok(Component::Precise(component.to_string()))
        }
    }
}

/// Split a relative glob pattern into its components.
///
/// Components are separated by `/`; empty and `.` components are dropped
/// the same way path parsing drops them. Every component is validated.
///
/// ```
/// use spimio_glob::{split_pattern, PatternError};
///
/// assert_eq!(split_pattern("sub-01//**/./*.h5").unwrap(), vec!["sub-01", "**", "*.h5"]);
/// assert_eq!(split_pattern("/abs/*"), Err(PatternError::Absolute("/abs/*".into())));
/// assert_eq!(split_pattern(""), Err(PatternError::Empty));
/// ```
pub fn split_pattern(pattern: &str) -> Result<Vec<String>, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty);
    }
    if pattern.starts_with('/') {
        return Err(PatternError::Absolute(pattern.to_string()));
    }

    let components: Vec<String> = pattern
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .map(str::to_string)
        .collect();

    if components.is_empty() {
        return Err(PatternError::Empty);
    }
    for component in &components {
        Component::parse(component)?;
    }

    Ok(components)
}
