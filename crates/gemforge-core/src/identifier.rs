//! Object identifier parsing
//!
//! Gem and engine names are referenced as `"name"` (any version) or
//! `"name<op>version"` (restricted). All identifier splitting lives here
//! so callers never pull strings apart ad hoc.

use std::fmt;

use semver::Version;

use crate::error::Result;
use crate::version::VersionSpecifier;

/// Characters that can begin a specifier operator
const OPERATOR_CHARS: [char; 5] = ['=', '!', '~', '>', '<'];

/// A parsed `name` / `name<op>version` identifier.
///
/// Per the registry's identity rules, two identifiers are equal when their
/// names are equal; specifiers are compared separately by callers that
/// need them.
#[derive(Debug, Clone, Eq)]
pub struct ObjectIdentifier {
    pub name: String,
    pub specifier: Option<VersionSpecifier>,
}

impl ObjectIdentifier {
    /// Parse an identifier string, splitting on the first specifier
    /// operator character. Whitespace around both halves is stripped.
    pub fn parse(input: &str) -> Result<Self> {
        match input.find(|c| OPERATOR_CHARS.contains(&c)) {
            Some(split) => {
                let (name, specifier) = input.split_at(split);
                Ok(Self {
                    name: name.trim().to_string(),
                    specifier: Some(VersionSpecifier::parse(specifier)?),
                })
            }
            None => Ok(Self {
                name: input.trim().to_string(),
                specifier: None,
            }),
        }
    }

    /// Construct an unrestricted identifier from a bare name
    pub fn unrestricted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specifier: None,
        }
    }

    /// Check a candidate version. A bare name means "any version".
    pub fn matches(&self, candidate: &Version) -> bool {
        match &self.specifier {
            Some(specifier) => specifier.matches(candidate),
            None => true,
        }
    }
}

impl PartialEq for ObjectIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.specifier {
            Some(specifier) => write!(f, "{}{}", self.name, specifier),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A normalized dependency edge: an identifier plus the optional flag
#[derive(Debug, Clone)]
pub struct GemDependency {
    pub id: ObjectIdentifier,
    pub optional: bool,
}

impl GemDependency {
    pub fn new(id: ObjectIdentifier, optional: bool) -> Self {
        Self { id, optional }
    }
}
