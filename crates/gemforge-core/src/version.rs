//! Version parsing and specifier matching
//!
//! Versions are `semver::Version` values, parsed leniently: one to three
//! dotted release components with an optional pre-release tag, so `"2"`,
//! `"2.1"`, and `"2.1.0-rc.1"` are all accepted. Specifiers follow the
//! PEP 440-style operators `==`, `!=`, `~=`, `>`, `>=`, `<`, `<=`.
//! `semver::VersionReq` is not used because its caret/tilde semantics do
//! not match the compatible-release and pre-release rules needed here.

use std::fmt;

use semver::{Prerelease, Version};

use crate::error::{Error, Result};

/// Specifier operators, longest spellings first so parsing can split on
/// the first match.
const OPERATORS: [(&str, SpecifierOp); 7] = [
    ("==", SpecifierOp::Equal),
    ("!=", SpecifierOp::NotEqual),
    ("~=", SpecifierOp::Compatible),
    (">=", SpecifierOp::GreaterEqual),
    ("<=", SpecifierOp::LessEqual),
    (">", SpecifierOp::Greater),
    ("<", SpecifierOp::Less),
];

/// A version-matching operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierOp {
    Equal,
    NotEqual,
    Compatible,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl SpecifierOp {
    fn as_str(&self) -> &'static str {
        match self {
            SpecifierOp::Equal => "==",
            SpecifierOp::NotEqual => "!=",
            SpecifierOp::Compatible => "~=",
            SpecifierOp::Greater => ">",
            SpecifierOp::GreaterEqual => ">=",
            SpecifierOp::Less => "<",
            SpecifierOp::LessEqual => "<=",
        }
    }
}

/// Parse a version string leniently.
///
/// Accepts 1-3 dotted numeric release components and an optional
/// `-prerelease` suffix. Missing components default to zero, so `"1.2"`
/// parses as `1.2.0`.
pub fn parse_loose_version(input: &str) -> Result<Version> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::specifier_parse(input));
    }
    if let Ok(version) = Version::parse(trimmed) {
        return Ok(version);
    }

    let (release, pre) = match trimmed.split_once('-') {
        Some((release, pre)) => (release, Some(pre)),
        None => (trimmed, None),
    };

    let mut parts = [0u64; 3];
    let components: Vec<&str> = release.split('.').collect();
    if components.is_empty() || components.len() > 3 {
        return Err(Error::specifier_parse(input));
    }
    for (slot, component) in parts.iter_mut().zip(&components) {
        *slot = component
            .parse::<u64>()
            .map_err(|_| Error::specifier_parse(input))?;
    }

    let mut version = Version::new(parts[0], parts[1], parts[2]);
    if let Some(pre) = pre {
        version.pre = Prerelease::new(pre).map_err(|_| Error::specifier_parse(input))?;
    }
    Ok(version)
}

/// Number of dotted release components in a version string, before any
/// pre-release suffix. Drives the `~=` upper bound.
fn release_component_count(input: &str) -> usize {
    let release = input.split(['-', '+']).next().unwrap_or(input);
    release.split('.').count()
}

/// A single parsed version specifier clause, e.g. `>=1.2.0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpecifier {
    op: SpecifierOp,
    version: Version,
    /// How many release components the specifier was written with;
    /// `~=1.2` and `~=1.2.0` have different upper bounds.
    components: usize,
}

impl VersionSpecifier {
    /// Parse a specifier string such as `"==1.2.3"` or `">= 2.0"`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let (op, rest) = OPERATORS
            .iter()
            .find_map(|(text, op)| trimmed.strip_prefix(text).map(|rest| (*op, rest)))
            .ok_or_else(|| Error::specifier_parse(input))?;

        let version_text = rest.trim();
        let version = parse_loose_version(version_text)?;
        let components = release_component_count(version_text);

        // PEP 440 requires at least two release segments for ~=
        if op == SpecifierOp::Compatible && components < 2 {
            return Err(Error::specifier_parse(input));
        }

        Ok(Self {
            op,
            version,
            components,
        })
    }

    /// The operator of this specifier
    pub fn op(&self) -> SpecifierOp {
        self.op
    }

    /// The version the specifier was written against
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Check a candidate version against this specifier.
    ///
    /// Pre-release candidates never match unless the specifier itself
    /// names a pre-release.
    pub fn matches(&self, candidate: &Version) -> bool {
        if !candidate.pre.is_empty() && self.version.pre.is_empty() {
            return false;
        }

        match self.op {
            SpecifierOp::Equal => self.release_eq(candidate),
            SpecifierOp::NotEqual => !self.release_eq(candidate),
            SpecifierOp::Greater => candidate > &self.version,
            SpecifierOp::GreaterEqual => candidate >= &self.version,
            SpecifierOp::Less => candidate < &self.version,
            SpecifierOp::LessEqual => candidate <= &self.version,
            SpecifierOp::Compatible => {
                candidate >= &self.version && candidate < &self.compatible_upper_bound()
            }
        }
    }

    fn release_eq(&self, candidate: &Version) -> bool {
        candidate.major == self.version.major
            && candidate.minor == self.version.minor
            && candidate.patch == self.version.patch
            && candidate.pre == self.version.pre
    }

    /// Exclusive upper bound for `~=`: bump the component before the last
    /// one written. `~=1.2.3` allows `<1.3.0`; `~=1.2` allows `<2.0.0`.
    fn compatible_upper_bound(&self) -> Version {
        if self.components >= 3 {
            Version::new(self.version.major, self.version.minor + 1, 0)
        } else {
            Version::new(self.version.major + 1, 0, 0)
        }
    }
}

impl fmt::Display for VersionSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}
