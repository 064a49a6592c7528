//! Parse and classify mod dependency directives
//!
//! The mod portal ships dependencies as raw strings such as `"mod_x >= 1.2.0"`,
//! `"? optional-mod"`, `"! conflicting-mod"`, `"(?) load-order-only"` or
//! `"~ weak-required"`. This module turns a release's directive list into a
//! classified set the planners can walk.
//!
//! Directive prefixes, in match order:
//!
//! - name containing `base` — the game itself (or an official expansion
//!   pseudo-mod), always present, never installed or removed
//! - `!` / `(!)` — conflict, must NOT be installed
//! - `?` — optional, may be installed
//! - `(?)` — hidden optional, declares load order only, never installed
//! - `~` — required but load-order-agnostic, treated as required
//! - no prefix — required
//!
//! The match order matters: the weaker prefixes are substrings of the
//! parenthesized ones, so checking `?` before `(?)` would misclassify.
//!
//! # Examples
//!
//! ```
//! use modman::{parse_dependencies, MinVersion};
//!
//! let deps = parse_dependencies(&[
//!     "base >= 1.1".to_string(),
//!     "flib >= 0.9.2".to_string(),
//!     "? informatron".to_string(),
//!     "! some-incompatible-mod".to_string(),
//! ]);
//!
//! assert_eq!(deps.required.len(), 1);
//! assert_eq!(deps.required[0].0, "flib");
//! assert_eq!(deps.optional[0].0, "informatron");
//! assert!(deps.conflict.contains("some-incompatible-mod"));
//! ```

use semver::Version;
use std::collections::HashSet;
use std::fmt;

/// Version comparator captured from a directive.
///
/// All five forms are parsed and kept, but the planners only ever apply `>=`
/// semantics when filtering releases, matching the portal's own behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Lt,
    Le,
    Eq,
    Ge,
    Gt,
}

impl Comparator {
    /// Comparator tokens, longest first so `>=` is never split as `>` then `=`.
    const TOKENS: [(&'static str, Comparator); 5] = [
        ("<=", Comparator::Le),
        (">=", Comparator::Ge),
        ("<", Comparator::Lt),
        (">", Comparator::Gt),
        ("=", Comparator::Eq),
    ];
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Eq => "=",
            Comparator::Ge => ">=",
            Comparator::Gt => ">",
        };
        f.write_str(s)
    }
}

/// Minimum version constraint for a dependency.
///
/// `Latest` is the sentinel used when a directive carries no version at all:
/// the planner then picks the newest release compatible with the game version
/// instead of filtering by the mod's own version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MinVersion {
    Latest,
    AtLeast(Version),
}

impl fmt::Display for MinVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinVersion::Latest => f.write_str("latest"),
            MinVersion::AtLeast(v) => write!(f, "{}", v),
        }
    }
}

/// How a single directive classifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Required,
    WeakRequired,
    Optional,
    HiddenOptional,
    Conflict,
    HiddenConflict,
}

/// One parsed dependency directive.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub name: String,
    pub version: MinVersion,
    pub comparator: Option<Comparator>,
}

/// A release's directives, classified for the planners.
///
/// `required` and `optional` preserve the input order; hidden optionals are
/// dropped entirely (they exist only to pin load order in the game). Both
/// conflict forms merge into one set of bare names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedDependencies {
    pub required: Vec<(String, MinVersion)>,
    pub optional: Vec<(String, MinVersion)>,
    pub conflict: HashSet<String>,
}

/// Parse a two- or three-component version string into a [`Version`].
///
/// The portal uses plain `major.minor` for Factorio versions (mods never pin
/// the patch level), so `"1.1"` normalizes to `1.1.0`.
pub fn normalize_version(s: &str) -> Option<Version> {
    let normalized = match s.matches('.').count() {
        0 => format!("{}.0.0", s),
        1 => format!("{}.0", s),
        _ => s.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Split a whitespace-stripped directive on its first comparator token.
fn split_comparator(raw: &str) -> (&str, Option<Comparator>, Option<&str>) {
    for (idx, _) in raw.char_indices() {
        for (token, cmp) in Comparator::TOKENS {
            if raw[idx..].starts_with(token) {
                return (&raw[..idx], Some(cmp), Some(&raw[idx + token.len()..]));
            }
        }
    }
    (raw, None, None)
}

/// Parse a single raw directive string.
///
/// Returns `None` for directives naming the game itself (anything containing
/// `base`): the host runtime is always present and never planned.
pub fn parse_directive(raw: &str) -> Option<Directive> {
    // The portal is inconsistent about spaces around names and comparators.
    let cleaned: String = raw.split_whitespace().collect();

    let (name_part, comparator, version_part) = split_comparator(&cleaned);

    if name_part.contains("base") {
        return None;
    }

    let (kind, name) = if let Some(rest) = name_part.strip_prefix("(!)") {
        (DirectiveKind::HiddenConflict, rest)
    } else if let Some(rest) = name_part.strip_prefix('!') {
        (DirectiveKind::Conflict, rest)
    } else if let Some(rest) = name_part.strip_prefix("(?)") {
        (DirectiveKind::HiddenOptional, rest)
    } else if let Some(rest) = name_part.strip_prefix('?') {
        (DirectiveKind::Optional, rest)
    } else if let Some(rest) = name_part.strip_prefix('~') {
        (DirectiveKind::WeakRequired, rest)
    } else {
        // Unrecognized formats deliberately fall through to Required so new
        // portal syntax does not silently vanish.
        (DirectiveKind::Required, name_part)
    };

    let version = version_part
        .and_then(normalize_version)
        .map(MinVersion::AtLeast)
        .unwrap_or(MinVersion::Latest);

    Some(Directive {
        kind,
        name: name.to_string(),
        version,
        comparator,
    })
}

/// Parse a release's directive list into a [`ClassifiedDependencies`].
pub fn parse_dependencies(directives: &[String]) -> ClassifiedDependencies {
    let mut deps = ClassifiedDependencies::default();

    for raw in directives {
        let Some(directive) = parse_directive(raw) else {
            continue;
        };

        match directive.kind {
            DirectiveKind::Required | DirectiveKind::WeakRequired => {
                deps.required.push((directive.name, directive.version));
            }
            DirectiveKind::Optional => {
                deps.optional.push((directive.name, directive.version));
            }
            // Load-order declarations only, never installed or removed.
            DirectiveKind::HiddenOptional => {}
            DirectiveKind::Conflict | DirectiveKind::HiddenConflict => {
                deps.conflict.insert(directive.name);
            }
        }
    }

    deps
}
