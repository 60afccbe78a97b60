//! # Stylist Identifiers
//!
//! This module provides the identifier model used everywhere in the crate.
//! An identifier names an element's position in a logical UI tree, e.g.
//! `home/header/searchBar/label`:
//!
//! - the last segment (`label`) is the **token**, the leaf name,
//! - the segments before it form the **path** (`home/header/searchBar`),
//! - an optional leading `@name` segment tags the identifier with a
//!   [Theme](crate::theme::Theme).
//!
//! Path components may be wildcarded (`*`) and may carry a bracketed
//! variant qualifier (`button[selected]`). Identifiers used as rule keys
//! ("patterns") typically use both; identifiers being resolved are fully
//! concrete.
//!
//! Parsing is total: any string produces an identifier, malformed input
//! simply produces a minimal one. For every parsed identifier,
//! `parse(x.to_string()) == x`.
//!
//! ## Usage
//!
//! ```rust
//! use stylist::identifier::StylistIdentifier;
//!
//! let id = StylistIdentifier::from("home/header/searchBar[compact]/label");
//! assert_eq!(id.token(), "label");
//! assert_eq!(id.path().len(), 3);
//! assert_eq!(id.component_at(0).value(), Some("searchBar"));
//! assert_eq!(id.component_at(0).variant(), Some("compact"));
//! // Out-of-range components are wildcards, not errors.
//! assert!(id.component_at(7).is_wildcard());
//! ```

use std::fmt::{Display, Formatter};

use crate::specificity::{Specificity, SpecificityCache};
use crate::theme::{Theme, THEME_PREFIX};

/// A single path component: an optional value and an optional variant.
///
/// `value == None` is the wildcard, written `*`. A variant is the bracketed
/// qualifier in `button[selected]`; empty brackets normalize to no variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    value: Option<String>,
    variant: Option<String>,
}

static WILDCARD: Component = Component {
    value: None,
    variant: None,
};

impl Component {
    /// Create a component, normalizing empty strings to absent.
    pub fn new(value: Option<String>, variant: Option<String>) -> Self {
        Self {
            value: value.filter(|v| !v.is_empty() && v != "*"),
            variant: variant.filter(|v| !v.is_empty()),
        }
    }

    /// Parse a component from a single path segment.
    ///
    /// The segment is split at the first `[`; a trailing `]` on the variant
    /// part is stripped. `*` (or an empty segment) parses to the wildcard.
    pub fn parse(segment: &str) -> Self {
        let (value, variant) = match segment.split_once('[') {
            Some((value, rest)) => (value, Some(rest.strip_suffix(']').unwrap_or(rest))),
            None => (segment, None),
        };
        Self::new(
            Some(value.trim().to_string()),
            variant.map(|v| v.trim().to_string()),
        )
    }

    /// The wildcard component, `*`.
    pub fn wildcard() -> Self {
        WILDCARD.clone()
    }

    /// The component's value, or `None` for a wildcard.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// The component's variant qualifier, if any.
    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    /// Whether this component is the plain wildcard (`*`, no variant).
    pub fn is_wildcard(&self) -> bool {
        self.value.is_none() && self.variant.is_none()
    }

    /// Whether this component, read as a pattern, accepts `other`.
    ///
    /// A wildcard value accepts any value; a concrete value requires
    /// equality. A pattern variant requires the same variant on `other`,
    /// while a pattern without one accepts any variant.
    pub fn subsumes(&self, other: &Component) -> bool {
        if let Some(value) = self.value() {
            if other.value() != Some(value) {
                return false;
            }
        }
        match self.variant() {
            Some(variant) => other.variant() == Some(variant),
            None => true,
        }
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{value}")?,
            None => write!(f, "*")?,
        }
        if let Some(variant) = &self.variant {
            write!(f, "[{variant}]")?;
        }
        Ok(())
    }
}

impl From<&str> for Component {
    fn from(segment: &str) -> Self {
        Self::parse(segment)
    }
}

/// The ancestry of an identifier: the components above the token.
///
/// Components are stored nearest-to-leaf first, so growing a path towards
/// the root is a cheap append. [Path::components] exposes that leaf-first
/// order; [Display] renders root-to-leaf as written in identifier strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    components: Vec<Component>,
}

impl Path {
    /// An empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a path from a `/`-separated string, root first.
    ///
    /// Segments are trimmed; empty segments are elided.
    pub fn parse(value: &str) -> Self {
        let components = value
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .rev()
            .map(Component::parse)
            .collect();
        Self { components }
    }

    pub(crate) fn from_components(components: Vec<Component>) -> Self {
        Self { components }
    }

    /// The components, nearest-to-leaf first.
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Whether the path has no components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// The component at `index`, counting from the leaf end.
    ///
    /// Out-of-range indices return the wildcard component, so matching code
    /// can probe any depth without bounds checks.
    pub fn component_at(&self, index: usize) -> &Component {
        self.components.get(index).unwrap_or(&WILDCARD)
    }

    /// This path nested inside `parent`: the parent's components are
    /// appended root-ward. An empty parent is the identity.
    pub fn within(&self, parent: &Path) -> Path {
        if parent.is_empty() {
            return self.clone();
        }
        let mut components = self.components.clone();
        components.extend(parent.components.iter().cloned());
        Self { components }
    }

    /// How specific this path is; see [crate::specificity].
    ///
    /// Values are memoized in the process-wide [SpecificityCache].
    pub fn specificity(&self) -> Specificity {
        SpecificityCache::shared().specificity(&self.components)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for component in self.components.iter().rev() {
            if !first {
                write!(f, "/")?;
            }
            write!(f, "{component}")?;
            first = false;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

/// Identifies a stylable element, or keys a style rule.
///
/// An identifier is a token, a [Path] of ancestry components and an optional
/// [Theme] requirement. Two identifiers with different tokens never match
/// each other, no matter their paths.
///
/// # Examples
///
/// ```rust
/// use stylist::identifier::StylistIdentifier;
///
/// let plain = StylistIdentifier::from("button/close");
/// assert_eq!(plain.token(), "close");
/// assert!(plain.theme().is_none());
///
/// let themed = StylistIdentifier::from("@dark/button/close");
/// assert_eq!(themed.theme().map(|t| t.name()), Some("dark"));
/// assert_eq!(themed.to_string(), "@dark/button/close");
/// ```
///
/// Identifiers compose: `"close".within("button")` is `button/close`.
///
/// ```rust
/// use stylist::identifier::{Path, StylistIdentifier};
///
/// let close = StylistIdentifier::from("close");
/// let nested = close.within(Some(&Path::from("button")));
/// assert_eq!(nested.to_string(), "button/close");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StylistIdentifier {
    token: String,
    path: Path,
    theme: Option<Theme>,
}

impl StylistIdentifier {
    /// Create an identifier from its parts.
    pub fn new(token: impl Into<String>, path: Path, theme: Option<Theme>) -> Self {
        Self {
            token: token.into(),
            path,
            theme,
        }
    }

    /// Parse an identifier string.
    ///
    /// The string is split on `/`. A leading `@name` segment becomes the
    /// theme, the last segment the token, everything between a path
    /// component. This never fails; malformed input (even an empty string)
    /// produces a minimal identifier rather than an error.
    pub fn parse(value: &str) -> Self {
        let mut segments: Vec<&str> = value
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        let theme = match segments.first() {
            Some(first) if first.starts_with(THEME_PREFIX) => Some(Theme::new(segments.remove(0))),
            _ => None,
        };

        let token = segments.pop().unwrap_or_default().to_string();
        let components = segments.into_iter().rev().map(Component::parse).collect();

        Self {
            token,
            path: Path::from_components(components),
            theme,
        }
    }

    /// The leaf name of the identifier.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The ancestry path above the token.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The theme requirement, if any.
    pub fn theme(&self) -> Option<&Theme> {
        self.theme.as_ref()
    }

    /// The path component at `index`, counting from the leaf end; wildcard
    /// when out of range.
    pub fn component_at(&self, index: usize) -> &Component {
        self.path.component_at(index)
    }

    /// This identifier nested inside `parent`.
    ///
    /// The parent path's components are prepended root-ward; the token and
    /// theme are kept. `within(None)` is the identity.
    pub fn within(&self, parent: Option<&Path>) -> Self {
        match parent {
            Some(parent) => Self {
                token: self.token.clone(),
                path: self.path.within(parent),
                theme: self.theme.clone(),
            },
            None => self.clone(),
        }
    }

    /// The inverse of [within](Self::within): `child` nested inside this
    /// whole identifier (token included).
    pub fn containing(&self, child: &StylistIdentifier) -> Self {
        child.within(Some(&self.enclosing_path()))
    }

    /// This identifier read as a path: the token becomes the leaf component.
    fn enclosing_path(&self) -> Path {
        let mut components = Vec::with_capacity(self.path.len() + 1);
        components.push(Component::parse(&self.token));
        components.extend(self.path.components.iter().cloned());
        Path::from_components(components)
    }
}

impl Display for StylistIdentifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(theme) = &self.theme {
            write!(f, "{theme}/")?;
        }
        if !self.path.is_empty() {
            write!(f, "{}/", self.path)?;
        }
        write!(f, "{}", self.token)
    }
}

impl From<&str> for StylistIdentifier {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl std::str::FromStr for StylistIdentifier {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}
