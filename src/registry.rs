//! # Style Registry
//!
//! [Stylist] owns a set of [Style] rules, an optional active
//! [Theme](crate::theme::Theme) and a resolution cache, and answers the one
//! question the rendering layer keeps asking: *which rule applies to this
//! identifier right now?*
//!
//! Rules are keyed by pattern identifiers; adding a rule whose pattern is
//! structurally equal to an existing one replaces it. Resolution runs on
//! every render of every element, so outcomes (hits and misses alike) are
//! cached per identifier and the cache is cleared whenever the rule set,
//! the active theme, the default style or the matching mode changes, all
//! of which require exclusive access, so a consistent rule set is always
//! observed.
//!
//! The registry is not inherently safe for concurrent *mutation*: it
//! assumes a single logical owner, the way a UI main loop owns its style
//! state. Shared resolution from several threads is fine (`resolve` takes
//! `&self` and the internal cache is lock-guarded); wrap the registry in a
//! `RwLock` if mutation must be shared too.
//!
//! ## Usage
//!
//! ```rust
//! use stylist::registry::{Style, Stylist};
//!
//! let mut stylist: Stylist<&str> = Stylist::new();
//! stylist.add_styles(vec![
//!     Style::new("searchBar/label", "accent"),
//!     Style::new("label", "plain"),
//! ]);
//!
//! let style = stylist.resolve(&"home/header/searchBar/label".into());
//! assert_eq!(style.map(|s| *s.payload()), Some("accent"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::mem;
use std::sync::RwLock;

use crate::identifier::StylistIdentifier;
use crate::matching_mode::{MatchingMode, ScoredMatching};
use crate::theme::Theme;

/// A single style rule: a pattern identifier and an opaque payload.
///
/// The payload is whatever the consuming layer applies when the rule wins:
/// a set of attributes, a view transform, a property map. The registry
/// never looks inside it.
#[derive(Clone)]
pub struct Style<T> {
    identifier: StylistIdentifier,
    payload: T,
}

impl<T> Style<T> {
    /// Create a rule from a pattern and its payload.
    pub fn new(identifier: impl Into<StylistIdentifier>, payload: T) -> Self {
        Self {
            identifier: identifier.into(),
            payload,
        }
    }

    /// The pattern identifier keying this rule.
    pub fn identifier(&self) -> &StylistIdentifier {
        &self.identifier
    }

    /// The rule's payload.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Consume the rule, returning its payload.
    pub fn into_payload(self) -> T {
        self.payload
    }
}

impl<T> fmt::Debug for Style<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Style")
            .field("identifier", &self.identifier)
            .finish_non_exhaustive()
    }
}

/// A registry of style rules, resolvable by identifier.
///
/// See the [module documentation](self) for semantics and an example.
pub struct Stylist<T> {
    styles: Vec<Style<T>>,
    current_theme: Option<Theme>,
    default_style: Option<Style<T>>,
    matching_mode: Box<dyn MatchingMode<T> + Send + Sync>,
    resolution_cache: RwLock<HashMap<StylistIdentifier, Option<usize>>>,
    change_handler: Option<Box<dyn Fn() + Send + Sync>>,
    sealed: bool,
}

impl<T> Stylist<T> {
    /// Create an empty registry using the weighted-score matching mode.
    pub fn new() -> Self {
        Self::with_matching_mode(ScoredMatching::new())
    }

    /// Create an empty registry with an explicit matching mode.
    pub fn with_matching_mode(mode: impl MatchingMode<T> + Send + Sync + 'static) -> Self {
        Self {
            styles: Vec::new(),
            current_theme: None,
            default_style: None,
            matching_mode: Box::new(mode),
            resolution_cache: RwLock::new(HashMap::new()),
            change_handler: None,
            sealed: false,
        }
    }

    /// A registry that never applies any style.
    ///
    /// This is an explicit empty value for call sites that need "no
    /// styling" without an `Option`. It is immutable by contract: adding
    /// styles to it, or changing its theme or default, is a programmer
    /// error and panics.
    pub fn unstyled() -> Self {
        let mut stylist = Self::new();
        stylist.sealed = true;
        stylist
    }

    /// Whether this is the immutable [unstyled](Self::unstyled) registry.
    pub fn is_unstyled(&self) -> bool {
        self.sealed
    }

    fn assert_mutable(&self) {
        assert!(
            !self.sealed,
            "a Stylist created with unstyled() is immutable by contract"
        );
    }

    /// The number of registered rules (the default rule not included).
    pub fn style_count(&self) -> usize {
        self.styles.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// The active theme, if any.
    pub fn current_theme(&self) -> Option<&Theme> {
        self.current_theme.as_ref()
    }

    /// Add a single rule; see [add_styles](Self::add_styles).
    pub fn add_style(&mut self, identifier: impl Into<StylistIdentifier>, payload: T) {
        self.add_styles(vec![Style::new(identifier, payload)]);
    }

    /// Add rules, replacing any existing rule with a structurally equal
    /// pattern. The resolution cache is invalidated and the change handler
    /// notified once for the whole batch.
    ///
    /// # Panics
    ///
    /// Panics when called on [Stylist::unstyled].
    pub fn add_styles(&mut self, styles: Vec<Style<T>>) {
        self.assert_mutable();

        let existing = mem::take(&mut self.styles)
            .into_iter()
            .filter(|existing| {
                !styles
                    .iter()
                    .any(|incoming| incoming.identifier() == existing.identifier())
            })
            .collect();

        self.styles = self.matching_mode.insert(styles, existing);
        self.mutated();
    }

    /// Replace the active theme. Rules whose pattern names a different
    /// theme stop matching immediately; previously cached resolutions are
    /// recomputed.
    ///
    /// # Panics
    ///
    /// Panics when called on [Stylist::unstyled].
    pub fn set_theme(&mut self, theme: Option<Theme>) {
        self.assert_mutable();
        self.current_theme = theme;
        self.mutated();
    }

    /// Set or clear the rule returned when nothing matches.
    ///
    /// # Panics
    ///
    /// Panics when called on [Stylist::unstyled].
    pub fn set_default_style(&mut self, style: Option<Style<T>>) {
        self.assert_mutable();
        self.default_style = style;
        self.mutated();
    }

    /// Replace the matching mode, re-inserting the current rules under the
    /// new mode's ordering.
    ///
    /// # Panics
    ///
    /// Panics when called on [Stylist::unstyled].
    pub fn set_matching_mode(&mut self, mode: impl MatchingMode<T> + Send + Sync + 'static) {
        self.assert_mutable();
        self.matching_mode = Box::new(mode);
        let styles = mem::take(&mut self.styles);
        self.styles = self.matching_mode.insert(styles, Vec::new());
        self.mutated();
    }

    /// Install a callback fired after every mutation, for the rendering
    /// layer to trigger re-renders from. The registry itself carries no
    /// observation machinery beyond this.
    pub fn set_change_handler(&mut self, handler: impl Fn() + Send + Sync + 'static) {
        self.change_handler = Some(Box::new(handler));
    }

    /// Resolve the best-matching rule for `identifier`.
    ///
    /// Returns the winning rule, the default rule when nothing matches and
    /// one is set, or `None`. Not finding a rule is a normal outcome (the
    /// caller renders unstyled) and is surfaced as a `log` warning rather
    /// than an error. Resolution is deterministic: among equally good
    /// candidates the first-registered rule wins.
    pub fn resolve(&self, identifier: &StylistIdentifier) -> Option<&Style<T>> {
        let found = match self.cached_resolution(identifier) {
            Some(found) => found,
            None => {
                let found = self.matching_mode.first_match(
                    &self.styles,
                    identifier,
                    self.current_theme.as_ref(),
                );
                if let Ok(mut cache) = self.resolution_cache.write() {
                    cache.insert(identifier.clone(), found);
                }
                match found {
                    Some(index) => {
                        if let Some(style) = self.styles.get(index) {
                            log::debug!("applying {} to {identifier}", style.identifier());
                        }
                    }
                    None => log::warn!("no matching style found for {identifier}"),
                }
                found
            }
        };

        match found {
            Some(index) => self.styles.get(index),
            None => self.default_style.as_ref(),
        }
    }

    /// Resolve and return just the winning payload.
    pub fn resolve_payload(&self, identifier: &StylistIdentifier) -> Option<&T> {
        self.resolve(identifier).map(Style::payload)
    }

    fn cached_resolution(&self, identifier: &StylistIdentifier) -> Option<Option<usize>> {
        let cache = self.resolution_cache.read().ok()?;
        cache.get(identifier).copied()
    }

    /// Rules, theme and cache always change together, under `&mut self`
    /// exclusivity, so readers never see a stale cache entry.
    fn mutated(&mut self) {
        if let Ok(mut cache) = self.resolution_cache.write() {
            cache.clear();
        }
        if let Some(handler) = &self.change_handler {
            handler();
        }
    }
}

impl<T> Default for Stylist<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Stylist<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stylist")
            .field("styles", &self.styles)
            .field("current_theme", &self.current_theme)
            .field("sealed", &self.sealed)
            .finish_non_exhaustive()
    }
}
