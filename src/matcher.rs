//! # Identifier Matching
//!
//! Decides whether a general (possibly wildcarded, variant-qualified,
//! themed) pattern identifier applies to a specific identifier, and how
//! well. The result is a [Score]: `0` strictly means "no match" and is
//! never produced for a successful one, so callers can treat it as a
//! sentinel.
//!
//! Scores mirror [specificity](crate::specificity) weighting: a pattern
//! component matched nearer the specific identifier's leaf is worth four
//! times one matched a step further up, and a matched variant is worth
//! twice the value match at the same position. Exact structural matches
//! short-circuit to reserved maximum scores so they outrank every partial
//! match, themed above unthemed.

use crate::identifier::StylistIdentifier;
use crate::theme::Theme;

/// A match score; `0` ([NO_MATCH]) means the pattern does not apply.
pub type Score = u64;

/// The pattern does not apply to the identifier.
pub const NO_MATCH: Score = 0;

/// Reserved score for an exact structural match of an unthemed pattern.
pub const EXACT_MATCH: Score = u64::MAX - 1;

/// Reserved score for an exact structural match of a themed pattern;
/// outranks [EXACT_MATCH].
pub const THEMED_EXACT_MATCH: Score = u64::MAX;

/// Bonus added to a themed pattern's score once its theme requirement has
/// been met, so that a themed pattern outranks an unthemed one of equal
/// path score.
const THEME_BONUS: Score = 1;

/// Path depths beyond this collapse onto the deepest representable weight.
const MAX_DEPTH: usize = 31;

/// Checks whether one identifier is a more general version of another.
///
/// ```rust
/// use stylist::matcher::StylistIdentifierMatcher;
///
/// let matcher = StylistIdentifierMatcher::new();
/// let specific = "home/header/searchBar/label".into();
///
/// let close = matcher.match_score(&specific, &"header/searchBar/label".into(), None);
/// let far = matcher.match_score(&specific, &"home/label".into(), None);
/// let miss = matcher.match_score(&specific, &"label/searchBar".into(), None);
/// assert!(close > far);
/// assert_eq!(miss, 0);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct StylistIdentifierMatcher;

impl StylistIdentifierMatcher {
    /// Create a matcher.
    pub fn new() -> Self {
        Self
    }

    /// Score `general` as a pattern for `specific`, under `active_theme`.
    ///
    /// Returns [NO_MATCH] when the pattern does not apply:
    /// - the tokens differ;
    /// - the pattern is themed and `active_theme` is absent or different
    ///   (a theme on a pattern is a requirement, not a hint);
    /// - the pattern demands ancestry the specific identifier lacks;
    /// - a pattern component's variant contradicts the matched component.
    ///
    /// Otherwise the score sums the weights of the specific positions each
    /// pattern component matched, walking both paths leaf to root and
    /// consuming pattern components as an in-order subsequence of the
    /// specific ones. A specific component may carry a variant the pattern
    /// does not mention; the reverse is a mismatch.
    pub fn match_score(
        &self,
        specific: &StylistIdentifier,
        general: &StylistIdentifier,
        active_theme: Option<&Theme>,
    ) -> Score {
        log::trace!("matching {specific} against {general}");

        if specific.token() != general.token() {
            return NO_MATCH;
        }

        if let Some(required) = general.theme() {
            if active_theme != Some(required) {
                log::trace!("  theme {required} not active, no match");
                return NO_MATCH;
            }
        }
        let themed = general.theme().is_some();

        // Identical paths short-circuit to the reserved maximum.
        if specific.path() == general.path() {
            return if themed { THEMED_EXACT_MATCH } else { EXACT_MATCH };
        }

        if general.path().is_empty() {
            // Token-only pattern: the weakest possible match.
            return 1 + if themed { THEME_BONUS } else { 0 };
        }

        if specific.path().is_empty() {
            return NO_MATCH;
        }

        let len = specific.path().len();
        let mut remaining = general.path().components().iter();
        let mut current = remaining.next();

        let mut score: Score = 0;

        for (index, component) in specific.path().components().iter().enumerate() {
            let Some(pattern) = current else { break };

            let depth = (len - index).min(MAX_DEPTH);
            log::trace!("  comparing {component} to {pattern}");

            // A value mismatch skips this specific component; the pattern
            // component may still match one further up.
            if let Some(value) = pattern.value() {
                if component.value() != Some(value) {
                    continue;
                }
            }

            let mut gained = match pattern.value() {
                Some(_) => 1 << (2 * depth - 1),
                None => 0,
            };

            // A variant on the pattern is a hard requirement: a mismatch
            // rejects the whole pattern, not just this component.
            match (pattern.variant(), component.variant()) {
                (Some(required), Some(actual)) if required == actual => {
                    gained += 1 << (2 * depth);
                }
                (Some(_), _) => {
                    log::trace!("  variant mismatch on {pattern}, no match");
                    return NO_MATCH;
                }
                (None, _) => {}
            }

            score += gained;

            current = remaining.next();
            if current.is_none() {
                // A pattern of nothing but wildcards earns no weight from
                // the walk; clamp so a successful match is never 0.
                let score = score.max(1) + if themed { THEME_BONUS } else { 0 };
                log::debug!("matched {specific} against {general} with score {score}");
                return score;
            }
        }

        // The specific path ran out before every pattern component was
        // consumed.
        log::trace!("  {specific} exhausted before {general}, no match");
        NO_MATCH
    }
}
