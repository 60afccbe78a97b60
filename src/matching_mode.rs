//! # Matching Modes
//!
//! Pluggable policies for how a registry stores its rules and which rule
//! wins a lookup. Two modes are provided:
//!
//! - [StructuralMatching] keeps rules ordered by descending pattern
//!   specificity and returns the first pattern that structurally subsumes
//!   the target, a plain wildcard-compatibility relation with no
//!   subsequence skipping.
//! - [ScoredMatching] keeps rules in insertion order and returns the rule
//!   with the highest [matcher](crate::matcher) score.
//!
//! Both honor theme precedence: a rule whose theme matches the active one
//! strictly outranks every unthemed rule; scores and scan order only decide
//! among rules on the same side of that line.

use crate::identifier::StylistIdentifier;
use crate::matcher::{StylistIdentifierMatcher, NO_MATCH};
use crate::registry::Style;
use crate::theme::Theme;

/// A rule-storage and lookup policy for a registry.
///
/// `insert` merges newly added rules into the existing collection in
/// whatever order the mode's `first_match` relies on; `first_match` returns
/// the index of the winning rule for a target identifier, if any.
pub trait MatchingMode<T> {
    /// Merge `new` rules into `existing`, returning the combined collection
    /// in this mode's lookup order.
    fn insert(&self, new: Vec<Style<T>>, existing: Vec<Style<T>>) -> Vec<Style<T>>;

    /// The index of the rule that wins `target` under `active_theme`.
    fn first_match(
        &self,
        styles: &[Style<T>],
        target: &StylistIdentifier,
        active_theme: Option<&Theme>,
    ) -> Option<usize>;
}

/// Whether `pattern` structurally subsumes `target`: equal tokens, and at
/// every leaf-relative position the pattern component accepts the target
/// component. Out-of-range components are wildcards on both sides, so a
/// short pattern subsumes deeper targets while a pattern demanding
/// ancestry rejects shallower ones.
fn subsumes(pattern: &StylistIdentifier, target: &StylistIdentifier) -> bool {
    if pattern.token() != target.token() {
        return false;
    }
    let positions = pattern.path().len().max(target.path().len());
    (0..positions).all(|index| pattern.component_at(index).subsumes(target.component_at(index)))
}

/// Most-specific-first storage with subsumption lookup.
///
/// Insertion keeps rules sorted by descending pattern specificity (stable,
/// so equally specific rules stay in registration order); lookup scans that
/// order and takes the first structural match.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralMatching;

impl StructuralMatching {
    /// Create the mode.
    pub fn new() -> Self {
        Self
    }
}

impl<T> MatchingMode<T> for StructuralMatching {
    fn insert(&self, new: Vec<Style<T>>, existing: Vec<Style<T>>) -> Vec<Style<T>> {
        let mut merged = existing;
        merged.extend(new);
        merged.sort_by(|a, b| {
            b.identifier()
                .path()
                .specificity()
                .cmp(&a.identifier().path().specificity())
        });
        merged
    }

    fn first_match(
        &self,
        styles: &[Style<T>],
        target: &StylistIdentifier,
        active_theme: Option<&Theme>,
    ) -> Option<usize> {
        if let Some(active) = active_theme {
            let themed = styles.iter().position(|style| {
                style.identifier().theme() == Some(active) && subsumes(style.identifier(), target)
            });
            if themed.is_some() {
                return themed;
            }
        }
        styles.iter().position(|style| {
            style.identifier().theme().is_none() && subsumes(style.identifier(), target)
        })
    }
}

/// Insertion-ordered storage with weighted-score lookup.
///
/// Insertion appends; lookup scores every rule with the
/// [StylistIdentifierMatcher] and keeps the best, first-registered winning
/// ties. A rule matching the active theme beats any unthemed rule
/// regardless of score.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoredMatching;

impl ScoredMatching {
    /// Create the mode.
    pub fn new() -> Self {
        Self
    }
}

impl<T> MatchingMode<T> for ScoredMatching {
    fn insert(&self, new: Vec<Style<T>>, existing: Vec<Style<T>>) -> Vec<Style<T>> {
        let mut merged = existing;
        merged.extend(new);
        merged
    }

    fn first_match(
        &self,
        styles: &[Style<T>],
        target: &StylistIdentifier,
        active_theme: Option<&Theme>,
    ) -> Option<usize> {
        let matcher = StylistIdentifierMatcher::new();
        let mut best: Option<(bool, u64, usize)> = None;

        for (index, style) in styles.iter().enumerate() {
            let score = matcher.match_score(target, style.identifier(), active_theme);
            if score == NO_MATCH {
                continue;
            }
            let themed = style.identifier().theme().is_some();
            // Strictly-greater keeps the first registered rule on ties;
            // the themed flag dominates the comparison outright.
            if best.map_or(true, |(best_themed, best_score, _)| {
                (themed, score) > (best_themed, best_score)
            }) {
                best = Some((themed, score, index));
            }
        }

        best.map(|(_, _, index)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> StylistIdentifier {
        StylistIdentifier::from(value)
    }

    fn style(pattern: &str) -> Style<u32> {
        Style::new(id(pattern), 0)
    }

    fn patterns(styles: &[Style<u32>]) -> Vec<String> {
        styles.iter().map(|s| s.identifier().to_string()).collect()
    }

    #[test]
    fn test_subsumes() {
        assert!(subsumes(&id("*/*/identifier"), &id("section/element/identifier")));
        assert!(subsumes(&id("section/*/atom"), &id("section/element/atom")));
        assert!(subsumes(&id("identifier"), &id("section/element/identifier")));
        assert!(subsumes(&id("*/*/*/identifier"), &id("section/element/identifier")));
        assert!(subsumes(
            &id("very/specific/identifier"),
            &id("very/specific/identifier")
        ));

        assert!(!subsumes(&id("*/element/identifier"), &id("x/element2/identifier")));
        assert!(!subsumes(&id("section/*/identifier"), &id("section2/x/identifier")));
        assert!(!subsumes(
            &id("*/*/identifier"),
            &id("section/element/different-identifier")
        ));
        // A pattern demanding ancestry rejects a shallower identifier.
        assert!(!subsumes(&id("section/element/identifier"), &id("element/identifier")));
    }

    #[test]
    fn test_subsumes_variants() {
        assert!(subsumes(&id("button/close"), &id("button[selected]/close")));
        assert!(subsumes(&id("*/close"), &id("button[selected]/close")));
        assert!(subsumes(
            &id("button[selected]/close"),
            &id("button[selected]/close")
        ));
        assert!(!subsumes(&id("button[selected]/close"), &id("button/close")));
        assert!(!subsumes(
            &id("button[normal]/close"),
            &id("button[selected]/close")
        ));
    }

    #[test]
    fn test_structural_insert_orders_by_descending_specificity() {
        let mode = StructuralMatching::new();
        let merged = mode.insert(
            vec![
                style("atom"),
                style("element/atom"),
                style("organism/element/atom"),
                style("*/element/atom"),
            ],
            Vec::new(),
        );
        // The longer pattern's concrete component sits at a higher bit, so
        // `*/element/atom` outranks the shorter `element/atom`.
        assert_eq!(
            patterns(&merged),
            vec!["organism/element/atom", "*/element/atom", "element/atom", "atom"]
        );
    }

    #[test]
    fn test_structural_first_match_takes_most_specific() {
        let mode = StructuralMatching::new();
        let styles = mode.insert(
            vec![style("atom"), style("element/atom"), style("organism/atom")],
            Vec::new(),
        );
        let index = mode.first_match(&styles, &id("element/atom"), None);
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("element/atom".to_string())
        );
    }

    #[test]
    fn test_structural_first_match_prefers_active_theme() {
        let mode = StructuralMatching::new();
        let styles = mode.insert(vec![style("element/atom"), style("@dark/atom")], Vec::new());
        let dark = Theme::new("dark");

        let index = mode.first_match(&styles, &id("element/atom"), Some(&dark));
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("@dark/atom".to_string())
        );

        let index = mode.first_match(&styles, &id("element/atom"), None);
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("element/atom".to_string())
        );
    }

    #[test]
    fn test_scored_insert_appends() {
        let mode = ScoredMatching::new();
        let existing = vec![style("this"), style("this/is"), style("this/is/a")];
        let merged = mode.insert(vec![style("this/is/a/test")], existing);
        assert_eq!(merged.len(), 4);
        assert_eq!(
            merged.last().map(|s| s.identifier().to_string()),
            Some("this/is/a/test".to_string())
        );
    }

    #[test]
    fn test_scored_first_match_takes_highest_score() {
        let mode = ScoredMatching::new();
        let styles = vec![
            style("label"),
            style("home/label"),
            style("header/searchBar/label"),
            style("home/searchBar/label"),
        ];
        let index = mode.first_match(&styles, &id("home/header/searchBar/label"), None);
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("header/searchBar/label".to_string())
        );
    }

    #[test]
    fn test_scored_first_match_breaks_ties_by_registration_order() {
        let mode = ScoredMatching::new();
        // Both patterns score identically against the target.
        let styles = vec![style("home/label"), style("home/label")];
        let index = mode.first_match(&styles, &id("home/header/label"), None);
        assert_eq!(index, Some(0));
    }

    #[test]
    fn test_scored_first_match_prefers_active_theme_over_score() {
        let mode = ScoredMatching::new();
        let styles = vec![style("element/searchBar/header/atom"), style("@dark/atom")];
        let dark = Theme::new("dark");

        // The unthemed pattern is an exact path match, but the themed rule
        // still dominates while its theme is active.
        let index = mode.first_match(&styles, &id("element/searchBar/header/atom"), Some(&dark));
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("@dark/atom".to_string())
        );

        // Without the theme, the exact match wins.
        let index = mode.first_match(&styles, &id("element/searchBar/header/atom"), None);
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("element/searchBar/header/atom".to_string())
        );
    }

    #[test]
    fn test_scored_first_match_falls_back_when_theme_does_not_apply() {
        let mode = ScoredMatching::new();
        let styles = vec![
            style("element/searchBar/header/atom"),
            style("@dark/differentAtom"),
        ];
        let dark = Theme::new("dark");
        let index = mode.first_match(&styles, &id("element/searchBar/header/atom"), Some(&dark));
        assert_eq!(
            index.map(|i| styles[i].identifier().to_string()),
            Some("element/searchBar/header/atom".to_string())
        );
    }
}
