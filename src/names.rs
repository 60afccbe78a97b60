//! # Name Variants
//!
//! Generates the ordered fallback names a resource-lookup collaborator
//! should probe for an identifier. The most specific name comes first,
//! with every component fully spelled out, followed by progressively more
//! general forms: variants dropped, then whole components dropped, until
//! only the token remains. Duplicates are skipped, and when a theme is
//! supplied each name is followed by its theme-prefixed form.
//!
//! ```rust
//! use stylist::names::{potential_names, DEFAULT_SEPARATOR};
//!
//! let names: Vec<String> = potential_names(
//!     &"searchbar/primary/image".into(),
//!     None,
//!     DEFAULT_SEPARATOR,
//! )
//! .collect();
//! assert_eq!(
//!     names,
//!     ["searchbar_primary_image", "primary_image", "searchbar_image", "image"]
//! );
//! ```
//!
//! The sequence is lazy: a caller that finds a resource for an early name
//! never pays for the later combinations.

use std::collections::HashSet;

use crate::identifier::{Component, StylistIdentifier};
use crate::theme::Theme;

/// The separator conventionally used in resource names.
pub const DEFAULT_SEPARATOR: &str = "_";

/// All the potential resource names for an identifier, most specific
/// first. A pure function of the identifier's components; `theme` is the
/// *active* theme, interleaving a themed form after each plain name.
pub fn potential_names(
    identifier: &StylistIdentifier,
    theme: Option<&Theme>,
    separator: &str,
) -> PotentialNames {
    // Masks below index components root-first.
    let components: Vec<Component> = identifier.path().components().iter().rev().cloned().collect();
    let end = 1u64
        .checked_shl(2 * components.len() as u32)
        .unwrap_or(u64::MAX);

    PotentialNames {
        components,
        token: identifier.token().to_string(),
        theme: theme.map(|theme| theme.name().to_string()),
        separator: separator.to_string(),
        mask: 0,
        end,
        seen: HashSet::new(),
        queued: None,
    }
}

/// Lazy iterator over an identifier's candidate resource names; see
/// [potential_names].
#[derive(Debug)]
pub struct PotentialNames {
    components: Vec<Component>,
    token: String,
    theme: Option<String>,
    separator: String,
    mask: u64,
    end: u64,
    seen: HashSet<Vec<String>>,
    queued: Option<String>,
}

impl Iterator for PotentialNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(queued) = self.queued.take() {
            return Some(queued);
        }

        while self.mask < self.end {
            let mask = self.mask;
            self.mask += 1;

            // Two mask bits per component: drop it entirely, or keep the
            // value and drop the variant. Dropping the value but keeping
            // the variant is not a form that exists, hence the dedup set.
            let mut parts: Vec<String> = Vec::with_capacity(self.components.len() + 1);
            for (index, component) in self.components.iter().enumerate() {
                if mask & (1 << (2 * index + 1)) != 0 {
                    continue;
                }
                if mask & (1 << (2 * index)) != 0 {
                    parts.push(component.value().unwrap_or("*").to_string());
                } else {
                    parts.push(component.to_string());
                }
            }
            parts.push(self.token.clone());

            if !self.seen.insert(parts.clone()) {
                continue;
            }

            let name = parts.join(&self.separator);
            if let Some(theme) = &self.theme {
                self.queued = Some(format!("{}{}{}", theme, self.separator, name));
            }
            return Some(name);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(identifier: &str, theme: Option<&str>, separator: &str) -> Vec<String> {
        let theme = theme.map(Theme::new);
        potential_names(&identifier.into(), theme.as_ref(), separator).collect()
    }

    #[test]
    fn test_single_component_identifier() {
        assert_eq!(names("hello", None, "_"), ["hello"]);
    }

    #[test]
    fn test_double_component_identifier() {
        assert_eq!(names("hello/world", None, "_"), ["hello_world", "world"]);
    }

    #[test]
    fn test_triple_component_identifier() {
        assert_eq!(
            names("searchbar/primary/image", None, "_"),
            ["searchbar_primary_image", "primary_image", "searchbar_image", "image"]
        );
    }

    #[test]
    fn test_custom_separator() {
        assert_eq!(
            names("searchbar/primary/image", None, "-"),
            ["searchbar-primary-image", "primary-image", "searchbar-image", "image"]
        );
    }

    #[test]
    fn test_variants_generalize_before_dropping() {
        assert_eq!(
            names("element[disabled]/atom", None, "_"),
            ["element[disabled]_atom", "element_atom", "atom"]
        );
    }

    #[test]
    fn test_theme_interleaves_after_each_name() {
        assert_eq!(
            names("hello/world", Some("dark"), "_"),
            ["hello_world", "dark_hello_world", "world", "dark_world"]
        );
    }

    #[test]
    fn test_sequence_is_lazy() {
        let identifier = StylistIdentifier::from("a/b/c/d/e/f/g/h/i/j");
        let first = potential_names(&identifier, None, DEFAULT_SEPARATOR).next();
        assert_eq!(first, Some("a_b_c_d_e_f_g_h_i_j".to_string()));
    }
}
