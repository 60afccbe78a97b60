#![warn(missing_docs)]

//! # Stylist
//!
//! A hierarchical style-resolution engine. Given an identifier naming an
//! element's position in a logical UI tree, and a set of style rules keyed
//! by (possibly wildcarded, variant-qualified, themed) pattern identifiers,
//! `stylist` decides which single rule best applies: CSS-like specificity
//! and cascade semantics over slash-separated paths.
//!
//! ## Overview
//!
//! The crate is built from a handful of small pieces:
//!
//! - **[StylistIdentifier](identifier::StylistIdentifier)**: the identifier
//!   model (token, ancestry path, optional theme) with total parsing and
//!   round-tripping display
//! - **[Specificity](specificity::Specificity)**: how precise a pattern is,
//!   memoized process-wide
//! - **[StylistIdentifierMatcher](matcher::StylistIdentifierMatcher)**:
//!   weighted pattern-to-identifier scoring
//! - **[MatchingMode](matching_mode::MatchingMode)**: pluggable lookup
//!   policies (structural subsumption vs. weighted scores)
//! - **[Stylist](registry::Stylist)**: the rule registry, themed, cached and
//!   resolvable on every render
//! - **[potential_names](names::potential_names)**: fallback name sequences
//!   for resource lookup by naming convention
//! - **[StylistConfig](config::StylistConfig)**: stylesheet files,
//!   environment configuration and hot reload
//!
//! Rules carry an opaque payload: the engine decides *which* rule wins,
//! the caller decides what applying it means. Nothing here renders, blocks
//! or suspends; resolution is a pure in-memory computation.
//!
//! ## Quick start
//!
//! ```rust
//! use stylist::registry::{Style, Stylist};
//! use stylist::theme::Theme;
//!
//! let mut stylist: Stylist<&str> = Stylist::new();
//! stylist.add_styles(vec![
//!     Style::new("searchBar/label", "blue"),
//!     Style::new("@dark/searchBar/label", "grey"),
//!     Style::new("label", "black"),
//! ]);
//!
//! let label = "home/header/searchBar/label".into();
//! assert_eq!(stylist.resolve_payload(&label), Some(&"blue"));
//!
//! stylist.set_theme(Some(Theme::new("dark")));
//! assert_eq!(stylist.resolve_payload(&label), Some(&"grey"));
//! ```
//!
//! ## Matching in a nutshell
//!
//! For a rule to apply at all, its pattern's token must equal the
//! identifier's, and its theme (if it names one) must be the active one.
//! Among applicable rules, matching more components wins; so does matching
//! the same component closer to the leaf, or a variant on top of a value.
//! An exact pattern beats every partial one, and a rule of the active
//! theme beats every unthemed rule. See [matcher] for the precise scoring
//! law.
//!
//! ## Concurrency
//!
//! A [Stylist](registry::Stylist) assumes a single mutating owner, the way
//! a UI main loop owns its style state; concurrent resolution through
//! `&self` is safe. The specificity cache is shared process-wide and safe
//! from any thread.

/// Contains the stylesheet configuration layer and hot reload.
pub mod config;
/// Contains the [error::StylistError] type.
pub mod error;
/// Contains the identifier model: components, paths and identifiers.
pub mod identifier;
/// Contains the weighted identifier matcher.
pub mod matcher;
/// Contains the pluggable matching-mode strategies.
pub mod matching_mode;
/// Contains the fallback resource-name generator.
pub mod names;
/// Contains the [registry::Stylist] rule registry.
pub mod registry;
/// Contains specificity scoring and its memoization cache.
pub mod specificity;
/// Contains the [theme::Theme] type.
pub mod theme;
