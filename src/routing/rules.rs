//! Ordered route rule lookup.
//!
//! # Responsibilities
//! - Hold the active route rules in resolution order
//! - Return the first rule whose pattern matches a path
//!
//! # Design Decisions
//! - Immutable after construction (shared across requests without locks)
//! - Inactive rules are dropped at construction
//! - Patterns are compiled once, at construction
//! - Stable sort: equal priorities keep insertion order
//! - O(n) scan (route rule counts are small)

use crate::background::RouteBackgroundRule;
use crate::routing::matcher::PathPattern;

/// Active route rules ordered by priority descending.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteRuleSet {
    rules: Vec<RouteBackgroundRule>,
    /// `patterns[i]` is `rules[i].path_pattern`, compiled.
    patterns: Vec<PathPattern>,
}

impl RouteRuleSet {
    /// Filter out inactive rules and order the rest by priority.
    pub fn new(rules: impl IntoIterator<Item = RouteBackgroundRule>) -> Self {
        let mut rules: Vec<_> = rules.into_iter().filter(|r| r.active).collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        let patterns = rules.iter().map(|r| PathPattern::parse(&r.path_pattern)).collect();
        Self { rules, patterns }
    }

    /// First rule matching `path`, if any.
    pub fn find(&self, path: &str) -> Option<&RouteBackgroundRule> {
        self.patterns
            .iter()
            .position(|pattern| pattern.matches(path))
            .map(|index| &self.rules[index])
    }

    pub fn as_slice(&self) -> &[RouteBackgroundRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<RouteBackgroundRule> for RouteRuleSet {
    fn from_iter<I: IntoIterator<Item = RouteBackgroundRule>>(iter: I) -> Self {
        Self::new(iter)
    }
}
