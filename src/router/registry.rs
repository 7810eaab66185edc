//! Route registry: the ordered route list, the combined alternation pattern,
//! its index, and the lazily compiled matcher.
//!
//! The registry itself is not synchronized; [`Router`](super::Router) keeps it
//! behind a single `RwLock`. Compiling produces an immutable
//! [`CompiledMatcher`] snapshot that dispatch uses without holding the lock.

use super::flatten::strip_group_names;
use super::index::{build_index, PatternIndex};
use crate::error::RouterError;
use crate::method::MethodTable;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// One registered route: its own pattern text and its handler table.
#[derive(Debug)]
pub struct Route {
    pub pattern: Arc<str>,
    pub handlers: MethodTable,
}

/// Immutable compiled form of the combined pattern.
///
/// Carries everything dispatch needs so that a snapshot stays consistent
/// even if routes are registered while requests are in flight.
#[derive(Debug)]
pub struct CompiledMatcher {
    regex: Regex,
    names: Vec<Option<Arc<str>>>,
    index: PatternIndex,
    routes: Vec<Arc<Route>>,
    combined: Arc<str>,
}

impl CompiledMatcher {
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Declared name of capture group `group`, if it is a named group.
    #[must_use]
    pub fn group_name(&self, group: usize) -> Option<&Arc<str>> {
        self.names.get(group).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn index(&self) -> &PatternIndex {
        &self.index
    }

    #[must_use]
    pub fn route(&self, slot: usize) -> Option<&Arc<Route>> {
        self.routes.get(slot)
    }

    #[must_use]
    pub fn combined(&self) -> &Arc<str> {
        &self.combined
    }
}

#[derive(Debug, Default)]
enum MatcherState {
    #[default]
    Stale,
    Fresh(Arc<CompiledMatcher>),
}

/// Ordered routes plus the combined pattern built from them.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<Arc<Route>>,
    combined: String,
    index: PatternIndex,
    matcher: MatcherState,
}

impl RouteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route; returns its slot.
    ///
    /// Extends the combined pattern with `|(pattern)`, rebuilds the index from
    /// scratch and marks the compiled matcher stale. Handler validation has
    /// already happened by the time a [`MethodTable`] exists.
    pub fn register(&mut self, pattern: &str, handlers: MethodTable) -> usize {
        if !self.combined.is_empty() {
            self.combined.push('|');
        }
        self.combined.push('(');
        self.combined.push_str(pattern);
        self.combined.push(')');

        let slot = self.routes.len();
        self.routes.push(Arc::new(Route {
            pattern: Arc::from(pattern),
            handlers,
        }));
        self.index = build_index(&self.combined);
        self.matcher = MatcherState::Stale;

        debug!(
            route_slot = slot,
            top_level_groups = self.index.len(),
            capture_groups = self.index.group_count(),
            "Pattern index rebuilt"
        );
        slot
    }

    /// The current compiled matcher, if it is fresh.
    #[must_use]
    pub fn fresh(&self) -> Option<Arc<CompiledMatcher>> {
        match &self.matcher {
            MatcherState::Fresh(m) => Some(Arc::clone(m)),
            MatcherState::Stale => None,
        }
    }

    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self.matcher, MatcherState::Stale)
    }

    /// Compile the combined pattern if stale and return the fresh matcher.
    ///
    /// On failure the matcher stays stale, so the next call retries and fails
    /// the same way.
    pub fn compile(&mut self, size_limit: usize) -> Result<Arc<CompiledMatcher>, RouterError> {
        if let MatcherState::Fresh(m) = &self.matcher {
            return Ok(Arc::clone(m));
        }

        let start = Instant::now();
        // Names are kept on our side; the engine rejects a name used twice,
        // and two routes sharing `(?P<id>...)` is normal.
        let (stripped, names) = strip_group_names(&self.combined);
        let regex = RegexBuilder::new(&stripped)
            .size_limit(size_limit)
            .build()
            .map_err(|source| RouterError::MalformedPattern {
                pattern: self.combined.clone(),
                source,
            })?;

        if self.index.len() != self.routes.len() {
            return Err(RouterError::IndexMismatch {
                pattern: self.combined.clone(),
                reason: format!(
                    "{} routes registered but {} top-level groups found",
                    self.routes.len(),
                    self.index.len()
                ),
            });
        }
        if self.index.group_count() + 1 != regex.captures_len() {
            return Err(RouterError::IndexMismatch {
                pattern: self.combined.clone(),
                reason: format!(
                    "index counted {} capture groups, regex has {}",
                    self.index.group_count(),
                    regex.captures_len() - 1
                ),
            });
        }

        let matcher = Arc::new(CompiledMatcher {
            regex,
            names,
            index: self.index.clone(),
            routes: self.routes.clone(),
            combined: Arc::from(self.combined.as_str()),
        });

        info!(
            routes_count = self.routes.len(),
            capture_groups = self.index.group_count(),
            duration_us = start.elapsed().as_micros(),
            "Combined pattern compiled"
        );

        self.matcher = MatcherState::Fresh(Arc::clone(&matcher));
        Ok(matcher)
    }

    #[must_use]
    pub fn combined(&self) -> &str {
        &self.combined
    }

    #[must_use]
    pub fn index(&self) -> &PatternIndex {
        &self.index
    }

    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 10 * (1 << 20);

    #[test]
    fn test_register_builds_combined_pattern() {
        let mut reg = RouteRegistry::new();
        assert_eq!(reg.register("/a", MethodTable::new()), 0);
        assert_eq!(reg.combined(), "(/a)");
        assert_eq!(reg.register(r"/b/(\d+)", MethodTable::new()), 1);
        assert_eq!(reg.combined(), r"(/a)|(/b/(\d+))");
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.index().get(2).map(|e| e.route_slot), Some(1));
    }

    #[test]
    fn test_compile_is_lazy_and_cached() {
        let mut reg = RouteRegistry::new();
        reg.register("/a", MethodTable::new());
        assert!(reg.is_stale());
        assert!(reg.fresh().is_none());

        let first = reg.compile(LIMIT).unwrap();
        assert!(!reg.is_stale());
        let second = reg.compile(LIMIT).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        reg.register("/b", MethodTable::new());
        assert!(reg.is_stale());
        let third = reg.compile(LIMIT).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.combined().as_ref(), "(/a)|(/b)");
    }

    #[test]
    fn test_compile_reports_malformed_pattern() {
        let mut reg = RouteRegistry::new();
        reg.register("/a/(", MethodTable::new());
        match reg.compile(LIMIT) {
            Err(RouterError::MalformedPattern { pattern, .. }) => assert_eq!(pattern, "(/a/()"),
            other => panic!("expected MalformedPattern, got {:?}", other.map(|_| ())),
        }
        assert!(reg.is_stale());
    }

    #[test]
    fn test_compile_reports_unbalanced_routes() {
        let mut reg = RouteRegistry::new();
        reg.register("/a)(/b", MethodTable::new());
        match reg.compile(LIMIT) {
            Err(RouterError::IndexMismatch { .. }) => {}
            other => panic!("expected IndexMismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_compiled_matcher_exposes_group_names() {
        let mut reg = RouteRegistry::new();
        reg.register(r"/user/(?P<id>\d+)", MethodTable::new());
        let m = reg.compile(LIMIT).unwrap();
        assert!(m.group_name(1).is_none());
        assert_eq!(m.group_name(2).map(|n| n.as_ref()), Some("id"));
        assert!(m.group_name(99).is_none());
    }

    #[test]
    fn test_compile_rejects_invalid_group_name() {
        let mut reg = RouteRegistry::new();
        reg.register(r"^/u/(?P<>\d+)$", MethodTable::new());
        match reg.compile(LIMIT) {
            Err(RouterError::MalformedPattern { pattern, .. }) => {
                assert_eq!(pattern, r"(^/u/(?P<>\d+)$)");
            }
            other => panic!("expected MalformedPattern, got {:?}", other.map(|_| ())),
        }
        assert!(reg.is_stale());
    }

    #[test]
    fn test_same_group_name_in_two_routes() {
        let mut reg = RouteRegistry::new();
        reg.register(r"^/user/(?P<id>\d+)$", MethodTable::new());
        reg.register(r"^/team/(?P<id>\w+)$", MethodTable::new());
        let m = reg.compile(LIMIT).unwrap();
        assert_eq!(m.group_name(2).map(|n| n.as_ref()), Some("id"));
        assert_eq!(m.group_name(4).map(|n| n.as_ref()), Some("id"));
        let caps = m.regex().captures("/team/core").unwrap();
        assert_eq!(caps.get(4).map(|c| c.as_str()), Some("core"));
    }
}
