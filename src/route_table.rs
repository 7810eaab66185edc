//! Route tables loaded from TOML.
//!
//! ```toml
//! [router]
//! slow_match_threshold_us = 500
//!
//! [[route]]
//! pattern = '^/blog/(\d+)/post/(\d+)$'
//! methods = ["GET"]
//!
//! [[route]]
//! pattern = '^/user/(?P<id>\d+)$'
//! methods = ["GET", "DELETE"]
//! ```
//!
//! Routes are registered in file order, which is also their priority.

use crate::dispatcher::Handler;
use crate::error::RouterError;
use crate::method::HandlersMap;
use crate::router::Router;
use crate::runtime_config::RouterConfig;
use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// One `[[route]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub pattern: String,
    #[serde(default)]
    pub methods: Vec<String>,
}

/// A whole route table file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
    #[serde(default)]
    pub router: RouterConfig,
    #[serde(default, rename = "route")]
    pub routes: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse route table")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table: {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load route table: {}", path.display()))
    }

    /// Build a router serving every entry with `handler` for each listed method.
    ///
    /// `ALTR_*` environment variables override the `[router]` section.
    /// Fails on the first entry with an unrecognized method.
    pub fn build_router(&self, handler: &Arc<dyn Handler>) -> Result<Router, RouterError> {
        self.build_router_with_overrides(handler, |key| std::env::var(key).ok())
    }

    /// Like [`build_router`](Self::build_router), reading overrides from `lookup`.
    pub fn build_router_with_overrides<F>(
        &self,
        handler: &Arc<dyn Handler>,
        lookup: F,
    ) -> Result<Router, RouterError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let router = Router::with_config(self.router.with_overrides(lookup));
        for entry in &self.routes {
            let handlers: HandlersMap = entry
                .methods
                .iter()
                .map(|m| (m.clone(), Arc::clone(handler)))
                .collect();
            router.register(&entry.pattern, handlers)?;
        }
        Ok(router)
    }
}
