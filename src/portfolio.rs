use std::sync::Arc;

use crate::models::*;
use crate::store::PortfolioStore;

/// Default cap for the featured-projects rail.
pub const DEFAULT_FEATURED_LIMIT: i64 = 6;

/// The only layer the HTTP handlers talk to. A degraded store must never
/// take the page down with it: every operation logs the underlying failure
/// and falls back to an empty/absent result instead of propagating it.
/// Nothing here retries; a failed query is terminal for that request's data.
#[derive(Clone)]
pub struct Portfolio {
    store: Arc<dyn PortfolioStore>,
}

impl Portfolio {
    pub fn new(store: Arc<dyn PortfolioStore>) -> Self {
        Self { store }
    }

    pub async fn list_projects(&self, filter: &ProjectFilter) -> Vec<Project> {
        match self.store.list_projects(filter).await {
            Ok(projects) => projects,
            Err(e) => {
                log::error!("failed to list portfolio projects: {e}");
                Vec::new()
            }
        }
    }

    pub async fn project_by_slug(&self, slug: &str) -> Option<Project> {
        match self.store.project_by_slug(slug).await {
            Ok(project) => project,
            Err(e) => {
                log::error!("failed to fetch project '{slug}': {e}");
                None
            }
        }
    }

    pub async fn featured_projects(&self, limit: i64) -> Vec<Project> {
        self.list_projects(&ProjectFilter {
            category: None,
            featured: true,
            limit: Some(limit),
        })
        .await
    }

    /// The `"All"` sentinel always leads, whatever the store says.
    pub async fn categories(&self) -> Vec<String> {
        match self.store.categories().await {
            Ok(mut categories) => {
                categories.insert(0, ALL_CATEGORIES.to_owned());
                categories
            }
            Err(e) => {
                log::error!("failed to fetch portfolio categories: {e}");
                vec![ALL_CATEGORIES.to_owned()]
            }
        }
    }

    pub async fn stats(&self) -> PortfolioStats {
        match self.store.stats().await {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("failed to compute portfolio stats: {e}");
                PortfolioStats::default()
            }
        }
    }

    pub async fn is_reachable(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("portfolio store unreachable: {e}");
                false
            }
        }
    }
}
