use ifrit_content::CategoryRouter;
use ifrit_monetization::RevenueTracker;
use parking_lot::RwLock;
use std::sync::Arc;

pub const DEFAULT_TOP_CONTENT_LIMIT: usize = 10;

/// Shared handler state. Clones share the same tracker.
#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<RwLock<RevenueTracker>>,
    pub router: Arc<CategoryRouter>,
    /// Limit for top-content queries that omit `limit`.
    pub top_content_limit: usize,
}

impl AppState {
    #[must_use]
    pub fn new(tracker: Arc<RwLock<RevenueTracker>>) -> Self {
        Self {
            tracker,
            router: Arc::new(CategoryRouter::default()),
            top_content_limit: DEFAULT_TOP_CONTENT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_top_content_limit(mut self, limit: usize) -> Self {
        self.top_content_limit = limit;
        self
    }

    #[must_use]
    pub fn with_category_router(mut self, router: CategoryRouter) -> Self {
        self.router = Arc::new(router);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(RwLock::new(RevenueTracker::new())))
    }
}
