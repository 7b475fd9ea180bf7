use std::sync::Arc;

use desk_core::cache::{CacheStats, Clock};
use desk_core::config::DeskConfig;
use desk_core::demo::fallback_user_search;
use desk_core::domain::User;
use desk_core::error::AppError;
use desk_core::normalize::records::normalize_user_search;

use crate::fetch::CachedFetch;
use crate::http::{require_success, HttpRequest, Transport};

/// User directory search, cached per lowercased query.
pub struct UserDirectoryApi {
    config: Arc<DeskConfig>,
    transport: Arc<dyn Transport>,
    cache: CachedFetch<String, Vec<User>>,
}

impl UserDirectoryApi {
    pub fn new(config: Arc<DeskConfig>, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        let ttl = config.user_search_cache_ttl;
        UserDirectoryApi {
            config,
            transport,
            cache: CachedFetch::new("user_search", ttl, clock),
        }
    }

    /// Blank queries return nothing without a request.
    pub fn search(&self, query: &str) -> Vec<User> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        self.cache.get(
            &query.to_lowercase(),
            false,
            || self.load(query),
            |_| fallback_user_search(query),
        )
    }

    pub fn load(&self, query: &str) -> Result<Vec<User>, AppError> {
        let url = self.config.search_users_url();
        let request = HttpRequest::get(&url)
            .query("q", query)
            .bearer(self.config.bearer());

        let resp = require_success(self.transport.send(&request)?, &url)?;
        let users = normalize_user_search(&resp.json()?);
        tracing::debug!(query, count = users.len(), "searched users");
        Ok(users)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
