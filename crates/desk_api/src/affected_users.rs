use std::sync::Arc;

use desk_core::cache::{CacheStats, Clock};
use desk_core::config::DeskConfig;
use desk_core::demo::fallback_affected_users;
use desk_core::domain::AffectedUser;
use desk_core::error::AppError;
use desk_core::normalize::records::normalize_affected_users;

use crate::fetch::CachedFetch;
use crate::http::{require_success, HttpRequest, Transport};

/// Affected users per incident, cached by incident number.
pub struct AffectedUsersApi {
    config: Arc<DeskConfig>,
    transport: Arc<dyn Transport>,
    cache: CachedFetch<String, Vec<AffectedUser>>,
}

impl AffectedUsersApi {
    pub fn new(config: Arc<DeskConfig>, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        let ttl = config.affected_users_cache_ttl;
        AffectedUsersApi {
            config,
            transport,
            cache: CachedFetch::new("affected_users", ttl, clock),
        }
    }

    pub fn fetch(&self, incident_number: &str, force: bool) -> Vec<AffectedUser> {
        self.cache.get(
            &incident_number.to_string(),
            force,
            || self.load(incident_number),
            |_| fallback_affected_users(incident_number),
        )
    }

    pub fn load(&self, incident_number: &str) -> Result<Vec<AffectedUser>, AppError> {
        let url = self.config.affected_users_url(incident_number);
        let request = HttpRequest::get(&url).bearer(self.config.bearer());

        let resp = require_success(self.transport.send(&request)?, &url)?;
        let users = normalize_affected_users(resp.json()?)?;
        tracing::debug!(incident_number, count = users.len(), "fetched affected users");
        Ok(users)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
