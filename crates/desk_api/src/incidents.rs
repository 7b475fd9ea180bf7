use std::sync::Arc;

use desk_core::cache::{CacheStats, Clock};
use desk_core::config::DeskConfig;
use desk_core::demo::fallback_incidents;
use desk_core::domain::Incident;
use desk_core::error::AppError;
use desk_core::normalize::records::normalize_incidents;

use crate::fetch::CachedFetch;
use crate::http::{require_success, HttpRequest, Transport};

/// Incident list endpoint behind a singleton cache.
pub struct IncidentsApi {
    config: Arc<DeskConfig>,
    transport: Arc<dyn Transport>,
    cache: CachedFetch<(), Vec<Incident>>,
}

impl IncidentsApi {
    pub fn new(config: Arc<DeskConfig>, transport: Arc<dyn Transport>, clock: Arc<dyn Clock>) -> Self {
        let ttl = config.incidents_cache_ttl;
        IncidentsApi {
            config,
            transport,
            cache: CachedFetch::new("incidents", ttl, clock),
        }
    }

    /// Current incidents. Never fails: backend trouble yields the fallback list.
    pub fn fetch(&self, force: bool) -> Vec<Incident> {
        self.cache
            .get(&(), force, || self.load(), |_| fallback_incidents())
    }

    /// One uncached round trip.
    pub fn load(&self) -> Result<Vec<Incident>, AppError> {
        let url = self.config.incidents_url();
        let mut request = HttpRequest::get(&url).bearer(self.config.bearer());
        for (key, value) in self.config.pagination() {
            request = request.query(&key, &value);
        }

        let resp = require_success(self.transport.send(&request)?, &url)?;
        let incidents = normalize_incidents(resp.json()?)?;
        tracing::info!(count = incidents.len(), url = %url, "fetched incidents");
        Ok(incidents)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
