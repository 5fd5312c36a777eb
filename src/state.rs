//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::LinkService;
use crate::domain::repositories::ShortLinkRepository;

/// Service backed by whichever storage the server was started with.
pub type DynLinkService = LinkService<dyn ShortLinkRepository>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<DynLinkService>,
    /// Storage handle used directly by the health check.
    pub repository: Arc<dyn ShortLinkRepository>,
}

impl AppState {
    /// Wires a [`LinkService`] over `repository`, composing short URLs from `base_url`.
    pub fn new(repository: Arc<dyn ShortLinkRepository>, base_url: impl Into<String>) -> Self {
        let link_service = Arc::new(LinkService::new(repository.clone(), base_url));

        Self {
            link_service,
            repository,
        }
    }
}
