use std::sync::Arc;

use touchgrass_core::staging::StagingPolicy;
use touchgrass_workflow::{EntityRepository, EntityStore, SubmissionOrchestrator};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam (Postgres in production, in-memory in tests).
    pub store: Arc<dyn EntityStore>,
    /// Cached entity access shared with the orchestrator.
    pub entities: Arc<EntityRepository>,
    pub orchestrator: SubmissionOrchestrator,
    pub config: Arc<ServerConfig>,
    /// Limits applied to uploaded media before it is staged.
    pub staging_policy: Arc<StagingPolicy>,
}

impl AppState {
    /// Wire the repository and orchestrator around `store` and `media`.
    pub fn new(
        store: Arc<dyn EntityStore>,
        media: touchgrass_storage::MediaRepository,
        config: ServerConfig,
        staging_policy: StagingPolicy,
    ) -> Self {
        let entities = Arc::new(EntityRepository::new(store.clone()));
        let orchestrator = SubmissionOrchestrator::new(entities.clone(), media);
        Self {
            store,
            entities,
            orchestrator,
            config: Arc::new(config),
            staging_policy: Arc::new(staging_policy),
        }
    }
}
