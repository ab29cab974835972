use std::sync::Arc;

use common::retry::RetryPolicy;
use common::storage::ObjectStore;
use common::upload::{Reclaimer, UploadOrchestrator};
use sea_orm::DatabaseConnection;

use crate::assets::RecordLinker;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn ObjectStore>,
    pub reclaimer: Reclaimer,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig, store: Arc<dyn ObjectStore>) -> Self {
        let references = Arc::new(RecordLinker::new(db.clone()));
        Self {
            reclaimer: Reclaimer::new(store.clone()).with_references(references),
            db,
            config: Arc::new(config),
            store,
        }
    }

    /// Upload workflow bound to this state's store, database and retry settings.
    pub fn orchestrator(&self) -> UploadOrchestrator<RecordLinker> {
        UploadOrchestrator::new(
            self.store.clone(),
            RecordLinker::new(self.db.clone()),
            RetryPolicy::from_config(&self.config.upload),
        )
        .with_compensation(self.config.upload.compensate_on_link_failure)
        .with_reclaimer(self.reclaimer.clone())
    }
}
