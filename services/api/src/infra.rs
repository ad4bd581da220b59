use bawabti::board::applications::ApplicationService;
use bawabti::board::companies::CompanyService;
use bawabti::board::jobs::JobService;
use bawabti::config::AppConfig;
use bawabti::db::Database;
use bawabti::error::AppError;
use bawabti::uploads::UploadPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) database: Database,
}

impl AppState {
    /// Ready once the listener is bound and the database answers.
    pub(crate) fn is_ready(&self) -> bool {
        if !self.readiness.load(Ordering::Acquire) {
            return false;
        }
        match self.database.ping() {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "database not answering readiness ping");
                false
            }
        }
    }
}

/// The three board services, all backed by the same database handle.
pub(crate) struct BoardServices {
    pub(crate) companies: Arc<CompanyService<Database>>,
    pub(crate) jobs: Arc<JobService<Database, Database>>,
    pub(crate) applications: Arc<ApplicationService<Database, Database>>,
}

impl BoardServices {
    pub(crate) fn new(database: &Database, uploads: UploadPipeline) -> Self {
        let repository = Arc::new(database.clone());
        let uploads = Arc::new(uploads);

        Self {
            companies: Arc::new(CompanyService::new(repository.clone(), uploads.clone())),
            jobs: Arc::new(JobService::new(repository.clone(), repository.clone())),
            applications: Arc::new(ApplicationService::new(
                repository.clone(),
                repository,
                uploads,
            )),
        }
    }
}

/// Open the database (applying migrations) and create the upload folders.
pub(crate) fn prepare_storage(config: &AppConfig) -> Result<(Database, UploadPipeline), AppError> {
    let database = Database::open(&config.database.path)?;
    let uploads = config.storage.pipeline();
    uploads.store().ensure_folders()?;
    Ok((database, uploads))
}
