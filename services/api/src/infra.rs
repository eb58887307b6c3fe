use aquasentra::reports::{InMemoryReportRepository, ReportLifecycleService, Role};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ReportService = ReportLifecycleService<InMemoryReportRepository>;

/// Lifecycle service backed by a fresh process-local store.
pub(crate) fn build_report_service() -> (Arc<ReportService>, Arc<InMemoryReportRepository>) {
    let repository = Arc::new(InMemoryReportRepository::default());
    let service = Arc::new(ReportLifecycleService::new(repository.clone()));
    (service, repository)
}

pub(crate) fn parse_role(raw: &str) -> Result<Role, String> {
    raw.parse()
}
