use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use super::domain::{HazardReport, NewReport, ReportId, ReportStatus};
use super::repository::{ReportRepository, RepositoryError};

#[derive(Debug, Clone)]
struct StoredReport {
    sequence: u64,
    report: HazardReport,
}

#[derive(Debug, Default)]
struct Records {
    next_sequence: u64,
    by_id: HashMap<ReportId, StoredReport>,
}

/// Process-local report store guarded by a single mutex.
#[derive(Debug, Default, Clone)]
pub struct InMemoryReportRepository {
    records: Arc<Mutex<Records>>,
}

impl InMemoryReportRepository {
    pub fn len(&self) -> usize {
        self.lock().map(|records| records.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<MutexGuard<'_, Records>, RepositoryError> {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("report store lock poisoned".to_string()))
    }
}

impl ReportRepository for InMemoryReportRepository {
    fn insert(&self, report: NewReport) -> Result<HazardReport, RepositoryError> {
        let mut guard = self.lock()?;
        let now = Utc::now();
        let record = HazardReport {
            id: ReportId(Uuid::new_v4().to_string()),
            details: report.details,
            status: report.status,
            created_by: report.created_by,
            created_at: now,
            updated_at: now,
        };

        let sequence = guard.next_sequence;
        guard.next_sequence += 1;
        guard.by_id.insert(
            record.id.clone(),
            StoredReport {
                sequence,
                report: record.clone(),
            },
        );
        Ok(record)
    }

    fn find_by_id(&self, id: &ReportId) -> Result<Option<HazardReport>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.by_id.get(id).map(|stored| stored.report.clone()))
    }

    fn find_by_status(&self, status: ReportStatus) -> Result<Vec<HazardReport>, RepositoryError> {
        let guard = self.lock()?;
        let mut matching: Vec<&StoredReport> = guard
            .by_id
            .values()
            .filter(|stored| stored.report.status == status)
            .collect();
        matching.sort_by(|a, b| {
            b.report
                .created_at
                .cmp(&a.report.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(matching
            .into_iter()
            .map(|stored| stored.report.clone())
            .collect())
    }

    fn update_status(
        &self,
        id: &ReportId,
        expected: ReportStatus,
        next: ReportStatus,
    ) -> Result<HazardReport, RepositoryError> {
        let mut guard = self.lock()?;
        let stored = guard.by_id.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if stored.report.status != expected {
            return Err(RepositoryError::StatusMismatch {
                current: stored.report.status,
            });
        }

        stored.report.status = next;
        stored.report.updated_at = Utc::now();
        Ok(stored.report.clone())
    }
}
