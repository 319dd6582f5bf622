//! Resume workflow controller — owns the generated resume list, the selected
//! index and the activity flags, and sequences generation and PDF export.
//!
//! Flow:
//!   generate(count) → clamp → N sequential `ResumeSource::fetch_one` calls,
//!                     each result appended (and observable) as soon as it lands.
//!   download_all()  → for each index: select → `present` (await RenderAck) → export.
//!
//! Every external call is awaited before the next one starts. Generation and
//! export are mutually exclusive; the flag guarding each is reset by
//! `ActivityGuard` on every exit path.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info};
use uuid::Uuid;

use crate::export::{export_filename, ExportError, ExportedFile, PdfExporter};
use crate::models::resume::ResumeRecord;
use crate::presentation::ResumePresentation;
use crate::source::{ResumeSource, SourceError};
use crate::workflow::navigation::{step, Direction};
use crate::workflow::notifications::{Notification, NotificationKind, Notifier};

pub const MIN_RESUME_COUNT: u32 = 1;
pub const MAX_RESUME_COUNT: u32 = 15;

/// Clamps any caller-supplied count into `[MIN_RESUME_COUNT, MAX_RESUME_COUNT]`.
pub fn clamp_count(requested: i64) -> u32 {
    requested.clamp(MIN_RESUME_COUNT as i64, MAX_RESUME_COUNT as i64) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// State
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Generating,
    Exporting,
}

impl std::fmt::Display for Activity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Activity::Generating => f.write_str("generation in progress"),
            Activity::Exporting => f.write_str("export in progress"),
        }
    }
}

#[derive(Debug)]
pub struct WorkflowState {
    records: Vec<ResumeRecord>,
    current_index: usize,
    requested_count: u32,
    is_generating: bool,
    is_exporting: bool,
}

impl WorkflowState {
    fn new(requested_count: u32) -> Self {
        Self {
            records: Vec::new(),
            current_index: 0,
            requested_count,
            is_generating: false,
            is_exporting: false,
        }
    }

    fn active(&self) -> Option<Activity> {
        if self.is_generating {
            Some(Activity::Generating)
        } else if self.is_exporting {
            Some(Activity::Exporting)
        } else {
            None
        }
    }

    fn reserve(&mut self, activity: Activity) -> Result<(), WorkflowError> {
        if let Some(active) = self.active() {
            return Err(WorkflowError::Busy(active));
        }
        match activity {
            Activity::Generating => {
                self.is_generating = true;
                self.records.clear();
                self.current_index = 0;
            }
            Activity::Exporting => self.is_exporting = true,
        }
        Ok(())
    }
}

/// Read-only copy of the workflow state for callers.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSnapshot {
    pub records: Vec<ResumeRecord>,
    pub current_index: usize,
    pub total: usize,
    pub requested_count: u32,
    pub is_generating: bool,
    pub is_exporting: bool,
}

/// Clears its activity flag when dropped, whatever way the run ended.
struct ActivityGuard {
    state: Arc<Mutex<WorkflowState>>,
    activity: Activity,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        match self.activity {
            Activity::Generating => state.is_generating = false,
            Activity::Exporting => state.is_exporting = false,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Errors + reports
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("workflow is busy: {0}")]
    Busy(Activity),

    #[error("failed to fetch resume {attempt} of {requested}: {source}")]
    Fetch {
        attempt: u32,
        requested: u32,
        #[source]
        source: SourceError,
    },

    #[error("failed to export resume #{index} as '{filename}': {source}")]
    Export {
        index: usize,
        filename: String,
        #[source]
        source: ExportError,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub run_id: Uuid,
    pub requested: u32,
    pub generated: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkExportReport {
    pub exported: Vec<ExportedFile>,
}

// ────────────────────────────────────────────────────────────────────────────
// Controller
// ────────────────────────────────────────────────────────────────────────────

/// One workflow instance. Clones share state and collaborators.
#[derive(Clone)]
pub struct WorkflowController {
    state: Arc<Mutex<WorkflowState>>,
    source: Arc<dyn ResumeSource>,
    presentation: Arc<dyn ResumePresentation>,
    exporter: Arc<dyn PdfExporter>,
    notifier: Arc<dyn Notifier>,
}

impl WorkflowController {
    pub fn new(
        source: Arc<dyn ResumeSource>,
        presentation: Arc<dyn ResumePresentation>,
        exporter: Arc<dyn PdfExporter>,
        notifier: Arc<dyn Notifier>,
        requested_count: u32,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(WorkflowState::new(clamp_count(
                requested_count as i64,
            )))),
            source,
            presentation,
            exporter,
            notifier,
        }
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        let state = self.state.lock();
        WorkflowSnapshot {
            records: state.records.clone(),
            current_index: state.current_index,
            total: state.records.len(),
            requested_count: state.requested_count,
            is_generating: state.is_generating,
            is_exporting: state.is_exporting,
        }
    }

    /// The selected record and its index, if any records exist.
    pub fn current_record(&self) -> Option<(usize, ResumeRecord)> {
        let state = self.state.lock();
        state
            .records
            .get(state.current_index)
            .map(|r| (state.current_index, r.clone()))
    }

    pub fn requested_count(&self) -> u32 {
        self.state.lock().requested_count
    }

    /// Stores the count used by `generate_requested`. Returns the clamped value.
    pub fn set_requested_count(&self, count: i64) -> u32 {
        let count = clamp_count(count);
        self.state.lock().requested_count = count;
        count
    }

    /// Moves the selection one step. Boundaries are a no-op, not an error.
    pub fn navigate(&self, direction: Direction) -> Result<usize, WorkflowError> {
        let mut state = self.state.lock();
        if state.is_exporting {
            return Err(WorkflowError::Busy(Activity::Exporting));
        }
        state.current_index = step(state.current_index, state.records.len(), direction);
        Ok(state.current_index)
    }

    fn begin(&self, activity: Activity) -> Result<ActivityGuard, WorkflowError> {
        self.state.lock().reserve(activity)?;
        Ok(ActivityGuard {
            state: Arc::clone(&self.state),
            activity,
        })
    }

    // ── generation ──────────────────────────────────────────────────────────

    /// Replaces the record list with `clamp(count)` freshly fetched records.
    ///
    /// The old list is discarded before the first fetch. On a failed fetch the
    /// run stops, records fetched so far are kept, and one failure notification
    /// is emitted.
    pub async fn generate(&self, count: i64) -> Result<GenerationReport, WorkflowError> {
        let count = clamp_count(count);
        let guard = self.begin(Activity::Generating)?;
        self.run_generation(guard, count).await
    }

    /// `generate` with the stored requested count.
    pub async fn generate_requested(&self) -> Result<GenerationReport, WorkflowError> {
        let count = self.requested_count();
        self.generate(count as i64).await
    }

    /// Reserves the generation slot now and runs the fetch loop on a tokio task.
    /// Returns the effective count alongside the task handle.
    pub fn spawn_generate(
        &self,
        count: i64,
    ) -> Result<(u32, JoinHandle<Result<GenerationReport, WorkflowError>>), WorkflowError> {
        let count = clamp_count(count);
        let guard = self.begin(Activity::Generating)?;
        let this = self.clone();
        let handle = tokio::spawn(async move { this.run_generation(guard, count).await });
        Ok((count, handle))
    }

    async fn run_generation(
        &self,
        _guard: ActivityGuard,
        count: u32,
    ) -> Result<GenerationReport, WorkflowError> {
        let run_id = Uuid::new_v4();
        info!(
            "Generation run {} started: {} resume(s) from {}",
            run_id,
            count,
            self.source.backend_name()
        );

        for attempt in 1..=count {
            match self.source.fetch_one().await {
                Ok(record) => self.state.lock().records.push(record),
                Err(source) => {
                    error!(
                        "Generation run {} failed on resume {} of {}: {}",
                        run_id, attempt, count, source
                    );
                    self.notifier
                        .notify(Notification::new(NotificationKind::GenerationFailed));
                    return Err(WorkflowError::Fetch {
                        attempt,
                        requested: count,
                        source,
                    });
                }
            }
        }

        let generated = self.state.lock().records.len();
        info!("Generation run {} finished: {} resume(s)", run_id, generated);

        Ok(GenerationReport {
            run_id,
            requested: count,
            generated,
        })
    }

    // ── export ──────────────────────────────────────────────────────────────

    /// Reserves the export slot and returns the records to export, or `None`
    /// (flags untouched) when there is nothing to export.
    fn begin_export(
        &self,
        all: bool,
    ) -> Result<Option<(ActivityGuard, Vec<(usize, ResumeRecord)>)>, WorkflowError> {
        let targets = {
            let mut state = self.state.lock();
            if state.records.is_empty() {
                return Ok(None);
            }
            state.reserve(Activity::Exporting)?;
            if all {
                state.records.iter().cloned().enumerate().collect::<Vec<_>>()
            } else {
                let index = state.current_index.min(state.records.len() - 1);
                vec![(index, state.records[index].clone())]
            }
        };

        let guard = ActivityGuard {
            state: Arc::clone(&self.state),
            activity: Activity::Exporting,
        };
        Ok(Some((guard, targets)))
    }

    /// Renders `record` and exports it once the presentation confirms it is showing.
    async fn export_one(
        &self,
        index: usize,
        record: &ResumeRecord,
        filename: &str,
    ) -> Result<ExportedFile, ExportError> {
        let ack = self.presentation.present(index, record).await?;
        if ack.index != index || ack.record_id != record.id {
            return Err(ExportError::StaleRender {
                expected: index,
                shown: ack.index,
            });
        }
        self.exporter
            .export(&self.presentation.region(), filename)
            .await
    }

    /// Exports the selected record. `Ok(None)` when the list is empty.
    pub async fn download_current(&self) -> Result<Option<ExportedFile>, WorkflowError> {
        let Some((_guard, mut targets)) = self.begin_export(false)? else {
            return Ok(None);
        };
        let Some((index, record)) = targets.pop() else {
            return Ok(None);
        };

        let filename = export_filename(&record.name);
        match self.export_one(index, &record, &filename).await {
            Ok(file) => Ok(Some(file)),
            Err(source) => {
                error!("Export of resume #{} failed: {}", index, source);
                self.notifier
                    .notify(Notification::new(NotificationKind::ExportFailed));
                Err(WorkflowError::Export {
                    index,
                    filename,
                    source,
                })
            }
        }
    }

    /// Exports every record in list order, selecting each one first.
    /// Stops at the first failure; files already written stay on disk.
    pub async fn download_all(&self) -> Result<Option<BulkExportReport>, WorkflowError> {
        let Some((guard, targets)) = self.begin_export(true)? else {
            return Ok(None);
        };
        self.run_bulk_export(guard, targets).await.map(Some)
    }

    /// Reserves the export slot now and runs the bulk export on a tokio task.
    /// `Ok(None)` when the list is empty; otherwise the number of records queued.
    #[allow(clippy::type_complexity)]
    pub fn spawn_download_all(
        &self,
    ) -> Result<Option<(usize, JoinHandle<Result<BulkExportReport, WorkflowError>>)>, WorkflowError>
    {
        let Some((guard, targets)) = self.begin_export(true)? else {
            return Ok(None);
        };
        let total = targets.len();
        let this = self.clone();
        let handle = tokio::spawn(async move { this.run_bulk_export(guard, targets).await });
        Ok(Some((total, handle)))
    }

    async fn run_bulk_export(
        &self,
        _guard: ActivityGuard,
        targets: Vec<(usize, ResumeRecord)>,
    ) -> Result<BulkExportReport, WorkflowError> {
        info!("Bulk export started: {} resume(s)", targets.len());
        self.notifier
            .notify(Notification::new(NotificationKind::BulkExportStarted));

        let mut exported = Vec::with_capacity(targets.len());
        for (index, record) in targets {
            self.state.lock().current_index = index;

            let filename = export_filename(&record.name);
            match self.export_one(index, &record, &filename).await {
                Ok(file) => exported.push(file),
                Err(source) => {
                    error!(
                        "Bulk export stopped at resume #{} after {} file(s): {}",
                        index,
                        exported.len(),
                        source
                    );
                    self.notifier
                        .notify(Notification::new(NotificationKind::BulkExportFailed));
                    return Err(WorkflowError::Export {
                        index,
                        filename,
                        source,
                    });
                }
            }
        }

        info!("Bulk export finished: {} file(s)", exported.len());
        self.notifier
            .notify(Notification::new(NotificationKind::BulkExportCompleted {
                count: exported.len(),
            }));
        Ok(BulkExportReport { exported })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
