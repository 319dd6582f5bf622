//! User-facing notifications (toasts). Fire-and-forget: nothing flows back into
//! the workflow from here.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationKind {
    GenerationFailed,
    ExportFailed,
    BulkExportStarted,
    BulkExportCompleted { count: usize },
    BulkExportFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind) -> Self {
        let (title, description, variant) = match kind {
            NotificationKind::GenerationFailed => (
                "Error",
                "Failed to generate resumes. Please try again.".to_string(),
                NotificationVariant::Destructive,
            ),
            NotificationKind::ExportFailed => (
                "Error",
                "Failed to download PDF. Please try again.".to_string(),
                NotificationVariant::Destructive,
            ),
            NotificationKind::BulkExportStarted => (
                "Bulk Download",
                "Preparing to download all resumes as PDFs...".to_string(),
                NotificationVariant::Default,
            ),
            NotificationKind::BulkExportCompleted { count } => (
                "Success",
                format!("All {count} PDFs have been downloaded."),
                NotificationVariant::Default,
            ),
            NotificationKind::BulkExportFailed => (
                "Error",
                "Failed to download all PDFs. Please try again.".to_string(),
                NotificationVariant::Destructive,
            ),
        };

        Self {
            id: Uuid::new_v4(),
            kind,
            title: title.to_string(),
            description,
            variant,
            created_at: Utc::now(),
        }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Bounded in-memory history of notifications, newest last. Every notification
/// is also logged.
pub struct NotificationLog {
    capacity: usize,
    entries: Mutex<VecDeque<Notification>>,
}

impl NotificationLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn recent(&self) -> Vec<Notification> {
        self.entries.lock().iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.entries.lock().iter().filter(|n| n.kind == kind).count()
    }
}

impl Notifier for NotificationLog {
    fn notify(&self, notification: Notification) {
        match notification.variant {
            NotificationVariant::Destructive => {
                warn!("{}: {}", notification.title, notification.description)
            }
            NotificationVariant::Default => {
                info!("{}: {}", notification.title, notification.description)
            }
        }

        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_message_includes_count() {
        let n = Notification::new(NotificationKind::BulkExportCompleted { count: 7 });
        assert_eq!(n.title, "Success");
        assert_eq!(n.description, "All 7 PDFs have been downloaded.");
        assert_eq!(n.variant, NotificationVariant::Default);
    }

    #[test]
    fn test_failures_are_destructive() {
        for kind in [
            NotificationKind::GenerationFailed,
            NotificationKind::ExportFailed,
            NotificationKind::BulkExportFailed,
        ] {
            assert_eq!(Notification::new(kind).variant, NotificationVariant::Destructive);
        }
    }

    #[test]
    fn test_log_drops_oldest_past_capacity() {
        let log = NotificationLog::new(2);
        log.notify(Notification::new(NotificationKind::BulkExportStarted));
        log.notify(Notification::new(NotificationKind::ExportFailed));
        log.notify(Notification::new(NotificationKind::GenerationFailed));

        let kinds: Vec<_> = log.recent().into_iter().map(|n| n.kind).collect();
        assert_eq!(
            kinds,
            vec![NotificationKind::ExportFailed, NotificationKind::GenerationFailed]
        );
    }

    #[test]
    fn test_zero_capacity_still_keeps_latest() {
        let log = NotificationLog::new(0);
        log.notify(Notification::new(NotificationKind::ExportFailed));
        assert_eq!(log.count_of(NotificationKind::ExportFailed), 1);
    }

    #[test]
    fn test_kind_serializes_with_tag() {
        let json = serde_json::to_value(NotificationKind::BulkExportCompleted { count: 3 }).unwrap();
        assert_eq!(json, serde_json::json!({"type": "bulk_export_completed", "count": 3}));
    }
}
