use std::sync::Arc;

use crate::layout::PageConfig;
use crate::workflow::{NotificationLog, WorkflowController};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single workflow instance this process serves.
    pub controller: WorkflowController,
    /// Same log the controller notifies into; read by the notifications endpoint.
    pub notifications: Arc<NotificationLog>,
    /// Page geometry for previews composed outside the workflow.
    pub page_config: PageConfig,
    /// `backend_name()` of the source the controller is running with.
    pub resume_source: &'static str,
}
