//! Presentation — renders the selected resume into the preview region.
//!
//! The exporter captures whatever the region currently holds, so the workflow must
//! know when a render has landed before it exports. `present` resolves only after
//! the region has been updated and returns a `RenderAck` naming what is now shown.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::layout::{compose_resume, PageConfig, RenderedResume};
use crate::models::resume::ResumeRecord;

/// Identifier of the on-screen preview region the exporter captures.
pub const PREVIEW_REGION_ID: &str = "resume-preview";

#[derive(Debug, Error)]
pub enum PresentationError {
    #[error("render task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Render-complete signal: the region now shows `record_id` at list position `index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderAck {
    pub index: usize,
    pub record_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Region
// ────────────────────────────────────────────────────────────────────────────

/// A named display region. Clones share the same content.
#[derive(Clone)]
pub struct PresentationRegion {
    id: Arc<str>,
    content: Arc<RwLock<Option<Arc<RenderedResume>>>>,
}

impl PresentationRegion {
    pub fn new(id: &str) -> Self {
        Self {
            id: Arc::from(id),
            content: Arc::new(RwLock::new(None)),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// What the region shows right now.
    pub fn snapshot(&self) -> Option<Arc<RenderedResume>> {
        self.content.read().clone()
    }

    pub fn show(&self, rendered: Arc<RenderedResume>) {
        *self.content.write() = Some(rendered);
    }
}

impl std::fmt::Debug for PresentationRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PresentationRegion")
            .field("id", &self.id)
            .field("showing", &self.snapshot().map(|r| r.index))
            .finish()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait + default implementation
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ResumePresentation: Send + Sync {
    /// The region exports are captured from.
    fn region(&self) -> PresentationRegion;

    /// Renders `record` into the region. Resolves once the region shows it.
    async fn present(
        &self,
        index: usize,
        record: &ResumeRecord,
    ) -> Result<RenderAck, PresentationError>;
}

/// Lays records out with `layout::compose_resume` and shows the result.
pub struct LayoutPresenter {
    config: PageConfig,
    region: PresentationRegion,
}

impl LayoutPresenter {
    pub fn new(config: PageConfig) -> Self {
        Self {
            config,
            region: PresentationRegion::new(PREVIEW_REGION_ID),
        }
    }
}

#[async_trait]
impl ResumePresentation for LayoutPresenter {
    fn region(&self) -> PresentationRegion {
        self.region.clone()
    }

    async fn present(
        &self,
        index: usize,
        record: &ResumeRecord,
    ) -> Result<RenderAck, PresentationError> {
        let record = record.clone();
        let config = self.config.clone();
        let rendered =
            tokio::task::spawn_blocking(move || compose_resume(index, &record, &config)).await?;

        let ack = RenderAck {
            index: rendered.index,
            record_id: rendered.record_id,
        };
        self.region.show(Arc::new(rendered));
        Ok(ack)
    }
}
