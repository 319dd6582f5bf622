// Resume layout: font metrics, word wrap and page composition.
// CPU-bound composition must run inside tokio::task::spawn_blocking when called from async code.

pub mod composer;
pub mod font_metrics;

// Re-export the public API consumed by other modules (presentation, export, handlers).
pub use composer::{compose_resume, RenderedResume};
pub use font_metrics::{default_page_config, FontFace, PageConfig};
