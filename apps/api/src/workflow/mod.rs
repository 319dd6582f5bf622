// Resume workflow: generation, navigation and PDF export sequencing.
// External services are reached only through the ResumeSource / ResumePresentation /
// PdfExporter traits, so the controller is testable with in-memory doubles.

pub mod controller;
pub mod handlers;
pub mod navigation;
pub mod notifications;

pub use controller::{clamp_count, WorkflowController, WorkflowError, WorkflowSnapshot};
pub use navigation::Direction;
pub use notifications::{Notification, NotificationLog};
