//! Core module - identity, configuration, and the request engines

pub mod analytics;
pub mod config;
pub mod identity;
pub mod lifecycle;
pub mod project;

pub use analytics::{Analytics, CountRow, StageCounts};
pub use config::Config;
pub use identity::{RecordId, RecordPrefix};
pub use lifecycle::{is_overdue, Lifecycle, LifecycleError, RequestDraft, RequestPatch};
pub use project::{Project, ProjectError};
