//! Trait seams for external collaborators.
//!
//! The core never talks to the network or a persistence backend
//! directly; it consumes these traits. `crate::http` adapts the real
//! REST client onto them, `crate::testing` provides mocks.

pub mod backend;
pub mod store;

pub use backend::{AnalyticsRow, AnalyticsSource, ExtractBackend, ExtractResponse, FileUpload, JobApi};
pub use store::TemplateStore;
