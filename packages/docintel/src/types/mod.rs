//! Data types for the extraction core.

pub mod job;
pub mod row;
pub mod schema;
pub mod template;
