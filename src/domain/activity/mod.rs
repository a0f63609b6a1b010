//! Activity trail domain
//!
//! Append-only audit records: one per inbound request and one per created
//! page, plus the filter/repository surface for querying them.

mod entity;
mod repository;

pub use entity::{
    ActivityRecord, ActivityRecordId, CreatedPageRecord, CreatedPageRecordId, RequestContext,
    RequestOutcome,
};
pub use repository::{ActivityFilter, ActivityLogRepository};
