//! Activity trail repository trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt::Debug;

use super::entity::{ActivityRecord, CreatedPageRecord, RequestOutcome};
use crate::domain::api_key::ApiKeyId;
use crate::domain::DomainError;

/// Filter for querying activity records
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    /// Only records with this outcome
    pub outcome: Option<RequestOutcome>,
    /// Only records attributed to this key
    pub api_key_id: Option<ApiKeyId>,
    /// Only records written at or after this time
    pub from: Option<DateTime<Utc>>,
    /// Only records written at or before this time
    pub to: Option<DateTime<Utc>>,
}

impl ActivityFilter {
    /// Check whether a record passes the filter
    pub fn matches(&self, record: &ActivityRecord) -> bool {
        if let Some(outcome) = self.outcome {
            if record.outcome != outcome {
                return false;
            }
        }

        if let Some(ref key_id) = self.api_key_id {
            if record.api_key_id.as_ref() != Some(key_id) {
                return false;
            }
        }

        if let Some(from) = self.from {
            if record.created_at < from {
                return false;
            }
        }

        if let Some(to) = self.to {
            if record.created_at > to {
                return false;
            }
        }

        true
    }
}

/// Repository trait for the append-only activity trail
#[async_trait]
pub trait ActivityLogRepository: Send + Sync + Debug {
    /// Append a request record; records are immutable once written
    async fn append(&self, record: ActivityRecord) -> Result<ActivityRecord, DomainError>;

    /// Append a created-page record
    async fn append_created_page(
        &self,
        record: CreatedPageRecord,
    ) -> Result<CreatedPageRecord, DomainError>;

    /// List request records matching the filter, newest first
    async fn records(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRecord>, DomainError>;

    /// List created-page records, newest first
    async fn created_pages(&self) -> Result<Vec<CreatedPageRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::RequestContext;

    fn record(outcome: RequestOutcome, key: Option<&str>) -> ActivityRecord {
        let context = RequestContext::new("/pagebuilder/v1/create-pages", "POST");
        let record = ActivityRecord::new(&context, outcome);
        match key {
            Some(id) => record.with_api_key_id(ApiKeyId::new(id)),
            None => record,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ActivityFilter::default();

        assert!(filter.matches(&record(RequestOutcome::Success, Some("key-1"))));
        assert!(filter.matches(&record(RequestOutcome::Failed, None)));
    }

    #[test]
    fn test_outcome_filter() {
        let filter = ActivityFilter {
            outcome: Some(RequestOutcome::Failed),
            ..Default::default()
        };

        assert!(filter.matches(&record(RequestOutcome::Failed, None)));
        assert!(!filter.matches(&record(RequestOutcome::Success, None)));
    }

    #[test]
    fn test_api_key_filter() {
        let filter = ActivityFilter {
            api_key_id: Some(ApiKeyId::new("key-1")),
            ..Default::default()
        };

        assert!(filter.matches(&record(RequestOutcome::Success, Some("key-1"))));
        assert!(!filter.matches(&record(RequestOutcome::Success, Some("key-2"))));
        assert!(!filter.matches(&record(RequestOutcome::Success, None)));
    }

    #[test]
    fn test_time_range_filter() {
        let rec = record(RequestOutcome::Success, None);

        let filter = ActivityFilter {
            from: Some(rec.created_at - chrono::Duration::minutes(1)),
            to: Some(rec.created_at + chrono::Duration::minutes(1)),
            ..Default::default()
        };
        assert!(filter.matches(&rec));

        let filter = ActivityFilter {
            from: Some(rec.created_at + chrono::Duration::minutes(1)),
            ..Default::default()
        };
        assert!(!filter.matches(&rec));
    }
}
