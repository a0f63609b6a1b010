//! Activity log service

use std::sync::Arc;

use tracing::debug;

use crate::domain::activity::{
    ActivityFilter, ActivityLogRepository, ActivityRecord, ActivityRecordId, CreatedPageRecord,
};
use crate::domain::api_key::ApiKeyId;
use crate::domain::DomainError;

/// High-level surface over the activity trail
#[derive(Debug)]
pub struct ActivityLogService {
    repository: Arc<dyn ActivityLogRepository>,
}

impl ActivityLogService {
    pub fn new(repository: Arc<dyn ActivityLogRepository>) -> Self {
        Self { repository }
    }

    /// Append one request record, returning its ID for linking
    pub async fn log_request(
        &self,
        record: ActivityRecord,
    ) -> Result<ActivityRecordId, DomainError> {
        let record = self.repository.append(record).await?;
        debug!(record_id = %record.id(), outcome = %record.outcome, "Activity recorded");
        Ok(record.id().clone())
    }

    /// Append one created-page record linked to a request record
    pub async fn log_created_page(
        &self,
        page_id: u64,
        title: &str,
        url: &str,
        api_key_id: &ApiKeyId,
        activity_record_id: &ActivityRecordId,
    ) -> Result<(), DomainError> {
        self.repository
            .append_created_page(CreatedPageRecord::new(
                page_id,
                title,
                url,
                api_key_id.clone(),
                activity_record_id.clone(),
            ))
            .await?;
        Ok(())
    }

    /// Query request records, newest first
    pub async fn records(
        &self,
        filter: &ActivityFilter,
    ) -> Result<Vec<ActivityRecord>, DomainError> {
        self.repository.records(filter).await
    }

    /// Query created-page records, newest first
    pub async fn created_pages(&self) -> Result<Vec<CreatedPageRecord>, DomainError> {
        self.repository.created_pages().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::{RequestContext, RequestOutcome};
    use crate::infrastructure::activity::StorageActivityLogRepository;
    use crate::infrastructure::storage::InMemoryStorage;

    fn create_service() -> ActivityLogService {
        ActivityLogService::new(Arc::new(StorageActivityLogRepository::new(
            Arc::new(InMemoryStorage::<ActivityRecord>::new()),
            Arc::new(InMemoryStorage::<CreatedPageRecord>::new()),
        )))
    }

    #[tokio::test]
    async fn test_log_request_and_created_page() {
        let service = create_service();
        let context = RequestContext::new("/pagebuilder/v1/create-pages", "POST");

        let record_id = service
            .log_request(
                ActivityRecord::new(&context, RequestOutcome::Success).with_pages_created(1),
            )
            .await
            .unwrap();

        service
            .log_created_page(
                5,
                "Home",
                "http://localhost/pages/home",
                &ApiKeyId::new("key-1"),
                &record_id,
            )
            .await
            .unwrap();

        let records = service.records(&ActivityFilter::default()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pages_created, 1);

        let pages = service.created_pages().await.unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(&pages[0].activity_record_id, &record_id);
    }
}
