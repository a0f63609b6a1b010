//! Storage-backed activity trail repository

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::activity::{
    ActivityFilter, ActivityLogRepository, ActivityRecord, CreatedPageRecord,
};
use crate::domain::storage::Storage;
use crate::domain::DomainError;

/// `ActivityLogRepository` over two generic storages: one table for request
/// records, one for created-page records. Both are append-only; nothing
/// here updates or deletes.
#[derive(Debug)]
pub struct StorageActivityLogRepository {
    records: Arc<dyn Storage<ActivityRecord>>,
    created_pages: Arc<dyn Storage<CreatedPageRecord>>,
}

impl StorageActivityLogRepository {
    pub fn new(
        records: Arc<dyn Storage<ActivityRecord>>,
        created_pages: Arc<dyn Storage<CreatedPageRecord>>,
    ) -> Self {
        Self {
            records,
            created_pages,
        }
    }
}

#[async_trait]
impl ActivityLogRepository for StorageActivityLogRepository {
    async fn append(&self, record: ActivityRecord) -> Result<ActivityRecord, DomainError> {
        self.records.create(record).await
    }

    async fn append_created_page(
        &self,
        record: CreatedPageRecord,
    ) -> Result<CreatedPageRecord, DomainError> {
        self.created_pages.create(record).await
    }

    async fn records(&self, filter: &ActivityFilter) -> Result<Vec<ActivityRecord>, DomainError> {
        let mut records: Vec<ActivityRecord> = self
            .records
            .list()
            .await?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn created_pages(&self) -> Result<Vec<CreatedPageRecord>, DomainError> {
        let mut pages = self.created_pages.list().await?;
        pages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pages)
    }
}
