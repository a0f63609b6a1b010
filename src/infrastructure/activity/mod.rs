//! Activity trail infrastructure: storage-backed repository and service.

mod service;
mod storage_repository;

pub use service::ActivityLogService;
pub use storage_repository::StorageActivityLogRepository;
