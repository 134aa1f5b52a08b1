//! Logwarden 레코드 저장 서버
//!
//! # 모듈 구성
//!
//! - [`storage`]: JSON Lines append 파일 + 메모리 미러 (`FileStore`)
//! - [`query`]: 필터/정렬/제한, 그룹 집계
//! - [`api`]: `/ingest`, `/logs`, `/metrics` HTTP 엔드포인트 (axum)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! collector -> POST /ingest -> FileStore::save -> logs.jsonl (append)
//!                                    |
//!                                  mirror <- GET /logs, GET /metrics
//! ```

pub mod api;
pub mod error;
pub mod query;
pub mod storage;

// --- 주요 타입 re-export ---

pub use api::{ApiError, ApiServer, router};
pub use error::StoreError;
pub use query::{GroupField, LogQuery, RecordFilter, SortOrder};
pub use storage::{FileStore, StoreSummary};
