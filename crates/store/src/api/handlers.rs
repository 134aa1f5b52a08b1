//! 요청 핸들러

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use logwarden_core::types::{EventCategory, StructuredRecord};

use super::error::ApiError;
use crate::query::LogQuery;
use crate::storage::{FileStore, StoreSummary};

/// `POST /ingest` 요청 본문
///
/// 수집기가 보낸 [`StructuredRecord`]와 같은 모양이지만 모든 필드가 선택입니다.
#[derive(Debug, Default, Deserialize)]
pub struct IngestPayload {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "event.category", default)]
    pub event_category: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(rename = "raw.message", default)]
    pub raw_message: String,
    #[serde(rename = "is.blacklisted", default)]
    pub is_blacklisted: bool,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl IngestPayload {
    /// 저장할 레코드로 변환합니다.
    ///
    /// 타임스탬프가 없으면 `now`, 분류가 비어 있으면 `unknown`을 채웁니다.
    /// 빈 문자열 선택 필드는 없는 값으로 취급합니다.
    pub fn into_record(self, now: DateTime<Utc>) -> StructuredRecord {
        let category = if self.event_category.is_empty() {
            EventCategory::Unknown.as_str().to_owned()
        } else {
            self.event_category
        };

        let mut record = StructuredRecord::new(self.timestamp.unwrap_or(now), category);
        record.username = non_empty(self.username);
        record.hostname = non_empty(self.hostname);
        record.severity = non_empty(self.severity);
        record.raw_message = self.raw_message;
        record.is_blacklisted = self.is_blacklisted;
        record.meta = self.meta;
        record
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// `POST /ingest` -- 레코드 하나를 저장합니다.
pub async fn ingest(
    State(store): State<Arc<FileStore>>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let payload: IngestPayload =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidPayload(e.to_string()))?;
    let record = payload.into_record(Utc::now());

    store.save(record).await?;
    Ok(StatusCode::ACCEPTED)
}

/// `GET /logs` -- 필터/정렬/제한을 적용한 레코드 배열을 반환합니다.
pub async fn logs(
    State(store): State<Arc<FileStore>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<StructuredRecord>> {
    let query = LogQuery::from_params(&params);
    let records = store.query(&query).await;
    debug!(?query, matched = records.len(), "logs query");
    Json(records)
}

/// `GET /metrics` -- 전체 수와 분류/심각도별 집계를 반환합니다.
pub async fn metrics(State(store): State<Arc<FileStore>>) -> Json<StoreSummary> {
    Json(store.summary().await)
}
