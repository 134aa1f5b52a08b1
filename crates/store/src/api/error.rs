//! API 에러 → HTTP 응답 변환

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::error::StoreError;

/// 수집/조회 API 에러
///
/// 본문은 `text/plain` 한 줄입니다.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 요청 본문이 레코드로 디코딩되지 않음 (400)
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// 저장 실패 (500)
    #[error("save error: {0}")]
    Save(#[from] StoreError),
}

impl ApiError {
    /// 에러에 대응하는 HTTP 상태 코드
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            Self::Save(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Self::InvalidPayload(reason) => warn!(%reason, "rejected ingest payload"),
            Self::Save(e) => error!(error = %e, "failed to save record"),
        }
        (status, self.to_string()).into_response()
    }
}
