//! 수집기 에러 타입
//!
//! [`CollectorError`]는 리스너와 파서에서, [`ForwardError`]는 포워더에서 발생합니다.
//! 라인 단위 에러(디코딩 실패)와 포워딩 실패는 로그만 남기고 흐름을 계속하며,
//! 리스너 바인드 실패만 호출자에게 치명적 에러로 전파됩니다.

use logwarden_core::error::LogwardenError;

/// 수집기 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// 스트림 라인 JSON 디코딩 실패
    #[error("decode error: {reason}")]
    Decode {
        /// 실패 사유
        reason: String,
    },

    /// 리스너 바인드 실패
    #[error("failed to bind {addr}: {reason}")]
    Bind {
        /// 바인드 주소
        addr: String,
        /// 실패 사유
        reason: String,
    },

    /// 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 포워딩 에러
///
/// 재시도하지 않으며, 원래 이벤트를 보낸 생산자에게도 노출되지 않습니다.
/// 리스너는 포워딩 태스크에서 이 에러를 로그로만 남깁니다.
#[derive(Debug, thiserror::Error)]
pub enum ForwardError {
    /// 연결 실패 등 전송 계층 에러
    #[error("transport error: {0}")]
    Transport(String),

    /// 2xx가 아닌 응답
    #[error("remote returned {status}: {body}")]
    Status {
        /// HTTP 상태 코드
        status: u16,
        /// 응답 본문
        body: String,
    },

    /// 레코드 직렬화 실패
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<CollectorError> for LogwardenError {
    fn from(err: CollectorError) -> Self {
        LogwardenError::Collector(err.to_string())
    }
}
