//! 저장소 에러 타입
//!
//! 쓰기 실패([`StoreError::Write`])만 호출자에게 전파되어 HTTP 500이 됩니다.
//! 재생(replay) 중 에러는 로그로만 남기고 프로세스를 멈추지 않습니다.

use logwarden_core::error::LogwardenError;

/// 저장소 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// 저장 파일 append 실패. 메모리 미러는 변경되지 않습니다.
    #[error("write failed for {path}: {source}")]
    Write {
        /// 저장 파일 경로
        path: String,
        /// 원인 I/O 에러
        #[source]
        source: std::io::Error,
    },

    /// 레코드 직렬화 실패
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// 시작 시 재생 중단 (해당 줄 이전 레코드는 유지)
    #[error("replay stopped at line {line}: {reason}")]
    Replay {
        /// 1부터 시작하는 줄 번호
        line: usize,
        /// 중단 사유
        reason: String,
    },

    /// HTTP 리스너 바인드 실패
    #[error("failed to bind {addr}: {reason}")]
    Bind {
        /// 바인드 주소
        addr: String,
        /// 실패 사유
        reason: String,
    },

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for LogwardenError {
    fn from(err: StoreError) -> Self {
        LogwardenError::Store(err.to_string())
    }
}
