//! 에러 타입 -- 도메인별 에러 정의
//!
//! 각 크레이트는 자체 도메인 에러(`CollectorError`, `StoreError`)를 정의하고
//! `From` 변환으로 [`LogwardenError`]에 합류합니다.

/// Logwarden 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogwardenError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 수집기(리스너/파서/포워더) 에러
    #[error("collector error: {0}")]
    Collector(String),

    /// 저장소 에러
    #[error("store error: {0}")]
    Store(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
