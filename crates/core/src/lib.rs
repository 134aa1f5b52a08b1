//! Logwarden 공통 크레이트
//!
//! 수집기(`logwarden-collector`)와 저장 서버(`logwarden-store`)가 공유하는
//! 레코드 타입, 에러, 설정, 메트릭 이름을 정의합니다.
//!
//! # 모듈 구성
//!
//! - [`types`]: `RawEvent`, `StructuredRecord`, 분류/심각도 열거형
//! - [`error`]: 최상위 에러 및 설정 에러
//! - [`config`]: `logwarden.toml` 파싱 + 환경변수 오버라이드
//! - [`metrics`]: Prometheus 메트릭 이름과 설명

pub mod config;
pub mod error;
pub mod metrics;
pub mod types;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, LogwardenError};

// 설정
pub use config::LogwardenConfig;

// 도메인 타입
pub use types::{EventCategory, RawEvent, Severity, StructuredRecord};
