//! Logwarden 스트림 수집기
//!
//! # 모듈 구성
//!
//! - [`parser`]: 원시 메시지 → `StructuredRecord` 보강 (분류, 심각도, 블랙리스트)
//! - [`forwarder`]: 보강된 레코드를 수집 API로 전달 (fire-and-forget)
//! - [`listener`]: 줄 단위 JSON 스트림을 받는 TCP 리스너
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! producer -> TCP -> IngestListener -> EnrichmentParser -> spawn(RecordForwarder) -> HTTP
//!                     (연결당 태스크)                        (레코드당 태스크)
//! ```

pub mod error;
pub mod forwarder;
pub mod listener;
pub mod parser;

// --- 주요 타입 re-export ---

pub use error::{CollectorError, ForwardError};
pub use forwarder::{HttpForwarder, RecordForwarder};
pub use listener::IngestListener;
pub use parser::{Blacklist, EnrichmentParser};
