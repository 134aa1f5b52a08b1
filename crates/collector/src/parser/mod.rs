//! 이벤트 보강 파서 -- 원시 메시지 한 줄을 [`StructuredRecord`]로 변환합니다.
//!
//! # 보강 단계
//! 1. 타임스탬프: 현재 UTC 시각 (생산자가 보낸 RFC 3339 값이 유효하면 대체)
//! 2. 선두 `<N>` 마커에서 우선순위 코드 추출 → 심각도 매핑
//! 3. 마커 뒤 첫 토큰 → 호스트명
//! 4. `by <token>` 패턴 → 사용자명 (대소문자 보존)
//! 5. 키워드 기반 이벤트 분류
//! 6. 블랙리스트 판정
//!
//! 외부 상태는 읽기 전용 블랙리스트뿐이며 I/O를 하지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use logwarden_collector::parser::{Blacklist, EnrichmentParser};
//!
//! let parser = EnrichmentParser::new(Blacklist::with_defaults())?;
//! let record = parser.parse("<86> host1 sudo: session opened for user root by motadata");
//! assert_eq!(record.event_category, "login.audit");
//! ```

pub mod blacklist;
pub mod classify;

pub use blacklist::Blacklist;
pub use classify::{classify, severity_for_priority};

use chrono::{DateTime, Utc};
use regex::Regex;

use logwarden_core::types::{RawEvent, StructuredRecord};

use crate::error::CollectorError;

/// 선두 우선순위 마커 `<N>`
const PRIORITY_PATTERN: &str = r"^<(\d+)>";

/// 마커 뒤 첫 번째 공백 구분 토큰
const HOSTNAME_PATTERN: &str = r"^<\d+>\s*(\S+)";

/// `by <token>` (영숫자/밑줄/하이픈)
const USERNAME_PATTERN: &str = r"by\s+([A-Za-z0-9_-]+)";

/// 이벤트 보강 파서
///
/// 정규식은 생성 시 한 번만 컴파일됩니다. `&self`만 요구하므로
/// `Arc`로 감싸 여러 연결 태스크에서 동시에 사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct EnrichmentParser {
    priority_re: Regex,
    hostname_re: Regex,
    username_re: Regex,
    blacklist: Blacklist,
}

impl EnrichmentParser {
    /// 주어진 블랙리스트로 파서를 생성합니다.
    pub fn new(blacklist: Blacklist) -> Result<Self, CollectorError> {
        Ok(Self {
            priority_re: Regex::new(PRIORITY_PATTERN)?,
            hostname_re: Regex::new(HOSTNAME_PATTERN)?,
            username_re: Regex::new(USERNAME_PATTERN)?,
            blacklist,
        })
    }

    /// 기본 블랙리스트로 파서를 생성합니다.
    pub fn with_defaults() -> Result<Self, CollectorError> {
        Self::new(Blacklist::with_defaults())
    }

    /// 사용 중인 블랙리스트를 반환합니다.
    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    /// 원시 메시지를 현재 시각 기준으로 보강합니다.
    pub fn parse(&self, raw: &str) -> StructuredRecord {
        self.parse_at(raw, Utc::now())
    }

    /// 원시 메시지를 주어진 시각 기준으로 보강합니다.
    pub fn parse_at(&self, raw: &str, now: DateTime<Utc>) -> StructuredRecord {
        let category = classify(raw);
        let mut record = StructuredRecord::new(now, category.as_str());
        record.raw_message = raw.to_owned();

        // 마커가 없으면 심각도는 비워 둔다 (기본값 INFO를 채우지 않음)
        record.severity = self
            .priority_re
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|code| severity_for_priority(code.as_str()).as_str().to_owned());

        record.hostname = self
            .hostname_re
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_owned());

        record.username = self
            .username_re
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_owned());

        record.is_blacklisted = self.blacklist.is_flagged(record.username.as_deref(), raw);
        record
    }

    /// [`RawEvent`]를 보강합니다. 유효한 생산자 타임스탬프가 있으면 사용합니다.
    pub fn enrich(&self, event: &RawEvent) -> StructuredRecord {
        self.enrich_at(event, Utc::now())
    }

    /// [`RawEvent`]를 주어진 시각 기준으로 보강합니다.
    ///
    /// 생산자 타임스탬프가 RFC 3339로 파싱되지 않으면 조용히 `now`를 유지합니다.
    pub fn enrich_at(&self, event: &RawEvent, now: DateTime<Utc>) -> StructuredRecord {
        let mut record = self.parse_at(&event.message, now);
        if let Some(ts) = event.timestamp.as_deref().and_then(parse_rfc3339) {
            record.timestamp = ts;
        }
        record
    }
}

/// RFC 3339 문자열을 UTC 시각으로 변환합니다.
pub fn parse_rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// 스트림 라인 하나를 [`RawEvent`]로 디코딩합니다.
pub fn decode_line(line: &str) -> Result<RawEvent, CollectorError> {
    serde_json::from_str(line).map_err(|e| CollectorError::Decode {
        reason: e.to_string(),
    })
}
