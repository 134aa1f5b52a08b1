//! 도메인 타입 -- 수집기와 저장 서버가 공유하는 레코드 구조
//!
//! 수집기는 [`RawEvent`]를 받아 [`StructuredRecord`]로 보강(enrich)하고,
//! 저장 서버는 [`StructuredRecord`]를 그대로 JSON Lines 파일에 기록합니다.
//! 와이어/파일 포맷의 필드명(`event.category`, `raw.message` 등)은
//! serde 속성으로 고정되어 있습니다.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 스트림으로 수신한 원시 이벤트
///
/// 한 줄에 JSON 객체 하나: `{"message": "...", "timestamp": "RFC3339"}`.
/// 생성기가 함께 보내는 그 밖의 필드(`hostname`, `event.category` 등)는 무시합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    /// 원본 메시지 텍스트
    #[serde(default)]
    pub message: String,
    /// 생산자가 지정한 RFC 3339 타임스탬프 (선택)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl RawEvent {
    /// 메시지만으로 원시 이벤트를 생성합니다.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: None,
        }
    }

    /// 생산자 타임스탬프를 지정합니다.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }
}

/// 보강된 이벤트 레코드 -- 저장의 최소 단위
///
/// 한 번 저장된 레코드는 변경되지 않습니다 (append-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredRecord {
    /// 이벤트 시각 (UTC)
    pub timestamp: DateTime<Utc>,
    /// 이벤트 분류 (`login.audit`, `logout.audit`, `event`, `unknown` 등)
    #[serde(rename = "event.category")]
    pub event_category: String,
    /// 메시지에서 추출한 사용자명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 메시지에서 추출한 호스트명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    /// 우선순위 코드에서 도출한 심각도 (`INFO`, `WARN`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// 원본 메시지 (그대로 보존)
    #[serde(rename = "raw.message", default, skip_serializing_if = "String::is_empty")]
    pub raw_message: String,
    /// 블랙리스트 매칭 여부
    #[serde(rename = "is.blacklisted", default)]
    pub is_blacklisted: bool,
    /// 확장 필드
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub meta: BTreeMap<String, String>,
}

impl StructuredRecord {
    /// 최소 필드로 레코드를 생성합니다. 나머지 필드는 비어 있습니다.
    pub fn new(timestamp: DateTime<Utc>, event_category: impl Into<String>) -> Self {
        Self {
            timestamp,
            event_category: event_category.into(),
            username: None,
            hostname: None,
            severity: None,
            raw_message: String::new(),
            is_blacklisted: false,
            meta: BTreeMap::new(),
        }
    }
}

impl fmt::Display for StructuredRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} host={} user={} blacklisted={}",
            self.event_category,
            self.timestamp.to_rfc3339(),
            self.hostname.as_deref().unwrap_or("-"),
            self.username.as_deref().unwrap_or("-"),
            self.is_blacklisted,
        )
    }
}

/// 이벤트 분류
///
/// 보강 단계에서 메시지 내용으로 추론됩니다.
/// 수집 API는 임의의 분류 문자열도 그대로 받아들이므로
/// 레코드에는 문자열로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// 로그인/세션 시작
    LoginAudit,
    /// 로그아웃/세션 종료
    LogoutAudit,
    /// 그 밖의 일반 이벤트
    Event,
    /// 분류 정보 없음
    Unknown,
}

impl EventCategory {
    /// 와이어 포맷 문자열을 반환합니다.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginAudit => "login.audit",
            Self::LogoutAudit => "logout.audit",
            Self::Event => "event",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 심각도
///
/// 우선순위 코드 `<86>` → `INFO`, `<134>` → `WARN`, 그 밖의 코드 → `INFO`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    /// 정보성 이벤트
    #[default]
    Info,
    /// 경고
    Warn,
}

impl Severity {
    /// 와이어 포맷 문자열을 반환합니다.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warn => "WARN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
