//! 분류 규칙 -- 이벤트 분류 키워드와 우선순위 코드 → 심각도 매핑

use logwarden_core::types::{EventCategory, Severity};

/// 로그인 분류 키워드 (소문자)
const LOGIN_KEYWORDS: &[&str] = &["login", "logged on", "session opened"];

/// 로그아웃 분류 키워드 (소문자)
const LOGOUT_KEYWORDS: &[&str] = &["logout", "session closed", "terminated"];

/// 메시지 내용으로 이벤트 분류를 추론합니다.
///
/// 대소문자 구분 없이 부분 문자열로 검사하며, 로그인 키워드가 로그아웃보다 우선합니다.
pub fn classify(message: &str) -> EventCategory {
    let lowered = message.to_lowercase();
    if LOGIN_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        EventCategory::LoginAudit
    } else if LOGOUT_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        EventCategory::LogoutAudit
    } else {
        EventCategory::Event
    }
}

/// 우선순위 코드 문자열을 심각도로 매핑합니다.
///
/// `86` → `INFO`, `134` → `WARN`, 그 밖의 코드 → `INFO`.
pub fn severity_for_priority(code: &str) -> Severity {
    match code {
        "134" => Severity::Warn,
        _ => Severity::Info,
    }
}
