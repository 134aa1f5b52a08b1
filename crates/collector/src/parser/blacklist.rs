//! 블랙리스트 -- 의심 사용자명/IP 리터럴 목록
//!
//! 리터럴은 설정에 나열된 순서 그대로 보관하고 검사합니다.
//! 매칭 결과는 순서와 무관하지만(단락 OR), 검사 순서를 고정해
//! 어떤 리터럴이 먼저 걸렸는지 재현 가능하게 합니다.

/// 정적 블랙리스트
///
/// 생성 후 읽기 전용이므로 `Arc`로 공유할 때 잠금이 필요 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blacklist {
    /// 순서가 고정된 리터럴 목록 (중복 제거됨)
    literals: Vec<String>,
}

impl Blacklist {
    /// 리터럴 목록으로 블랙리스트를 생성합니다.
    ///
    /// 빈 문자열은 모든 메시지에 부분 문자열로 매칭되므로 제외하고,
    /// 중복은 첫 등장 위치만 남깁니다.
    pub fn new<I, S>(literals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for literal in literals {
            let literal = literal.into();
            if literal.is_empty() || ordered.contains(&literal) {
                continue;
            }
            ordered.push(literal);
        }
        Self { literals: ordered }
    }

    /// 기본 블랙리스트 (`baduser`, `192.0.2.1`)
    pub fn with_defaults() -> Self {
        Self::new(["baduser", "192.0.2.1"])
    }

    /// 리터럴 목록을 검사 순서대로 반환합니다.
    pub fn literals(&self) -> &[String] {
        &self.literals
    }

    /// 등록된 리터럴 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// 소문자로 바꾼 사용자명이 블랙리스트 멤버인지 확인합니다.
    pub fn contains_user(&self, username: &str) -> bool {
        let lowered = username.to_lowercase();
        self.literals.iter().any(|l| *l == lowered)
    }

    /// 원본 메시지에 부분 문자열로 포함된 첫 번째 리터럴을 반환합니다.
    ///
    /// 대소문자를 구분합니다.
    pub fn first_match_in<'a>(&'a self, message: &str) -> Option<&'a str> {
        self.literals
            .iter()
            .find(|l| message.contains(l.as_str()))
            .map(String::as_str)
    }

    /// 사용자명 멤버십 또는 메시지 내 리터럴 포함 여부를 판정합니다.
    pub fn is_flagged(&self, username: Option<&str>, message: &str) -> bool {
        if username.is_some_and(|u| self.contains_user(u)) {
            return true;
        }
        self.first_match_in(message).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_declared_order() {
        let bl = Blacklist::with_defaults();
        assert_eq!(bl.literals(), ["baduser", "192.0.2.1"]);
        assert_eq!(bl.len(), 2);
    }

    #[test]
    fn new_drops_empty_and_duplicate_literals() {
        let bl = Blacklist::new(["a", "", "b", "a"]);
        assert_eq!(bl.literals(), ["a", "b"]);
    }

    #[test]
    fn user_membership_is_case_insensitive_on_username() {
        let bl = Blacklist::with_defaults();
        assert!(bl.contains_user("BadUser"));
        assert!(bl.contains_user("baduser"));
        assert!(!bl.contains_user("gooduser"));
    }

    #[test]
    fn substring_scan_is_case_sensitive() {
        let bl = Blacklist::with_defaults();
        assert_eq!(bl.first_match_in("from 192.0.2.1 port 22"), Some("192.0.2.1"));
        assert_eq!(bl.first_match_in("user BADUSER"), None);
    }

    #[test]
    fn first_match_follows_declared_order() {
        let bl = Blacklist::new(["192.0.2.1", "baduser"]);
        let msg = "baduser from 192.0.2.1";
        assert_eq!(bl.first_match_in(msg), Some("192.0.2.1"));
    }

    #[test]
    fn ip_literal_flags_without_username() {
        let bl = Blacklist::with_defaults();
        assert!(bl.is_flagged(None, "Accepted password from 192.0.2.1"));
        assert!(!bl.is_flagged(None, "Accepted password from 198.51.100.23"));
    }

    #[test]
    fn empty_blacklist_never_flags() {
        let bl = Blacklist::default();
        assert!(bl.is_empty());
        assert!(!bl.is_flagged(Some("baduser"), "baduser 192.0.2.1"));
    }
}
