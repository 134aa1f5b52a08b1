//! 조회 엔진 -- 미러 슬라이스에 대한 필터/정렬/제한과 그룹 집계
//!
//! 모든 함수는 순수 함수이며 잠금은 호출자(`FileStore`)가 책임집니다.
//!
//! # 필터 의미
//! 제공된 모든 조건을 동시에 만족해야 매칭됩니다 (AND).
//!
//! | 파라미터 | 필드 | 비교 |
//! |---|---|---|
//! | `service` | `event.category` | 정확히 일치 |
//! | `level` | `severity` | 대소문자 무시 일치 |
//! | `username` | `username` | 정확히 일치 |
//! | `is.blacklisted` | `is.blacklisted` | `"true"`이면 true, 그 밖의 값은 false |

use std::collections::{BTreeMap, HashMap};

use logwarden_core::types::StructuredRecord;

/// 필터 파라미터 키
pub const PARAM_SERVICE: &str = "service";
/// 심각도 필터 키
pub const PARAM_LEVEL: &str = "level";
/// 사용자명 필터 키
pub const PARAM_USERNAME: &str = "username";
/// 블랙리스트 필터 키
pub const PARAM_BLACKLISTED: &str = "is.blacklisted";
/// 결과 개수 제한 키
pub const PARAM_LIMIT: &str = "limit";
/// 정렬 키
pub const PARAM_SORT: &str = "sort";

/// 레코드 필터 (AND 결합)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// 이벤트 분류 일치
    pub category: Option<String>,
    /// 심각도 일치 (대소문자 무시)
    pub severity: Option<String>,
    /// 사용자명 일치
    pub username: Option<String>,
    /// 블랙리스트 플래그 일치
    pub is_blacklisted: Option<bool>,
}

impl RecordFilter {
    /// 문자열 파라미터 맵에서 필터를 만듭니다.
    ///
    /// 값이 빈 파라미터와 알 수 없는 키는 무시합니다.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            params
                .get(key)
                .filter(|v| !v.is_empty())
                .map(ToOwned::to_owned)
        };

        Self {
            category: get(PARAM_SERVICE),
            severity: get(PARAM_LEVEL),
            username: get(PARAM_USERNAME),
            is_blacklisted: get(PARAM_BLACKLISTED).map(|v| v == "true"),
        }
    }

    /// 레코드가 모든 조건을 만족하는지 검사합니다.
    pub fn matches(&self, record: &StructuredRecord) -> bool {
        if let Some(category) = &self.category {
            if *category != record.event_category {
                return false;
            }
        }
        if let Some(severity) = &self.severity {
            let actual = record.severity.as_deref().unwrap_or("");
            if !severity.eq_ignore_ascii_case(actual) {
                return false;
            }
        }
        if let Some(username) = &self.username {
            if record.username.as_deref() != Some(username.as_str()) {
                return false;
            }
        }
        if let Some(flag) = self.is_blacklisted {
            if flag != record.is_blacklisted {
                return false;
            }
        }
        true
    }

    /// 조건이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 결과 정렬 방식
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// 저장 순서 (append 순서) 유지
    #[default]
    Insertion,
    /// 타임스탬프 오름차순 (동점은 저장 순서 유지)
    Timestamp,
}

impl SortOrder {
    /// `sort` 파라미터 값을 해석합니다. `"timestamp"` 외의 값은 저장 순서입니다.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("timestamp") => Self::Timestamp,
            _ => Self::Insertion,
        }
    }
}

/// 조회 요청 (필터 + 제한 + 정렬)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// 필터 조건
    pub filter: RecordFilter,
    /// 최대 결과 수. `None`이면 전체.
    pub limit: Option<usize>,
    /// 정렬 방식
    pub sort: SortOrder,
}

impl LogQuery {
    /// HTTP 쿼리 문자열 파라미터에서 조회 요청을 만듭니다.
    ///
    /// `limit`이 0 이하이거나 정수가 아니면 제한하지 않습니다.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let limit = params
            .get(PARAM_LIMIT)
            .and_then(|v| v.trim().parse::<i64>().ok())
            .and_then(|n| usize::try_from(n).ok())
            .filter(|n| *n > 0);

        Self {
            filter: RecordFilter::from_params(params),
            limit,
            sort: SortOrder::from_param(params.get(PARAM_SORT).map(String::as_str)),
        }
    }

    /// 필터를 지정합니다.
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = filter;
        self
    }

    /// 결과 수 제한을 지정합니다. 0이면 제한하지 않습니다.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// 정렬 방식을 지정합니다.
    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }
}

/// 레코드를 선형 스캔하여 조회 결과를 만듭니다.
///
/// 필터 → 정렬 → 제한 순서로 적용합니다.
pub fn run_query(records: &[StructuredRecord], query: &LogQuery) -> Vec<StructuredRecord> {
    let mut result: Vec<StructuredRecord> = records
        .iter()
        .filter(|r| query.filter.matches(r))
        .cloned()
        .collect();

    if query.sort == SortOrder::Timestamp {
        // sort_by_key는 안정 정렬
        result.sort_by_key(|r| r.timestamp);
    }

    if let Some(limit) = query.limit {
        result.truncate(limit);
    }

    result
}

/// 그룹 집계 대상 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    /// `event.category`
    Category,
    /// `severity` (값이 없으면 빈 문자열 그룹)
    Severity,
}

/// 필드 값별 레코드 수를 셉니다.
///
/// 값이 없거나 빈 레코드도 빈 문자열 키로 집계됩니다.
pub fn group_by(records: &[StructuredRecord], field: GroupField) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        let key = match field {
            GroupField::Category => record.event_category.as_str(),
            GroupField::Severity => record.severity.as_deref().unwrap_or(""),
        };
        *counts.entry(key.to_owned()).or_insert(0) += 1;
    }
    counts
}
