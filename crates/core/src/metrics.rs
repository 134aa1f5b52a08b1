//! 메트릭 상수 및 설명 등록
//!
//! 모든 Prometheus 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 수집기와 저장소는 이 상수로 `metrics::counter!()` 등을 호출합니다.
//! 전역 레코더가 설치되지 않았으면 매크로 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `logwarden_`
//! - 모듈명: `collector_`, `store_`
//! - 접미어: `_total` (counter), `_seconds` (histogram/latency), 없음 (gauge)

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 이벤트 분류 레이블 키 (login.audit, logout.audit, event, unknown)
pub const LABEL_CATEGORY: &str = "category";

/// 결과 레이블 키 (success, failure)
pub const LABEL_RESULT: &str = "result";

// ─── Collector 메트릭 ───────────────────────────────────────────────

/// Collector: 수신한 전체 라인 수 (counter)
pub const COLLECTOR_LINES_RECEIVED_TOTAL: &str = "logwarden_collector_lines_received_total";

/// Collector: JSON 디코딩 실패 라인 수 (counter)
pub const COLLECTOR_DECODE_ERRORS_TOTAL: &str = "logwarden_collector_decode_errors_total";

/// Collector: 보강된 레코드 수 (counter, label: category)
pub const COLLECTOR_RECORDS_ENRICHED_TOTAL: &str = "logwarden_collector_records_enriched_total";

/// Collector: 블랙리스트에 걸린 레코드 수 (counter)
pub const COLLECTOR_BLACKLIST_HITS_TOTAL: &str = "logwarden_collector_blacklist_hits_total";

/// Collector: 포워딩 시도 수 (counter, label: result)
pub const COLLECTOR_FORWARDS_TOTAL: &str = "logwarden_collector_forwards_total";

/// Collector: 포워딩 지연 시간 (histogram, 초)
pub const COLLECTOR_FORWARD_DURATION_SECONDS: &str =
    "logwarden_collector_forward_duration_seconds";

/// Collector: 현재 열린 스트림 연결 수 (gauge)
pub const COLLECTOR_ACTIVE_CONNECTIONS: &str = "logwarden_collector_active_connections";

// ─── Store 메트릭 ───────────────────────────────────────────────────

/// Store: 저장된 레코드 수 (counter, label: category)
pub const STORE_RECORDS_SAVED_TOTAL: &str = "logwarden_store_records_saved_total";

/// Store: 파일 쓰기 실패 수 (counter)
pub const STORE_WRITE_ERRORS_TOTAL: &str = "logwarden_store_write_errors_total";

/// Store: 시작 시 재생(replay)된 레코드 수 (gauge)
pub const STORE_REPLAYED_RECORDS: &str = "logwarden_store_replayed_records";

/// Store: 미러에 보관 중인 레코드 수 (gauge)
pub const STORE_MIRROR_SIZE: &str = "logwarden_store_mirror_size";

/// Store: 조회 요청 수 (counter)
pub const STORE_QUERIES_TOTAL: &str = "logwarden_store_queries_total";

// ─── 히스토그램 버킷 정의 ────────────────────────────────────────────

/// 포워딩 지연 시간 히스토그램 버킷 (초)
///
/// 1ms ~ 30s 범위 (타임아웃이 없으므로 긴 꼬리를 포함)
pub const FORWARD_DURATION_BUCKETS: [f64; 9] = [0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 30.0];

// ─── 설명 등록 함수 ─────────────────────────────────────────────────

/// 모든 메트릭의 설명(description)을 등록합니다.
///
/// 전역 레코더 설치 후 한 번만 호출합니다.
pub fn describe_all() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // Collector
    describe_counter!(
        COLLECTOR_LINES_RECEIVED_TOTAL,
        "Total number of raw lines received over stream connections"
    );
    describe_counter!(
        COLLECTOR_DECODE_ERRORS_TOTAL,
        "Total number of lines skipped because they were not valid JSON events"
    );
    describe_counter!(
        COLLECTOR_RECORDS_ENRICHED_TOTAL,
        "Total number of records produced by the enrichment parser"
    );
    describe_counter!(
        COLLECTOR_BLACKLIST_HITS_TOTAL,
        "Total number of enriched records flagged as blacklisted"
    );
    describe_counter!(
        COLLECTOR_FORWARDS_TOTAL,
        "Total number of forward attempts to the ingestion endpoint"
    );
    describe_histogram!(
        COLLECTOR_FORWARD_DURATION_SECONDS,
        "Latency of a single forward call in seconds"
    );
    describe_gauge!(
        COLLECTOR_ACTIVE_CONNECTIONS,
        "Number of currently open stream connections"
    );

    // Store
    describe_counter!(
        STORE_RECORDS_SAVED_TOTAL,
        "Total number of records durably appended"
    );
    describe_counter!(
        STORE_WRITE_ERRORS_TOTAL,
        "Total number of failed durable appends"
    );
    describe_gauge!(
        STORE_REPLAYED_RECORDS,
        "Number of records recovered from the storage file at startup"
    );
    describe_gauge!(
        STORE_MIRROR_SIZE,
        "Number of records held in the in-memory mirror"
    );
    describe_counter!(STORE_QUERIES_TOTAL, "Total number of record queries served");
}
