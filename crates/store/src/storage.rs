//! 파일 저장 엔진 -- JSON Lines append 파일 + 메모리 미러
//!
//! 파일 한 줄에 [`StructuredRecord`] 하나를 기록하며, 같은 레코드를 메모리
//! 벡터(미러)에도 보관해 조회에 사용합니다. 파일과 미러는 하나의
//! `tokio::sync::Mutex` 아래에서 함께 갱신되므로 동시 저장도 단일 순서로
//! 직렬화됩니다.
//!
//! # 불변식
//! - 미러에 있는 레코드는 반드시 파일에도 기록되어 있다
//! - 미러 순서 == 파일 줄 순서 == append 순서
//! - 저장된 레코드는 수정/삭제되지 않는다

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use logwarden_core::metrics as m;
use logwarden_core::types::StructuredRecord;

use crate::error::StoreError;
use crate::query::{GroupField, LogQuery, group_by, run_query};

/// 전체 통계 (`GET /metrics` 응답 본문)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    /// 저장된 레코드 수
    pub total_logs: usize,
    /// 분류별 레코드 수
    pub by_category: BTreeMap<String, usize>,
    /// 심각도별 레코드 수 (심각도 없음은 빈 문자열 키)
    pub by_severity: BTreeMap<String, usize>,
}

/// JSON Lines 파일 기반 레코드 저장소
///
/// 프로세스당 하나를 만들어 `Arc`로 공유합니다.
pub struct FileStore {
    path: PathBuf,
    records: Mutex<Vec<StructuredRecord>>,
}

impl FileStore {
    /// 저장 파일을 열고 기존 레코드를 재생합니다.
    ///
    /// 실패하지 않습니다. 상위 디렉토리 생성 실패나 읽기 에러는 로그로 남기고
    /// 가능한 만큼(또는 빈 상태로) 시작합니다. 파일이 없으면 빈 저장소입니다.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                error!(path = %parent.display(), error = %e, "failed to create storage directory");
            }
        }

        let records = replay(&path).await;
        info!(path = %path.display(), records = records.len(), "file store opened");
        metrics::gauge!(m::STORE_REPLAYED_RECORDS).set(records.len() as f64);
        metrics::gauge!(m::STORE_MIRROR_SIZE).set(records.len() as f64);

        Self {
            path,
            records: Mutex::new(records),
        }
    }

    /// 저장 파일 경로를 반환합니다.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 레코드를 파일 끝에 기록하고 미러에 추가합니다.
    ///
    /// # Errors
    ///
    /// 직렬화 실패 시 `StoreError::Encode`, 파일 열기/쓰기/flush 실패 시
    /// `StoreError::Write`를 반환합니다. 어느 경우든 미러는 변경되지 않습니다.
    pub async fn save(&self, record: StructuredRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(&record)?;
        line.push(b'\n');

        let mut records = self.records.lock().await;

        if let Err(source) = append_line(&self.path, &line).await {
            metrics::counter!(m::STORE_WRITE_ERRORS_TOTAL).increment(1);
            return Err(StoreError::Write {
                path: self.path.display().to_string(),
                source,
            });
        }

        debug!(category = %record.event_category, "record saved");
        metrics::counter!(
            m::STORE_RECORDS_SAVED_TOTAL,
            m::LABEL_CATEGORY => record.event_category.clone()
        )
        .increment(1);

        records.push(record);
        metrics::gauge!(m::STORE_MIRROR_SIZE).set(records.len() as f64);
        Ok(())
    }

    /// 조건에 맞는 레코드를 반환합니다.
    pub async fn query(&self, query: &LogQuery) -> Vec<StructuredRecord> {
        metrics::counter!(m::STORE_QUERIES_TOTAL).increment(1);
        let records = self.records.lock().await;
        run_query(&records, query)
    }

    /// 저장된 레코드 수를 반환합니다.
    pub async fn count(&self) -> usize {
        self.records.lock().await.len()
    }

    /// 필드 값별 레코드 수를 반환합니다.
    pub async fn group_by(&self, field: GroupField) -> BTreeMap<String, usize> {
        let records = self.records.lock().await;
        group_by(&records, field)
    }

    /// 전체 수와 두 가지 그룹 집계를 한 번의 잠금으로 계산합니다.
    pub async fn summary(&self) -> StoreSummary {
        let records = self.records.lock().await;
        StoreSummary {
            total_logs: records.len(),
            by_category: group_by(&records, GroupField::Category),
            by_severity: group_by(&records, GroupField::Severity),
        }
    }
}

/// 파일을 append 모드로 열어 한 줄을 기록하고 flush합니다.
async fn append_line(path: &Path, line: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(line).await?;
    file.flush().await
}

/// 저장 파일을 처음부터 읽어 레코드를 복원합니다.
///
/// 빈 줄은 건너뛰고, 첫 디코딩 실패에서 멈춥니다 (그 이전 레코드는 유지).
async fn replay(path: &Path) -> Vec<StructuredRecord> {
    let file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "storage file not found, starting empty");
            return Vec::new();
        }
        Err(e) => {
            error!(
                path = %path.display(),
                error = %e,
                "failed to open storage file, starting empty"
            );
            return Vec::new();
        }
    };

    let mut lines = BufReader::new(file).lines();
    let mut records = Vec::new();
    let mut line_no = 0usize;

    loop {
        line_no += 1;
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                let err = StoreError::Replay {
                    line: line_no,
                    reason: e.to_string(),
                };
                warn!(path = %path.display(), error = %err, kept = records.len(), "replay aborted");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<StructuredRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                let err = StoreError::Replay {
                    line: line_no,
                    reason: e.to_string(),
                };
                warn!(path = %path.display(), error = %err, kept = records.len(), "replay aborted");
                break;
            }
        }
    }

    records
}
