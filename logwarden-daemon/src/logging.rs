//! 로깅 초기화
//!
//! `[general]` 섹션의 `log_level`/`log_format`으로 전역 `tracing` 구독자를 설치합니다.
//! `RUST_LOG` 환경변수가 있으면 `log_level`보다 우선합니다.

use anyhow::Result;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use logwarden_core::config::GeneralConfig;

/// 전역 tracing 구독자를 설치합니다.
///
/// 프로세스당 한 번, 첫 로그 이전에 호출해야 합니다.
///
/// - `"json"`: 수집 파이프라인용 JSON Lines (기본값)
/// - `"pretty"`: 개발용 사람이 읽는 형식
///
/// # Errors
///
/// 형식이 둘 중 하나가 아니거나 구독자가 이미 설치되어 있으면 에러를 반환합니다.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match config.log_format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        "pretty" => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
        other => {
            return Err(anyhow::anyhow!(
                "unknown log format '{other}', expected 'json' or 'pretty'"
            ));
        }
    };

    installed.map_err(|e| {
        anyhow::anyhow!(
            "failed to initialize {} tracing subscriber: {}",
            config.log_format,
            e
        )
    })
}
