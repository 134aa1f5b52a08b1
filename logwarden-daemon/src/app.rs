//! 역할별 실행 -- 설정 로딩, 수집기/저장 서버 구성
//!
//! `main`은 CLI 파싱과 시그널 처리만 하고, 실제 구성은 이 모듈이 담당합니다.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use logwarden_collector::{Blacklist, EnrichmentParser, HttpForwarder, IngestListener};
use logwarden_core::config::{CollectorConfig, LogwardenConfig, ServerConfig};
use logwarden_store::{ApiServer, FileStore};

use crate::cli::DaemonCli;

/// 설정을 로드합니다.
///
/// 기본값 → 설정 파일(지정 시) → 환경변수 → CLI 인자 순으로 덮어쓴 뒤 검증합니다.
pub async fn load_config(cli: &DaemonCli) -> Result<LogwardenConfig> {
    let mut config = match &cli.config {
        Some(path) => LogwardenConfig::load(path)
            .await
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => LogwardenConfig::from_env().context("invalid configuration")?,
    };

    apply_cli_overrides(&mut config, cli);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// CLI 인자로 로그 설정을 덮어씁니다.
pub fn apply_cli_overrides(config: &mut LogwardenConfig, cli: &DaemonCli) {
    if let Some(level) = &cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.general.log_format = format.clone();
    }
}

/// 수집기 리스너를 구성하고 바인드합니다.
///
/// # Errors
///
/// 정규식 컴파일 또는 바인드 실패 시 에러를 반환합니다.
pub async fn start_collector(config: &CollectorConfig) -> Result<IngestListener<HttpForwarder>> {
    let blacklist = Blacklist::new(config.blacklist.iter().cloned());
    let parser =
        Arc::new(EnrichmentParser::new(blacklist).context("failed to build enrichment parser")?);
    let forwarder = Arc::new(HttpForwarder::new(config.forward_url.clone()));

    info!(
        forward_url = %config.forward_url,
        blacklist = parser.blacklist().len(),
        "collector configured"
    );

    IngestListener::bind(&config.bind_addr, parser, forwarder)
        .await
        .context("failed to start collector")
}

/// 저장소를 열고 API 서버를 바인드합니다.
///
/// # Errors
///
/// 바인드 실패 시 에러를 반환합니다. 저장 파일 재생 실패는 치명적이지 않습니다.
pub async fn start_server(config: &ServerConfig) -> Result<ApiServer> {
    let store = Arc::new(FileStore::open(&config.storage_path).await);
    ApiServer::bind(&config.bind_addr, store)
        .await
        .context("failed to start api server")
}
