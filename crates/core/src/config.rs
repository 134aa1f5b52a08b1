//! 설정 관리 -- logwarden.toml 파싱 및 런타임 설정
//!
//! [`LogwardenConfig`]는 수집기와 저장 서버 설정을 모두 담는 최상위 구조체입니다.
//! 두 프로세스가 같은 파일을 공유하고 각자 자기 섹션만 읽습니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGWARDEN_SERVER_STORAGE_PATH=/data/logs.jsonl` 형식)
//! 3. 설정 파일 (`logwarden.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logwarden_core::error::LogwardenError> {
//! use logwarden_core::config::LogwardenConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogwardenConfig::load("logwarden.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogwardenConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogwardenError};

/// Logwarden 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogwardenConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 수집기 설정
    #[serde(default)]
    pub collector: CollectorConfig,
    /// 저장/조회 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// Prometheus 메트릭 설정
    #[serde(default)]
    pub metrics: MetricsConfig,
}

impl LogwardenConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogwardenError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일 없이 기본값에 환경변수 오버라이드만 적용합니다.
    pub fn from_env() -> Result<Self, LogwardenError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogwardenError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogwardenError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogwardenError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogwardenError> {
        toml::from_str(toml_str).map_err(|e| {
            LogwardenError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGWARDEN_{SECTION}_{FIELD}`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGWARDEN_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGWARDEN_GENERAL_LOG_FORMAT");

        // Collector
        override_string(
            &mut self.collector.bind_addr,
            "LOGWARDEN_COLLECTOR_BIND_ADDR",
        );
        override_string(
            &mut self.collector.forward_url,
            "LOGWARDEN_COLLECTOR_FORWARD_URL",
        );
        override_csv(
            &mut self.collector.blacklist,
            "LOGWARDEN_COLLECTOR_BLACKLIST",
        );

        // Server
        override_string(&mut self.server.bind_addr, "LOGWARDEN_SERVER_BIND_ADDR");
        override_string(
            &mut self.server.storage_path,
            "LOGWARDEN_SERVER_STORAGE_PATH",
        );

        // Metrics
        override_bool(&mut self.metrics.enabled, "LOGWARDEN_METRICS_ENABLED");
        override_string(
            &mut self.metrics.listen_addr,
            "LOGWARDEN_METRICS_LISTEN_ADDR",
        );
        override_u16(&mut self.metrics.port, "LOGWARDEN_METRICS_PORT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogwardenError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        if self.collector.bind_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "collector.bind_addr".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        let url = self.collector.forward_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                field: "collector.forward_url".to_owned(),
                reason: format!("'{url}' must be an http:// or https:// URL"),
            }
            .into());
        }

        if self.collector.blacklist.iter().any(|l| l.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "collector.blacklist".to_owned(),
                reason: "blacklist entries must not be empty".to_owned(),
            }
            .into());
        }

        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.bind_addr".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.server.storage_path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "server.storage_path".to_owned(),
                reason: "must not be empty".to_owned(),
            }
            .into());
        }

        if self.metrics.enabled && self.metrics.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "metrics.port".to_owned(),
                reason: "must be greater than 0 when metrics are enabled".to_owned(),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "json".to_owned(),
        }
    }
}

/// 수집기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// 스트림 수신 바인드 주소
    pub bind_addr: String,
    /// 보강된 레코드를 전달할 수집 API 엔드포인트
    pub forward_url: String,
    /// 블랙리스트 리터럴 (사용자명 또는 IP 문자열), 순서대로 검사
    pub blacklist: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:6000".to_owned(),
            forward_url: "http://log-server:8081/ingest".to_owned(),
            blacklist: vec!["baduser".to_owned(), "192.0.2.1".to_owned()],
        }
    }
}

/// 저장/조회 서버 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP 바인드 주소
    pub bind_addr: String,
    /// append-only 저장 파일 경로 (JSON Lines)
    pub storage_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8081".to_owned(),
            storage_path: "/data/logs.jsonl".to_owned(),
        }
    }
}

/// Prometheus 메트릭 익스포터 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// 활성화 여부
    pub enabled: bool,
    /// 리스너 주소
    pub listen_addr: String,
    /// 리스너 포트
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: "127.0.0.1".to_owned(),
            port: 9100,
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_u16(target: &mut u16, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u16>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u16 from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_config_has_sane_values() {
        let config = LogwardenConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.general.log_format, "json");
        assert_eq!(config.collector.bind_addr, "0.0.0.0:6000");
        assert_eq!(config.collector.forward_url, "http://log-server:8081/ingest");
        assert_eq!(config.collector.blacklist, vec!["baduser", "192.0.2.1"]);
        assert_eq!(config.server.bind_addr, "0.0.0.0:8081");
        assert_eq!(config.server.storage_path, "/data/logs.jsonl");
        assert!(!config.metrics.enabled);
    }

    #[test]
    fn default_config_passes_validation() {
        LogwardenConfig::default().validate().unwrap();
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = LogwardenConfig::parse("").unwrap();
        assert_eq!(config.server.storage_path, "/data/logs.jsonl");
    }

    #[test]
    fn parse_partial_toml_merges_with_defaults() {
        let toml = r#"
[collector]
bind_addr = "127.0.0.1:6001"

[server]
storage_path = "/tmp/logwarden/logs.jsonl"
"#;
        let config = LogwardenConfig::parse(toml).unwrap();
        assert_eq!(config.collector.bind_addr, "127.0.0.1:6001");
        // forward_url은 기본값 유지
        assert_eq!(config.collector.forward_url, "http://log-server:8081/ingest");
        assert_eq!(config.server.storage_path, "/tmp/logwarden/logs.jsonl");
        assert_eq!(config.server.bind_addr, "0.0.0.0:8081");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let err = LogwardenConfig::parse("invalid = [[[toml").unwrap_err();
        assert!(matches!(
            err,
            LogwardenError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = LogwardenConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_non_http_forward_url() {
        let mut config = LogwardenConfig::default();
        config.collector.forward_url = "log-server:8081/ingest".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("forward_url"));
    }

    #[test]
    fn validate_accepts_https_forward_url() {
        let mut config = LogwardenConfig::default();
        config.collector.forward_url = "https://log-server:8443/ingest".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_blacklist_entry() {
        let mut config = LogwardenConfig::default();
        config.collector.blacklist.push("  ".to_owned());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blacklist"));
    }

    #[test]
    fn validate_accepts_empty_blacklist() {
        let mut config = LogwardenConfig::default();
        config.collector.blacklist.clear();
        config.validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_storage_path() {
        let mut config = LogwardenConfig::default();
        config.server.storage_path = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("storage_path"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_LOGWARDEN_STR", "overridden") };
        override_string(&mut val, "TEST_LOGWARDEN_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_LOGWARDEN_STR") };
    }

    #[test]
    #[serial]
    fn env_override_bool_invalid_keeps_original() {
        let mut val = false;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_LOGWARDEN_BOOL_BAD", "not-a-bool") };
        override_bool(&mut val, "TEST_LOGWARDEN_BOOL_BAD");
        assert!(!val);
        unsafe { std::env::remove_var("TEST_LOGWARDEN_BOOL_BAD") };
    }

    #[test]
    #[serial]
    fn env_override_csv_trims_and_drops_empty() {
        let mut val = vec!["a".to_owned()];
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_LOGWARDEN_CSV", "baduser, 10.0.0.1,,") };
        override_csv(&mut val, "TEST_LOGWARDEN_CSV");
        assert_eq!(val, vec!["baduser", "10.0.0.1"]);
        unsafe { std::env::remove_var("TEST_LOGWARDEN_CSV") };
    }

    #[test]
    #[serial]
    fn env_override_u16_invalid_keeps_original() {
        let mut val = 9100u16;
        // SAFETY: serial 테스트로 실행되므로 환경변수 조작이 다른 테스트와 겹치지 않습니다.
        unsafe { std::env::set_var("TEST_LOGWARDEN_PORT", "99999") };
        override_u16(&mut val, "TEST_LOGWARDEN_PORT");
        assert_eq!(val, 9100);
        unsafe { std::env::remove_var("TEST_LOGWARDEN_PORT") };
    }

    #[test]
    fn config_serialize_roundtrip() {
        let config = LogwardenConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = LogwardenConfig::parse(&toml_str).unwrap();
        assert_eq!(config.collector.blacklist, parsed.collector.blacklist);
        assert_eq!(config.server.storage_path, parsed.server.storage_path);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let err = LogwardenConfig::from_file("/nonexistent/path/logwarden.toml")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LogwardenError::Config(ConfigError::FileNotFound { .. })
        ));
    }
}
