//! 스트림 수집 리스너
//!
//! 줄바꿈으로 구분된 JSON 이벤트(`{"message": ..., "timestamp": ...}`)를
//! TCP 연결로 수신합니다. 연결마다 독립된 tokio 태스크가 라인을 읽고,
//! 보강 후 레코드마다 분리된 포워딩 태스크를 띄웁니다.
//!
//! # 에러 정책
//! - 디코딩 실패: 경고 로그 후 해당 라인만 건너뜀 (연결 유지)
//! - 잘못된 UTF-8: 치환 문자로 바꿔 디코딩 (연결 유지)
//! - 읽기 에러/EOF: 해당 연결 태스크만 종료
//! - accept 에러: 로그 후 루프 계속
//! - 바인드 실패: 호출자에게 반환 (치명적)
//!
//! 종료 토큰은 accept 루프만 멈춥니다. 이미 진행 중인 연결 읽기와
//! 포워딩 태스크는 취소하지 않습니다.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use logwarden_core::metrics as m;

use crate::error::CollectorError;
use crate::forwarder::RecordForwarder;
use crate::parser::{EnrichmentParser, decode_line};

/// 스트림 수집 리스너
///
/// [`bind`](Self::bind)로 소켓을 연 뒤 [`run`](Self::run)으로 accept 루프를 실행합니다.
pub struct IngestListener<F: RecordForwarder> {
    listener: TcpListener,
    local_addr: SocketAddr,
    parser: Arc<EnrichmentParser>,
    forwarder: Arc<F>,
    shutdown: CancellationToken,
}

impl<F: RecordForwarder> IngestListener<F> {
    /// 주소에 바인드합니다.
    ///
    /// # Errors
    ///
    /// 바인드에 실패하면 `CollectorError::Bind`를 반환합니다.
    pub async fn bind(
        addr: &str,
        parser: Arc<EnrichmentParser>,
        forwarder: Arc<F>,
    ) -> Result<Self, CollectorError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| CollectorError::Bind {
                addr: addr.to_owned(),
                reason: e.to_string(),
            })?;
        let local_addr = listener.local_addr()?;

        info!(%local_addr, blacklist = parser.blacklist().len(), "ingest listener bound");

        Ok(Self {
            listener,
            local_addr,
            parser,
            forwarder,
            shutdown: CancellationToken::new(),
        })
    }

    /// 실제 바인드된 주소를 반환합니다 (포트 0 바인드 시 유용).
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// accept 루프를 멈추는 토큰을 반환합니다.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// accept 루프를 실행합니다. 종료 토큰이 취소될 때까지 반환하지 않습니다.
    pub async fn run(self) -> Result<(), CollectorError> {
        info!(local_addr = %self.local_addr, "ingest listener accepting connections");

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    let (stream, peer) = match result {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            error!(error = %e, "accept error");
                            continue;
                        }
                    };

                    debug!(%peer, "accepted connection");

                    let parser = Arc::clone(&self.parser);
                    let forwarder = Arc::clone(&self.forwarder);
                    tokio::spawn(async move {
                        metrics::gauge!(m::COLLECTOR_ACTIVE_CONNECTIONS).increment(1.0);
                        handle_connection(stream, peer, parser, forwarder).await;
                        metrics::gauge!(m::COLLECTOR_ACTIVE_CONNECTIONS).decrement(1.0);
                    });
                }
                _ = self.shutdown.cancelled() => {
                    info!("ingest listener stopped accepting connections");
                    break;
                }
            }
        }

        Ok(())
    }
}

/// 연결 하나의 라인을 끝까지 읽습니다.
async fn handle_connection<F: RecordForwarder>(
    stream: TcpStream,
    peer: SocketAddr,
    parser: Arc<EnrichmentParser>,
    forwarder: Arc<F>,
) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => {
                debug!(%peer, "connection closed by peer");
                break;
            }
            Ok(_) => {
                // 잘못된 UTF-8 바이트는 U+FFFD로 치환하고 연결을 유지한다
                let line = String::from_utf8_lossy(&buf);
                let payload = line.trim();
                if payload.is_empty() {
                    continue;
                }
                metrics::counter!(m::COLLECTOR_LINES_RECEIVED_TOTAL).increment(1);
                process_line(payload, peer, &parser, &forwarder);
            }
            Err(e) => {
                warn!(%peer, error = %e, "read error, closing connection");
                break;
            }
        }
    }
}

/// 라인 하나를 디코딩/보강하고 포워딩 태스크를 분리 실행합니다.
fn process_line<F: RecordForwarder>(
    payload: &str,
    peer: SocketAddr,
    parser: &EnrichmentParser,
    forwarder: &Arc<F>,
) {
    let event = match decode_line(payload) {
        Ok(event) => event,
        Err(e) => {
            metrics::counter!(m::COLLECTOR_DECODE_ERRORS_TOTAL).increment(1);
            warn!(%peer, error = %e, line = payload, "skipping invalid line");
            return;
        }
    };

    let record = parser.enrich(&event);
    metrics::counter!(
        m::COLLECTOR_RECORDS_ENRICHED_TOTAL,
        m::LABEL_CATEGORY => record.event_category.clone()
    )
    .increment(1);
    if record.is_blacklisted {
        metrics::counter!(m::COLLECTOR_BLACKLIST_HITS_TOTAL).increment(1);
        info!(
            %peer,
            username = record.username.as_deref().unwrap_or("-"),
            hostname = record.hostname.as_deref().unwrap_or("-"),
            "blacklisted event"
        );
    }

    // 결과를 기다리지 않는다: 포워딩 지연이 다음 라인 읽기를 막지 않도록
    let forwarder = Arc::clone(forwarder);
    tokio::spawn(async move {
        if let Err(e) = forwarder.forward(record).await {
            error!(error = %e, "forward error");
        }
    });
}
