//! 포워더 -- 보강된 레코드를 원격 수집 API로 전달합니다.
//!
//! 레코드 하나당 HTTP `POST` 한 번. 재시도, 큐잉, 명시적 타임아웃은 없습니다.
//! 리스너는 포워딩을 분리된(detached) 태스크로 실행하므로 포워딩 결과가
//! 읽기 루프의 성공 경로에 영향을 주지 않습니다.

use std::future::Future;
use std::time::Instant;

use tracing::debug;

use logwarden_core::metrics as m;
use logwarden_core::types::StructuredRecord;

use crate::error::ForwardError;

/// 레코드 전달 추상화
///
/// 운영 환경에서는 [`HttpForwarder`]를, 테스트에서는 채널 기반 대역을 사용합니다.
pub trait RecordForwarder: Send + Sync + 'static {
    /// 레코드 하나를 전달합니다.
    ///
    /// # Errors
    ///
    /// - `ForwardError::Transport`: 연결 실패 등 전송 계층 에러
    /// - `ForwardError::Status`: 2xx가 아닌 응답
    fn forward(
        &self,
        record: StructuredRecord,
    ) -> impl Future<Output = Result<(), ForwardError>> + Send;
}

/// reqwest 기반 HTTP 포워더
#[derive(Debug, Clone)]
pub struct HttpForwarder {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpForwarder {
    /// 지정한 엔드포인트로 전달하는 포워더를 생성합니다.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    /// 외부에서 구성한 클라이언트로 포워더를 생성합니다.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// 대상 엔드포인트를 반환합니다.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, record: &StructuredRecord) -> Result<(), ForwardError> {
        let body = serde_json::to_vec(record)?;
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| ForwardError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ForwardError::Status {
                status: status.as_u16(),
                body: body.trim().to_owned(),
            });
        }

        debug!(endpoint = %self.endpoint, status = status.as_u16(), "record forwarded");
        Ok(())
    }
}

impl RecordForwarder for HttpForwarder {
    async fn forward(&self, record: StructuredRecord) -> Result<(), ForwardError> {
        let started = Instant::now();
        let result = self.post(&record).await;

        metrics::histogram!(m::COLLECTOR_FORWARD_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        let outcome = if result.is_ok() { "success" } else { "failure" };
        metrics::counter!(m::COLLECTOR_FORWARDS_TOTAL, m::LABEL_RESULT => outcome).increment(1);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn endpoint_is_kept() {
        let fwd = HttpForwarder::new("http://127.0.0.1:8081/ingest");
        assert_eq!(fwd.endpoint(), "http://127.0.0.1:8081/ingest");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        // 포트 1은 리스닝 중이 아니므로 연결이 거부된다
        let fwd = HttpForwarder::new("http://127.0.0.1:1/ingest");
        let record = StructuredRecord::new(Utc::now(), "event");
        let err = fwd.forward(record).await.unwrap_err();
        assert!(matches!(err, ForwardError::Transport(_)));
    }

    #[tokio::test]
    async fn https_endpoint_starts_tls_handshake() {
        use tokio::io::AsyncReadExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut first = [0u8; 1];
            socket.read_exact(&mut first).await.unwrap();
            first[0]
        });

        let fwd = HttpForwarder::new(format!("https://{addr}/ingest"));
        let record = StructuredRecord::new(Utc::now(), "event");
        let forward = tokio::spawn(async move { fwd.forward(record).await });

        // 0x16 = TLS handshake 레코드 (ClientHello)
        assert_eq!(server.await.unwrap(), 0x16);
        let err = forward.await.unwrap().unwrap_err();
        assert!(matches!(err, ForwardError::Transport(_)));
    }
}
