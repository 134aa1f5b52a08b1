//! 통합 테스트 -- TCP 수신부터 HTTP 포워딩까지의 수집기 전체 흐름 검증
//!
//! 수집 API 자리에 axum 스텁 서버를 띄우고, 실제 [`HttpForwarder`]로 전달된
//! 레코드를 채널로 받아 확인합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::http::StatusCode;
use axum::routing::post;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;

use logwarden_collector::{
    Blacklist, EnrichmentParser, ForwardError, HttpForwarder, IngestListener, RecordForwarder,
};
use logwarden_core::types::StructuredRecord;

/// 지정한 상태 코드로 응답하고, 받은 레코드를 채널로 넘기는 수집 API 스텁
async fn spawn_ingest_stub(
    status: StatusCode,
) -> (String, mpsc::UnboundedReceiver<StructuredRecord>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let app = Router::new().route(
        "/ingest",
        post(move |body: Bytes| {
            let tx = tx.clone();
            async move {
                if let Ok(record) = serde_json::from_slice::<StructuredRecord>(&body) {
                    let _ = tx.send(record);
                }
                (status, "stub")
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    (format!("http://{addr}/ingest"), rx)
}

/// 수집기 리스너를 띄우고 바인드된 주소를 반환합니다.
async fn spawn_collector(endpoint: &str, blacklist: Blacklist) -> std::net::SocketAddr {
    let parser = Arc::new(EnrichmentParser::new(blacklist).expect("parser"));
    let forwarder = Arc::new(HttpForwarder::new(endpoint));
    let listener = IngestListener::bind("127.0.0.1:0", parser, forwarder)
        .await
        .expect("bind collector");
    let addr = listener.local_addr();
    tokio::spawn(listener.run());
    addr
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<StructuredRecord>) -> StructuredRecord {
    timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for forwarded record")
        .expect("stub channel closed")
}

/// 생성기 샘플 라인이 보강되어 수집 API에 도착하는지 확인
#[tokio::test]
async fn test_line_is_enriched_and_forwarded() {
    let (endpoint, mut rx) = spawn_ingest_stub(StatusCode::ACCEPTED).await;
    let addr = spawn_collector(&endpoint, Blacklist::with_defaults()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    let line = concat!(
        r#"{"timestamp":"2024-01-15T12:00:00Z","hostname":"gen","message":"<86> host1 sudo: "#,
        r#"pam_unix(sudo:session): session opened for user root(uid=0) by motadata(uid=1000)"}"#,
    );
    stream.write_all(format!("{line}\n").as_bytes()).await.unwrap();

    let record = recv(&mut rx).await;
    assert_eq!(record.event_category, "login.audit");
    assert_eq!(record.username.as_deref(), Some("motadata"));
    assert_eq!(record.hostname.as_deref(), Some("host1"));
    assert_eq!(record.severity.as_deref(), Some("INFO"));
    assert!(!record.is_blacklisted);
    assert_eq!(record.timestamp.to_rfc3339(), "2024-01-15T12:00:00+00:00");
}

/// 블랙리스트 사용자는 플래그가 켜진 채 전달되는지 확인
#[tokio::test]
async fn test_blacklisted_user_is_flagged() {
    let (endpoint, mut rx) = spawn_ingest_stub(StatusCode::ACCEPTED).await;
    let addr = spawn_collector(&endpoint, Blacklist::with_defaults()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"{\"message\":\"<134> host2 su: session opened by baduser\"}\n")
        .await
        .unwrap();

    let record = recv(&mut rx).await;
    assert_eq!(record.username.as_deref(), Some("baduser"));
    assert_eq!(record.severity.as_deref(), Some("WARN"));
    assert!(record.is_blacklisted);
}

/// 잘못된 라인 뒤에도 같은 연결의 다음 라인이 처리되는지 확인
#[tokio::test]
async fn test_malformed_line_does_not_close_connection() {
    let (endpoint, mut rx) = spawn_ingest_stub(StatusCode::ACCEPTED).await;
    let addr = spawn_collector(&endpoint, Blacklist::with_defaults()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(b"this is not json\n").await.unwrap();
    stream
        .write_all(b"{\"message\":\"<86> host1 pam_unix: session closed for user motadata\"}\n")
        .await
        .unwrap();

    let record = recv(&mut rx).await;
    assert_eq!(record.event_category, "logout.audit");
}

/// 여러 연결이 동시에 독립적으로 처리되는지 확인
#[tokio::test]
async fn test_concurrent_connections() {
    let (endpoint, mut rx) = spawn_ingest_stub(StatusCode::ACCEPTED).await;
    let addr = spawn_collector(&endpoint, Blacklist::with_defaults()).await;

    let mut handles = Vec::new();
    for i in 0..5 {
        handles.push(tokio::spawn(async move {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            for j in 0..4 {
                let line = format!("{{\"message\":\"<86> host{i} app: job {j} by worker{i}\"}}\n");
                stream.write_all(line.as_bytes()).await.unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.expect("writer task failed");
    }

    let mut received = Vec::new();
    for _ in 0..20 {
        received.push(recv(&mut rx).await);
    }
    assert_eq!(received.len(), 20);
    assert!(received.iter().all(|r| r.event_category == "event"));
    assert!(
        received
            .iter()
            .all(|r| r.username.as_deref().is_some_and(|u| u.starts_with("worker")))
    );
}

/// 포워딩 실패가 이후 라인 처리를 막지 않는지 확인
#[tokio::test]
async fn test_forward_failure_does_not_block_reader() {
    let (endpoint, mut rx) = spawn_ingest_stub(StatusCode::INTERNAL_SERVER_ERROR).await;
    let addr = spawn_collector(&endpoint, Blacklist::with_defaults()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    for _ in 0..3 {
        stream
            .write_all(b"{\"message\":\"<86> host1 app: heartbeat\"}\n")
            .await
            .unwrap();
    }

    // 스텁은 500을 돌려주지만 세 레코드 모두 도착해야 한다
    for _ in 0..3 {
        let record = recv(&mut rx).await;
        assert_eq!(record.event_category, "event");
    }
}

/// 2xx가 아닌 응답은 ForwardError::Status로 분류되는지 확인
#[tokio::test]
async fn test_non_success_status_is_forward_error() {
    let (endpoint, _rx) = spawn_ingest_stub(StatusCode::BAD_REQUEST).await;
    let forwarder = HttpForwarder::new(endpoint);

    let record = StructuredRecord::new(chrono::Utc::now(), "event");
    let err = forwarder.forward(record).await.unwrap_err();
    match err {
        ForwardError::Status { status, body } => {
            assert_eq!(status, 400);
            assert_eq!(body, "stub");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}
