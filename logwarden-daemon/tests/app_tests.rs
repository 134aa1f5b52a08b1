//! Role startup tests: the daemon's collector and server wiring end to end.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use logwarden_core::config::{CollectorConfig, ServerConfig};
use logwarden_daemon::app;

#[tokio::test]
async fn test_collect_and_serve_roles_together() {
    let dir = tempfile::tempdir().unwrap();
    let server = app::start_server(&ServerConfig {
        bind_addr: "127.0.0.1:0".to_owned(),
        storage_path: dir.path().join("logs.jsonl").display().to_string(),
    })
    .await
    .expect("server should start");
    let api_addr = server.local_addr();
    let server_token = server.shutdown_token();
    let server_task = tokio::spawn(server.run());

    let collector = app::start_collector(&CollectorConfig {
        bind_addr: "127.0.0.1:0".to_owned(),
        forward_url: format!("http://{api_addr}/ingest"),
        blacklist: vec!["mallory".to_owned()],
    })
    .await
    .expect("collector should start");
    let collector_addr = collector.local_addr();
    let collector_token = collector.shutdown_token();
    let collector_task = tokio::spawn(collector.run());

    let mut stream = TcpStream::connect(collector_addr).await.unwrap();
    stream
        .write_all(b"{\"message\":\"<134> host9 sshd: session opened by mallory\"}\n")
        .await
        .unwrap();

    let client = reqwest::Client::new();
    let url = format!("http://{api_addr}/logs?is.blacklisted=true");
    let records = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let response = client.get(&url).send().await.unwrap();
            let body: serde_json::Value = response.json().await.unwrap();
            if body.as_array().is_some_and(|a| !a.is_empty()) {
                break body;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("record should reach the store");

    assert_eq!(records[0]["username"], "mallory");
    assert_eq!(records[0]["hostname"], "host9");
    assert_eq!(records[0]["event.category"], "login.audit");

    collector_token.cancel();
    server_token.cancel();
    collector_task.await.unwrap().unwrap();
    server_task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_bind_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let occupied = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();

    let result = app::start_server(&ServerConfig {
        bind_addr: occupied.local_addr().unwrap().to_string(),
        storage_path: dir.path().join("logs.jsonl").display().to_string(),
    })
    .await;

    let err = result.err().expect("bind on occupied port should fail");
    assert!(format!("{err:#}").contains("failed to bind"), "{err:#}");
}
