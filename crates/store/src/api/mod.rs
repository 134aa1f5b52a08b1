//! 수집/조회 HTTP API
//!
//! | 경로 | 메서드 | 응답 |
//! |---|---|---|
//! | `/ingest` | POST | 202 / 400 `invalid payload: ...` / 500 `save error: ...` |
//! | `/logs` | GET | 레코드 JSON 배열 |
//! | `/metrics` | GET | `{total_logs, by_category, by_severity}` |
//!
//! 등록되지 않은 메서드는 405를 반환합니다.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::StoreError;
use crate::storage::FileStore;

pub use error::ApiError;

/// 저장소를 공유 상태로 갖는 라우터를 만듭니다.
pub fn router(store: Arc<FileStore>) -> Router {
    Router::new()
        .route("/ingest", post(handlers::ingest))
        .route("/logs", get(handlers::logs))
        .route("/metrics", get(handlers::metrics))
        .with_state(store)
}

/// 수집/조회 API 서버
pub struct ApiServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    router: Router,
    shutdown: CancellationToken,
}

impl ApiServer {
    /// 주소에 바인드합니다.
    ///
    /// # Errors
    ///
    /// 바인드에 실패하면 `StoreError::Bind`를 반환합니다.
    pub async fn bind(addr: &str, store: Arc<FileStore>) -> Result<Self, StoreError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| StoreError::Bind {
                addr: addr.to_owned(),
                reason: e.to_string(),
            })?;
        let local_addr = listener.local_addr()?;

        info!(%local_addr, storage = %store.path().display(), "api server bound");

        Ok(Self {
            listener,
            local_addr,
            router: router(store),
            shutdown: CancellationToken::new(),
        })
    }

    /// 실제 바인드된 주소
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 서버를 멈추는 토큰을 반환합니다.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// 요청을 처리합니다. 종료 토큰이 취소되면 진행 중 요청을 마친 뒤 반환합니다.
    pub async fn run(self) -> Result<(), StoreError> {
        info!(local_addr = %self.local_addr, "api server listening");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(self.shutdown.cancelled_owned())
            .await?;
        info!("api server stopped");
        Ok(())
    }
}
