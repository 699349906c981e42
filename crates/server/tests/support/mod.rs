#![allow(dead_code)]

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use configs::AppConfig;
use sea_orm::DatabaseConnection;
use server::routes::ServerState;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub struct TestApp {
    pub base_url: String,
    pub http_addr: SocketAddr,
    pub grpc_addr: SocketAddr,
    /// 与服务共用的连接，用于预置数据
    pub db: DatabaseConnection,
    // dropping it stops both servers
    stop: Option<oneshot::Sender<()>>,
    served: Option<JoinHandle<anyhow::Result<()>>>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}/seckill{}", self.base_url, path)
    }

    /// Fire the shutdown signal without waiting.
    pub fn trigger_stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }

    /// Wait for `serve` to return after [`TestApp::trigger_stop`].
    pub async fn wait_stopped(&mut self) -> anyhow::Result<()> {
        match self.served.take() {
            Some(handle) => handle.await?,
            None => Ok(()),
        }
    }
}

pub fn config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.server.server_name = "seckill".into();
    cfg
}

/// HTTP and gRPC on ephemeral ports over a fresh in-memory database.
pub async fn start_server(cfg: AppConfig) -> anyhow::Result<TestApp> {
    start_server_with_drain(cfg, server::HTTP_DRAIN_TIMEOUT).await
}

pub async fn start_server_with_drain(cfg: AppConfig, drain: Duration) -> anyhow::Result<TestApp> {
    let db = models::db::connect_in_memory().await?;
    let state = ServerState::new(db.clone(), &cfg)?;

    let http = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let grpc = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
    let http_addr = http.local_addr()?;
    let grpc_addr = grpc.local_addr()?;

    let (tx, rx) = oneshot::channel::<()>();
    let served = tokio::spawn(async move {
        let signal = async move {
            let _ = rx.await;
        };
        server::serve_with_drain(state, http, grpc, signal, drain).await
    });

    Ok(TestApp {
        base_url: format!("http://{http_addr}"),
        http_addr,
        grpc_addr,
        db,
        stop: Some(tx),
        served: Some(served),
    })
}
