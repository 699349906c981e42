use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use configs::AppConfig;
use service::cache::{Cache, MemoryCache, RedisCache};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tonic::transport::server::TcpIncoming;
use tracing::{error, info, warn};

use crate::errors::StartupError;
use crate::grpc::handler::ShopGrpc;
use crate::routes::{build_router, ServerState};

/// HTTP 在收到停机信号后最多再处理这么久
pub const HTTP_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Connect storage, serve HTTP and gRPC until Ctrl+C/SIGTERM, then release
/// the database pool and the cache.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&config.database).await?;
    if config.database.auto_migrate {
        models::db::migrate(&db).await?;
        info!("database migrated");
    }

    let cache: Arc<dyn Cache> = if config.redis.enabled {
        Arc::new(RedisCache::connect(&config.redis.url).await?)
    } else {
        info!("redis disabled, using in-process cache");
        Arc::new(MemoryCache::new())
    };

    let state = ServerState::new(db.clone(), &config)?;
    let host = config.server.host.as_str();
    let http = TcpListener::bind((host, config.server.port)).await.map_err(StartupError::from)?;
    let grpc = TcpListener::bind((host, config.server.grpc_port)).await.map_err(StartupError::from)?;

    let served = serve(state, http, grpc, shutdown_signal()).await;

    if let Err(e) = db.close().await {
        warn!(error = %e, "close database");
    }
    if let Err(e) = cache.close().await {
        warn!(error = %e, "close cache");
    }
    info!("server stopped");
    served
}

/// Serve HTTP on `http` and gRPC on `grpc` until `signal` resolves. In-flight
/// HTTP requests get [`HTTP_DRAIN_TIMEOUT`] to finish.
pub async fn serve<F>(state: ServerState, http: TcpListener, grpc: TcpListener, signal: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    serve_with_drain(state, http, grpc, signal, HTTP_DRAIN_TIMEOUT).await
}

/// [`serve`] with an explicit HTTP drain window
pub async fn serve_with_drain<F>(
    state: ServerState,
    http: TcpListener,
    grpc: TcpListener,
    signal: F,
    drain: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let http_addr = http.local_addr().map_err(StartupError::from)?;
    let grpc_addr = grpc.local_addr().map_err(StartupError::from)?;

    let (stop, _) = broadcast::channel::<()>(1);
    let mut http_stop = stop.subscribe();
    let mut drain_stop = stop.subscribe();
    let mut grpc_stop = stop.subscribe();

    let shop = ShopGrpc::new(Arc::clone(&state.goods), Arc::clone(&state.metrics)).into_service();
    let app = build_router(state);

    info!(%http_addr, %grpc_addr, "server listening");

    let http_task = async move {
        let server = axum::serve(http, app)
            .with_graceful_shutdown(async move {
                let _ = http_stop.recv().await;
            })
            .into_future();
        tokio::pin!(server);
        tokio::select! {
            res = &mut server => res.map_err(anyhow::Error::from),
            _ = async {
                let _ = drain_stop.recv().await;
                tokio::time::sleep(drain).await;
            } => {
                warn!(timeout_ms = drain.as_millis() as u64, "http drain timed out");
                Ok(())
            }
        }
    };

    let incoming = TcpIncoming::from_listener(grpc, true, None).map_err(|e| anyhow!(e))?;
    let grpc_task = async move {
        tonic::transport::Server::builder()
            .add_service(shop)
            .serve_with_incoming_shutdown(incoming, async move {
                let _ = grpc_stop.recv().await;
            })
            .await
            .map_err(anyhow::Error::from)
    };

    let trigger = async move {
        signal.await;
        info!("shutdown signal received");
        let _ = stop.send(());
        Ok::<(), anyhow::Error>(())
    };

    tokio::try_join!(http_task, grpc_task, trigger)?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                error!(error = %e, "install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
