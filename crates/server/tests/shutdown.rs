use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Instant};

mod support;
use support::{config, start_server, start_server_with_drain};

const HEAD: &str = "PUT /seckill/v1/resource HTTP/1.1\r\nhost: localhost\r\ncontent-type: application/json\r\n";
const BODY: &str = r#"{"name":"late","desc":"arrives after stop","count":1}"#;

async fn send_head_and_half_body(stream: &mut TcpStream) -> anyhow::Result<()> {
    let head = format!("{HEAD}content-length: {}\r\n\r\n", BODY.len());
    stream.write_all(head.as_bytes()).await?;
    stream.write_all(&BODY.as_bytes()[..BODY.len() / 2]).await?;
    stream.flush().await?;
    Ok(())
}

#[tokio::test]
async fn shutdown_lets_in_flight_request_finish() -> anyhow::Result<()> {
    let mut app = start_server(config()).await?;
    let mut stream = TcpStream::connect(app.http_addr).await?;
    send_head_and_half_body(&mut stream).await?;
    // 等 handler 开始读取请求体
    sleep(Duration::from_millis(200)).await;

    app.trigger_stop();
    sleep(Duration::from_millis(200)).await;

    stream.write_all(&BODY.as_bytes()[BODY.len() / 2..]).await?;
    stream.flush().await?;

    let mut raw = Vec::new();
    timeout(Duration::from_secs(5), stream.read_to_end(&mut raw)).await??;
    let raw = String::from_utf8_lossy(&raw);
    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
    let body = raw.split("\r\n\r\n").nth(1).unwrap_or_default();
    let body: Value = serde_json::from_str(body)?;
    assert_eq!(body["code"], 0);

    timeout(Duration::from_secs(5), app.wait_stopped()).await??;
    Ok(())
}

#[tokio::test]
async fn shutdown_drain_is_bounded() -> anyhow::Result<()> {
    let mut app = start_server_with_drain(config(), Duration::from_millis(300)).await?;
    // 请求体永远不会发完
    let mut stream = TcpStream::connect(app.http_addr).await?;
    send_head_and_half_body(&mut stream).await?;
    sleep(Duration::from_millis(200)).await;

    app.trigger_stop();
    // 排空窗口到期后 serve 返回，不等这个连接
    timeout(Duration::from_secs(5), app.wait_stopped()).await??;
    drop(stream);
    Ok(())
}

#[tokio::test]
async fn shutdown_without_traffic_returns_promptly() -> anyhow::Result<()> {
    let mut app = start_server(config()).await?;
    let started = Instant::now();
    app.trigger_stop();
    timeout(Duration::from_secs(5), app.wait_stopped()).await??;
    // 没有在途请求时不等满排空窗口
    assert!(started.elapsed() < server::HTTP_DRAIN_TIMEOUT);
    Ok(())
}

#[test]
fn drain_window_is_ten_seconds() {
    assert_eq!(server::HTTP_DRAIN_TIMEOUT, Duration::from_secs(10));
}
