use std::time::Duration;

use tonic::transport::{Channel, Endpoint, Error};

use super::shop_client::ShopClient;

/// Connect to a `shop.Shop` server; `host` may omit the `http://` scheme.
pub async fn connect(host: &str) -> Result<ShopClient<Channel>, Error> {
    let dst = if host.contains("://") { host.to_string() } else { format!("http://{host}") };
    let channel = Endpoint::from_shared(dst)?
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(10))
        .connect()
        .await?;
    Ok(ShopClient::new(channel))
}
