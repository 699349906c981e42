//! `shop.Shop` gRPC service. The wire contract lives in `proto/shop.proto`.

pub mod client;
pub mod handler;
pub mod proto;

mod generated {
    include!(concat!(env!("OUT_DIR"), "/shop.Shop.rs"));
}

pub use generated::{shop_client, shop_server};
