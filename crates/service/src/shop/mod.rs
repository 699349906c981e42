//! Shop listing (read only).

pub mod domain;
pub mod repository;
pub mod service;

pub use repository::SeaOrmShopRepository;
pub use service::ShopService;
