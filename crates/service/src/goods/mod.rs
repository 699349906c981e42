//! Goods module: three-layer architecture (domain, repository, service).

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use repo::seaorm::SeaOrmGoodsRepository;
pub use service::GoodsService;
