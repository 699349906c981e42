/// Goods entity helpers against an in-memory database
pub mod goods_tests;

/// Shop entity helpers and live-database smoke test
pub mod shop_tests;
