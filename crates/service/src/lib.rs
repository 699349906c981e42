//! Service layer providing business-oriented operations on top of models.
//! - `goods` / `shop`: repository traits, SeaORM implementations and services.
//! - `cache`: Redis wrapper with an in-memory fallback.
//! - Business rules live here; HTTP and gRPC concerns stay in the server crate.

pub mod cache;
pub mod errors;
pub mod filter;
pub mod goods;
pub mod shop;
#[cfg(test)]
pub mod test_support;
