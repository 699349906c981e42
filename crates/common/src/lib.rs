//! Shared building blocks for the seckill services: paging, response envelope,
//! business codes, tokens, crypto helpers and small utilities.

pub mod crypto;
pub mod pagination;
pub mod response;
pub mod token;
pub mod utils;
