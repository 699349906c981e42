//! Migrator for the seckill schema.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_goods;
mod m20240101_000002_create_shop;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_goods::Migration),
            Box::new(m20240101_000002_create_shop::Migration),
        ]
    }
}
