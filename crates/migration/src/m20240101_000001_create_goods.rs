//! Create `goods` table.
//! `delete_time = 0` marks a live row; soft delete stores the unix time.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Goods::Table)
                    .if_not_exists()
                    .col(pk_auto(Goods::Id))
                    .col(string_len_uniq(Goods::Name, 255))
                    .col(string_len(Goods::Desc, 500).default(""))
                    .col(big_integer(Goods::Count).default(0))
                    .col(big_integer(Goods::CreateTime).default(0))
                    .col(big_integer(Goods::DeleteTime).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_goods_delete_time")
                    .table(Goods::Table)
                    .col(Goods::DeleteTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Goods::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Goods {
    Table,
    Id,
    Name,
    Desc,
    Count,
    CreateTime,
    DeleteTime,
}
