use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::{db, shop};

#[tokio::test]
async fn test_create_shop_rows() -> Result<()> {
    let conn = db::connect_in_memory().await?;
    shop::create(&conn, "flagship", "main store", 3, 100).await?;
    shop::create(&conn, "outlet", "", 0, 200).await?;
    assert_eq!(shop::Entity::find().count(&conn).await?, 2);
    assert!(shop::create(&conn, "", "", 0, 0).await.is_err());
    Ok(())
}

/// 需要真实 MySQL：设置 DATABASE_URL 且未设置 SKIP_DB_TESTS 时运行
#[tokio::test]
async fn test_live_mysql_migrates() -> Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
        return Ok(());
    }
    let conn = db::connect().await?;
    migration::Migrator::up(&conn, None).await?;
    let _ = shop::Entity::find().count(&conn).await?;
    Ok(())
}
