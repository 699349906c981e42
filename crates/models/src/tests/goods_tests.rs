use anyhow::Result;
use sea_orm::EntityTrait;

use crate::{db::connect_in_memory, errors::ModelError, goods};

#[tokio::test]
async fn test_create_and_soft_delete_goods() -> Result<()> {
    let db = connect_in_memory().await?;

    let g = goods::create(&db, "apple", "red apple", 10, 1_579_871_471).await?;
    assert!(g.id > 0);
    assert_eq!(g.delete_time, 0);

    let found = goods::find_live(&db, g.id).await?;
    assert_eq!(found.map(|m| m.name), Some("apple".to_string()));

    assert!(goods::soft_delete(&db, g.id, 1_600_000_000).await?);
    // 已删除的记录不能再次删除
    assert!(!goods::soft_delete(&db, g.id, 1_600_000_001).await?);
    assert!(goods::find_live(&db, g.id).await?.is_none());

    let raw = goods::Entity::find_by_id(g.id).one(&db).await?.expect("row kept");
    assert_eq!(raw.delete_time, 1_600_000_000);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_name_is_reported() -> Result<()> {
    let db = connect_in_memory().await?;
    goods::create(&db, "pear", "", 0, 0).await?;
    let dup = goods::create(&db, "pear", "another", 1, 0).await;
    assert!(matches!(dup, Err(ModelError::Duplicate(_))), "got {dup:?}");
    Ok(())
}

#[tokio::test]
async fn test_incr_count_is_additive() -> Result<()> {
    let db = connect_in_memory().await?;
    let g = goods::create(&db, "banana", "", 5, 0).await?;
    assert_eq!(goods::incr_count(&db, g.id, 3).await?, 1);
    assert_eq!(goods::incr_count(&db, g.id, -1).await?, 1);
    let after = goods::Entity::find_by_id(g.id).one(&db).await?.expect("row");
    assert_eq!(after.count, 7);
    assert_eq!(goods::incr_count(&db, 9999, 1).await?, 0);
    Ok(())
}

#[test]
fn test_validation_rules() {
    assert!(goods::validate_name("  ").is_err());
    assert!(goods::validate_name(&"x".repeat(goods::NAME_MAX_LEN + 1)).is_err());
    assert!(goods::validate_name("商品").is_ok());
    assert!(goods::validate_desc(&"d".repeat(goods::DESC_MAX_LEN)).is_ok());
    assert!(goods::validate_desc(&"d".repeat(goods::DESC_MAX_LEN + 1)).is_err());
}
