#![cfg(test)]
use sea_orm::DatabaseConnection;

/// 每个测试独立的内存库，migration 已执行
pub async fn get_db() -> DatabaseConnection {
    models::db::connect_in_memory().await.expect("open in-memory sqlite")
}

pub async fn seed_goods(db: &DatabaseConnection, rows: &[(&str, i64, i64)]) -> Vec<models::goods::Model> {
    let mut out = Vec::with_capacity(rows.len());
    for (name, count, create_time) in rows {
        let m = models::goods::create(db, name, "", *count, *create_time).await.expect("seed goods");
        out.push(m);
    }
    out
}
