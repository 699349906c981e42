use std::time::Duration;

use common::token::Token;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};

mod support;
use support::{config, start_server, TestApp};

fn client() -> reqwest::Client {
    reqwest::Client::builder().timeout(Duration::from_secs(10)).build().expect("reqwest client")
}

async fn add_goods(app: &TestApp, name: &str, count: i64) -> anyhow::Result<Value> {
    let res = client()
        .put(app.url("/v1/resource"))
        .json(&json!({"name": name, "desc": format!("{name} desc"), "count": count}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(res.json().await?)
}

async fn list(app: &TestApp, query: &str) -> anyhow::Result<Value> {
    let res = client().get(app.url(&format!("/v1/list{query}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], 0);
    Ok(body["data"].clone())
}

#[tokio::test]
async fn e2e_health_echoes_trace_id() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    let res = client().get(app.url("/system/health")).header("x-request-id", "trace-1").send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.headers().get("x-request-id").and_then(|v| v.to_str().ok()), Some("trace-1"));
    let body: Value = res.json().await?;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["timestamp"].as_str().map(str::len), Some(19));
    Ok(())
}

#[tokio::test]
async fn e2e_goods_crud() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    let c = client();

    let body = add_goods(&app, "apple", 3).await?;
    assert_eq!(body, json!({"code": 0, "message": "", "data": {}}));
    add_goods(&app, "pear", 5).await?;

    let page = list(&app, "?pageIndex=1&pageSize=10").await?;
    assert_eq!(page["count"], 2);
    // 默认按 id 倒序
    assert_eq!(page["list"][0]["name"], "pear");
    assert_eq!(page["list"][1]["name"], "apple");
    let apple_id = page["list"][1]["id"].as_i64().unwrap();

    let page = list(&app, "?name=app").await?;
    assert_eq!(page["count"], 1);
    assert_eq!(page["list"][0]["desc"], "apple desc");

    let res = c.post(app.url("/v1/resource")).json(&json!({"id": apple_id, "count": 10})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let page = list(&app, &format!("?id={apple_id}")).await?;
    assert_eq!(page["list"][0]["count"], 10);
    assert_eq!(page["list"][0]["name"], "apple");

    let res = c.delete(app.url(&format!("/v1/resource?id={apple_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(list(&app, "").await?["count"], 1);

    let res = c.delete(app.url(&format!("/v1/resource?id={apple_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["code"], 10005);
    Ok(())
}

#[tokio::test]
async fn e2e_duplicate_name_is_business_error() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    add_goods(&app, "apple", 1).await?;
    let body = add_goods(&app, "apple", 2).await?;
    assert_eq!(body["code"], 10004);
    assert_eq!(body["message"], "商品名重复");
    assert_eq!(body["data"], json!({}));
    Ok(())
}

#[tokio::test]
async fn e2e_bad_input_is_param_bind_error() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    let c = client();

    let res = c
        .put(app.url("/v1/resource"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], 10004);

    let res = c.post(app.url("/v1/resource")).json(&json!({"id": 0, "count": 1})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.delete(app.url("/v1/resource?id=abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["code"], 10004);

    let res = c.delete(app.url("/v1/resource")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.post(app.url("/v1/resource")).json(&json!({"id": 999, "count": 1})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_route_is_not_found() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    let c = client();
    let res = c.get(app.url("/v2/nothing")).header("x-request-id", "trace-404").send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.headers().get("x-request-id").and_then(|v| v.to_str().ok()), Some("trace-404"));
    let body: Value = res.json().await?;
    assert_eq!(body["code"], 10005);

    // 未匹配的路径共用一个 label
    c.get(app.url("/v2/other")).send().await?;
    let text = c.get(app.url("/metrics")).send().await?.text().await?;
    assert!(text.contains(r#"path="unmatched""#));
    assert!(!text.contains("/v2/nothing"));
    Ok(())
}

#[tokio::test]
async fn e2e_shop_list() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    let res = client().get(app.url("/v1/shop/list?pageSize=5")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"], json!({"count": 0, "list": []}));
    Ok(())
}

#[tokio::test]
async fn e2e_shop_list_filters_seeded_rows() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    models::shop::create(&app.db, "flagship", "main", 3, 300).await?;
    models::shop::create(&app.db, "outlet", "", 0, 100).await?;
    models::shop::create(&app.db, "flagship-2", "", 1, 200).await?;
    let c = client();

    let body: Value = c.get(app.url("/v1/shop/list")).send().await?.json().await?;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["count"], 3);

    let body: Value =
        c.get(app.url("/v1/shop/list?name=flagship&sort=create_time-")).send().await?.json().await?;
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["list"][0]["name"], "flagship");
    assert_eq!(body["data"]["list"][0]["desc"], "main");
    assert_eq!(body["data"]["list"][1]["name"], "flagship-2");

    let outlet_id = {
        let body: Value = c.get(app.url("/v1/shop/list?name=outlet")).send().await?.json().await?;
        body["data"]["list"][0]["id"].as_i64().unwrap()
    };
    let body: Value = c.get(app.url(&format!("/v1/shop/list?id={outlet_id}"))).send().await?.json().await?;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["list"][0]["count"], 0);
    Ok(())
}

#[tokio::test]
async fn e2e_huge_page_index_is_empty_page() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    add_goods(&app, "apple", 1).await?;
    models::shop::create(&app.db, "flagship", "", 1, 1).await?;

    let page = list(&app, "?pageIndex=18446744073709551615&pageSize=100").await?;
    assert_eq!(page, json!({"count": 1, "list": []}));

    let res = client().get(app.url("/v1/shop/list?pageIndex=9223372036854775807&pageSize=100")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"], json!({"count": 1, "list": []}));
    Ok(())
}

#[tokio::test]
async fn e2e_jwt_protects_v1() -> anyhow::Result<()> {
    let mut cfg = config();
    cfg.jwt.enabled = true;
    cfg.jwt.secret = "test-secret".into();
    let app = start_server(cfg).await?;
    let c = client();

    let res = c.get(app.url("/v1/list")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<Value>().await?["code"], 10003);

    let res = c.get(app.url("/v1/list")).header("authorization", "Bearer not-a-jwt").send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let token = Token::new("test-secret").jwt_sign(42, "alice", Duration::from_secs(3600))?;
    let res = c.get(app.url("/v1/list")).header("authorization", format!("Bearer {token}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let anonymous = Token::new("test-secret").jwt_sign(0, "nobody", Duration::from_secs(3600))?;
    let res = c.get(app.url("/v1/list")).header("authorization", anonymous).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    // 运维接口不需要 token
    let res = c.get(app.url("/system/health")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_rate_limit() -> anyhow::Result<()> {
    let mut cfg = config();
    cfg.server.enable_rate = true;
    cfg.server.rate_per_second = 1;
    cfg.server.rate_burst = 2;
    let app = start_server(cfg).await?;
    let c = client();

    let mut statuses = Vec::new();
    for _ in 0..4 {
        statuses.push(c.get(app.url("/v1/list")).send().await?.status());
    }
    assert_eq!(statuses[0], HttpStatusCode::OK);
    assert!(statuses.contains(&HttpStatusCode::TOO_MANY_REQUESTS));
    Ok(())
}

#[tokio::test]
async fn e2e_metrics_and_openapi() -> anyhow::Result<()> {
    let app = start_server(config()).await?;
    let c = client();
    list(&app, "").await?;

    let text = c.get(app.url("/metrics")).send().await?.text().await?;
    assert!(text.contains("seckill_api_requests_total"));
    assert!(text.contains("/v1/list"));
    assert!(!text.contains("/system/health"));

    let doc: Value = c.get(app.url("/api-docs/openapi.json")).send().await?.json().await?;
    assert!(doc["paths"]["/v1/resource"].is_object());
    Ok(())
}
