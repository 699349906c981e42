use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthDoc { pub timestamp: String, pub host: String, pub status: String }

#[derive(ToSchema)]
pub struct GoodsAddDoc {
    pub name: String,
    pub desc: Option<String>,
    pub count: i64,
}

#[derive(ToSchema)]
pub struct GoodsUpdateDoc {
    pub id: i64,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub count: Option<i64>,
}

#[derive(ToSchema)]
pub struct GoodsListItemDoc { pub id: i64, pub name: String, pub desc: String, pub count: i64, pub create_time: i64 }

#[derive(ToSchema)]
pub struct GoodsPageDoc { pub count: u64, pub list: Vec<GoodsListItemDoc> }

#[derive(ToSchema)]
pub struct ShopListItemDoc { pub id: i64, pub name: String, pub desc: String, pub count: i64, pub create_time: i64 }

#[derive(ToSchema)]
pub struct ShopPageDoc { pub count: u64, pub list: Vec<ShopListItemDoc> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::system::health,
        crate::routes::goods::list,
        crate::routes::goods::add,
        crate::routes::goods::update,
        crate::routes::goods::delete,
        crate::routes::shop::list,
    ),
    components(
        schemas(
            HealthDoc,
            GoodsAddDoc,
            GoodsUpdateDoc,
            GoodsListItemDoc,
            GoodsPageDoc,
            ShopListItemDoc,
            ShopPageDoc,
        )
    ),
    tags(
        (name = "system"),
        (name = "goods"),
        (name = "shop")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_v1_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/v1/list"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/resource"));
        assert!(paths.iter().any(|p| p.as_str() == "/v1/shop/list"));
        assert!(paths.iter().any(|p| p.as_str() == "/system/health"));
    }
}
