use std::sync::Arc;
use std::time::Instant;

use service::errors::ServiceError;
use service::goods::domain::{GoodsListItem, GoodsQuery};
use tonic::{Request, Response, Status};
use tracing::info;

use super::proto::{IncrReq, IncrResp, ListReq, ListResp, ShopData};
use super::shop_server::{Shop, ShopServer};
use crate::errors::grpc_status;
use crate::metrics::Metrics;
use crate::routes::GoodsSvc;

pub struct ShopGrpc {
    goods: Arc<GoodsSvc>,
    metrics: Arc<Metrics>,
}

impl ShopGrpc {
    pub fn new(goods: Arc<GoodsSvc>, metrics: Arc<Metrics>) -> Self {
        Self { goods, metrics }
    }

    pub fn into_service(self) -> ShopServer<Self> {
        ShopServer::new(self)
    }

    /// 记录调用日志与 metrics，并把业务错误转成 Status
    fn finish<T>(&self, method: &'static str, started: Instant, result: Result<T, ServiceError>) -> Result<Response<T>, Status> {
        let result = result.map_err(grpc_status);
        let code = result.as_ref().map_or_else(Status::code, |_| tonic::Code::Ok);
        self.metrics.observe_grpc(method, code);
        info!(
            target: "grpc",
            method,
            code = ?code,
            cost_ms = started.elapsed().as_secs_f64() * 1000.0,
            "grpc call"
        );
        result.map(Response::new)
    }
}

impl From<ListReq> for GoodsQuery {
    fn from(req: ListReq) -> Self {
        Self {
            shop_id: req.shop_id,
            shop_name: req.shop_name,
            shop_ids: req.shop_ids,
            field_list: req.field_list,
            page_no: req.page_no,
            page_size: req.page_size,
            sort_by: req.sort_by,
        }
    }
}

impl From<GoodsListItem> for ShopData {
    fn from(item: GoodsListItem) -> Self {
        Self { id: item.id, name: item.name, desc: item.desc, count: item.count, create_time: item.create_time }
    }
}

#[tonic::async_trait]
impl Shop for ShopGrpc {
    async fn list(&self, request: Request<ListReq>) -> Result<Response<ListResp>, Status> {
        let started = Instant::now();
        let result = self
            .goods
            .grpc_list(GoodsQuery::from(request.into_inner()))
            .await
            .map(|items| ListResp { data: items.into_iter().map(ShopData::from).collect() });
        self.finish("List", started, result)
    }

    async fn incr(&self, request: Request<IncrReq>) -> Result<Response<IncrResp>, Status> {
        let started = Instant::now();
        let req = request.into_inner();
        let result = self.goods.incr_count(req.shop_id, req.n).await.map(|()| IncrResp { ok: true });
        self.finish("Incr", started, result)
    }
}
