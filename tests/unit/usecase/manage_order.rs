use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use industrial_order::api::web::dto::{OrderCreateReqData, OrderEditReqData};
use industrial_order::datastore::{AbstInMemoryDStore, AppInMemoryDStore};
use industrial_order::error::{AppError, AppErrorCode};
use industrial_order::logging::AppLogContext;
use industrial_order::model::OrderModel;
use industrial_order::repository::{AbsOrderRepo, OrderInMemRepo};
use industrial_order::usecase::{
    CreateOrderUseCase, DiscardOrderUseCase, EditOrderUseCase, ListOrderUseCase,
};
use industrial_order::AppInMemoryDbCfg;

use crate::{ut_load_config, ut_setup_log_context};

struct MockFailRepo {}

#[async_trait]
impl AbsOrderRepo for MockFailRepo {
    async fn create(&self, _order: OrderModel) -> Result<(), AppError> {
        Err(Self::error())
    }
    async fn fetch_all(&self) -> Result<Vec<OrderModel>, AppError> {
        Err(Self::error())
    }
    async fn update_quantity(&self, _oid: &str, _quantity: u32) -> Result<usize, AppError> {
        Err(Self::error())
    }
    async fn delete(&self, _oid: &str) -> Result<usize, AppError> {
        Err(Self::error())
    }
}

impl MockFailRepo {
    fn error() -> AppError {
        AppError {
            code: AppErrorCode::RemoteDbServerFailure,
            detail: Some("unit-test".to_string()),
        }
    }
}

struct UtContext {
    dstore: Arc<Box<dyn AbstInMemoryDStore>>,
    logctx: Arc<AppLogContext>,
}

impl UtContext {
    fn new() -> Self {
        let cfg = ut_load_config("config_ok.json");
        let logctx = ut_setup_log_context(&cfg);
        let inmem_cfg = AppInMemoryDbCfg {
            alias: "ut-inmem".to_string(),
            max_items: 50,
        };
        let obj: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(&inmem_cfg));
        Self {
            dstore: Arc::new(obj),
            logctx,
        }
    }

    async fn repo(&self) -> Box<dyn AbsOrderRepo> {
        let obj = OrderInMemRepo::new(self.dstore.clone()).await.unwrap();
        Box::new(obj)
    }

    async fn create(&self, product_id: &str, quantity: i64) -> Result<OrderModel, AppError> {
        let uc = CreateOrderUseCase {
            repo: self.repo().await,
            logctx: self.logctx.clone(),
        };
        let req = OrderCreateReqData {
            product_id: Some(product_id.to_string()),
            quantity: Some(quantity),
        };
        uc.execute(req).await
    }

    async fn list(&self) -> Vec<OrderModel> {
        let uc = ListOrderUseCase {
            repo: self.repo().await,
            logctx: self.logctx.clone(),
        };
        uc.execute().await.unwrap()
    }

    async fn edit(&self, oid: &str, quantity: Option<i64>) -> Result<(), AppError> {
        let uc = EditOrderUseCase {
            repo: self.repo().await,
            logctx: self.logctx.clone(),
        };
        uc.execute(oid.to_string(), OrderEditReqData { quantity })
            .await
    }

    async fn discard(&self, oid: &str) -> Result<(), AppError> {
        let uc = DiscardOrderUseCase {
            repo: self.repo().await,
            logctx: self.logctx.clone(),
        };
        uc.execute(oid.to_string()).await
    }
} // end of impl UtContext

#[tokio::test]
async fn create_then_list_ok() {
    let ctx = UtContext::new();
    let t_req = Utc::now();
    let saved = ctx.create("IND-1002", 3).await.unwrap();
    assert!(!saved.oid.is_empty());
    let orders = ctx.list().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].oid, saved.oid);
    assert_eq!(orders[0].product_id.as_str(), "IND-1002");
    assert_eq!(orders[0].quantity, 3);
    assert!(orders[0].create_time >= t_req);
}

#[tokio::test]
async fn create_invalid_input_nothing_saved() {
    let ctx = UtContext::new();
    let uc = CreateOrderUseCase {
        repo: ctx.repo().await,
        logctx: ctx.logctx.clone(),
    };
    let req = OrderCreateReqData {
        product_id: None,
        quantity: Some(2),
    };
    let e = uc.execute(req).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    let e = ctx.create("IND-1002", 0).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    assert!(ctx.list().await.is_empty());
}

#[tokio::test]
async fn edit_order_ok() {
    let ctx = UtContext::new();
    let saved = ctx.create("IND-1004", 2).await.unwrap();
    ctx.edit(saved.oid.as_str(), Some(5)).await.unwrap();
    let orders = ctx.list().await;
    assert_eq!(orders[0].quantity, 5);
    assert_eq!(orders[0].create_time, saved.create_time);
    assert_eq!(orders[0].product_id, saved.product_id);
}

#[tokio::test]
async fn edit_order_error() {
    let ctx = UtContext::new();
    let saved = ctx.create("IND-1004", 2).await.unwrap();
    let e = ctx.edit("nonexist-order-id", Some(5)).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::OrderNotExist);
    // quantity is validated before the order is looked up
    for (oid, qty) in [
        (saved.oid.as_str(), Some(0)),
        (saved.oid.as_str(), Some(-1)),
        (saved.oid.as_str(), None),
        ("nonexist-order-id", Some(0)),
        ("nonexist-order-id", Some(-1)),
    ] {
        let e = ctx.edit(oid, qty).await.unwrap_err();
        assert_eq!(e.code, AppErrorCode::InvalidInput);
    }
    assert_eq!(ctx.list().await[0].quantity, 2);
}

#[tokio::test]
async fn discard_order() {
    let ctx = UtContext::new();
    let saved = ctx.create("IND-1006", 1).await.unwrap();
    let other = ctx.create("IND-1007", 8).await.unwrap();
    ctx.discard(saved.oid.as_str()).await.unwrap();
    let orders = ctx.list().await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].oid, other.oid);
    let e = ctx.discard(saved.oid.as_str()).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::OrderNotExist);
}

#[tokio::test]
async fn repository_failure() {
    let ctx = UtContext::new();
    let uc = CreateOrderUseCase {
        repo: Box::new(MockFailRepo {}),
        logctx: ctx.logctx.clone(),
    };
    let req = OrderCreateReqData {
        product_id: Some("IND-1001".to_string()),
        quantity: Some(1),
    };
    let e = uc.execute(req).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::RemoteDbServerFailure);
    let uc = ListOrderUseCase {
        repo: Box::new(MockFailRepo {}),
        logctx: ctx.logctx.clone(),
    };
    assert!(uc.execute().await.is_err());
    let uc = EditOrderUseCase {
        repo: Box::new(MockFailRepo {}),
        logctx: ctx.logctx.clone(),
    };
    let req = OrderEditReqData { quantity: Some(3) };
    let e = uc.execute("any-id".to_string(), req).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::RemoteDbServerFailure);
    let uc = DiscardOrderUseCase {
        repo: Box::new(MockFailRepo {}),
        logctx: ctx.logctx.clone(),
    };
    let e = uc.execute("any-id".to_string()).await.unwrap_err();
    assert_eq!(e.code, AppErrorCode::RemoteDbServerFailure);
} // end of fn repository_failure
