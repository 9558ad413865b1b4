use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use chrono::Utc;

use crate::api::web::dto::{OrderCreateReqData, OrderEditReqData};
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::OrderModel;
use crate::repository::AbsOrderRepo;

pub struct CreateOrderUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub logctx: Arc<AppLogContext>,
}

pub struct ListOrderUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub logctx: Arc<AppLogContext>,
}

pub struct EditOrderUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub logctx: Arc<AppLogContext>,
}

pub struct DiscardOrderUseCase {
    pub repo: Box<dyn AbsOrderRepo>,
    pub logctx: Arc<AppLogContext>,
}

fn order_not_exist(oid: &str) -> AppError {
    AppError {
        code: AppErrorCode::OrderNotExist,
        detail: Some(oid.to_string()),
    }
}

impl CreateOrderUseCase {
    /// return the saved order, including its newly generated ID
    pub async fn execute(self, req: OrderCreateReqData) -> DefaultResult<OrderModel, AppError> {
        let logctx = self.logctx;
        let order = match OrderModel::try_from_create_req(req, Utc::now()) {
            Ok(m) => m,
            Err(e) => {
                app_log_event!(logctx, AppLogLevel::DEBUG, "invalid request, {e}");
                return Err(e);
            }
        };
        match self.repo.create(order.clone()).await {
            Ok(()) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::INFO,
                    "order created, id:{}, product:{}, qty:{}",
                    order.oid,
                    order.product_id,
                    order.quantity
                );
                Ok(order)
            }
            Err(e) => {
                app_log_event!(
                    logctx,
                    AppLogLevel::ERROR,
                    "failed to save order, product:{}, reason:{e}",
                    order.product_id
                );
                Err(e)
            }
        }
    } // end of fn execute
} // end of impl CreateOrderUseCase

impl ListOrderUseCase {
    pub async fn execute(self) -> DefaultResult<Vec<OrderModel>, AppError> {
        let logctx = self.logctx;
        let result = self.repo.fetch_all().await;
        match result.as_ref() {
            Ok(v) => app_log_event!(logctx, AppLogLevel::DEBUG, "num-orders:{}", v.len()),
            Err(e) => app_log_event!(logctx, AppLogLevel::ERROR, "failed to fetch, {e}"),
        }
        result
    }
}

impl EditOrderUseCase {
    /// only quantity can be modified, the quantity is validated before
    /// looking up the order
    pub async fn execute(self, oid: String, req: OrderEditReqData) -> DefaultResult<(), AppError> {
        let logctx = self.logctx;
        let quantity = OrderModel::try_quantity_from_edit_req(&req).map_err(|e| {
            app_log_event!(logctx, AppLogLevel::DEBUG, "order:{oid}, {e}");
            e
        })?;
        let num_matched = self
            .repo
            .update_quantity(oid.as_str(), quantity)
            .await
            .map_err(|e| {
                app_log_event!(logctx, AppLogLevel::ERROR, "order:{oid}, {e}");
                e
            })?;
        if num_matched == 0 {
            app_log_event!(logctx, AppLogLevel::INFO, "order not found, id:{oid}");
            Err(order_not_exist(oid.as_str()))
        } else {
            app_log_event!(
                logctx,
                AppLogLevel::INFO,
                "order updated, id:{oid}, qty:{quantity}"
            );
            Ok(())
        }
    } // end of fn execute
} // end of impl EditOrderUseCase

impl DiscardOrderUseCase {
    pub async fn execute(self, oid: String) -> DefaultResult<(), AppError> {
        let logctx = self.logctx;
        let num_deleted = self.repo.delete(oid.as_str()).await.map_err(|e| {
            app_log_event!(logctx, AppLogLevel::ERROR, "order:{oid}, {e}");
            e
        })?;
        if num_deleted == 0 {
            app_log_event!(logctx, AppLogLevel::INFO, "order not found, id:{oid}");
            Err(order_not_exist(oid.as_str()))
        } else {
            app_log_event!(logctx, AppLogLevel::INFO, "order deleted, id:{oid}");
            Ok(())
        }
    }
} // end of impl DiscardOrderUseCase
