use axum::debug_handler;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Json as ExtractJson, Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use super::dto::{OrderCreateReqData, OrderCreateRespDto, OrderDto, OrderEditReqData};
use super::presenter;
use crate::logging::{app_log_event, AppLogLevel};
use crate::repository::app_repo_order;
use crate::usecase::{CreateOrderUseCase, DiscardOrderUseCase, EditOrderUseCase, ListOrderUseCase};
use crate::AppSharedState;

#[debug_handler(state=AppSharedState)]
pub(super) async fn create_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
    wrapped_req_body: Result<ExtractJson<OrderCreateReqData>, JsonRejection>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let req_body = match wrapped_req_body {
        Ok(ExtractJson(v)) => v,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::DEBUG, "rejected body, {}", e.body_text());
            return presenter::rejected(e);
        }
    };
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(r) => r,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "repository init failure, {e}");
            return presenter::error(e, "Error creating order");
        }
    };
    let uc = CreateOrderUseCase { repo, logctx };
    match uc.execute(req_body).await {
        Ok(saved) => {
            let body = OrderCreateRespDto {
                message: "Order created successfully".to_string(),
                order_id: saved.oid,
            };
            presenter::json(HttpStatusCode::CREATED, &body)
        }
        Err(e) => presenter::error(e, "Error creating order"),
    }
} // end of fn create_handler

#[debug_handler(state=AppSharedState)]
pub(super) async fn list_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(r) => r,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "repository init failure, {e}");
            return presenter::error(e, "Error fetching orders");
        }
    };
    let uc = ListOrderUseCase { repo, logctx };
    match uc.execute().await {
        Ok(ms) => {
            let body = ms.into_iter().map(OrderDto::from).collect::<Vec<_>>();
            presenter::json(HttpStatusCode::OK, &body)
        }
        Err(e) => presenter::error(e, "Error fetching orders"),
    }
}

#[debug_handler(state=AppSharedState)]
pub(super) async fn edit_handler(
    ExtractPath(oid): ExtractPath<String>,
    ExtractState(appstate): ExtractState<AppSharedState>,
    wrapped_req_body: Result<ExtractJson<OrderEditReqData>, JsonRejection>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let req_body = match wrapped_req_body {
        Ok(ExtractJson(v)) => v,
        Err(e) => {
            app_log_event!(
                logctx,
                AppLogLevel::DEBUG,
                "rejected body, order:{oid}, {}",
                e.body_text()
            );
            return presenter::rejected(e);
        }
    };
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(r) => r,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "repository init failure, {e}");
            return presenter::error(e, "Error updating order");
        }
    };
    let uc = EditOrderUseCase { repo, logctx };
    match uc.execute(oid, req_body).await {
        Ok(()) => presenter::message(HttpStatusCode::OK, "Order updated successfully"),
        Err(e) => presenter::error(e, "Error updating order"),
    }
} // end of fn edit_handler

#[debug_handler(state=AppSharedState)]
pub(super) async fn discard_handler(
    ExtractPath(oid): ExtractPath<String>,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    let logctx = appstate.log_context().clone();
    let repo = match app_repo_order(appstate.datastore()).await {
        Ok(r) => r,
        Err(e) => {
            app_log_event!(logctx, AppLogLevel::ERROR, "repository init failure, {e}");
            return presenter::error(e, "Error deleting order");
        }
    };
    let uc = DiscardOrderUseCase { repo, logctx };
    match uc.execute(oid).await {
        Ok(()) => presenter::message(HttpStatusCode::OK, "Order deleted successfully"),
        Err(e) => presenter::error(e, "Error deleting order"),
    }
}
