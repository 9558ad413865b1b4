use axum::debug_handler;
use axum::extract::{Path as ExtractPath, State as ExtractState};
use axum::http::StatusCode as HttpStatusCode;
use axum::response::IntoResponse;

use super::dto::ProductDto;
use super::presenter;
use crate::usecase::ProductLookupUseCase;
use crate::AppSharedState;

fn usecase(appstate: &AppSharedState) -> ProductLookupUseCase {
    ProductLookupUseCase {
        catalog: appstate.product_catalog(),
        logctx: appstate.log_context().clone(),
    }
}

// always to specify state type explicitly to the debug macro
#[debug_handler(state=AppSharedState)]
pub(super) async fn list_handler(
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    match usecase(&appstate).list_all() {
        Ok(ms) => {
            let body = ms.into_iter().map(ProductDto::from).collect::<Vec<_>>();
            presenter::json(HttpStatusCode::OK, &body)
        }
        Err(e) => presenter::error(e, "Error fetching products"),
    }
}

#[debug_handler(state=AppSharedState)]
pub(super) async fn retrieve_handler(
    ExtractPath(article_number): ExtractPath<String>,
    ExtractState(appstate): ExtractState<AppSharedState>,
) -> impl IntoResponse {
    match usecase(&appstate).get_by_article_number(article_number.as_str()) {
        Ok(m) => presenter::json(HttpStatusCode::OK, &ProductDto::from(m)),
        Err(e) => presenter::error(e, "Error fetching product"),
    }
}
