use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::catalog::AbstractProductCatalog;
use crate::error::AppError;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::ProductModel;

pub struct ProductLookupUseCase {
    pub catalog: Arc<Box<dyn AbstractProductCatalog>>,
    pub logctx: Arc<AppLogContext>,
}

impl ProductLookupUseCase {
    pub fn list_all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        let logctx = &self.logctx;
        self.catalog.all().map_err(|e| {
            app_log_event!(logctx, AppLogLevel::ERROR, "catalog unavailable, {e}");
            e
        })
    }

    pub fn get_by_article_number(
        &self,
        article_number: &str,
    ) -> DefaultResult<ProductModel, AppError> {
        let logctx = &self.logctx;
        self.catalog.find(article_number).map_err(|e| {
            if e.is_not_found() {
                app_log_event!(
                    logctx,
                    AppLogLevel::DEBUG,
                    "product not found, article:{article_number}"
                );
            } else {
                app_log_event!(logctx, AppLogLevel::ERROR, "catalog unavailable, {e}");
            }
            e
        })
    }
} // end of impl ProductLookupUseCase
