use std::fs::File;
use std::io::BufReader;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use crate::api::web::dto::ProductDto;
use crate::error::{AppError, AppErrorCode};
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};
use crate::model::ProductModel;

// the catalog is shared by all request handlers and never mutated after
// it is loaded
pub trait AbstractProductCatalog: Send + Sync {
    fn find(&self, article_number: &str) -> DefaultResult<ProductModel, AppError>;

    fn all(&self) -> DefaultResult<Vec<ProductModel>, AppError>;
}

pub struct AppFileProductCatalog {
    // load error is kept and reported on every access
    items: DefaultResult<Vec<ProductModel>, AppError>,
}

impl AppFileProductCatalog {
    pub fn load(path: String, logctx: Arc<AppLogContext>) -> Self {
        let items = Self::parse(path.as_str());
        match items.as_ref() {
            Ok(v) => app_log_event!(
                logctx,
                AppLogLevel::INFO,
                "product catalog loaded, path:{path}, num-items:{}",
                v.len()
            ),
            Err(e) => app_log_event!(
                logctx,
                AppLogLevel::ERROR,
                "product catalog load failed, path:{path}, reason:{e}"
            ),
        }
        Self { items }
    }

    pub fn from_models(items: Vec<ProductModel>) -> Self {
        Self { items: Ok(items) }
    }

    pub fn from_error(e: AppError) -> Self {
        Self { items: Err(e) }
    }

    fn parse(path: &str) -> DefaultResult<Vec<ProductModel>, AppError> {
        let fileobj = File::open(path)?;
        let reader = BufReader::new(fileobj);
        let dtos = serde_json::from_reader::<BufReader<File>, Vec<ProductDto>>(reader)?;
        Ok(dtos.into_iter().map(ProductModel::from).collect())
    }

    fn loaded(&self) -> DefaultResult<&Vec<ProductModel>, AppError> {
        self.items.as_ref().map_err(Clone::clone)
    }
} // end of impl AppFileProductCatalog

impl AbstractProductCatalog for AppFileProductCatalog {
    fn find(&self, article_number: &str) -> DefaultResult<ProductModel, AppError> {
        self.loaded()?
            .iter()
            .find(|p| p.article_number == article_number)
            .cloned()
            .ok_or(AppError {
                code: AppErrorCode::ProductNotExist,
                detail: Some(article_number.to_string()),
            })
    }

    fn all(&self) -> DefaultResult<Vec<ProductModel>, AppError> {
        self.loaded().cloned()
    }
}
