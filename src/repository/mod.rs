use std::boxed::Box;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AppError, AppErrorCode};
use crate::model::OrderModel;
use crate::AppDataStoreContext;

mod in_mem;
// make in-memory repo visible only for testing purpose
pub use in_mem::order::OrderInMemRepo;

#[cfg(feature = "mariadb")]
mod mariadb;

#[cfg(feature = "mariadb")]
pub use mariadb::order::OrderMariaDbRepo;

// the repository instance may be used across an await,
// the future created by app callers has to be able to pass to different threads
// , it is the reason to add `Send` and `Sync` as super-traits
#[async_trait]
pub trait AbsOrderRepo: Sync + Send {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError>;

    /// latest order comes first, orders created at the same time are
    /// sorted by insertion sequence in descending order
    async fn fetch_all(&self) -> DefaultResult<Vec<OrderModel>, AppError>;

    /// return number of orders matching the given ID, zero means the
    /// order does not exist
    async fn update_quantity(&self, oid: &str, quantity: u32) -> DefaultResult<usize, AppError>;

    async fn delete(&self, oid: &str) -> DefaultResult<usize, AppError>;
}

pub async fn app_repo_order(
    ds: Arc<AppDataStoreContext>,
) -> DefaultResult<Box<dyn AbsOrderRepo>, AppError> {
    #[cfg(feature = "mariadb")]
    if let Some(dbs) = ds.sql_dbs.as_ref().filter(|d| !d.is_empty()) {
        let obj = OrderMariaDbRepo::try_build(dbs)?;
        return Ok(Box::new(obj));
    }
    if let Some(m) = &ds.in_mem {
        let obj = OrderInMemRepo::new(m.clone()).await?;
        Ok(Box::new(obj))
    } else {
        Err(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("order-repo".to_string()),
        })
    }
}
