use std::ops::DerefMut;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future;
use futures_util::stream::TryStreamExt;
use sqlx::mysql::MySqlRow;
use sqlx::{Connection, Executor, Row, Statement};

use crate::datastore::AppMariaDbStore;
use crate::error::{AppError, AppErrorCode};
use crate::model::OrderModel;
use crate::repository::AbsOrderRepo;

const SQL_INSERT: &str = "INSERT INTO `orders`(`order_id`,`product_id`,`quantity`,\
                          `order_date`) VALUES (?,?,?,?)";
const SQL_FETCH_ALL: &str = "SELECT `order_id`,`product_id`,`quantity`,`order_date` \
                             FROM `orders` ORDER BY `order_date` DESC, `row_id` DESC";
const SQL_UPDATE_QTY: &str = "UPDATE `orders` SET `quantity`=? WHERE `order_id`=?";
const SQL_COUNT_BY_ID: &str = "SELECT COUNT(*) FROM `orders` WHERE `order_id`=?";
const SQL_DELETE: &str = "DELETE FROM `orders` WHERE `order_id`=?";

impl TryFrom<MySqlRow> for OrderModel {
    type Error = AppError;
    fn try_from(value: MySqlRow) -> DefaultResult<Self, Self::Error> {
        let oid = value.try_get::<String, usize>(0)?;
        let product_id = value.try_get::<String, usize>(1)?;
        let raw_qty = value.try_get::<i32, usize>(2)?;
        let quantity = u32::try_from(raw_qty).map_err(|_e| AppError {
            code: AppErrorCode::DataCorruption,
            detail: Some(format!("order:{oid}, quantity:{raw_qty}")),
        })?;
        let create_time = value.try_get::<DateTime<Utc>, usize>(3)?;
        Ok(Self {
            oid,
            product_id,
            quantity,
            create_time,
        })
    }
}

pub struct OrderMariaDbRepo {
    _db: Arc<AppMariaDbStore>,
}

impl OrderMariaDbRepo {
    pub fn try_build(dstores: &[Arc<AppMariaDbStore>]) -> DefaultResult<Self, AppError> {
        let _db = dstores.first().cloned().ok_or(AppError {
            code: AppErrorCode::MissingDataStore,
            detail: Some("mariadb".to_string()),
        })?;
        Ok(Self { _db })
    }
}

#[async_trait]
impl AbsOrderRepo for OrderMariaDbRepo {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        let OrderModel {
            oid,
            product_id,
            quantity,
            create_time,
        } = order;
        let mut conn = self._db.acquire().await?;
        let stmt = conn.prepare(SQL_INSERT).await?;
        let query = stmt
            .query()
            .bind(oid)
            .bind(product_id)
            .bind(quantity)
            .bind(create_time);
        let exec = conn.deref_mut();
        let resultset = query.execute(exec).await?;
        if resultset.rows_affected() == 1 {
            Ok(())
        } else {
            Err(AppError {
                code: AppErrorCode::DataCorruption,
                detail: Some(format!(
                    "num-inserted, actual:{}, expect:1",
                    resultset.rows_affected()
                )),
            })
        }
    } // end of fn create

    async fn fetch_all(&self) -> DefaultResult<Vec<OrderModel>, AppError> {
        let mut conn = self._db.acquire().await?;
        let stmt = conn.prepare(SQL_FETCH_ALL).await?;
        let query = stmt.query();
        let exec = conn.deref_mut();
        query
            .fetch(exec)
            .map_err(AppError::from)
            .and_then(|row| future::ready(OrderModel::try_from(row)))
            .try_collect::<Vec<_>>()
            .await
    }

    async fn update_quantity(&self, oid: &str, quantity: u32) -> DefaultResult<usize, AppError> {
        let mut conn = self._db.acquire().await?;
        let mut tx = conn.begin().await?;
        let stmt = tx.deref_mut().prepare(SQL_UPDATE_QTY).await?;
        let query = stmt.query().bind(quantity).bind(oid);
        let resultset = query.execute(tx.deref_mut()).await?;
        let num_affected = resultset.rows_affected() as usize;
        // the server reports zero affected rows when the new quantity is
        // the same as the saved one, existence has to be checked separately
        let num_matched = if num_affected == 0 {
            let stmt = tx.deref_mut().prepare(SQL_COUNT_BY_ID).await?;
            let row = stmt.query().bind(oid).fetch_one(tx.deref_mut()).await?;
            row.try_get::<i64, usize>(0)? as usize
        } else {
            num_affected
        };
        tx.commit().await?;
        Ok(num_matched)
    } // end of fn update_quantity

    async fn delete(&self, oid: &str) -> DefaultResult<usize, AppError> {
        let mut conn = self._db.acquire().await?;
        let stmt = conn.prepare(SQL_DELETE).await?;
        let query = stmt.query().bind(oid);
        let exec = conn.deref_mut();
        let resultset = query.execute(exec).await?;
        Ok(resultset.rows_affected() as usize)
    }
} // end of impl OrderMariaDbRepo
