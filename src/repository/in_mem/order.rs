use std::boxed::Box;
use std::collections::HashMap;
use std::result::Result as DefaultResult;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::datastore::{AbstInMemoryDStore, AppInMemFetchedSingleRow};
use crate::error::{AppError, AppErrorCode};
use crate::model::OrderModel;
use crate::repository::AbsOrderRepo;

const TABLE_LABEL: &str = "orders";

#[rustfmt::skip]
enum InMemColIdx {ProductId, Quantity, CreateTime, RowId, TotNumColumns}

impl From<InMemColIdx> for usize {
    fn from(value: InMemColIdx) -> usize {
        match value {
            InMemColIdx::ProductId => 0,
            InMemColIdx::Quantity => 1,
            InMemColIdx::CreateTime => 2,
            InMemColIdx::RowId => 3,
            InMemColIdx::TotNumColumns => 4,
        }
    }
}

struct SavedOrder {
    row_id: u64,
    model: OrderModel,
}

fn to_inmem_row(m: &OrderModel, row_id: u64) -> AppInMemFetchedSingleRow {
    let num_cols = usize::from(InMemColIdx::TotNumColumns);
    let mut row = vec![String::new(); num_cols];
    let _ = [
        (InMemColIdx::ProductId, m.product_id.clone()),
        (InMemColIdx::Quantity, m.quantity.to_string()),
        (
            InMemColIdx::CreateTime,
            m.create_time.to_rfc3339_opts(SecondsFormat::Micros, true),
        ),
        (InMemColIdx::RowId, row_id.to_string()),
    ]
    .into_iter()
    .map(|(idx, val)| {
        let idx: usize = idx.into();
        row[idx] = val;
    })
    .count();
    row
}

fn corrupted(oid: &str, reason: &str) -> AppError {
    AppError {
        code: AppErrorCode::DataCorruption,
        detail: Some(format!("order:{oid}, {reason}")),
    }
}

impl TryFrom<(String, AppInMemFetchedSingleRow)> for SavedOrder {
    type Error = AppError;
    fn try_from(value: (String, AppInMemFetchedSingleRow)) -> DefaultResult<Self, Self::Error> {
        let (oid, row) = value;
        if row.len() != usize::from(InMemColIdx::TotNumColumns) {
            return Err(corrupted(oid.as_str(), "num-columns"));
        }
        let product_id = row[usize::from(InMemColIdx::ProductId)].clone();
        let quantity = row[usize::from(InMemColIdx::Quantity)]
            .parse::<u32>()
            .map_err(|_e| corrupted(oid.as_str(), "quantity"))?;
        let create_time = DateTime::parse_from_rfc3339(
            row[usize::from(InMemColIdx::CreateTime)].as_str(),
        )
        .map_err(|_e| corrupted(oid.as_str(), "create-time"))?
        .with_timezone(&Utc);
        let row_id = row[usize::from(InMemColIdx::RowId)]
            .parse::<u64>()
            .map_err(|_e| corrupted(oid.as_str(), "row-id"))?;
        let model = OrderModel {
            oid,
            product_id,
            quantity,
            create_time,
        };
        Ok(Self { row_id, model })
    }
}

pub struct OrderInMemRepo {
    datastore: Arc<Box<dyn AbstInMemoryDStore>>,
}

impl OrderInMemRepo {
    pub async fn new(m: Arc<Box<dyn AbstInMemoryDStore>>) -> DefaultResult<Self, AppError> {
        m.create_table(TABLE_LABEL).await?;
        Ok(Self { datastore: m })
    }
}

#[async_trait]
impl AbsOrderRepo for OrderInMemRepo {
    async fn create(&self, order: OrderModel) -> DefaultResult<(), AppError> {
        let row_id = self.datastore.next_row_id(TABLE_LABEL).await?;
        let row = to_inmem_row(&order, row_id);
        let table = HashMap::from([(order.oid, row)]);
        let data = HashMap::from([(TABLE_LABEL.to_string(), table)]);
        let _num_saved = self.datastore.save(data).await?;
        Ok(())
    }

    async fn fetch_all(&self) -> DefaultResult<Vec<OrderModel>, AppError> {
        let table = self.datastore.fetch_all(TABLE_LABEL).await?;
        let mut saved = table
            .into_iter()
            .map(SavedOrder::try_from)
            .collect::<DefaultResult<Vec<_>, AppError>>()?;
        saved.sort_by(|a, b| {
            b.model
                .create_time
                .cmp(&a.model.create_time)
                .then(b.row_id.cmp(&a.row_id))
        });
        Ok(saved.into_iter().map(|s| s.model).collect())
    }

    async fn update_quantity(&self, oid: &str, quantity: u32) -> DefaultResult<usize, AppError> {
        let info = HashMap::from([(TABLE_LABEL.to_string(), vec![oid.to_string()])]);
        let mut fetched = self.datastore.fetch(info).await?;
        let found = fetched
            .remove(TABLE_LABEL)
            .and_then(|mut t| t.remove(oid));
        let mut row = match found {
            Some(r) => r,
            None => return Ok(0),
        };
        row[usize::from(InMemColIdx::Quantity)] = quantity.to_string();
        let table = HashMap::from([(oid.to_string(), row)]);
        let data = HashMap::from([(TABLE_LABEL.to_string(), table)]);
        // skipped if the order was deleted in the meantime
        self.datastore.update_existing(data).await
    }

    async fn delete(&self, oid: &str) -> DefaultResult<usize, AppError> {
        let info = HashMap::from([(TABLE_LABEL.to_string(), vec![oid.to_string()])]);
        self.datastore.delete(info).await
    }
} // end of impl OrderInMemRepo
