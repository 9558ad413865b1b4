use std::collections::HashMap;
use std::result::Result as DefaultResult;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::AppInMemoryDbCfg;
use crate::error::{AppError, AppErrorCode};

// key of the outer hash map is table label, key of inner hash map is
// primary key of each row
pub type AppInMemFetchKeys = HashMap<String, Vec<String>>;
pub type AppInMemDeleteInfo = AppInMemFetchKeys;
pub type AppInMemFetchedSingleRow = Vec<String>;
pub type AppInMemFetchedSingleTable = HashMap<String, AppInMemFetchedSingleRow>;
pub type AppInMemFetchedData = HashMap<String, AppInMemFetchedSingleTable>;
pub type AppInMemUpdateData = AppInMemFetchedData;

#[async_trait]
pub trait AbstInMemoryDStore: Send + Sync {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError>;

    async fn fetch(&self, info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError>;

    async fn fetch_all(&self, label: &str) -> DefaultResult<AppInMemFetchedSingleTable, AppError>;

    /// insert new rows or overwrite existing rows, return number of rows saved
    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;

    /// overwrite rows which already exist, keys not found in the table
    /// are skipped, return number of rows updated
    async fn update_existing(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError>;

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError>;

    /// auto-increment sequence of a table, starting from 1
    async fn next_row_id(&self, label: &str) -> DefaultResult<u64, AppError>;
}

struct InnerTable {
    rows: AppInMemFetchedSingleTable,
    last_row_id: u64,
}

pub struct AppInMemoryDStore {
    alias: String,
    max_items_per_table: u32,
    tables: Mutex<HashMap<String, InnerTable>>,
}

impl AppInMemoryDStore {
    pub fn new(cfg: &AppInMemoryDbCfg) -> Self {
        Self {
            alias: cfg.alias.clone(),
            max_items_per_table: cfg.max_items,
            tables: Mutex::new(HashMap::new()),
        }
    }

    pub fn alias(&self) -> &str {
        self.alias.as_str()
    }

    fn table_not_exist(label: &str) -> AppError {
        AppError {
            code: AppErrorCode::DataTableNotExist,
            detail: Some(label.to_string()),
        }
    }
}

#[async_trait]
impl AbstInMemoryDStore for AppInMemoryDStore {
    async fn create_table(&self, label: &str) -> DefaultResult<(), AppError> {
        let mut guard = self.tables.lock().await;
        guard.entry(label.to_string()).or_insert_with(|| InnerTable {
            rows: HashMap::new(),
            last_row_id: 0,
        });
        Ok(())
    }

    async fn fetch(&self, info: AppInMemFetchKeys) -> DefaultResult<AppInMemFetchedData, AppError> {
        let guard = self.tables.lock().await;
        let mut out = HashMap::new();
        for (label, keys) in info {
            let table = guard
                .get(label.as_str())
                .ok_or_else(|| Self::table_not_exist(label.as_str()))?;
            let found = keys
                .into_iter()
                .filter_map(|k| table.rows.get(k.as_str()).map(|row| (k, row.clone())))
                .collect::<AppInMemFetchedSingleTable>();
            out.insert(label, found);
        }
        Ok(out)
    }

    async fn fetch_all(&self, label: &str) -> DefaultResult<AppInMemFetchedSingleTable, AppError> {
        let guard = self.tables.lock().await;
        let table = guard.get(label).ok_or_else(|| Self::table_not_exist(label))?;
        Ok(table.rows.clone())
    }

    async fn save(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.lock().await;
        // check all tables before writing anything
        for (label, rows) in data.iter() {
            let table = guard
                .get(label.as_str())
                .ok_or_else(|| Self::table_not_exist(label.as_str()))?;
            let num_new = rows
                .keys()
                .filter(|k| !table.rows.contains_key(k.as_str()))
                .count();
            let total = table.rows.len() + num_new;
            if total > self.max_items_per_table as usize {
                return Err(AppError {
                    code: AppErrorCode::ExceedingMaxLimit,
                    detail: Some(format!(
                        "table:{label}, limit:{}",
                        self.max_items_per_table
                    )),
                });
            }
        }
        let mut num_saved = 0;
        for (label, rows) in data {
            if let Some(table) = guard.get_mut(label.as_str()) {
                num_saved += rows.len();
                table.rows.extend(rows);
            }
        }
        Ok(num_saved)
    }

    async fn update_existing(&self, data: AppInMemUpdateData) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.lock().await;
        let mut num_updated = 0;
        for (label, rows) in data {
            let table = guard
                .get_mut(label.as_str())
                .ok_or_else(|| Self::table_not_exist(label.as_str()))?;
            for (key, row) in rows {
                if let Some(saved) = table.rows.get_mut(key.as_str()) {
                    *saved = row;
                    num_updated += 1;
                }
            }
        }
        Ok(num_updated)
    }

    async fn delete(&self, info: AppInMemDeleteInfo) -> DefaultResult<usize, AppError> {
        let mut guard = self.tables.lock().await;
        let mut num_deleted = 0;
        for (label, keys) in info {
            let table = guard
                .get_mut(label.as_str())
                .ok_or_else(|| Self::table_not_exist(label.as_str()))?;
            num_deleted += keys
                .iter()
                .filter_map(|k| table.rows.remove(k.as_str()))
                .count();
        }
        Ok(num_deleted)
    }

    async fn next_row_id(&self, label: &str) -> DefaultResult<u64, AppError> {
        let mut guard = self.tables.lock().await;
        let table = guard
            .get_mut(label)
            .ok_or_else(|| Self::table_not_exist(label))?;
        table.last_row_id += 1;
        Ok(table.last_row_id)
    }
} // end of impl AppInMemoryDStore
