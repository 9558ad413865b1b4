mod in_mem;
mod sql_db;

use std::boxed::Box;
use std::sync::Arc;

use crate::config::AppDataStoreCfg;
use crate::logging::{app_log_event, AppLogContext, AppLogLevel};

pub use in_mem::{
    AbstInMemoryDStore, AppInMemDeleteInfo, AppInMemFetchKeys, AppInMemFetchedData,
    AppInMemFetchedSingleRow, AppInMemFetchedSingleTable, AppInMemUpdateData, AppInMemoryDStore,
};
pub use sql_db::AppMariaDbStore;

pub(crate) fn build_context(
    logctx: Arc<AppLogContext>,
    cfg: &Vec<AppDataStoreCfg>,
) -> (
    Option<Box<dyn AbstInMemoryDStore>>,
    Option<Vec<AppMariaDbStore>>,
) {
    let mut inmem = None;
    let mut sqldb = None;
    for c in cfg {
        match c {
            AppDataStoreCfg::InMemory(d) => {
                let item: Box<dyn AbstInMemoryDStore> = Box::new(AppInMemoryDStore::new(d));
                inmem = Some(item);
            }
            AppDataStoreCfg::DbServer(d) => {
                let lst = sqldb.get_or_insert_with(Vec::new);
                match AppMariaDbStore::try_build(d) {
                    Ok(item) => {
                        app_log_event!(
                            logctx,
                            AppLogLevel::INFO,
                            "sql db pool ready, alias:{}, host:{}, db:{}",
                            d.alias,
                            d.host,
                            d.db_name
                        );
                        lst.push(item);
                    }
                    Err(e) => {
                        app_log_event!(logctx, AppLogLevel::ERROR, "{:?}", e);
                    }
                }
            }
        }
    }
    (inmem, sqldb)
}
