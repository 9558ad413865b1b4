use std::sync::Arc;

use chrono::Utc;

use industrial_order::datastore::AppMariaDbStore;
use industrial_order::repository::{AbsOrderRepo, OrderMariaDbRepo};
use industrial_order::AppDataStoreCfg;

use super::{ut_order, ut_order_repo_crud};
use crate::ut_load_config;

// the test cases below require a running database server, configured in
// the example file `config_ok_sqldb.json`
async fn ut_setup_db_repo() -> OrderMariaDbRepo {
    let cfg = ut_load_config("config_ok_sqldb.json");
    let db_cfg = cfg
        .api_server
        .data_store
        .iter()
        .find_map(|c| match c {
            AppDataStoreCfg::DbServer(d) => Some(d),
            AppDataStoreCfg::InMemory(_) => None,
        })
        .unwrap();
    let db = AppMariaDbStore::try_build(db_cfg).unwrap();
    db.ensure_schema().await.unwrap();
    // idempotent
    db.ensure_schema().await.unwrap();
    {
        let mut conn = db.acquire().await.unwrap();
        sqlx::query("DELETE FROM `orders`")
            .execute(&mut *conn)
            .await
            .unwrap();
    }
    OrderMariaDbRepo::try_build(&[Arc::new(db)]).unwrap()
}

#[tokio::test]
#[ignore]
async fn order_crud_ok() {
    let repo = ut_setup_db_repo().await;
    ut_order_repo_crud(Box::new(repo)).await;
}

#[tokio::test]
#[ignore]
async fn create_time_microsecond_precision() {
    let repo = ut_setup_db_repo().await;
    let t0 = Utc::now();
    let m = ut_order("IND-1007", 4, t0);
    repo.create(m.clone()).await.unwrap();
    let fetched = repo.fetch_all().await.unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0], m);
}
