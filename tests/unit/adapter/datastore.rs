use std::collections::HashMap;

use industrial_order::datastore::{AbstInMemoryDStore, AppInMemoryDStore};
use industrial_order::error::AppErrorCode;
use industrial_order::AppInMemoryDbCfg;

fn ut_inmem_store(max_items: u32) -> AppInMemoryDStore {
    let cfg = AppInMemoryDbCfg {
        alias: "ut-inmem".to_string(),
        max_items,
    };
    AppInMemoryDStore::new(&cfg)
}

fn ut_row(vals: &[&str]) -> Vec<String> {
    vals.iter().map(|v| v.to_string()).collect()
}

#[tokio::test]
async fn save_fetch_ok() {
    let store = ut_inmem_store(10);
    store.create_table("ut-tbl").await.unwrap();
    let rows = HashMap::from([
        ("k1".to_string(), ut_row(&["a", "1"])),
        ("k2".to_string(), ut_row(&["b", "2"])),
    ]);
    let num = store
        .save(HashMap::from([("ut-tbl".to_string(), rows)]))
        .await
        .unwrap();
    assert_eq!(num, 2);
    let keys = HashMap::from([(
        "ut-tbl".to_string(),
        vec!["k2".to_string(), "k-nonexist".to_string()],
    )]);
    let mut fetched = store.fetch(keys).await.unwrap();
    let table = fetched.remove("ut-tbl").unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("k2").unwrap(), &ut_row(&["b", "2"]));
    let all = store.fetch_all("ut-tbl").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn update_delete_existing_only() {
    let store = ut_inmem_store(10);
    store.create_table("ut-tbl").await.unwrap();
    let rows = HashMap::from([("k1".to_string(), ut_row(&["a", "1"]))]);
    store
        .save(HashMap::from([("ut-tbl".to_string(), rows)]))
        .await
        .unwrap();
    let rows = HashMap::from([
        ("k1".to_string(), ut_row(&["a", "9"])),
        ("k-nonexist".to_string(), ut_row(&["z", "0"])),
    ]);
    let num = store
        .update_existing(HashMap::from([("ut-tbl".to_string(), rows)]))
        .await
        .unwrap();
    assert_eq!(num, 1);
    let all = store.fetch_all("ut-tbl").await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all.get("k1").unwrap(), &ut_row(&["a", "9"]));

    let keys = HashMap::from([(
        "ut-tbl".to_string(),
        vec!["k1".to_string(), "k-nonexist".to_string()],
    )]);
    let num = store.delete(keys).await.unwrap();
    assert_eq!(num, 1);
    assert!(store.fetch_all("ut-tbl").await.unwrap().is_empty());
}

#[tokio::test]
async fn exceed_max_items() {
    let store = ut_inmem_store(2);
    store.create_table("ut-tbl").await.unwrap();
    let rows = HashMap::from([
        ("k1".to_string(), ut_row(&["a"])),
        ("k2".to_string(), ut_row(&["b"])),
    ]);
    store
        .save(HashMap::from([("ut-tbl".to_string(), rows)]))
        .await
        .unwrap();
    // overwriting existing rows does not count as new items
    let rows = HashMap::from([("k2".to_string(), ut_row(&["c"]))]);
    let result = store
        .save(HashMap::from([("ut-tbl".to_string(), rows)]))
        .await;
    assert!(result.is_ok());
    let rows = HashMap::from([("k3".to_string(), ut_row(&["d"]))]);
    let result = store
        .save(HashMap::from([("ut-tbl".to_string(), rows)]))
        .await;
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().code, AppErrorCode::ExceedingMaxLimit);
}

#[tokio::test]
async fn table_not_exist() {
    let store = ut_inmem_store(2);
    let result = store.fetch_all("ut-nonexist").await;
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().code, AppErrorCode::DataTableNotExist);
    let result = store.next_row_id("ut-nonexist").await;
    assert_eq!(result.unwrap_err().code, AppErrorCode::DataTableNotExist);
}

#[tokio::test]
async fn row_id_sequence() {
    let store = ut_inmem_store(2);
    store.create_table("ut-tbl").await.unwrap();
    assert_eq!(store.next_row_id("ut-tbl").await.unwrap(), 1);
    assert_eq!(store.next_row_id("ut-tbl").await.unwrap(), 2);
    // creating the same table again keeps the sequence
    store.create_table("ut-tbl").await.unwrap();
    assert_eq!(store.next_row_id("ut-tbl").await.unwrap(), 3);
    assert_eq!(store.alias(), "ut-inmem");
}
