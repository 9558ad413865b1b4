#[cfg(feature = "mariadb")]
mod mariadb;

use chrono::{DateTime, Duration, SubsecRound, Utc};

use industrial_order::model::OrderModel;
use industrial_order::repository::AbsOrderRepo;

pub(crate) fn ut_order(product_id: &str, quantity: u32, create_time: DateTime<Utc>) -> OrderModel {
    OrderModel {
        oid: OrderModel::generate_oid(),
        product_id: product_id.to_string(),
        quantity,
        // sql database keeps the time in microseconds
        create_time: create_time.trunc_subsecs(6),
    }
}

// shared by all repository implementations, the repository should start
// with no saved order
pub(crate) async fn ut_order_repo_crud(repo: Box<dyn AbsOrderRepo>) {
    let t0 = Utc::now();
    let m1 = ut_order("IND-1001", 3, t0 - Duration::seconds(30));
    let m2 = ut_order("IND-1002", 5, t0);
    let m3 = ut_order("IND-1003", 1, t0 - Duration::seconds(10));
    for m in [m1.clone(), m2.clone(), m3.clone()] {
        repo.create(m).await.unwrap();
    }
    let fetched = repo.fetch_all().await.unwrap();
    let ids = fetched.iter().map(|m| m.oid.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, [m2.oid.as_str(), m3.oid.as_str(), m1.oid.as_str()]);
    assert_eq!(fetched[0], m2);

    let num = repo.update_quantity(m1.oid.as_str(), 9).await.unwrap();
    assert_eq!(num, 1);
    // same quantity again still matches the order
    let num = repo.update_quantity(m1.oid.as_str(), 9).await.unwrap();
    assert_eq!(num, 1);
    let num = repo
        .update_quantity("00000000-0000-4000-8000-000000000000", 9)
        .await
        .unwrap();
    assert_eq!(num, 0);
    let fetched = repo.fetch_all().await.unwrap();
    let saved = fetched.iter().find(|m| m.oid == m1.oid).unwrap();
    assert_eq!(saved.quantity, 9);
    assert_eq!(saved.product_id, m1.product_id);
    assert_eq!(saved.create_time, m1.create_time);

    let num = repo.delete(m3.oid.as_str()).await.unwrap();
    assert_eq!(num, 1);
    let num = repo.delete(m3.oid.as_str()).await.unwrap();
    assert_eq!(num, 0);
    let fetched = repo.fetch_all().await.unwrap();
    assert_eq!(fetched.len(), 2);
    assert!(fetched.iter().all(|m| m.oid != m3.oid));
} // end of fn ut_order_repo_crud
