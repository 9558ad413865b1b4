use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use industrial_order::api::web::dto::{OrderCreateReqData, OrderDto, OrderEditReqData, ProductDto};
use industrial_order::error::AppErrorCode;
use industrial_order::model::{OrderModel, ProductModel};

fn ut_create_req(product_id: Option<&str>, quantity: Option<i64>) -> OrderCreateReqData {
    OrderCreateReqData {
        product_id: product_id.map(String::from),
        quantity,
    }
}

#[test]
fn create_order_from_req_ok() {
    let now = Utc::now();
    let req = ut_create_req(Some(" IND-1003 "), Some(3));
    let m = OrderModel::try_from_create_req(req, now).unwrap();
    assert_eq!(m.product_id.as_str(), "IND-1003");
    assert_eq!(m.quantity, 3);
    assert_eq!(m.create_time, now);
    assert_eq!(m.oid.len(), 36);
    let req = ut_create_req(Some("IND-1003"), Some(3));
    let m2 = OrderModel::try_from_create_req(req, now).unwrap();
    assert_ne!(m.oid, m2.oid);
}

#[test]
fn create_order_from_req_error() {
    let now = Utc::now();
    let too_long = "x".repeat(51);
    let combo = [
        (None, Some(3), "Product ID and quantity are required"),
        (Some("IND-1003"), None, "Product ID and quantity are required"),
        (Some("   "), Some(3), "Product ID and quantity are required"),
        (Some("IND-1003"), Some(0), "Valid quantity is required"),
        (Some("IND-1003"), Some(-1), "Valid quantity is required"),
        (
            Some("IND-1003"),
            Some(i32::MAX as i64 + 1),
            "Valid quantity is required",
        ),
        (Some(too_long.as_str()), Some(3), "Valid product ID is required"),
    ];
    for (product_id, quantity, expect_msg) in combo {
        let req = ut_create_req(product_id, quantity);
        let result = OrderModel::try_from_create_req(req, now);
        assert!(result.is_err());
        let e = result.unwrap_err();
        assert_eq!(e.code, AppErrorCode::InvalidInput);
        assert_eq!(e.detail.as_deref(), Some(expect_msg));
    }
}

#[test]
fn create_order_product_id_multibyte() {
    let now = Utc::now();
    // 50 characters occupy 100 bytes in UTF-8
    let fit = "é".repeat(50);
    let req = ut_create_req(Some(fit.as_str()), Some(1));
    let m = OrderModel::try_from_create_req(req, now).unwrap();
    assert_eq!(m.product_id, fit);
    let too_long = "é".repeat(51);
    let req = ut_create_req(Some(too_long.as_str()), Some(1));
    let e = OrderModel::try_from_create_req(req, now).unwrap_err();
    assert_eq!(e.code, AppErrorCode::InvalidInput);
    assert_eq!(e.detail.as_deref(), Some("Valid product ID is required"));
}

#[test]
fn edit_order_quantity_validation() {
    let combo = [
        (Some(1i64), Ok(1u32)),
        (Some(i32::MAX as i64), Ok(i32::MAX as u32)),
        (Some(0), Err(())),
        (Some(-5), Err(())),
        (None, Err(())),
    ];
    for (raw, expect) in combo {
        let req = OrderEditReqData { quantity: raw };
        let actual = OrderModel::try_quantity_from_edit_req(&req);
        match expect {
            Ok(v) => assert_eq!(actual.unwrap(), v),
            Err(()) => {
                let e = actual.unwrap_err();
                assert_eq!(e.code, AppErrorCode::InvalidInput);
                assert_eq!(e.detail.as_deref(), Some("Valid quantity is required"));
            }
        }
    }
}

#[test]
fn order_dto_serialize_camel_case() {
    let create_time = Utc::now() - Duration::minutes(5);
    let m = OrderModel {
        oid: "0b7e1a4e-5b7d-4b0a-9d1e-2f1f0c3a7e11".to_string(),
        product_id: "IND-1001".to_string(),
        quantity: 7,
        create_time,
    };
    let value = serde_json::to_value(OrderDto::from(m)).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 4);
    assert_eq!(
        obj.get("orderId").unwrap().as_str(),
        Some("0b7e1a4e-5b7d-4b0a-9d1e-2f1f0c3a7e11")
    );
    assert_eq!(obj.get("productId").unwrap().as_str(), Some("IND-1001"));
    assert_eq!(obj.get("quantity").unwrap().as_u64(), Some(7));
    assert!(obj.contains_key("orderDate"));
}

#[test]
fn create_req_accept_snake_case_alias() {
    let raw = json!({"product_id": "IND-1005", "quantity": 2});
    let req = serde_json::from_value::<OrderCreateReqData>(raw).unwrap();
    assert_eq!(req.product_id.as_deref(), Some("IND-1005"));
    assert_eq!(req.quantity, Some(2));
    let raw = json!({"productId": "IND-1005", "quantity": 2, "price": 99});
    let result = serde_json::from_value::<OrderCreateReqData>(raw);
    assert!(result.is_err());
    let raw = json!({"productId": "IND-1005", "quantity": "2"});
    let result = serde_json::from_value::<OrderCreateReqData>(raw);
    assert!(result.is_err());
}

#[test]
fn product_dto_price_as_number() {
    let m = ProductModel {
        article_number: "IND-1005".to_string(),
        description: "Ball bearing 6205-2RS".to_string(),
        price: Decimal::new(640, 2),
    };
    let value = serde_json::to_value(ProductDto::from(m.clone())).unwrap();
    assert_eq!(value.get("articleNumber").unwrap().as_str(), Some("IND-1005"));
    assert_eq!(value.get("price").unwrap().as_f64(), Some(6.4));
    let dto = serde_json::from_value::<ProductDto>(value).unwrap();
    assert_eq!(ProductModel::from(dto), m);
}
