use std::result::Result as DefaultResult;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::web::dto::{OrderCreateReqData, OrderDto, OrderEditReqData};
use crate::constant::limit;
use crate::error::{AppError, AppErrorCode};

pub(crate) const MSG_CREATE_FIELDS_REQUIRED: &str = "Product ID and quantity are required";
pub(crate) const MSG_QUANTITY_INVALID: &str = "Valid quantity is required";
pub(crate) const MSG_PRODUCT_ID_INVALID: &str = "Valid product ID is required";

#[derive(Debug, Clone, PartialEq)]
pub struct OrderModel {
    pub oid: String,
    pub product_id: String,
    pub quantity: u32,
    pub create_time: DateTime<Utc>,
}

fn client_error(msg: &str) -> AppError {
    AppError {
        code: AppErrorCode::InvalidInput,
        detail: Some(msg.to_string()),
    }
}

impl OrderModel {
    /// validate the creation request, then assign new order ID and the
    /// given creation time
    pub fn try_from_create_req(
        req: OrderCreateReqData,
        create_time: DateTime<Utc>,
    ) -> DefaultResult<Self, AppError> {
        let product_id = req
            .product_id
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty());
        let (product_id, raw_qty) = match (product_id, req.quantity) {
            (Some(p), Some(q)) => (p, q),
            _others => {
                return Err(client_error(MSG_CREATE_FIELDS_REQUIRED));
            }
        };
        // the column width counts characters, not bytes
    if product_id.chars().count() > limit::MAX_PRODUCT_ID_LEN {
            return Err(client_error(MSG_PRODUCT_ID_INVALID));
        }
        let quantity = Self::validate_quantity(Some(raw_qty))?;
        Ok(Self {
            oid: Self::generate_oid(),
            product_id,
            quantity,
            create_time,
        })
    }

    pub fn try_quantity_from_edit_req(req: &OrderEditReqData) -> DefaultResult<u32, AppError> {
        Self::validate_quantity(req.quantity)
    }

    /// quantity has to be positive integer which fits the column of the
    /// order table
    pub fn validate_quantity(raw: Option<i64>) -> DefaultResult<u32, AppError> {
        match raw {
            Some(q) if (1..=limit::MAX_ORDER_QUANTITY).contains(&q) => Ok(q as u32),
            _others => Err(client_error(MSG_QUANTITY_INVALID)),
        }
    }

    pub fn generate_oid() -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
} // end of impl OrderModel

impl From<OrderModel> for OrderDto {
    fn from(value: OrderModel) -> Self {
        Self {
            order_id: value.oid,
            product_id: value.product_id,
            quantity: value.quantity,
            order_date: value.create_time,
        }
    }
}

#[test]
fn verify_generated_oid_format() {
    let oid = OrderModel::generate_oid();
    assert_eq!(oid.len(), limit::MAX_ORDER_ID_LEN);
    let parsed = Uuid::parse_str(oid.as_str()).unwrap();
    assert_eq!(parsed.get_version_num(), 4);
    assert_ne!(oid, OrderModel::generate_oid());
}
