use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// fields of request bodies are optional at deserialization stage, missing
// fields are reported by use cases with readable message
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderCreateReqData {
    #[serde(alias = "product_id")]
    pub product_id: Option<String>,
    pub quantity: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct OrderEditReqData {
    pub quantity: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreateRespDto {
    pub message: String,
    pub order_id: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub order_date: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub article_number: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct AppRespMsgDto {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}
