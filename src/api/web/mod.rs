use std::collections::HashMap;

use axum::routing::{get, put, MethodRouter};

use crate::constant::api::web as WebConst;
use crate::{AppSharedState, WebApiHdlrLabel};

pub mod dto;
mod order;
mod product;

pub type ApiRouteType = MethodRouter<AppSharedState>;
pub type ApiRouteTableType = HashMap<WebApiHdlrLabel, ApiRouteType>;

pub fn route_table() -> ApiRouteTableType {
    let mut out: ApiRouteTableType = HashMap::new();
    out.insert(WebConst::PRODUCT_COLLECTION, get(product::list_handler));
    out.insert(WebConst::PRODUCT_INSTANCE, get(product::retrieve_handler));
    out.insert(
        WebConst::ORDER_COLLECTION,
        get(order::list_handler).post(order::create_handler),
    );
    out.insert(
        WebConst::ORDER_INSTANCE,
        put(order::edit_handler).delete(order::discard_handler),
    );
    out
}

mod presenter {
    use axum::extract::rejection::JsonRejection;
    use axum::http::{
        header as HttpHeader, HeaderMap as HttpHeaderMap, HeaderValue as HttpHeaderValue,
        StatusCode as HttpStatusCode,
    };
    use serde::Serialize;

    use super::dto::AppRespMsgDto;
    use crate::constant as AppConst;
    use crate::error::{AppError, AppErrorCode};

    pub(super) type AppWebResponse = (HttpStatusCode, HttpHeaderMap, String);

    pub(super) fn json<T: Serialize>(status: HttpStatusCode, body: &T) -> AppWebResponse {
        let (status, serial) = match serde_json::to_string(body) {
            Ok(s) => (status, s),
            Err(_e) => (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                r#"{"message":"serialization-failure"}"#.to_string(),
            ),
        };
        let resp_ctype_val = HttpHeaderValue::from_static(AppConst::HTTP_CONTENT_TYPE_JSON);
        let hdr_kv_pairs = [(HttpHeader::CONTENT_TYPE, resp_ctype_val)];
        let hdr_map = HttpHeaderMap::from_iter(hdr_kv_pairs);
        (status, hdr_map, serial)
    }

    pub(super) fn message(status: HttpStatusCode, msg: &str) -> AppWebResponse {
        let body = AppRespMsgDto {
            message: msg.to_string(),
            error: None,
        };
        json(status, &body)
    }

    /// `server_msg` is applied only to server-side errors, detail of client
    /// errors are always shown to clients
    pub(super) fn error(e: AppError, server_msg: &str) -> AppWebResponse {
        let (status, body) = match e.code {
            AppErrorCode::InvalidInput => (
                HttpStatusCode::BAD_REQUEST,
                AppRespMsgDto {
                    message: e.detail.unwrap_or("Invalid request".to_string()),
                    error: None,
                },
            ),
            AppErrorCode::OrderNotExist => (
                HttpStatusCode::NOT_FOUND,
                AppRespMsgDto {
                    message: "Order not found".to_string(),
                    error: None,
                },
            ),
            AppErrorCode::ProductNotExist => (
                HttpStatusCode::NOT_FOUND,
                AppRespMsgDto {
                    message: "Product not found".to_string(),
                    error: None,
                },
            ),
            _ => (
                HttpStatusCode::INTERNAL_SERVER_ERROR,
                AppRespMsgDto {
                    message: server_msg.to_string(),
                    error: Some(e.to_string()),
                },
            ),
        };
        json(status, &body)
    }

    /// malformed body and schema violation are reported as client error,
    /// except oversized body which keeps its own status
    pub(super) fn rejected(e: JsonRejection) -> AppWebResponse {
        let status = match e.status() {
            HttpStatusCode::PAYLOAD_TOO_LARGE => HttpStatusCode::PAYLOAD_TOO_LARGE,
            _others => HttpStatusCode::BAD_REQUEST,
        };
        message(status, e.body_text().as_str())
    }
} // end of inner module presenter
