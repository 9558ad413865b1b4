use crate::WebApiHdlrLabel;

pub mod env_vars {
    pub const SERVICE_BASEPATH: &str = "SERVICE_BASE_PATH";
    // relative path starting from app / service home folder
    pub const CFG_FILEPATH: &str = "CONFIG_FILE_PATH";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";
    pub const DB_NAME: &str = "DB_NAME";
    pub const LISTEN_PORT: &str = "PORT";
    pub const EXPECTED_LABELS: [&str; 8] = [
        SERVICE_BASEPATH,
        CFG_FILEPATH,
        DB_HOST,
        DB_PORT,
        DB_USER,
        DB_PASSWORD,
        DB_NAME,
        LISTEN_PORT,
    ];
}

pub mod default_local {
    pub const SERVICE_BASEPATH: &str = ".";
    pub const LISTEN_HOST: &str = "0.0.0.0";
    pub const LISTEN_PORT: u16 = 3000;
    pub const API_BASE: &str = "api";
    pub const DB_HOST: &str = "localhost";
    pub const DB_PORT: u16 = 3306;
    pub const DB_USER: &str = "root";
    pub const DB_NAME: &str = "industrial_orders";
    pub const DB_ALIAS: &str = "order-db";
    pub const DB_MAX_CONNS: u32 = 10;
    pub const DB_ACQUIRE_TIMEOUT_SECS: u16 = 30;
    pub const DB_IDLE_TIMEOUT_SECS: u16 = 60;
    pub const CATALOG_PATH: &str = "static/industrial.json";
    pub const STATIC_ASSET_PATH: &str = "static";
    pub const MAX_CONNECTIONS: u32 = 128;
    pub const LIMIT_REQ_BODY_BYTES: usize = 16384;
    pub const NUM_WORKERS: u8 = 4;
    pub const STACK_SIZE_KB: u16 = 256;
}

pub mod limit {
    pub const MAX_ITEMS_STORED_PER_MODEL: u32 = 65535u32;
    pub const MAX_DB_CONNECTIONS: u32 = 1000u32;
    pub const MAX_SECONDS_DB_IDLE: u16 = 600u16;
    // match column sizes of the table `orders`
    pub const MAX_PRODUCT_ID_LEN: usize = 50;
    pub const MAX_ORDER_ID_LEN: usize = 36;
    pub const MAX_ORDER_QUANTITY: i64 = i32::MAX as i64;
}

pub const HTTP_CONTENT_TYPE_JSON: &str = "application/json";

pub(crate) mod api {
    use super::WebApiHdlrLabel;

    #[allow(non_camel_case_types)]
    pub(crate) struct web {}

    impl web {
        pub(crate) const PRODUCT_COLLECTION: WebApiHdlrLabel = "product_collection";
        pub(crate) const PRODUCT_INSTANCE: WebApiHdlrLabel = "product_instance";
        pub(crate) const ORDER_COLLECTION: WebApiHdlrLabel = "order_collection";
        pub(crate) const ORDER_INSTANCE: WebApiHdlrLabel = "order_instance";
    }
}

pub mod logging {
    use serde::Deserialize;

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize, Debug, Clone)]
    pub enum Level {
        TRACE,
        DEBUG,
        INFO,
        WARNING,
        ERROR,
        FATAL,
    }

    #[allow(clippy::upper_case_acronyms)]
    #[derive(Deserialize, Debug, Clone)]
    #[serde(rename_all = "lowercase")]
    pub enum Destination {
        CONSOLE,
        LOCALFS,
    }
}
