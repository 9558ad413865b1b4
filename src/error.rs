use std::fmt::{Debug, Display};

#[derive(Debug, Clone, PartialEq)]
pub enum AppErrorCode {
    Unknown,
    MissingAppBasePath,
    MissingDataStore,
    InvalidJsonFormat,
    InvalidRouteConfig,
    MissingAliasLogHdlerCfg,
    MissingAliasLoggerCfg,
    NoRouteApiServerCfg,
    NoLogHandlerCfg,
    NoLoggerCfg,
    FeatureDisabled,
    NoHandlerInLoggerCfg,
    InvalidHandlerLoggerCfg,
    InvalidInput,   // for frontend client error
    NoDatabaseCfg,
    RemoteDbServerFailure,
    ExceedingMaxLimit,
    DatabaseServerBusy,
    DataTableNotExist,
    DataCorruption,
    ProductNotExist,
    OrderNotExist,
    IOerror(std::io::ErrorKind),
} // end of AppErrorCode

#[derive(Debug, Clone)]
pub struct AppError {
    pub code: AppErrorCode,
    pub detail: Option<String>,
}

impl Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let default_detail = "none";
        let dp = if let Some(s) = &self.detail {
            s.as_str()
        } else {
            default_detail
        };
        write!(f, "code:{:?}, detail:{}", self.code, dp)
    }
}

impl std::error::Error for AppError {}

impl From<(AppErrorCode, String)> for AppError {
    fn from(value: (AppErrorCode, String)) -> Self {
        AppError {
            code: value.0,
            detail: Some(value.1),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError {
            code: AppErrorCode::InvalidJsonFormat,
            detail: Some(value.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError {
            code: AppErrorCode::IOerror(value.kind()),
            detail: Some(value.to_string()),
        }
    }
}

impl AppError {
    /// errors caused by client input, their detail can be safely
    /// exposed in http response
    pub fn is_client_fault(&self) -> bool {
        matches!(self.code, AppErrorCode::InvalidInput)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self.code,
            AppErrorCode::OrderNotExist | AppErrorCode::ProductNotExist
        )
    }
}
