use std::collections::hash_map::RandomState;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::result::Result as DefaultResult;
use std::str::FromStr;
use std::sync::Arc;

use serde::de::{Error as DeserializeError, Expected};
use serde::Deserialize;

use crate::constant::{default_local, env_vars, limit, logging as const_log};
use crate::error::{AppError, AppErrorCode};
use crate::{AppLogAlias, WebApiPath};

// module paths which emit log events, each of them is registered as a logger
// in the built-in configuration
const DEFAULT_LOGGER_ALIASES: [&str; 9] = [
    "industrial_order::adapter::catalog",
    "industrial_order::adapter::datastore",
    "industrial_order::adapter::datastore::sql_db",
    "industrial_order::api::web::order",
    "industrial_order::api::web::product",
    "industrial_order::usecase::manage_order",
    "industrial_order::usecase::product_lookup",
    "web",
    "init_db",
];

#[derive(Deserialize)]
pub struct AppLogHandlerCfg {
    pub min_level: const_log::Level,
    pub destination: const_log::Destination,
    pub alias: AppLogAlias,
    pub path: Option<String>,
}

#[derive(Deserialize)]
pub struct AppLoggerCfg {
    pub alias: AppLogAlias,
    pub handlers: Vec<String>,
    pub level: Option<const_log::Level>,
}

#[derive(Deserialize)]
pub struct AppLoggingCfg {
    pub handlers: Vec<AppLogHandlerCfg>,
    pub loggers: Vec<AppLoggerCfg>,
}

#[derive(Deserialize)]
pub struct WebApiRouteCfg {
    pub path: WebApiPath,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub handler: String,
}

impl std::fmt::Display for WebApiRouteCfg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path:{}, handler:{}", self.path, self.handler)
    }
}

#[derive(Deserialize)]
pub struct AppCorsCfg {
    // empty list or the wildcard `*` means any origin is allowed
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub preflight_max_age: u64,
}

#[derive(Deserialize)]
pub struct WebApiListenCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub api_base: String,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub cors: Option<AppCorsCfg>,
    pub routes: Vec<WebApiRouteCfg>,
}

#[derive(Deserialize, Debug, Clone)]
pub enum AppDbServerType {
    MariaDB,
}

#[derive(Deserialize, Debug)]
pub struct AppInMemoryDbCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub alias: String,
    pub max_items: u32,
}

#[derive(Deserialize, Debug)]
pub struct AppDbServerCfg {
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub alias: String,
    pub srv_type: AppDbServerType,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub host: String,
    pub port: u16,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub db_name: String,
    pub max_conns: u32,
    pub acquire_timeout_secs: u16, // for acquiring connection from pool
    pub idle_timeout_secs: u16,
}

#[allow(non_camel_case_types)]
#[derive(Deserialize)]
#[serde(tag = "_type")]
pub enum AppDataStoreCfg {
    InMemory(AppInMemoryDbCfg),
    DbServer(AppDbServerCfg),
}

#[derive(Deserialize)]
pub struct ApiServerCfg {
    pub logging: AppLoggingCfg,
    pub listen: WebApiListenCfg,
    pub limit_req_body_in_bytes: usize,
    pub num_workers: u8,
    pub stack_sz_kb: u16,
    pub data_store: Vec<AppDataStoreCfg>,
    // relative to service base path
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub product_catalog: String,
    #[serde(deserialize_with = "jsn_deny_empty_string")]
    pub static_assets: String,
}

pub struct AppBasepathCfg {
    pub service: String,
}

pub struct AppConfig {
    pub basepath: AppBasepathCfg,
    pub api_server: ApiServerCfg,
}

impl AppBasepathCfg {
    pub fn resolve(&self, path: &str) -> String {
        if path.starts_with('/') {
            path.to_string()
        } else if self.service.ends_with('/') {
            self.service.clone() + path
        } else {
            self.service.clone() + "/" + path
        }
    }
}

impl ApiServerCfg {
    /// configuration applied when no config file is given, everything
    /// runs on local machine
    pub fn default_local() -> Self {
        let handlers = vec![AppLogHandlerCfg {
            min_level: const_log::Level::INFO,
            destination: const_log::Destination::CONSOLE,
            alias: Arc::new("std-output".to_string()),
            path: None,
        }];
        let loggers = DEFAULT_LOGGER_ALIASES
            .iter()
            .map(|alias| AppLoggerCfg {
                alias: Arc::new(alias.to_string()),
                handlers: vec!["std-output".to_string()],
                level: None,
            })
            .collect();
        let routes = [
            ("/products", "product_collection"),
            ("/products/:article_number", "product_instance"),
            ("/orders", "order_collection"),
            ("/orders/:order_id", "order_instance"),
        ]
        .into_iter()
        .map(|(path, handler)| WebApiRouteCfg {
            path: path.to_string(),
            handler: handler.to_string(),
        })
        .collect();
        let listen = WebApiListenCfg {
            api_base: default_local::API_BASE.to_string(),
            host: default_local::LISTEN_HOST.to_string(),
            port: default_local::LISTEN_PORT,
            max_connections: default_local::MAX_CONNECTIONS,
            cors: None,
            routes,
        };
        let db = AppDbServerCfg {
            alias: default_local::DB_ALIAS.to_string(),
            srv_type: AppDbServerType::MariaDB,
            host: default_local::DB_HOST.to_string(),
            port: default_local::DB_PORT,
            user: default_local::DB_USER.to_string(),
            password: None,
            db_name: default_local::DB_NAME.to_string(),
            max_conns: default_local::DB_MAX_CONNS,
            acquire_timeout_secs: default_local::DB_ACQUIRE_TIMEOUT_SECS,
            idle_timeout_secs: default_local::DB_IDLE_TIMEOUT_SECS,
        };
        Self {
            logging: AppLoggingCfg { handlers, loggers },
            listen,
            limit_req_body_in_bytes: default_local::LIMIT_REQ_BODY_BYTES,
            num_workers: default_local::NUM_WORKERS,
            stack_sz_kb: default_local::STACK_SIZE_KB,
            data_store: vec![AppDataStoreCfg::DbServer(db)],
            product_catalog: default_local::CATALOG_PATH.to_string(),
            static_assets: default_local::STATIC_ASSET_PATH.to_string(),
        }
    } // end of fn default_local
} // end of impl ApiServerCfg

impl AppConfig {
    pub fn new(mut args: HashMap<String, String, RandomState>) -> DefaultResult<Self, AppError> {
        let app_basepath = args
            .remove(env_vars::SERVICE_BASEPATH)
            .unwrap_or(default_local::SERVICE_BASEPATH.to_string());
        if app_basepath.is_empty() {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAppBasePath,
            });
        }
        let basepath = AppBasepathCfg {
            service: app_basepath,
        };
        let mut api_srv_cfg = if let Some(cfg_path) = args.remove(env_vars::CFG_FILEPATH) {
            let fullpath = basepath.resolve(cfg_path.as_str());
            Self::parse_from_file(fullpath)?
        } else {
            ApiServerCfg::default_local()
        };
        Self::apply_env_overrides(&mut api_srv_cfg, args)?;
        Self::_check_datastore(&api_srv_cfg.data_store)?;
        Ok(Self {
            api_server: api_srv_cfg,
            basepath,
        })
    } // end of new

    pub fn parse_from_file(filepath: String) -> DefaultResult<ApiServerCfg, AppError> {
        // load and parse a config file with given path
        let fileobj = File::open(filepath)?;
        let reader = BufReader::new(fileobj);
        let jsnobj = serde_json::from_reader::<BufReader<File>, ApiServerCfg>(reader)?;
        Self::_check_web_listener(&jsnobj.listen)?;
        Self::_check_logging(&jsnobj.logging)?;
        Self::_check_datastore(&jsnobj.data_store)?;
        Ok(jsnobj)
    }

    fn apply_env_overrides(
        cfg: &mut ApiServerCfg,
        mut args: HashMap<String, String, RandomState>,
    ) -> DefaultResult<(), AppError> {
        if let Some(v) = args.remove(env_vars::LISTEN_PORT) {
            cfg.listen.port = Self::parse_env_value::<u16>(env_vars::LISTEN_PORT, v)?;
        }
        let db_port = match args.remove(env_vars::DB_PORT) {
            Some(v) => Some(Self::parse_env_value::<u16>(env_vars::DB_PORT, v)?),
            None => None,
        };
        let db_host = args.remove(env_vars::DB_HOST);
        let db_user = args.remove(env_vars::DB_USER);
        let db_passwd = args.remove(env_vars::DB_PASSWORD);
        let db_name = args.remove(env_vars::DB_NAME);
        cfg.data_store
            .iter_mut()
            .filter_map(|item| match item {
                AppDataStoreCfg::DbServer(c) => Some(c),
                AppDataStoreCfg::InMemory(_) => None,
            })
            .for_each(|c| {
                if let Some(v) = db_host.as_ref() {
                    c.host = v.clone();
                }
                if let Some(v) = db_port {
                    c.port = v;
                }
                if let Some(v) = db_user.as_ref() {
                    c.user = v.clone();
                }
                if let Some(v) = db_passwd.as_ref() {
                    c.password = Some(v.clone());
                }
                if let Some(v) = db_name.as_ref() {
                    c.db_name = v.clone();
                }
            });
        Ok(())
    } // end of fn apply_env_overrides

    fn parse_env_value<T: FromStr>(label: &str, raw: String) -> DefaultResult<T, AppError> {
        raw.trim().parse::<T>().map_err(|_e| AppError {
            code: AppErrorCode::InvalidInput,
            detail: Some(format!("env-var:{label}, value:{raw}")),
        })
    }

    fn _check_web_listener(obj: &WebApiListenCfg) -> DefaultResult<(), AppError> {
        let mut iter2 = obj
            .routes
            .iter()
            .filter(|i| i.path.is_empty() || i.handler.is_empty());
        if obj.routes.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoRouteApiServerCfg,
            })
        } else if let Some(badroute) = iter2.next() {
            let err_msg = Some(badroute.to_string());
            Err(AppError {
                detail: err_msg,
                code: AppErrorCode::InvalidRouteConfig,
            })
        } else if obj.api_base.contains('/') {
            let err_msg = Some(format!("api-base:{}", obj.api_base));
            Err(AppError {
                detail: err_msg,
                code: AppErrorCode::InvalidRouteConfig,
            })
        } else {
            Ok(())
        }
    } // end of _check_web_listener

    fn _check_logging(obj: &AppLoggingCfg) -> DefaultResult<(), AppError> {
        let mut filtered = obj.loggers.iter().filter(|item| item.handlers.is_empty());
        let mut filtered2 = obj.handlers.iter().filter(|item| match &item.destination {
            const_log::Destination::LOCALFS => item.path.is_none(),
            _other => false,
        }); // for file-type handler, the field `path` has to be provided
        let mut filtered3 = obj.handlers.iter().filter(|item| item.alias.is_empty());
        let mut filtered4 = obj.loggers.iter().filter(|item| item.alias.is_empty());
        if obj.handlers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLogHandlerCfg,
            })
        } else if obj.loggers.is_empty() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::NoLoggerCfg,
            })
        } else if let Some(alogger) = filtered.next() {
            let msg = format!("the logger does not have handler: {}", alogger.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::NoHandlerInLoggerCfg,
            })
        } else if filtered3.next().is_some() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAliasLogHdlerCfg,
            })
        } else if filtered4.next().is_some() {
            Err(AppError {
                detail: None,
                code: AppErrorCode::MissingAliasLoggerCfg,
            })
        } else if let Some(ahandler) = filtered2.next() {
            let msg = format!("file-type handler does not contain path: {}", ahandler.alias);
            Err(AppError {
                detail: Some(msg),
                code: AppErrorCode::InvalidHandlerLoggerCfg,
            })
        } else {
            let iter = obj.handlers.iter().map(|i| i.alias.as_str());
            let hdlr_alias_map: HashSet<&str> = HashSet::from_iter(iter);
            let mut filtered = obj.loggers.iter().filter(|item| {
                item.handlers
                    .iter()
                    .any(|i| !hdlr_alias_map.contains(i.as_str()))
            }); // handler alias in each logger has to be present
            if let Some(alogger) = filtered.next() {
                let msg = format!(
                    "the logger contains invalid handler alias: {}",
                    alogger.alias
                );
                Err(AppError {
                    detail: Some(msg),
                    code: AppErrorCode::InvalidHandlerLoggerCfg,
                })
            } else {
                Ok(())
            }
        }
    } // end of _check_logging

    fn _check_datastore(obj: &[AppDataStoreCfg]) -> DefaultResult<(), AppError> {
        if obj.is_empty() {
            return Err(AppError {
                detail: None,
                code: AppErrorCode::NoDatabaseCfg,
            });
        }
        for item in obj {
            match item {
                AppDataStoreCfg::InMemory(c) => {
                    let lmt = limit::MAX_ITEMS_STORED_PER_MODEL;
                    if c.max_items > lmt {
                        let e = AppError {
                            detail: Some(format!("limit:{}", lmt)),
                            code: AppErrorCode::ExceedingMaxLimit,
                        };
                        return Err(e);
                    }
                }
                AppDataStoreCfg::DbServer(c) => {
                    let lmt_conn = limit::MAX_DB_CONNECTIONS;
                    let lmt_idle = limit::MAX_SECONDS_DB_IDLE;
                    if c.max_conns == 0 || c.max_conns > lmt_conn {
                        let e = AppError {
                            detail: Some(format!("limit-conn:{}", lmt_conn)),
                            code: AppErrorCode::ExceedingMaxLimit,
                        };
                        return Err(e);
                    } else if c.idle_timeout_secs > lmt_idle {
                        let e = AppError {
                            detail: Some(format!("limit-idle-time:{}", lmt_idle)),
                            code: AppErrorCode::ExceedingMaxLimit,
                        };
                        return Err(e);
                    } else if !is_valid_db_identifier(c.db_name.as_str()) {
                        let e = AppError {
                            detail: Some(format!("db-name:{}", c.db_name)),
                            code: AppErrorCode::InvalidInput,
                        };
                        return Err(e);
                    }
                }
            }
        } // end of loop
        Ok(())
    } // end of _check_datastore
} // end of impl AppConfig

// the database name is interpolated into DDL statements during schema setup,
// restrict it to plain identifier characters
pub(crate) fn is_valid_db_identifier(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

struct ExpectNonEmptyString {
    min_len: u32,
}

impl Expected for ExpectNonEmptyString {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        let msg = format!("minimum string length >= {}", self.min_len);
        formatter.write_str(msg.as_str())
    }
}

fn jsn_deny_empty_string<'de, D>(raw: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(raw)?;
    if s.is_empty() {
        let exp = ExpectNonEmptyString { min_len: 1 };
        Err(DeserializeError::invalid_length(0, &exp))
    } else {
        Ok(s)
    }
}

#[test]
fn verify_db_identifier() {
    assert!(is_valid_db_identifier("industrial_orders"));
    assert!(is_valid_db_identifier("shop$2024"));
    assert!(!is_valid_db_identifier(""));
    assert!(!is_valid_db_identifier("orders`; DROP DATABASE x"));
    assert!(!is_valid_db_identifier("my-db"));
}
