use std::result::Result as DefaultResult;

#[cfg(feature = "mariadb")]
use std::ops::DerefMut;
#[cfg(feature = "mariadb")]
use std::time::Duration;

#[cfg(feature = "mariadb")]
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
#[cfg(feature = "mariadb")]
use sqlx::pool::{PoolConnection, PoolOptions};
#[cfg(feature = "mariadb")]
use sqlx::{Connection, Executor, MySql, Pool};

use crate::config::{AppDbServerCfg, AppDbServerType};
use crate::error::{AppError, AppErrorCode};

#[cfg(feature = "mariadb")]
const DDL_CREATE_ORDERS: &str = "CREATE TABLE IF NOT EXISTS `orders` (\
    `row_id` INT AUTO_INCREMENT PRIMARY KEY,\
    `order_id` VARCHAR(36) NOT NULL,\
    `product_id` VARCHAR(50) NOT NULL,\
    `quantity` INT NOT NULL,\
    `order_date` TIMESTAMP(6) NOT NULL DEFAULT CURRENT_TIMESTAMP(6),\
    INDEX `idx_order_id` (`order_id`),\
    INDEX `idx_product_id` (`product_id`)\
)";

#[cfg(feature = "mariadb")]
pub struct AppMariaDbStore {
    pub alias: String,
    db_name: String,
    // connection options without default database, for bootstrapping schema
    server_opts: MySqlConnectOptions,
    pool: Pool<MySql>,
}
#[cfg(not(feature = "mariadb"))]
pub struct AppMariaDbStore {
    pub alias: String,
}

#[cfg(feature = "mariadb")]
impl AppMariaDbStore {
    pub fn try_build(cfg: &AppDbServerCfg) -> DefaultResult<Self, AppError> {
        if !matches!(cfg.srv_type, AppDbServerType::MariaDB) {
            let detail = format!("db-cfg-server-type: {:?}", cfg.srv_type);
            return Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(detail),
            });
        }
        let mut server_opts = MySqlConnectOptions::new()
            .host(cfg.host.as_str())
            .port(cfg.port)
            .username(cfg.user.as_str());
        if let Some(p) = cfg.password.as_ref() {
            server_opts = server_opts.password(p.as_str());
        }
        let conn_opts = server_opts.clone().database(cfg.db_name.as_str());
        let pol_opts = PoolOptions::<MySql>::new()
            .max_connections(cfg.max_conns)
            .idle_timeout(Some(Duration::new(cfg.idle_timeout_secs as u64, 0)))
            .acquire_timeout(Duration::new(cfg.acquire_timeout_secs as u64, 0))
            .min_connections(0);
        // no connection is established until the first request arrives
        let pool = pol_opts.connect_lazy_with(conn_opts);
        Ok(Self {
            pool,
            server_opts,
            db_name: cfg.db_name.clone(),
            alias: cfg.alias.clone(),
        })
    }

    pub async fn acquire(&self) -> DefaultResult<PoolConnection<MySql>, AppError> {
        // callers wait in queue until a connection is released or
        // the acquire timeout is reached
        let conn = self.pool.acquire().await?;
        Ok(conn)
    }

    /// create the database and the order table if they do not exist yet
    pub async fn ensure_schema(&self) -> DefaultResult<(), AppError> {
        if !crate::config::is_valid_db_identifier(self.db_name.as_str()) {
            return Err(AppError {
                code: AppErrorCode::InvalidInput,
                detail: Some(format!("db-name:{}", self.db_name)),
            });
        }
        let mut conn = MySqlConnection::connect_with(&self.server_opts).await?;
        let stmt = format!("CREATE DATABASE IF NOT EXISTS `{}`", self.db_name);
        conn.execute(stmt.as_str()).await?;
        conn.close().await?;

        let mut conn = self.acquire().await?;
        let exec = conn.deref_mut();
        exec.execute(DDL_CREATE_ORDERS).await?;
        Ok(())
    }
} // end of impl AppMariaDbStore

#[cfg(not(feature = "mariadb"))]
impl AppMariaDbStore {
    pub fn try_build(cfg: &AppDbServerCfg) -> DefaultResult<Self, AppError> {
        let detail = format!(
            "sql-db, type:{:?}, alias:{}",
            cfg.srv_type,
            cfg.alias.as_str()
        );
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some(detail),
        })
    }

    pub async fn ensure_schema(&self) -> DefaultResult<(), AppError> {
        Err(AppError {
            code: AppErrorCode::FeatureDisabled,
            detail: Some(format!("sql-db, alias:{}", self.alias)),
        })
    }
} // end of impl AppMariaDbStore
