use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::env;
use std::process;
use std::sync::Arc;

use tokio::runtime::Builder as RuntimeBuilder;

use industrial_order::constant::env_vars::EXPECTED_LABELS;
use industrial_order::datastore::AppMariaDbStore;
use industrial_order::logging::{app_log_event, AppLogContext, AppLogLevel};
use industrial_order::{AppConfig, AppDataStoreCfg};

async fn init_all(cfg: &AppConfig, log_ctx: Arc<AppLogContext>) -> bool {
    let db_cfgs = cfg.api_server.data_store.iter().filter_map(|c| match c {
        AppDataStoreCfg::DbServer(d) => Some(d),
        AppDataStoreCfg::InMemory(_) => None,
    });
    let mut num_done = 0usize;
    for d in db_cfgs {
        let result = match AppMariaDbStore::try_build(d) {
            Ok(db) => db.ensure_schema().await,
            Err(e) => Err(e),
        };
        if let Err(e) = result {
            app_log_event!(
                log_ctx,
                AppLogLevel::ERROR,
                "database initialization failed, alias:{}, reason:{e}",
                d.alias
            );
            return false;
        }
        app_log_event!(
            log_ctx,
            AppLogLevel::INFO,
            "database and table ready, alias:{}, db:{}",
            d.alias,
            d.db_name
        );
        num_done += 1;
    }
    if num_done == 0 {
        app_log_event!(log_ctx, AppLogLevel::WARNING, "no database server configured");
    }
    true
} // end of fn init_all

fn main() {
    let iter = env::vars().filter(|(k, _v)| EXPECTED_LABELS.contains(&k.as_str()));
    let arg_map: HashMap<String, String, RandomState> = HashMap::from_iter(iter);
    let cfg = match AppConfig::new(arg_map) {
        Ok(c) => c,
        Err(e) => {
            println!("app failed to configure, error code: {} ", e);
            process::exit(1);
        }
    };
    let log_ctx = Arc::new(AppLogContext::new(&cfg.basepath, &cfg.api_server.logging));
    let rt = match RuntimeBuilder::new_current_thread().enable_all().build() {
        Ok(r) => r,
        Err(e) => {
            println!("async runtime failed to build, {} ", e);
            process::exit(1);
        }
    };
    let done = rt.block_on(init_all(&cfg, log_ctx));
    if !done {
        process::exit(1);
    }
} // end of main
